//! Interactive status capture.
//!
//! ## State Machine
//!
//! ```text
//! Editing ── Enter / Ctrl-D ──────────→ Submitted
//! Editing ── Esc / Ctrl-C / EOF ──────→ Cancelled
//! Editing ── any other key ───────────→ Editing   (forwarded to LineEditor)
//! ```
//!
//! The `~user` prefix is drawn in front of the editable buffer but is not part
//! of it. The buffer starts as a single space so typing doesn't run into the
//! prefix. Cancelling keeps whatever was typed; the caller decides what a
//! cancelled capture means.

use crate::error::{CheckinError, Result};
use std::collections::VecDeque;
use std::io;

/// Terminal-independent key events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    Paste(String),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    KillToStart,
    KillToEnd,
    DeleteWordBack,
    Enter,
    /// Ctrl-D: confirm, like Enter.
    Eof,
    Escape,
    /// Ctrl-C
    Interrupt,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    Escape,
    Interrupt,
    /// The event source ran dry before a terminal key arrived.
    InputClosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureState {
    Editing,
    Submitted,
    Cancelled(CancelReason),
}

impl CaptureState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, CaptureState::Editing)
    }
}

/// Single-line text buffer with a char-indexed cursor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    chars: Vec<char>,
    cursor: usize,
}

impl LineEditor {
    /// Creates an editor holding `value` with the cursor at the end.
    pub fn with_value(value: &str) -> Self {
        let chars: Vec<char> = value.chars().collect();
        let cursor = chars.len();
        Self { chars, cursor }
    }

    pub fn value(&self) -> String {
        self.chars.iter().collect()
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert_str(&mut self, text: &str) {
        for c in text.chars().filter(|c| !c.is_control()) {
            self.chars.insert(self.cursor, c);
            self.cursor += 1;
        }
    }

    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.chars.len() {
            self.chars.remove(self.cursor);
        }
    }

    pub fn delete_word_back(&mut self) {
        let mut start = self.cursor;
        while start > 0 && self.chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !self.chars[start - 1].is_whitespace() {
            start -= 1;
        }
        self.chars.drain(start..self.cursor);
        self.cursor = start;
    }

    /// Applies an editing key. Returns false for keys that are not edits.
    pub fn apply(&mut self, key: &KeyInput) -> bool {
        match key {
            KeyInput::Char(c) => {
                let mut buf = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut buf));
            }
            KeyInput::Paste(text) => self.insert_str(&text.replace(['\r', '\n'], " ")),
            KeyInput::Backspace => self.backspace(),
            KeyInput::Delete => self.delete(),
            KeyInput::Left => self.cursor = self.cursor.saturating_sub(1),
            KeyInput::Right => self.cursor = (self.cursor + 1).min(self.chars.len()),
            KeyInput::Home => self.cursor = 0,
            KeyInput::End => self.cursor = self.chars.len(),
            KeyInput::KillToStart => {
                self.chars.drain(..self.cursor);
                self.cursor = 0;
            }
            KeyInput::KillToEnd => self.chars.truncate(self.cursor),
            KeyInput::DeleteWordBack => self.delete_word_back(),
            KeyInput::Enter | KeyInput::Eof | KeyInput::Escape | KeyInput::Interrupt => {
                return false
            }
        }
        true
    }
}

/// Supplies key events. `Ok(None)` means no more input will arrive.
pub trait EventSource {
    fn next_key(&mut self) -> io::Result<Option<KeyInput>>;
}

/// Draws the capture session. Called once up front and after every event.
pub trait CaptureView {
    fn draw(&mut self, session: &CaptureSession) -> io::Result<()>;
}

/// A fixed key sequence, for scripted input.
#[derive(Debug, Clone, Default)]
pub struct ScriptedKeys(VecDeque<KeyInput>);

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = KeyInput>) -> Self {
        Self(keys.into_iter().collect())
    }

    /// One `Char` per character of `text`.
    pub fn typed(text: &str) -> Self {
        Self::new(text.chars().map(KeyInput::Char))
    }

    pub fn then(mut self, key: KeyInput) -> Self {
        self.0.push_back(key);
        self
    }
}

impl EventSource for ScriptedKeys {
    fn next_key(&mut self) -> io::Result<Option<KeyInput>> {
        Ok(self.0.pop_front())
    }
}

/// A view that draws nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoView;

impl CaptureView for NoView {
    fn draw(&mut self, _session: &CaptureSession) -> io::Result<()> {
        Ok(())
    }
}

/// Final state and extracted status of a finished capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaptureOutcome {
    pub state: CaptureState,
    /// `~user` + trimmed buffer, or empty.
    pub status: String,
}

impl CaptureOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self.state, CaptureState::Cancelled(_))
    }
}

#[derive(Debug, Clone)]
pub struct CaptureSession {
    prompt: String,
    prefix: String,
    editor: LineEditor,
    state: CaptureState,
}

impl CaptureSession {
    pub fn new(prompt: impl Into<String>, prefix: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            prefix: prefix.into(),
            editor: LineEditor::with_value(" "),
            state: CaptureState::Editing,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    /// Processes one key. Keys after a terminal state are ignored.
    pub fn handle(&mut self, key: KeyInput) -> CaptureState {
        if self.state.is_terminal() {
            return self.state;
        }

        self.state = match key {
            KeyInput::Enter | KeyInput::Eof => CaptureState::Submitted,
            KeyInput::Escape => CaptureState::Cancelled(CancelReason::Escape),
            KeyInput::Interrupt => CaptureState::Cancelled(CancelReason::Interrupt),
            other => {
                self.editor.apply(&other);
                CaptureState::Editing
            }
        };
        self.state
    }

    /// Prefix plus the buffer without trailing whitespace; empty when the
    /// trimmed buffer is empty.
    pub fn result(&self) -> String {
        let value = self.editor.value();
        let trimmed = value.trim_end();
        if trimmed.is_empty() {
            String::new()
        } else {
            format!("{}{}", self.prefix, trimmed)
        }
    }

    /// Runs the event loop until a terminal state is reached.
    pub fn run(
        mut self,
        events: &mut dyn EventSource,
        view: &mut dyn CaptureView,
    ) -> Result<CaptureOutcome> {
        view.draw(&self).map_err(CheckinError::Terminal)?;
        while !self.state.is_terminal() {
            match events.next_key().map_err(CheckinError::Terminal)? {
                Some(key) => {
                    self.handle(key);
                }
                None => self.state = CaptureState::Cancelled(CancelReason::InputClosed),
            }
            view.draw(&self).map_err(CheckinError::Terminal)?;
        }

        tracing::debug!(state = ?self.state, "Capture finished");
        Ok(CaptureOutcome {
            state: self.state,
            status: self.result(),
        })
    }
}
