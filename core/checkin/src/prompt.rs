//! Terminal front end for interactive capture.
//!
//! Draws `<question> ~user <buffer>` on a single inline line (no alternate
//! screen) and feeds crossterm key events into the capture state machine.
//! Raw mode is held by a guard for exactly as long as the capture runs.

use checkin_core::{
    CaptureOutcome, CaptureSession, CaptureView, CheckinError, EventSource, KeyInput,
};
use crossterm::event::{
    self, DisableBracketedPaste, EnableBracketedPaste, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers,
};
use crossterm::execute;
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::{
    backend::CrosstermBackend,
    layout::Position,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Terminal, TerminalOptions, Viewport,
};
use std::io;

/// Prompts on the terminal until the user submits or cancels.
pub fn capture(question: &str, prefix: &str) -> Result<CaptureOutcome, CheckinError> {
    let session = CaptureSession::new(question, prefix);

    let outcome = {
        let _raw = RawModeGuard::acquire().map_err(CheckinError::Terminal)?;
        let mut view = InlineView::new().map_err(CheckinError::Terminal)?;
        let outcome = session.run(&mut TerminalEvents, &mut view);
        let _ = view.terminal.show_cursor();
        outcome
    };

    // Raw mode is off again, so a plain newline moves below the prompt.
    println!();
    outcome
}

/// Raw mode plus bracketed paste, so a pasted block arrives as one
/// `Event::Paste` instead of keystrokes whose first newline would submit.
struct RawModeGuard;

impl RawModeGuard {
    fn acquire() -> io::Result<Self> {
        enable_raw_mode()?;
        if let Err(e) = execute!(io::stdout(), EnableBracketedPaste) {
            let _ = disable_raw_mode();
            return Err(e);
        }
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), DisableBracketedPaste);
        let _ = disable_raw_mode();
    }
}

struct TerminalEvents;

impl EventSource for TerminalEvents {
    fn next_key(&mut self) -> io::Result<Option<KeyInput>> {
        loop {
            if let Some(input) = map_event(event::read()?) {
                return Ok(Some(input));
            }
        }
    }
}

fn map_event(event: Event) -> Option<KeyInput> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => map_key(key),
        Event::Paste(text) => Some(KeyInput::Paste(text)),
        _ => None,
    }
}

/// Maps a crossterm key to a capture key. Emacs-style control chords cover
/// the usual line-editing shortcuts.
fn map_key(key: KeyEvent) -> Option<KeyInput> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let input = match key.code {
        KeyCode::Char(c) if ctrl => match c.to_ascii_lowercase() {
            'c' => KeyInput::Interrupt,
            'd' => KeyInput::Eof,
            'a' => KeyInput::Home,
            'e' => KeyInput::End,
            'b' => KeyInput::Left,
            'f' => KeyInput::Right,
            'h' => KeyInput::Backspace,
            'u' => KeyInput::KillToStart,
            'k' => KeyInput::KillToEnd,
            'w' => KeyInput::DeleteWordBack,
            _ => return None,
        },
        KeyCode::Char(c) => KeyInput::Char(c),
        KeyCode::Enter => KeyInput::Enter,
        KeyCode::Esc => KeyInput::Escape,
        KeyCode::Backspace => KeyInput::Backspace,
        KeyCode::Delete => KeyInput::Delete,
        KeyCode::Left => KeyInput::Left,
        KeyCode::Right => KeyInput::Right,
        KeyCode::Home => KeyInput::Home,
        KeyCode::End => KeyInput::End,
        _ => return None,
    };
    Some(input)
}

struct InlineView {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    question_style: Style,
}

impl InlineView {
    fn new() -> io::Result<Self> {
        let terminal = Terminal::with_options(
            CrosstermBackend::new(io::stdout()),
            TerminalOptions {
                viewport: Viewport::Inline(1),
            },
        )?;
        let question_style = if color_enabled() {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        Ok(Self {
            terminal,
            question_style,
        })
    }
}

impl CaptureView for InlineView {
    fn draw(&mut self, session: &CaptureSession) -> io::Result<()> {
        let value = session.editor().value();
        let cursor_col =
            session.prompt().chars().count() + 1 + session.prefix().chars().count() + session.editor().cursor();
        let line = Line::from(vec![
            Span::styled(session.prompt(), self.question_style),
            Span::raw(" "),
            Span::raw(session.prefix()),
            Span::raw(value),
        ]);
        let editing = !session.state().is_terminal();

        self.terminal.draw(|f| {
            let area = f.area();
            f.render_widget(Paragraph::new(line), area);
            if editing {
                let col = u16::try_from(cursor_col)
                    .unwrap_or(u16::MAX)
                    .min(area.width.saturating_sub(1));
                f.set_cursor_position(Position::new(area.x + col, area.y));
            }
        })?;
        Ok(())
    }
}

fn color_enabled() -> bool {
    std::env::var_os("NO_COLOR").is_none()
        && std::env::var("TERM").map(|t| t != "dumb").unwrap_or(true)
}
