//! Status normalization.
//!
//! Turns whatever a user left in their status file into one display line that
//! starts with `~user`. An empty result means "no status".

/// Normalizes raw status file bytes owned by `username`.
///
/// Rules, in order:
/// 1. Decode lossily, fold line breaks into spaces, drop control characters
///    and trim.
/// 2. Empty text stays empty.
/// 3. Text already starting with `~username` is kept.
/// 4. Text starting with bare `username` gets a `~` prepended.
/// 5. Anything else becomes `~username: <text>`.
///
/// The username is taken verbatim; callers derive it from a trusted source.
pub fn normalize_status(raw: &[u8], username: &str) -> String {
    normalize_text(&String::from_utf8_lossy(raw), username)
}

/// Joins command-line words into a normalized status.
pub fn normalize_args<S: AsRef<str>>(args: &[S], username: &str) -> String {
    let joined = args
        .iter()
        .map(|a| a.as_ref())
        .collect::<Vec<_>>()
        .join(" ");
    normalize_text(&joined, username)
}

/// Same rules as [`normalize_status`] for text that is already decoded.
pub fn normalize_text(text: &str, username: &str) -> String {
    let line = single_line(text);
    if line.is_empty() {
        return line;
    }

    let tilde_user = format!("~{}", username);
    if line.starts_with(&tilde_user) {
        line
    } else if line.starts_with(username) {
        format!("~{}", line)
    } else {
        format!("{}: {}", tilde_user, line)
    }
}

/// Folds each line break into one space and drops control characters other
/// than tab, then trims. Whitespace inside a line is left alone.
fn single_line(text: &str) -> String {
    let folded = text
        .lines()
        .flat_map(|l| l.split('\r'))
        .collect::<Vec<_>>()
        .join(" ");
    folded
        .chars()
        .filter(|c| *c == '\t' || !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}
