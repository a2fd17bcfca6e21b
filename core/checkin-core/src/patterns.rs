//! Compiled regex patterns for scanning status text.
//!
//! Compiled once on first use. Extend `RE_LINK`'s TLD list when a bare
//! domain should start being linked.

use once_cell::sync::Lazy;
use regex::Regex;

// ═══════════════════════════════════════════════════════════════════════════════
// Link Detection
// ═══════════════════════════════════════════════════════════════════════════════

/// URL-like spans, in priority order:
/// - explicit `http://`, `https://`, `ftp://` URLs (scheme captured as `scheme`)
/// - `www.` hosts
/// - bare hosts ending in a well-known TLD, with an optional path
pub static RE_LINK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r#"(?i)(?P<scheme>\b(?:https?|ftp)://)[^\s<>"]+"#,
        r#"|\bwww\.[^\s<>"]+"#,
        r#"|\b(?:[a-z0-9](?:[a-z0-9-]*[a-z0-9])?\.)+"#,
        r#"(?:com|org|net|edu|gov|io|dev|town|club|xyz|info|me|app|social|space|online)\b"#,
        r#"(?:/[^\s<>"]*)?"#,
    ))
    .unwrap()
});

/// Characters that end a sentence rather than a URL.
pub const LINK_TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', ':', '!', '?', '\'', '"'];
