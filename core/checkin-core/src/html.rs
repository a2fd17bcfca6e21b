//! HTML list rendering for `get --output-html`.
//!
//! Text is escaped first; anchors are built around already-escaped pieces and
//! never escaped again.

use crate::config::SiteConfig;
use crate::links::find_links;
use crate::types::StatusRecord;

pub const LIST_OPEN: &str = "<ul>";
pub const LIST_CLOSE: &str = "</ul>";

/// Escapes `&`, `<`, `>`, `"` and `'`.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn anchor(href: &str, text: &str) -> String {
    format!("<a href=\"{}\">{}</a>", escape(href), escape(text))
}

/// Renders a normalized status line as a `<li>` element.
///
/// The leading `~owner` token links to the owner's profile page; other URL-like
/// spans link to themselves.
pub fn render_line(text: &str, owner: &str, site: &SiteConfig) -> String {
    let tilde_owner = format!("~{}", owner);
    let (head, rest) = match text.strip_prefix(&tilde_owner) {
        Some(rest) => (anchor(&site.profile_url(owner), &tilde_owner), rest),
        None => (String::new(), text),
    };

    let mut out = String::with_capacity(text.len() * 2);
    out.push_str("<li>");
    out.push_str(&head);

    let mut position = 0;
    for link in find_links(rest) {
        out.push_str(&escape(&rest[position..link.start]));
        out.push_str(&anchor(&link.href(rest), link.text(rest)));
        position = link.end;
    }
    out.push_str(&escape(&rest[position..]));
    out.push_str("</li>");
    out
}

/// Renders records as lines of an HTML list, including the opening and
/// closing list tags. Empty statuses are left out.
pub fn render_list<I>(records: I, site: &SiteConfig) -> Vec<String>
where
    I: IntoIterator<Item = StatusRecord>,
{
    let mut lines = vec![LIST_OPEN.to_string()];
    lines.extend(
        records
            .into_iter()
            .filter(|r| !r.is_empty())
            .map(|r| render_line(&r.text, &r.owner, site)),
    );
    lines.push(LIST_CLOSE.to_string());
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(owner: &str, text: &str) -> StatusRecord {
        StatusRecord {
            owner: owner.to_string(),
            text: text.to_string(),
            captured_at: Utc::now(),
        }
    }

    #[test]
    fn test_escape() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&#34;Tom&#34; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_render_line_with_link() {
        let html = render_line("~alice: see http://x.test", "alice", &SiteConfig::default());
        assert_eq!(
            html,
            "<li><a href=\"https://tilde.town/~alice/\">~alice</a>: see \
             <a href=\"http://x.test\">http://x.test</a></li>"
        );
        assert_eq!(html.matches("<a ").count(), 2);
    }

    #[test]
    fn test_render_line_escapes_literal_text_only() {
        let html = render_line(
            "~alice: <script> & http://x.test/?a=1&b=2",
            "alice",
            &SiteConfig::default(),
        );
        assert!(html.contains(": &lt;script&gt; &amp; "));
        assert!(html.contains("<a href=\"http://x.test/?a=1&amp;b=2\">http://x.test/?a=1&amp;b=2</a>"));
        assert!(!html.contains("&lt;a"));
    }

    #[test]
    fn test_render_line_defaults_scheme() {
        let html = render_line("~bob: www.example.org", "bob", &SiteConfig::default());
        assert!(html.contains("<a href=\"http://www.example.org\">www.example.org</a>"));
    }

    #[test]
    fn test_render_list_brackets_and_skips_empty() {
        let lines = render_list(
            vec![record("alice", "~alice: hi"), record("bob", "")],
            &SiteConfig::default(),
        );
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "<ul>");
        assert!(lines[1].starts_with("<li>"));
        assert_eq!(lines[2], "</ul>");
    }

    #[test]
    fn test_render_list_empty_input() {
        let lines = render_list(Vec::new(), &SiteConfig::default());
        assert_eq!(lines, vec!["<ul>", "</ul>"]);
    }
}
