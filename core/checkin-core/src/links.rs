//! URL detection inside a normalized status line.

use crate::patterns::{LINK_TRAILING_PUNCTUATION, RE_LINK};

pub const DEFAULT_SCHEME: &str = "http://";

/// A URL-like region of a status line. Offsets are byte offsets into the
/// scanned text; `scheme` is empty when the text carries none.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpan {
    pub start: usize,
    pub end: usize,
    pub scheme: String,
}

impl LinkSpan {
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.start..self.end]
    }

    /// The address to link to, with `http://` supplied for scheme-less spans.
    pub fn href(&self, source: &str) -> String {
        let link = self.text(source);
        let scheme = if self.scheme.is_empty() {
            DEFAULT_SCHEME
        } else {
            self.scheme.as_str()
        };
        if link.starts_with(scheme) {
            link.to_string()
        } else {
            format!("{}{}", scheme, link)
        }
    }
}

/// Finds link spans in `text`, left to right, without overlaps.
pub fn find_links(text: &str) -> Vec<LinkSpan> {
    RE_LINK
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            // The host part of an email address is not a link of its own.
            if text[..whole.start()].ends_with('@') {
                return None;
            }

            let scheme = caps
                .name("scheme")
                .map(|m| m.as_str().to_string())
                .unwrap_or_default();
            let end = whole.start() + trim_trailing(whole.as_str()).len();
            if end - whole.start() <= scheme.len() {
                return None;
            }

            Some(LinkSpan {
                start: whole.start(),
                end,
                scheme,
            })
        })
        .collect()
}

/// Drops sentence punctuation and unbalanced closing brackets from the end.
fn trim_trailing(candidate: &str) -> &str {
    let mut s = candidate;
    loop {
        let Some(last) = s.chars().last() else {
            return s;
        };
        let unbalanced = match last {
            ')' => s.matches(')').count() > s.matches('(').count(),
            ']' => s.matches(']').count() > s.matches('[').count(),
            '}' => s.matches('}').count() > s.matches('{').count(),
            _ => false,
        };
        if unbalanced || LINK_TRAILING_PUNCTUATION.contains(&last) {
            s = &s[..s.len() - last.len_utf8()];
        } else {
            return s;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(text: &str) -> Vec<&str> {
        find_links(text).iter().map(|l| l.text(text)).collect()
    }

    #[test]
    fn test_explicit_scheme() {
        let text = "~alice: see http://x.test";
        let links = find_links(text);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text(text), "http://x.test");
        assert_eq!(links[0].scheme, "http://");
        assert_eq!(links[0].href(text), "http://x.test");
    }

    #[test]
    fn test_www_without_scheme_defaults_to_http() {
        let text = "reading www.example.org/blog today";
        let links = find_links(text);
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].text(text), "www.example.org/blog");
        assert_eq!(links[0].scheme, "");
        assert_eq!(links[0].href(text), "http://www.example.org/blog");
    }

    #[test]
    fn test_bare_domain() {
        assert_eq!(spans("mirroring tilde.town/~alice now"), vec!["tilde.town/~alice"]);
    }

    #[test]
    fn test_trailing_punctuation_is_not_part_of_link() {
        assert_eq!(spans("go to https://a.test/x."), vec!["https://a.test/x"]);
        assert_eq!(spans("(see https://a.test/x)"), vec!["https://a.test/x"]);
        assert_eq!(
            spans("wiki https://a.test/Foo_(bar) ok"),
            vec!["https://a.test/Foo_(bar)"]
        );
    }

    #[test]
    fn test_multiple_links_in_order() {
        assert_eq!(
            spans("http://one.test and https://two.test/"),
            vec!["http://one.test", "https://two.test/"]
        );
    }

    #[test]
    fn test_email_host_is_skipped() {
        assert!(find_links("mail me at bob@example.com").is_empty());
    }

    #[test]
    fn test_scheme_alone_is_not_a_link() {
        assert!(find_links("type http://. please").is_empty());
    }

    #[test]
    fn test_plain_text_has_no_links() {
        assert!(find_links("~alice: just vibing").is_empty());
    }

    #[test]
    fn test_offsets_are_bytes() {
        let text = "ünï http://x.test";
        let links = find_links(text);
        assert_eq!(links[0].start, "ünï ".len());
        assert_eq!(links[0].end, text.len());
    }
}
