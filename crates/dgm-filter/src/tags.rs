//! Tag extraction for code nodes.
//!
//! A code node is tagged either through its class list (`{.diagram}` on the
//! fence) or through a marker line: a first line consisting solely of
//! `{.name}`. The marker line is removed from the body the diagram sees.

use std::sync::LazyLock;

use dgm_doc::Attr;
use regex::Regex;

/// Class names recognized by the filter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Markers {
    /// Diagram blocks and inline spans.
    pub diagram: String,
    /// Definition blocks.
    pub definition: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            diagram: "diagram".to_owned(),
            definition: "diagram-def".to_owned(),
        }
    }
}

static MARKER_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\{\.([A-Za-z][A-Za-z0-9_-]*)\}\s*$").unwrap());

/// Body text split into an optional marker-line tag and the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkedBody<'a> {
    pub tag: Option<&'a str>,
    pub body: &'a str,
}

/// Split a leading marker line off `text`.
///
/// Without a marker line the whole text is returned as the body.
#[must_use]
pub fn split_marker_line(text: &str) -> MarkedBody<'_> {
    let (first, rest) = text.split_once('\n').unwrap_or((text, ""));

    match MARKER_LINE.captures(first).and_then(|caps| caps.get(1)) {
        Some(tag) => MarkedBody {
            tag: Some(tag.as_str()),
            body: rest,
        },
        None => MarkedBody {
            tag: None,
            body: text,
        },
    }
}

/// Effective tag set and body of a code node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeTags<'a> {
    /// Marker-line tag (if any) followed by the declared classes.
    pub tags: Vec<&'a str>,
    /// Body with the marker line removed.
    pub body: &'a str,
}

impl<'a> CodeTags<'a> {
    #[must_use]
    pub fn new(attr: &'a Attr, text: &'a str) -> Self {
        let marked = split_marker_line(text);
        let tags = marked
            .tag
            .into_iter()
            .chain(attr.classes.iter().map(String::as_str))
            .collect();
        Self {
            tags,
            body: marked.body,
        }
    }

    #[must_use]
    pub fn has(&self, marker: &str) -> bool {
        self.tags.iter().any(|tag| *tag == marker)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_split_marker_line() {
        let marked = split_marker_line("{.diagram}\ndia = circle 1");

        assert_eq!(marked.tag, Some("diagram"));
        assert_eq!(marked.body, "dia = circle 1");
    }

    #[test]
    fn test_split_marker_line_keeps_remaining_lines() {
        let marked = split_marker_line("{.diagram-def}\na = 1\nb = 2\n");

        assert_eq!(marked.tag, Some("diagram-def"));
        assert_eq!(marked.body, "a = 1\nb = 2\n");
    }

    #[test]
    fn test_split_marker_line_tolerates_whitespace_and_crlf() {
        let marked = split_marker_line("  {.diagram}  \r\ndia = circle 1");

        assert_eq!(marked.tag, Some("diagram"));
        assert_eq!(marked.body, "dia = circle 1");
    }

    #[test]
    fn test_split_marker_line_alone() {
        let marked = split_marker_line("{.diagram}");

        assert_eq!(marked.tag, Some("diagram"));
        assert_eq!(marked.body, "");
    }

    #[test]
    fn test_split_no_marker_line() {
        for text in [
            "dia = circle 1",
            "{.diagram} dia = circle 1",
            "{diagram}\ndia = circle 1",
            "{.1diagram}\nx",
            "{.two words}\nx",
            "",
            "\n{.diagram}",
        ] {
            let marked = split_marker_line(text);
            assert_eq!(marked.tag, None, "unexpected tag for {text:?}");
            assert_eq!(marked.body, text);
        }
    }

    #[test]
    fn test_code_tags_prepends_marker_tag() {
        let attr = Attr::with_classes(["haskell", "wide"]);
        let tags = CodeTags::new(&attr, "{.diagram}\ndia = circle 1");

        assert_eq!(tags.tags, vec!["diagram", "haskell", "wide"]);
        assert_eq!(tags.body, "dia = circle 1");
        assert!(tags.has("diagram"));
        assert!(tags.has("wide"));
        assert!(!tags.has("diagram-def"));
    }

    #[test]
    fn test_code_tags_without_marker_line() {
        let attr = Attr::with_classes(["diagram"]);
        let tags = CodeTags::new(&attr, "dia = circle 1");

        assert_eq!(tags.tags, vec!["diagram"]);
        assert_eq!(tags.body, "dia = circle 1");
    }
}
