//! Per-document renderer state: heading anchors, table of contents, title.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

/// Runs of punctuation, symbols, separators and control characters.
static SLUG_SEPARATORS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\p{P}\p{S}\p{Z}\p{C}]+").unwrap());

/// Table of contents entry.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TocEntry {
    /// Output heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor ID for linking.
    pub id: String,
}

/// Heading bookkeeping for one document.
#[derive(Debug, Default)]
pub(crate) struct HeadingState {
    /// Text of the first H1.
    title: Option<String>,
    toc: Vec<TocEntry>,
    /// Occurrences seen per base slug.
    id_counts: HashMap<String, usize>,
}

impl HeadingState {
    /// Register a heading and return its unique anchor ID.
    pub(crate) fn push_heading(&mut self, rank: u8, level: u8, text: &str) -> String {
        let id = self.generate_id(text);
        if rank == 0 && self.title.is_none() {
            self.title = Some(text.to_owned());
        }
        self.toc.push(TocEntry {
            level,
            title: text.to_owned(),
            id: id.clone(),
        });
        id
    }

    /// First occurrence keeps the bare slug, later ones get `-1`, `-2`, ...
    fn generate_id(&mut self, text: &str) -> String {
        let base_id = slugify(text);
        let count = self.id_counts.entry(base_id.clone()).or_default();
        *count += 1;
        match *count {
            1 => base_id,
            n => format!("{base_id}-{}", n - 1),
        }
    }

    pub(crate) fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub(crate) fn toc(&self) -> &[TocEntry] {
        &self.toc
    }

    pub(crate) fn take_toc(&mut self) -> Vec<TocEntry> {
        std::mem::take(&mut self.toc)
    }

    pub(crate) fn reset(&mut self) {
        self.title = None;
        self.toc.clear();
        self.id_counts.clear();
    }
}

/// Convert heading text to an anchor slug.
///
/// Lower-cases the text and collapses every run of punctuation, symbol,
/// separator or control characters into a single `-`. Leading and trailing
/// dashes are kept, so `"What's new?"` becomes `"what-s-new-"`.
#[must_use]
pub fn slugify(text: &str) -> String {
    SLUG_SEPARATORS
        .replace_all(&text.to_lowercase(), "-")
        .into_owned()
}

/// Escape HTML special characters.
#[must_use]
pub fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' => result.push_str("&quot;"),
            '\'' => result.push_str("&#39;"),
            _ => result.push(c),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Title"), "title");
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("Multiple   Spaces"), "multiple-spaces");
        assert_eq!(slugify("What's New?"), "what-s-new-");
        assert_eq!(slugify("a + b = c"), "a-b-c");
        assert_eq!(slugify("snake_case"), "snake-case");
        assert_eq!(slugify("tab\there"), "tab-here");
    }

    #[test]
    fn test_slugify_keeps_unicode_letters() {
        assert_eq!(slugify("Ñandú Güero"), "ñandú-güero");
        assert_eq!(slugify("日本語 テキスト"), "日本語-テキスト");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(escape_html("a & b"), "a &amp; b");
        assert_eq!(escape_html(r#""quoted""#), "&quot;quoted&quot;");
        assert_eq!(escape_html("it's"), "it&#39;s");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_duplicate_ids() {
        let mut state = HeadingState::default();
        assert_eq!(state.push_heading(1, 2, "Foo"), "foo");
        assert_eq!(state.push_heading(1, 2, "Foo"), "foo-1");
        assert_eq!(state.push_heading(2, 3, "foo"), "foo-2");
        assert_eq!(state.push_heading(1, 2, "Bar"), "bar");
    }

    #[test]
    fn test_title_is_first_h1() {
        let mut state = HeadingState::default();
        state.push_heading(1, 2, "Section");
        assert_eq!(state.title(), None);
        state.push_heading(0, 1, "Post");
        state.push_heading(0, 1, "Other");
        assert_eq!(state.title(), Some("Post"));
    }

    #[test]
    fn test_toc_and_reset() {
        let mut state = HeadingState::default();
        state.push_heading(0, 1, "Intro");
        state.push_heading(1, 2, "Intro");
        assert_eq!(
            state.toc(),
            &[
                TocEntry {
                    level: 1,
                    title: "Intro".to_owned(),
                    id: "intro".to_owned(),
                },
                TocEntry {
                    level: 2,
                    title: "Intro".to_owned(),
                    id: "intro-1".to_owned(),
                },
            ]
        );

        state.reset();
        assert!(state.toc().is_empty());
        assert_eq!(state.title(), None);
        assert_eq!(state.push_heading(0, 1, "Intro"), "intro");
    }

    #[test]
    fn test_take_toc() {
        let mut state = HeadingState::default();
        state.push_heading(0, 1, "A");
        assert_eq!(state.take_toc().len(), 1);
        assert!(state.toc().is_empty());
    }
}
