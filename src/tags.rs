//! Tag pattern matching
//!
//! Every tag family the renderer understands is described by a [`TagPattern`]:
//! a compiled regex plus a name used in logs. Patterns are compiled once per
//! process (see the `Lazy` statics below) and matched against the plain text
//! of a [`StyledText`](crate::styled::StyledText); the byte ranges they yield
//! are then used to slice the styled buffer so that existing styles survive.
//!
//! Block tags follow the shape `<para style="X">content</para>`; leading
//! whitespace inside the opening tag is skipped and the content runs up to the
//! first closing `</para>`.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

/// The whitespace class used throughout the pipeline (ASCII only)
pub(crate) const WS: &str = r"[ \t\n\x0B\x0C\r]";

/// A compiled tag shape
#[derive(Debug)]
pub struct TagPattern {
    name: &'static str,
    regex: Regex,
}

/// One occurrence of a tag in the text
#[derive(Debug)]
pub struct TagMatch<'t> {
    captures: Captures<'t>,
}

impl<'t> TagMatch<'t> {
    /// Byte range of the whole tag
    pub fn range(&self) -> Range<usize> {
        self.captures.get(0).map(|m| m.range()).unwrap_or(0..0)
    }

    pub fn start(&self) -> usize {
        self.range().start
    }

    pub fn end(&self) -> usize {
        self.range().end
    }

    /// Byte range of a capture group, if it participated in the match
    pub fn group(&self, index: usize) -> Option<Range<usize>> {
        self.captures.get(index).map(|m| m.range())
    }

    pub fn group_str(&self, index: usize) -> Option<&'t str> {
        self.captures.get(index).map(|m| m.as_str())
    }
}

impl TagPattern {
    /// Compile a pattern. Panics on an invalid regex; patterns are constants.
    pub fn new(name: &'static str, pattern: &str) -> Self {
        let regex = Regex::new(pattern)
            .unwrap_or_else(|e| panic!("invalid tag pattern '{}': {}", name, e));
        TagPattern { name, regex }
    }

    /// `<para style="STYLE">content</para>`. The content is the last group.
    pub fn para(name: &'static str, style: &str) -> Self {
        let pattern = format!(
            r#"(?s)<para{ws}+style="{style}"{ws}*>{ws}*(.*?)</para>"#,
            ws = WS,
            style = style
        );
        Self::new(name, &pattern)
    }

    /// Self-closing `<para style="STYLE"/>`
    pub fn para_void(name: &'static str, style: &str) -> Self {
        let pattern = format!(r#"<para{ws}+style="{style}"{ws}*/>"#, ws = WS, style = style);
        Self::new(name, &pattern)
    }

    /// `<char style="STYLE">content</char>`
    pub fn char_style(name: &'static str, style: &str) -> Self {
        let pattern = format!(
            r#"(?s)<char{ws}+style="{style}"{ws}*>{ws}*(.*?)</char>"#,
            ws = WS,
            style = style
        );
        Self::new(name, &pattern)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// All non-overlapping occurrences, left to right
    pub fn find_iter<'t>(&'t self, text: &'t str) -> impl Iterator<Item = TagMatch<'t>> + 't {
        self.regex
            .captures_iter(text)
            .map(|captures| TagMatch { captures })
    }

    /// The leftmost occurrence
    pub fn find<'t>(&self, text: &'t str) -> Option<TagMatch<'t>> {
        self.regex.captures(text).map(|captures| TagMatch { captures })
    }
}

pub static TRIM: Lazy<TagPattern> =
    Lazy::new(|| TagPattern::new("trim", &format!(r"^{ws}+|{ws}+$", ws = WS)));
pub static LINE_BREAKS: Lazy<TagPattern> =
    Lazy::new(|| TagPattern::new("line-breaks", &format!(r"{ws}*\n+{ws}*", ws = WS)));
pub static WHITESPACE: Lazy<TagPattern> =
    Lazy::new(|| TagPattern::new("whitespace", &format!(r"{ws}+", ws = WS)));

pub static MAJOR_SECTION_HEADING: Lazy<TagPattern> =
    Lazy::new(|| TagPattern::para("major-section-heading", "ms"));
pub static SECTION_HEADING: Lazy<TagPattern> =
    Lazy::new(|| TagPattern::para("section-heading", "s"));
pub static PARAGRAPH: Lazy<TagPattern> = Lazy::new(|| TagPattern::para("paragraph", "p"));
pub static BLANK_LINE: Lazy<TagPattern> = Lazy::new(|| TagPattern::para_void("blank-line", "b"));
pub static CHAPTER_LABEL: Lazy<TagPattern> = Lazy::new(|| TagPattern::para("chapter-label", "cl"));
/// Group 1 is the level, group 2 the content
pub static POETIC_LINE: Lazy<TagPattern> =
    Lazy::new(|| TagPattern::para("poetic-line", r"q(\d+)"));
pub static RIGHT_ALIGNED_POETIC_LINE: Lazy<TagPattern> =
    Lazy::new(|| TagPattern::para("right-aligned-poetic-line", "qr"));
pub static SELAH: Lazy<TagPattern> = Lazy::new(|| TagPattern::char_style("selah", "qs"));

/// Group 1 is the raw `number` attribute
pub static VERSE: Lazy<TagPattern> = Lazy::new(|| {
    TagPattern::new(
        "verse",
        &format!(
            r#"<verse{ws}+number="([^"]*)"{ws}+style="v"{ws}*/>"#,
            ws = WS
        ),
    )
});

/// Group 1 is the attribute list, group 2 the body
pub static NOTE: Lazy<TagPattern> = Lazy::new(|| {
    TagPattern::new(
        "note",
        &format!(r#"(?s)<note({ws}[^>]*)>(.*?)</note>"#, ws = WS),
    )
});

/// Prefix that identifies a verse tag inside raw content
pub(crate) const VERSE_TAG_PREFIX: &str = "<verse number";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_para_captures_content() {
        let text = r#"x<para style="s">  Intro</para>y"#;
        let m = SECTION_HEADING.find(text).unwrap();
        assert_eq!(m.start(), 1);
        assert_eq!(m.group_str(1), Some("Intro"));
        assert_eq!(&text[m.range()], r#"<para style="s">  Intro</para>"#);
    }

    #[test]
    fn test_para_style_is_exact() {
        let text = r#"<para style="ms">Title</para>"#;
        assert!(SECTION_HEADING.find(text).is_none());
        assert!(MAJOR_SECTION_HEADING.find(text).is_some());
    }

    #[test]
    fn test_para_content_stops_at_first_close() {
        let text = r#"<para style="p">one</para><para style="p">two</para>"#;
        let contents: Vec<_> = PARAGRAPH
            .find_iter(text)
            .map(|m| m.group_str(1).unwrap())
            .collect();
        assert_eq!(contents, vec!["one", "two"]);
    }

    #[test]
    fn test_poetic_line_captures_level() {
        let text = r#"<para style="q2">line</para>"#;
        let m = POETIC_LINE.find(text).unwrap();
        assert_eq!(m.group_str(1), Some("2"));
        assert_eq!(m.group_str(2), Some("line"));
        assert!(POETIC_LINE.find(r#"<para style="qr">x</para>"#).is_none());
    }

    #[test]
    fn test_blank_line_void_tag() {
        assert!(BLANK_LINE.find(r#"<para style="b" />"#).is_some());
        assert!(BLANK_LINE.find(r#"<para style="b"/>"#).is_some());
        assert!(BLANK_LINE.find(r#"<para style="b">x</para>"#).is_none());
    }

    #[test]
    fn test_verse_and_note_tags() {
        let verse = VERSE.find(r#"<verse number="3-5" style="v" />"#).unwrap();
        assert_eq!(verse.group_str(1), Some("3-5"));

        let note = NOTE
            .find(r#"a<note caller="+" style="f"><char style="ft">text</char></note>b"#)
            .unwrap();
        assert_eq!(note.group_str(1), Some(r#" caller="+" style="f""#));
        assert_eq!(note.group_str(2), Some(r#"<char style="ft">text</char>"#));
    }

    #[test]
    fn test_selah() {
        let m = SELAH.find(r#"<char style="qs">Selah</char>"#).unwrap();
        assert_eq!(m.group_str(1), Some("Selah"));
    }
}
