//! Inline notes (footnotes, endnotes, cross references)
//!
//! Grammar of a note tag, as matched by the note stage:
//!
//! ```text
//! <note style="f" caller="+"><char style="fr">1.2 </char><char style="ft">Or, breath</char></note>
//! ```
//!
//! The attribute list must name a known `style` and a `caller`. The body is
//! plain text interleaved with `<char style="...">text</char>` elements; `fr`
//! and `xo` elements hold the reference, everything else is note text.

use crate::error::NoteParseError;
use crate::styled::{ClickKind, ClickRegion, StyleAttribute, StyledText};
use chumsky::prelude::*;
use serde::Serialize;

type Attribute = (String, String);

/// Which kind of note a tag declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteKind {
    Footnote,
    Endnote,
    CrossReference,
}

impl NoteKind {
    fn from_style(style: &str) -> Option<Self> {
        match style {
            "f" => Some(NoteKind::Footnote),
            "fe" | "ef" => Some(NoteKind::Endnote),
            "x" | "ex" => Some(NoteKind::CrossReference),
            _ => None,
        }
    }

    /// Glyph shown when the caller is generated (`+`) or hidden (`-`)
    fn glyph(&self) -> &'static str {
        match self {
            NoteKind::Footnote | NoteKind::Endnote => "*",
            NoteKind::CrossReference => "†",
        }
    }
}

/// A parsed note
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NoteMarker {
    kind: NoteKind,
    caller: String,
    reference: Option<String>,
    text: String,
}

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Char { style: String, text: String },
    Text(String),
}

impl NoteMarker {
    /// Parse a note from its raw attribute list and body
    pub fn parse(attributes: &str, body: &str) -> Result<Self, NoteParseError> {
        let attributes = attribute_list().parse(attributes).map_err(malformed)?;

        let style = attribute_value(&attributes, "style")
            .ok_or(NoteParseError::MissingAttribute("style"))?;
        let kind = NoteKind::from_style(style)
            .ok_or_else(|| NoteParseError::UnknownStyle(style.to_string()))?;
        let caller = attribute_value(&attributes, "caller")
            .ok_or(NoteParseError::MissingAttribute("caller"))?
            .to_string();

        let segments = note_body().parse(body).map_err(malformed)?;
        let mut reference = None;
        let mut text = String::new();
        for segment in segments {
            match segment {
                Segment::Char { style, text: value } if style == "fr" || style == "xo" => {
                    let value = normalize_whitespace(&value);
                    if !value.is_empty() {
                        reference = Some(value);
                    }
                }
                Segment::Char { text: value, .. } | Segment::Text(value) => text.push_str(&value),
            }
        }

        let text = normalize_whitespace(&text);
        if text.is_empty() {
            return Err(NoteParseError::Empty);
        }

        Ok(NoteMarker {
            kind,
            caller,
            reference,
            text,
        })
    }

    pub fn kind(&self) -> NoteKind {
        self.kind
    }

    pub fn caller(&self) -> &str {
        &self.caller
    }

    pub fn reference(&self) -> Option<&str> {
        self.reference.as_deref()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// What the reader sees in the running text
    pub fn display_glyph(&self) -> &str {
        match self.caller.as_str() {
            "" | "+" | "-" => self.kind.glyph(),
            caller => caller,
        }
    }

    /// The text handed to the note click handler
    pub fn payload(&self) -> String {
        match &self.reference {
            Some(reference) => format!("{} {}", reference, self.text),
            None => self.text.clone(),
        }
    }

    pub fn render(&self) -> StyledText {
        let region = ClickRegion::new(ClickKind::Note, self.payload());
        StyledText::styled(
            self.display_glyph(),
            [StyleAttribute::Italic, StyleAttribute::Clickable(region)],
        )
    }
}

fn attribute_value<'a>(attributes: &'a [Attribute], key: &str) -> Option<&'a str> {
    attributes
        .iter()
        .find(|(name, _)| name == key)
        .map(|(_, value)| value.as_str())
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn malformed(errors: Vec<Simple<char>>) -> NoteParseError {
    let message = errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ");
    NoteParseError::Malformed(message)
}

/// `key="value"`, surrounded by optional whitespace
fn attribute() -> impl Parser<char, Attribute, Error = Simple<char>> + Clone {
    let key = filter(|c: &char| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .repeated()
        .at_least(1)
        .collect::<String>();
    let value = filter(|c: &char| *c != '"')
        .repeated()
        .collect::<String>()
        .delimited_by(just('"'), just('"'));

    key.then_ignore(just('=')).then(value).padded()
}

fn attribute_list() -> impl Parser<char, Vec<Attribute>, Error = Simple<char>> {
    attribute().repeated().then_ignore(end())
}

fn note_body() -> impl Parser<char, Vec<Segment>, Error = Simple<char>> {
    let char_element = just("<char")
        .ignore_then(attribute().repeated())
        .then_ignore(just('>'))
        .then(filter(|c: &char| *c != '<').repeated().collect::<String>())
        .then_ignore(just("</char>"))
        .try_map(|(attributes, text): (Vec<Attribute>, String), span| {
            match attribute_value(&attributes, "style") {
                Some(style) => Ok(Segment::Char {
                    style: style.to_string(),
                    text,
                }),
                None => Err(Simple::custom(span, "char element without a style")),
            }
        });

    let plain = filter(|c: &char| *c != '<')
        .repeated()
        .at_least(1)
        .collect::<String>()
        .map(Segment::Text);

    char_element.or(plain).repeated().then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FOOTNOTE_ATTRS: &str = r#" style="f" caller="+""#;

    #[test]
    fn test_parse_footnote() {
        let note = NoteMarker::parse(
            FOOTNOTE_ATTRS,
            r#"<char style="fr">1.2 </char><char style="ft">Or, the  breath</char>"#,
        )
        .unwrap();

        assert_eq!(note.kind(), NoteKind::Footnote);
        assert_eq!(note.caller(), "+");
        assert_eq!(note.reference(), Some("1.2"));
        assert_eq!(note.text(), "Or, the breath");
        assert_eq!(note.display_glyph(), "*");
        assert_eq!(note.payload(), "1.2 Or, the breath");
    }

    #[test]
    fn test_parse_plain_body() {
        let note = NoteMarker::parse(r#" caller="a" style="x""#, "See also John 1.1").unwrap();
        assert_eq!(note.kind(), NoteKind::CrossReference);
        assert_eq!(note.display_glyph(), "a");
        assert_eq!(note.reference(), None);
        assert_eq!(note.text(), "See also John 1.1");
    }

    #[test]
    fn test_mixed_body() {
        let note = NoteMarker::parse(
            FOOTNOTE_ATTRS,
            r#"Hebrew <char style="fq">ruach</char> means wind"#,
        )
        .unwrap();
        assert_eq!(note.text(), "Hebrew ruach means wind");
    }

    #[test]
    fn test_missing_caller() {
        let err = NoteMarker::parse(r#" style="f""#, "text").unwrap_err();
        assert_eq!(err, NoteParseError::MissingAttribute("caller"));
    }

    #[test]
    fn test_missing_style() {
        let err = NoteMarker::parse(r#" caller="+""#, "text").unwrap_err();
        assert_eq!(err, NoteParseError::MissingAttribute("style"));
    }

    #[test]
    fn test_unknown_style() {
        let err = NoteMarker::parse(r#" style="zz" caller="+""#, "text").unwrap_err();
        assert_eq!(err, NoteParseError::UnknownStyle("zz".into()));
    }

    #[test]
    fn test_unclosed_char_element_is_malformed() {
        let err = NoteMarker::parse(FOOTNOTE_ATTRS, r#"<char style="ft">text"#).unwrap_err();
        assert!(matches!(err, NoteParseError::Malformed(_)));
    }

    #[test]
    fn test_char_without_style_is_malformed() {
        let err = NoteMarker::parse(FOOTNOTE_ATTRS, r#"<char>text</char>"#).unwrap_err();
        assert!(matches!(err, NoteParseError::Malformed(_)));
    }

    #[test]
    fn test_reference_only_is_empty() {
        let err =
            NoteMarker::parse(FOOTNOTE_ATTRS, r#"<char style="fr">1.2</char>"#).unwrap_err();
        assert_eq!(err, NoteParseError::Empty);
    }

    #[test]
    fn test_render() {
        let note = NoteMarker::parse(FOOTNOTE_ATTRS, "Or, wind").unwrap();
        assert_eq!(note.render().to_markup(), "[italic,note=Or, wind]*[/]");
    }
}
