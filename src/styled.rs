//! Styled text buffer
//!
//! `StyledText` is plain text plus an ordered list of runs, each run covering a
//! byte range of the text with a set of style attributes. Runs are contiguous,
//! non-empty and together cover the whole text; adjacent runs never share the
//! same style set (they are merged on insertion).
//!
//! Stages build their output by appending slices of their input, so styles
//! attached by earlier passes travel along with the text they cover. Appending
//! never re-derives or drops an existing run; the only way to change styling is
//! to wrap a whole value with additional attributes via [`StyledText::with_styles`].

use serde::Serialize;
use std::collections::BTreeSet;
use std::fmt;
use std::ops::Range;

/// What a clickable region refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClickKind {
    Verse,
    Note,
}

/// A tap target and the data handed to its handler
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ClickRegion {
    pub kind: ClickKind,
    pub payload: String,
}

impl ClickRegion {
    pub fn new(kind: ClickKind, payload: impl Into<String>) -> Self {
        ClickRegion {
            kind,
            payload: payload.into(),
        }
    }
}

/// A presentation or interactivity attribute attached to a run
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StyleAttribute {
    Bold,
    Italic,
    Normal,
    AlignCenter,
    /// Trailing-edge alignment (right in left-to-right scripts)
    AlignOpposite,
    Clickable(ClickRegion),
}

impl fmt::Display for StyleAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StyleAttribute::Bold => write!(f, "bold"),
            StyleAttribute::Italic => write!(f, "italic"),
            StyleAttribute::Normal => write!(f, "normal"),
            StyleAttribute::AlignCenter => write!(f, "center"),
            StyleAttribute::AlignOpposite => write!(f, "opposite"),
            StyleAttribute::Clickable(region) => match region.kind {
                ClickKind::Verse => write!(f, "verse={}", region.payload),
                ClickKind::Note => write!(f, "note={}", region.payload),
            },
        }
    }
}

pub type StyleSet = BTreeSet<StyleAttribute>;

/// A byte range of the text and the styles applied to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Run {
    pub range: Range<usize>,
    pub styles: StyleSet,
}

/// Text with positional style annotations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StyledText {
    text: String,
    runs: Vec<Run>,
}

impl StyledText {
    pub fn new() -> Self {
        Self::default()
    }

    /// Unstyled text
    pub fn plain(text: impl Into<String>) -> Self {
        let text = text.into();
        let mut out = Self::new();
        out.push_str(&text);
        out
    }

    /// Text carrying the given attributes over its whole length
    pub fn styled(text: &str, styles: impl IntoIterator<Item = StyleAttribute>) -> Self {
        let mut out = Self::new();
        out.push_styled(text, styles);
        out
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn runs(&self) -> &[Run] {
        &self.runs
    }

    /// Iterate over `(text, styles)` pairs in document order
    pub fn segments(&self) -> impl Iterator<Item = (&str, &StyleSet)> + '_ {
        self.runs
            .iter()
            .map(move |run| (&self.text[run.range.clone()], &run.styles))
    }

    /// Append unstyled text
    pub fn push_str(&mut self, text: &str) {
        self.push_run(text, StyleSet::new());
    }

    pub fn push_styled(&mut self, text: &str, styles: impl IntoIterator<Item = StyleAttribute>) {
        self.push_run(text, styles.into_iter().collect());
    }

    /// Append another styled value, keeping all of its runs
    pub fn append(&mut self, other: &StyledText) {
        self.text.reserve(other.len());
        for (text, styles) in other.segments() {
            self.push_run(text, styles.clone());
        }
    }

    /// Insert another styled value at the very front
    pub fn prepend(&mut self, other: &StyledText) {
        let mut out = other.clone();
        out.append(self);
        *self = out;
    }

    /// Copy out a byte range, splitting runs at the boundaries.
    ///
    /// The range must fall on char boundaries.
    pub fn slice(&self, range: Range<usize>) -> StyledText {
        let mut out = StyledText::new();
        let first = self.runs.partition_point(|run| run.range.end <= range.start);
        for run in &self.runs[first..] {
            if run.range.start >= range.end {
                break;
            }
            let start = run.range.start.max(range.start);
            let end = run.range.end.min(range.end);
            if start < end {
                out.push_run(&self.text[start..end], run.styles.clone());
            }
        }
        out
    }

    /// Add attributes to every run, keeping the ones already present
    pub fn with_styles(mut self, attrs: impl IntoIterator<Item = StyleAttribute>) -> Self {
        let attrs: Vec<StyleAttribute> = attrs.into_iter().collect();
        for run in &mut self.runs {
            run.styles.extend(attrs.iter().cloned());
        }
        self.coalesce();
        self
    }

    /// Rewrite the text of each run independently; styles are carried over.
    pub fn map_text(&self, f: impl Fn(&str) -> String) -> StyledText {
        let mut out = StyledText::new();
        for (text, styles) in self.segments() {
            out.push_run(&f(text), styles.clone());
        }
        out
    }

    /// Styles of the run covering `offset`
    pub fn styles_at(&self, offset: usize) -> Option<&StyleSet> {
        let index = self.runs.partition_point(|run| run.range.end <= offset);
        self.runs
            .get(index)
            .filter(|run| run.range.contains(&offset))
            .map(|run| &run.styles)
    }

    /// All clickable regions with the byte range they cover
    pub fn clickable_regions(&self) -> impl Iterator<Item = (Range<usize>, &ClickRegion)> + '_ {
        self.runs.iter().filter_map(|run| {
            run.styles.iter().find_map(|attr| match attr {
                StyleAttribute::Clickable(region) => Some((run.range.clone(), region)),
                _ => None,
            })
        })
    }

    /// Debug rendering: styled runs are written as `[bold,center]text[/]`.
    pub fn to_markup(&self) -> String {
        let mut out = String::with_capacity(self.text.len());
        for (text, styles) in self.segments() {
            if styles.is_empty() {
                out.push_str(text);
                continue;
            }
            let names: Vec<String> = styles.iter().map(|attr| attr.to_string()).collect();
            out.push('[');
            out.push_str(&names.join(","));
            out.push(']');
            out.push_str(text);
            out.push_str("[/]");
        }
        out
    }

    fn push_run(&mut self, text: &str, styles: StyleSet) {
        if text.is_empty() {
            return;
        }
        let start = self.text.len();
        self.text.push_str(text);
        let end = self.text.len();
        match self.runs.last_mut() {
            Some(last) if last.styles == styles => last.range.end = end,
            _ => self.runs.push(Run {
                range: start..end,
                styles,
            }),
        }
    }

    fn coalesce(&mut self) {
        self.runs.dedup_by(|next, prev| {
            if prev.styles == next.styles {
                prev.range.end = next.range.end;
                true
            } else {
                false
            }
        });
    }
}

impl From<&str> for StyledText {
    fn from(text: &str) -> Self {
        StyledText::plain(text)
    }
}

impl From<String> for StyledText {
    fn from(text: String) -> Self {
        StyledText::plain(text)
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
