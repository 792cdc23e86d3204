//! Verse markers
//!
//! A verse tag carries a `number` attribute that is either a single verse
//! (`"7"`) or an inclusive range (`"3-5"`). [`VerseMarker`] is the parsed form;
//! [`VerseStyle`] decides how a marker is shown.

use crate::config::RenderConfig;
use crate::error::VerseParseError;
use crate::styled::{ClickKind, ClickRegion, StyleAttribute, StyledText};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

/// A parsed verse number or verse range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct VerseMarker {
    start: u32,
    end: u32,
}

impl VerseMarker {
    pub fn single(number: u32) -> Self {
        VerseMarker {
            start: number,
            end: number,
        }
    }

    pub fn range(start: u32, end: u32) -> Result<Self, VerseParseError> {
        if end < start {
            return Err(VerseParseError::Descending { start, end });
        }
        Ok(VerseMarker { start, end })
    }

    /// Parse the content of a verse tag's `number` attribute
    pub fn parse(raw: &str) -> Result<Self, VerseParseError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(VerseParseError::Empty);
        }
        match raw.split_once('-') {
            Some((start, end)) => Self::range(parse_number(start)?, parse_number(end)?),
            None => Ok(Self::single(parse_number(raw)?)),
        }
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn is_range(&self) -> bool {
        self.end > self.start
    }

    /// Every verse number this marker covers
    pub fn numbers(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

fn parse_number(raw: &str) -> Result<u32, VerseParseError> {
    let raw = raw.trim();
    if raw.is_empty() || !raw.chars().all(|c| c.is_ascii_digit()) {
        return Err(VerseParseError::InvalidNumber(raw.to_string()));
    }
    raw.parse::<u32>()
        .map_err(|_| VerseParseError::InvalidNumber(raw.to_string()))
}

impl FromStr for VerseMarker {
    type Err = VerseParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VerseMarker::parse(s)
    }
}

impl fmt::Display for VerseMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_range() {
            write!(f, "{}-{}", self.start, self.end)
        } else {
            write!(f, "{}", self.start)
        }
    }
}

/// Verse numbers held as disjoint inclusive spans.
///
/// Lookups and inserts cost O(log n) in the number of spans, whatever the
/// width of a span.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerseSet {
    spans: BTreeMap<u32, u32>,
}

impl VerseSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Whether any number the marker covers is in the set
    pub fn overlaps(&self, marker: &VerseMarker) -> bool {
        // spans are disjoint, so the last one starting at or before the
        // marker's end reaches furthest
        self.spans
            .range(..=marker.end)
            .next_back()
            .is_some_and(|(_, &end)| end >= marker.start)
    }

    pub fn contains(&self, verse: u32) -> bool {
        self.overlaps(&VerseMarker::single(verse))
    }

    /// Add the marker's span unless it overlaps one already present
    pub fn insert_disjoint(&mut self, marker: &VerseMarker) -> bool {
        if self.overlaps(marker) {
            return false;
        }
        self.spans.insert(marker.start, marker.end);
        true
    }
}

/// How verse markers are rendered during one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerseStyle {
    /// Structural label only
    Plain,
    /// Label that is also a tap target for the verse handler
    Pin,
}

impl VerseStyle {
    /// Pins are used whenever a verse click handler is configured
    pub fn for_config(config: &RenderConfig) -> Self {
        if config.has_verse_handler() {
            VerseStyle::Pin
        } else {
            VerseStyle::Plain
        }
    }

    /// The label followed by an unstyled space
    pub fn render(&self, marker: &VerseMarker) -> StyledText {
        let label = marker.to_string();
        let mut out = match self {
            VerseStyle::Plain => StyledText::styled(&label, [StyleAttribute::Bold]),
            VerseStyle::Pin => {
                let region = ClickRegion::new(ClickKind::Verse, label.clone());
                StyledText::styled(
                    &label,
                    [StyleAttribute::Bold, StyleAttribute::Clickable(region)],
                )
            }
        };
        out.push_str(" ");
        out
    }
}
