//! Render configuration
//!
//! A [`RenderConfig`] is an immutable value: it is assembled with
//! [`RenderConfigBuilder`], validated once in [`RenderConfigBuilder::build`],
//! and then only read while rendering. Click handlers are shared closures, so a
//! configuration can be cloned cheaply and handed to several renderers.

use crate::error::ConfigError;
use crate::markers::{VerseMarker, VerseSet};
use crate::styled::{ClickKind, ClickRegion};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Callback invoked when the reader taps a clickable region
pub type ClickHandler = Arc<dyn Fn(&ClickRegion) + Send + Sync>;

/// Which verse numbers a rendered passage must expose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExpectedVerses {
    #[default]
    Unconstrained,
    Single(u32),
    /// Inclusive range
    Range { first: u32, last: u32 },
}

impl ExpectedVerses {
    /// Build from 0, 1 or 2 values
    pub fn from_bounds(values: &[u32]) -> Result<Self, ConfigError> {
        match *values {
            [] => Ok(ExpectedVerses::Unconstrained),
            [verse] => Ok(ExpectedVerses::Single(verse)),
            [first, last] if first > last => Err(ConfigError::InvertedVerseRange { first, last }),
            [first, last] => Ok(ExpectedVerses::Range { first, last }),
            _ => Err(ConfigError::TooManyVerseBounds(values.len())),
        }
    }

    /// Inclusive `(min, max)` or `None` when unconstrained
    pub fn bounds(&self) -> Option<(u32, u32)> {
        match *self {
            ExpectedVerses::Unconstrained => None,
            ExpectedVerses::Single(verse) => Some((verse, verse)),
            ExpectedVerses::Range { first, last } => Some((first, last)),
        }
    }

    /// Whether both ends of a marker fall inside the expected range
    pub fn admits(&self, marker: &VerseMarker) -> bool {
        match self.bounds() {
            None => true,
            Some((min, max)) => {
                let inside = |verse: u32| verse >= min && verse <= max;
                inside(marker.start()) && inside(marker.end())
            }
        }
    }

    /// Expected verses absent from `found`, in ascending order
    pub fn missing(&self, found: &VerseSet) -> Vec<u32> {
        match self.bounds() {
            None => Vec::new(),
            Some((min, max)) => (min..=max).filter(|&v| !found.contains(v)).collect(),
        }
    }
}

/// Everything a render call needs besides the input text
#[derive(Clone)]
pub struct RenderConfig {
    render_verses: bool,
    expected_verses: ExpectedVerses,
    suppress_leading_major_section_headings: bool,
    break_before_verses: bool,
    verse_handler: Option<ClickHandler>,
    note_handler: Option<ClickHandler>,
}

impl RenderConfig {
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::default()
    }

    pub fn render_verses(&self) -> bool {
        self.render_verses
    }

    pub fn expected_verses(&self) -> ExpectedVerses {
        self.expected_verses
    }

    pub fn suppress_leading_major_section_headings(&self) -> bool {
        self.suppress_leading_major_section_headings
    }

    /// Compatibility: insert a line break before every verse found in the text
    pub fn break_before_verses(&self) -> bool {
        self.break_before_verses
    }

    pub fn has_verse_handler(&self) -> bool {
        self.verse_handler.is_some()
    }

    pub fn has_note_handler(&self) -> bool {
        self.note_handler.is_some()
    }

    /// Route a tapped region to its handler. Returns false when none is set.
    pub fn dispatch(&self, region: &ClickRegion) -> bool {
        let handler = match region.kind {
            ClickKind::Verse => self.verse_handler.as_ref(),
            ClickKind::Note => self.note_handler.as_ref(),
        };
        match handler {
            Some(handler) => {
                handler(region);
                true
            }
            None => false,
        }
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            render_verses: true,
            expected_verses: ExpectedVerses::Unconstrained,
            suppress_leading_major_section_headings: false,
            break_before_verses: false,
            verse_handler: None,
            note_handler: None,
        }
    }
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("render_verses", &self.render_verses)
            .field("expected_verses", &self.expected_verses)
            .field(
                "suppress_leading_major_section_headings",
                &self.suppress_leading_major_section_headings,
            )
            .field("break_before_verses", &self.break_before_verses)
            .field("verse_handler", &self.verse_handler.is_some())
            .field("note_handler", &self.note_handler.is_some())
            .finish()
    }
}

/// Builder for [`RenderConfig`]
#[derive(Default)]
pub struct RenderConfigBuilder {
    render_verses: Option<bool>,
    expected_verses: Vec<u32>,
    suppress_leading_major_section_headings: bool,
    break_before_verses: bool,
    verse_handler: Option<ClickHandler>,
    note_handler: Option<ClickHandler>,
}

impl RenderConfigBuilder {
    /// Show verse markers (default true)
    pub fn render_verses(mut self, enable: bool) -> Self {
        self.render_verses = Some(enable);
        self
    }

    /// 0, 1 or 2 inclusive bounds; validated by [`build`](Self::build)
    pub fn expected_verses(mut self, bounds: &[u32]) -> Self {
        self.expected_verses = bounds.to_vec();
        self
    }

    pub fn suppress_leading_major_section_headings(mut self, suppress: bool) -> Self {
        self.suppress_leading_major_section_headings = suppress;
        self
    }

    pub fn break_before_verses(mut self, enable: bool) -> Self {
        self.break_before_verses = enable;
        self
    }

    pub fn on_verse_click(mut self, handler: impl Fn(&ClickRegion) + Send + Sync + 'static) -> Self {
        self.verse_handler = Some(Arc::new(handler));
        self
    }

    pub fn on_note_click(mut self, handler: impl Fn(&ClickRegion) + Send + Sync + 'static) -> Self {
        self.note_handler = Some(Arc::new(handler));
        self
    }

    pub fn build(self) -> Result<RenderConfig, ConfigError> {
        Ok(RenderConfig {
            render_verses: self.render_verses.unwrap_or(true),
            expected_verses: ExpectedVerses::from_bounds(&self.expected_verses)?,
            suppress_leading_major_section_headings: self.suppress_leading_major_section_headings,
            break_before_verses: self.break_before_verses,
            verse_handler: self.verse_handler,
            note_handler: self.note_handler,
        })
    }
}
