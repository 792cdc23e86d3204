//! Error types for the rendering pipeline
//!
//! Rendering itself never fails: unparsable verse and note tags degrade to raw
//! text and cancellation returns the last completed pass. The errors here cover
//! configuration mistakes (which fail fast at build time) and the sub-parser
//! failures that the stages log before degrading.

use thiserror::Error;

/// An invalid render configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// More than two values were given for the expected verse range
    #[error("expected verse range takes at most 2 values, got {0}")]
    TooManyVerseBounds(usize),

    /// The first bound of the expected verse range is after the last
    #[error("expected verse range is inverted: {first} > {last}")]
    InvertedVerseRange { first: u32, last: u32 },
}

/// Failure to read a verse tag's `number` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerseParseError {
    #[error("verse number is empty")]
    Empty,

    #[error("invalid verse number '{0}'")]
    InvalidNumber(String),

    #[error("verse range {start}-{end} ends before it starts")]
    Descending { start: u32, end: u32 },
}

/// Failure to interpret a note tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NoteParseError {
    #[error("note is missing the '{0}' attribute")]
    MissingAttribute(&'static str),

    #[error("unknown note style '{0}'")]
    UnknownStyle(String),

    #[error("malformed note markup: {0}")]
    Malformed(String),

    #[error("note has no text")]
    Empty,
}

/// Failure to load layered render settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to load settings: {0}")]
    Load(#[from] ::config::ConfigError),

    #[error("invalid settings: {0}")]
    Invalid(#[from] ConfigError),
}
