//! # usx-render
//!
//! Renders USX-style scripture markup into styled, clickable text.
//!
//! The input is plain text with paragraph tags (`<para style="p">`), inline
//! verse markers (`<verse number="3" style="v" />`), notes and character
//! styles. A [`Renderer`] runs a fixed sequence of regex-driven stages over it;
//! each stage rewrites one tag family and hands the accumulated
//! [`StyledText`] to the next.
//!
//! ```text
//! let config = RenderConfig::builder().expected_verses(&[1, 3]).build()?;
//! let styled = Renderer::new(config).render(source);
//! ```
//!
//! Modules:
//! - [`styled`]: the text-plus-runs buffer stages read and write
//! - [`tags`]: precompiled tag patterns
//! - [`markers`]: verse and note sub-parsers
//! - [`pipeline`]: the stages and the orchestrator
//! - [`config`] / [`settings`]: per-render configuration and its TOML layer
//! - [`display`]: conversion to ratatui text

pub mod cancel;
pub mod config;
pub mod display;
pub mod error;
pub mod markers;
pub mod pipeline;
pub mod settings;
pub mod styled;
pub mod tags;

pub use cancel::CancelToken;
pub use config::{ExpectedVerses, RenderConfig, RenderConfigBuilder};
pub use error::{ConfigError, NoteParseError, SettingsError, VerseParseError};
pub use pipeline::{leading_major_section_heading, RenderReport, Renderer};
pub use styled::{ClickKind, ClickRegion, StyleAttribute, StyledText};
