//! Inline marker sub-parsers
//!
//! The stages locate verse and note tags; the models here interpret what the
//! tags contain and produce their styled representation.

pub mod note;
pub mod verse;

pub use note::{NoteKind, NoteMarker};
pub use verse::{VerseMarker, VerseSet, VerseStyle};
