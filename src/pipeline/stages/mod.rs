//! One stage per tag family

mod blocks;
mod headings;
mod notes;
mod poetry;
mod verses;
mod whitespace;

pub use blocks::{BlankLine, ChapterLabel, Paragraph};
pub use headings::{leading_major_section_heading, MajorSectionHeading, SectionHeading};
pub use notes::Notes;
pub use poetry::{PoeticLine, RightAlignedPoeticLine, Selah};
pub use verses::Verses;
pub use whitespace::{CollapseLineBreaks, CollapseWhitespace, TrimWhitespace};
