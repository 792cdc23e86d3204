//! Note stage

use crate::markers::NoteMarker;
use crate::pipeline::stage::{rewrite, Stage, StageContext, StageOutcome};
use crate::styled::StyledText;
use crate::tags::NOTE;

/// Replaces each note tag with its clickable glyph.
///
/// A note that cannot be parsed stays in the text as the raw, unstyled tag.
pub struct Notes;

impl Stage for Notes {
    fn name(&self) -> &'static str {
        "note"
    }

    fn apply(&self, input: &StyledText, cx: &StageContext<'_>) -> StageOutcome {
        rewrite(input, &NOTE, cx.cancel, |m| {
            let attributes = m.group_str(1).unwrap_or_default();
            let body = m.group_str(2).unwrap_or_default();
            match NoteMarker::parse(attributes, body) {
                Ok(note) => note.render(),
                Err(err) => {
                    tracing::debug!(offset = m.start(), error = %err, "keeping unparsable note");
                    StyledText::plain(&input.as_str()[m.range()])
                }
            }
        })
    }
}
