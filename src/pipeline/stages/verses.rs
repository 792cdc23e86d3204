//! Verse stage
//!
//! Replaces verse tags with verse labels while guaranteeing that the output
//! exposes each verse at most once and only within the expected range:
//!
//! 1. With verse rendering disabled every tag is stripped.
//! 2. A marker whose numbers were all unseen in this pass is recorded; if any
//!    of its numbers was already seen the tag is dropped as a duplicate and
//!    nothing is recorded.
//! 3. A marker with either end outside the expected range is dropped.
//! 4. After the scan, every expected verse that was never seen is synthesized
//!    at the front of the output, in ascending order.
//!
//! A tag whose number cannot be parsed is left in the text verbatim, unstyled.

use crate::config::RenderConfig;
use crate::markers::{VerseMarker, VerseSet, VerseStyle};
use crate::pipeline::stage::{rewrite, Stage, StageContext, StageOutcome};
use crate::styled::StyledText;
use crate::tags::VERSE;

pub struct Verses;

impl Stage for Verses {
    fn name(&self) -> &'static str {
        "verse"
    }

    fn apply(&self, input: &StyledText, cx: &StageContext<'_>) -> StageOutcome {
        let config = cx.config;
        let style = VerseStyle::for_config(config);
        let mut found = VerseSet::new();

        let outcome = rewrite(input, &VERSE, cx.cancel, |m| {
            if !config.render_verses() {
                return StyledText::new();
            }

            let raw = m.group_str(1).unwrap_or_default();
            let marker = match VerseMarker::parse(raw) {
                Ok(marker) => marker,
                Err(err) => {
                    tracing::debug!(number = raw, error = %err, "keeping unparsable verse tag");
                    return StyledText::plain(&input.as_str()[m.range()]);
                }
            };

            if !found.insert_disjoint(&marker) {
                tracing::trace!(verse = %marker, "dropping duplicate verse");
                return StyledText::new();
            }
            if !config.expected_verses().admits(&marker) {
                tracing::trace!(verse = %marker, "dropping verse outside expected range");
                return StyledText::new();
            }

            let mut out = StyledText::new();
            if config.break_before_verses() {
                out.push_str("\n");
            }
            out.append(&style.render(&marker));
            out
        });

        match outcome {
            StageOutcome::Completed(mut out) => {
                if config.render_verses() {
                    synthesize_missing(&mut out, config, style, &found);
                }
                StageOutcome::Completed(out)
            }
            StageOutcome::Cancelled => StageOutcome::Cancelled,
        }
    }
}

/// Prepend a label for every expected verse the pass never saw
fn synthesize_missing(
    out: &mut StyledText,
    config: &RenderConfig,
    style: VerseStyle,
    found: &VerseSet,
) {
    let missing = config.expected_verses().missing(found);
    if missing.is_empty() {
        return;
    }
    let mut labels = StyledText::new();
    for verse in missing {
        tracing::trace!(verse, "synthesizing missing verse");
        labels.append(&style.render(&VerseMarker::single(verse)));
    }
    out.prepend(&labels);
}
