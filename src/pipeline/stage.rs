//! Stage trait and the shared scan-and-rewrite loop
//!
//! A stage is one left-to-right pass over the accumulated styled text for a
//! single tag family. Most stages are a [`TagPattern`] plus a replacement rule,
//! so they delegate the traversal to [`rewrite`]: the loop copies the text
//! between matches (with its styles) and appends whatever the rule returns for
//! each match.
//!
//! # Cancellation
//!
//! `rewrite` polls the cancel token before handling every match. When it is
//! raised the partial output is dropped and [`StageOutcome::Cancelled`] is
//! returned; the orchestrator then falls back to the stage's input.

use crate::cancel::CancelToken;
use crate::config::RenderConfig;
use crate::styled::StyledText;
use crate::tags::{TagMatch, TagPattern};

/// Read-only state shared by all stages of one render call
#[derive(Debug, Clone, Copy)]
pub struct StageContext<'a> {
    pub config: &'a RenderConfig,
    pub cancel: &'a CancelToken,
}

/// Result of running one stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    Completed(StyledText),
    Cancelled,
}

impl StageOutcome {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, StageOutcome::Cancelled)
    }
}

/// One transform pass of the pipeline
pub trait Stage: Send + Sync {
    /// Name used in logs and render reports
    fn name(&self) -> &'static str;

    /// Rewrite `input`. Must not return a partially rewritten text.
    fn apply(&self, input: &StyledText, cx: &StageContext<'_>) -> StageOutcome;
}

/// Replace every occurrence of `pattern` in `input` with `replace(match)`.
pub fn rewrite<F>(
    input: &StyledText,
    pattern: &TagPattern,
    cancel: &CancelToken,
    mut replace: F,
) -> StageOutcome
where
    F: FnMut(&TagMatch<'_>) -> StyledText,
{
    let text = input.as_str();
    let mut out = StyledText::new();
    let mut last = 0;

    for m in pattern.find_iter(text) {
        if cancel.is_cancelled() {
            tracing::trace!(pattern = pattern.name(), offset = m.start(), "pass cancelled");
            return StageOutcome::Cancelled;
        }
        out.append(&input.slice(last..m.start()));
        out.append(&replace(&m));
        last = m.end();
    }

    out.append(&input.slice(last..text.len()));
    StageOutcome::Completed(out)
}

/// Styled content of a capture group (empty if the group did not match)
pub(crate) fn group_text(input: &StyledText, m: &TagMatch<'_>, index: usize) -> StyledText {
    m.group(index)
        .map(|range| input.slice(range))
        .unwrap_or_default()
}
