//! Whitespace normalization stages
//!
//! Run first, in this order:
//! 1. trim boundary whitespace
//! 2. collapse any run containing line breaks into one space
//! 3. collapse any remaining whitespace run into one space
//!
//! After these passes the text holds no line breaks; every break in the output
//! comes from a later stage.

use crate::pipeline::stage::{rewrite, Stage, StageContext, StageOutcome};
use crate::styled::StyledText;
use crate::tags::{LINE_BREAKS, TRIM, WHITESPACE};

pub struct TrimWhitespace;

impl Stage for TrimWhitespace {
    fn name(&self) -> &'static str {
        "trim"
    }

    fn apply(&self, input: &StyledText, cx: &StageContext<'_>) -> StageOutcome {
        rewrite(input, &TRIM, cx.cancel, |_| StyledText::new())
    }
}

pub struct CollapseLineBreaks;

impl Stage for CollapseLineBreaks {
    fn name(&self) -> &'static str {
        "line-breaks"
    }

    fn apply(&self, input: &StyledText, cx: &StageContext<'_>) -> StageOutcome {
        rewrite(input, &LINE_BREAKS, cx.cancel, |_| StyledText::plain(" "))
    }
}

pub struct CollapseWhitespace;

impl Stage for CollapseWhitespace {
    fn name(&self) -> &'static str {
        "whitespace"
    }

    fn apply(&self, input: &StyledText, cx: &StageContext<'_>) -> StageOutcome {
        rewrite(input, &WHITESPACE, cx.cancel, |_| StyledText::plain(" "))
    }
}
