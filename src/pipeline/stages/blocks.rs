//! Block stages: paragraphs, blank lines and chapter labels

use crate::pipeline::stage::{group_text, rewrite, Stage, StageContext, StageOutcome};
use crate::styled::{StyleAttribute, StyledText};
use crate::tags::{BLANK_LINE, CHAPTER_LABEL, PARAGRAPH};

pub(crate) const INDENT: &str = "    ";

/// `p`: a line break (unless at the start), an indent, the content, a line break
pub struct Paragraph;

impl Stage for Paragraph {
    fn name(&self) -> &'static str {
        "paragraph"
    }

    fn apply(&self, input: &StyledText, cx: &StageContext<'_>) -> StageOutcome {
        rewrite(input, &PARAGRAPH, cx.cancel, |m| {
            let mut out = StyledText::new();
            if m.start() > 0 {
                out.push_str("\n");
            }
            out.push_str(INDENT);
            out.append(&group_text(input, m, 1));
            out.push_str("\n");
            out
        })
    }
}

/// `b`: a blank line
pub struct BlankLine;

impl Stage for BlankLine {
    fn name(&self) -> &'static str {
        "blank-line"
    }

    fn apply(&self, input: &StyledText, cx: &StageContext<'_>) -> StageOutcome {
        rewrite(input, &BLANK_LINE, cx.cancel, |_| StyledText::plain("\n\n"))
    }
}

/// `cl`: bold label, in place
pub struct ChapterLabel;

impl Stage for ChapterLabel {
    fn name(&self) -> &'static str {
        "chapter-label"
    }

    fn apply(&self, input: &StyledText, cx: &StageContext<'_>) -> StageOutcome {
        rewrite(input, &CHAPTER_LABEL, cx.cancel, |m| {
            group_text(input, m, 1).with_styles([StyleAttribute::Bold])
        })
    }
}
