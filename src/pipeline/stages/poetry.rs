//! Poetry stages: indented poetic lines, right-aligned lines and Selah

use super::blocks::INDENT;
use crate::pipeline::stage::{group_text, rewrite, Stage, StageContext, StageOutcome};
use crate::styled::{StyleAttribute, StyledText};
use crate::tags::{POETIC_LINE, RIGHT_ALIGNED_POETIC_LINE, SELAH, VERSE_TAG_PREFIX};

/// Deeper levels render with this indent
const MAX_POETIC_LEVEL: usize = 16;

const BLOCK_TAG_PREFIX: &str = "<para";

const OPPOSITE_STYLES: [StyleAttribute; 2] = [StyleAttribute::Italic, StyleAttribute::AlignOpposite];

/// `qN`: content indented by N levels.
///
/// Lines that open with a verse marker are outdented by half a level so the
/// number hangs to the left of the text. Line breaks are only added where the
/// surrounding text does not already provide one.
pub struct PoeticLine;

impl Stage for PoeticLine {
    fn name(&self) -> &'static str {
        "poetic-line"
    }

    fn apply(&self, input: &StyledText, cx: &StageContext<'_>) -> StageOutcome {
        let text = input.as_str();
        rewrite(input, &POETIC_LINE, cx.cancel, |m| {
            let level = m
                .group_str(1)
                .and_then(|level| level.parse::<usize>().ok())
                .unwrap_or(0)
                .min(MAX_POETIC_LEVEL);
            let content = group_text(input, m, 2).with_styles([StyleAttribute::Normal]);

            let mut padding = INDENT.repeat(level);
            if level > 0 && content.as_str().starts_with(VERSE_TAG_PREFIX) {
                padding.truncate(padding.len() - 2);
            }

            let mut out = StyledText::new();
            if needs_leading_break(&text[..m.start()]) {
                out.push_str("\n");
            }
            out.push_str(&padding);
            out.append(&content);
            if needs_trailing_break(&text[m.end()..]) {
                out.push_str("\n");
            }
            out
        })
    }
}

/// The preceding text (spaces ignored) is non-empty and does not end a line
fn needs_leading_break(previous: &str) -> bool {
    let previous = previous.trim_end_matches(' ');
    !previous.is_empty() && !previous.ends_with('\n')
}

/// The following text (spaces ignored) holds both a line break and a block
/// tag, and starts with neither. Existing breaks are never stacked.
fn needs_trailing_break(next: &str) -> bool {
    let next = next.trim_start_matches(' ');
    if next.starts_with('\n') || next.starts_with(BLOCK_TAG_PREFIX) {
        return false;
    }
    next.contains('\n') && next.contains(BLOCK_TAG_PREFIX)
}

/// `qr`: italic, trailing-aligned, on its own line
pub struct RightAlignedPoeticLine;

impl Stage for RightAlignedPoeticLine {
    fn name(&self) -> &'static str {
        "right-aligned-poetic-line"
    }

    fn apply(&self, input: &StyledText, cx: &StageContext<'_>) -> StageOutcome {
        rewrite(input, &RIGHT_ALIGNED_POETIC_LINE, cx.cancel, |m| {
            let mut out = StyledText::plain("\n");
            out.append(&group_text(input, m, 1).with_styles(OPPOSITE_STYLES));
            out
        })
    }
}

/// `<char style="qs">`: italic, trailing-aligned, on its own line
pub struct Selah;

impl Stage for Selah {
    fn name(&self) -> &'static str {
        "selah"
    }

    fn apply(&self, input: &StyledText, cx: &StageContext<'_>) -> StageOutcome {
        rewrite(input, &SELAH, cx.cancel, |m| {
            let mut out = StyledText::plain("\n");
            out.append(&group_text(input, m, 1).with_styles(OPPOSITE_STYLES));
            out
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::pipeline::stage::test_support::run_stage;
    use rstest::rstest;

    fn poetic(input: &str) -> String {
        run_stage(&PoeticLine, input, &RenderConfig::default()).to_markup()
    }

    #[rstest]
    #[case(r#"<para style="q1">line</para>"#, "    [normal]line[/]")]
    #[case(r#"<para style="q2">line</para>"#, "        [normal]line[/]")]
    #[case(r#"<para style="q0">line</para>"#, "[normal]line[/]")]
    fn test_indent_by_level(#[case] input: &str, #[case] expected: &str) {
        assert_eq!(poetic(input), expected);
    }

    #[test]
    fn test_verse_marker_outdent() {
        let out = poetic(r#"<para style="q1"><verse number="1" style="v" />Blessed</para>"#);
        assert_eq!(
            out,
            r#"  [normal]<verse number="1" style="v" />Blessed[/]"#
        );
    }

    #[test]
    fn test_leading_break_after_text() {
        assert_eq!(
            poetic(r#"text <para style="q1">line</para>"#),
            "text \n    [normal]line[/]"
        );
    }

    #[test]
    fn test_no_leading_break_after_line_end() {
        assert_eq!(
            poetic("text\n  <para style=\"q1\">line</para>"),
            "text\n      [normal]line[/]"
        );
    }

    #[test]
    fn test_consecutive_lines() {
        let out = poetic(r#"<para style="q1">one</para> <para style="q2">two</para>"#);
        assert_eq!(out, "    [normal]one[/] \n        [normal]two[/]");
    }

    #[rstest]
    #[case(" \n<para style=\"q1\">", false)]
    #[case("<para style=\"q1\">x</para>\n", false)]
    #[case("  <para style=\"q1\">x</para>\n", false)]
    #[case("tail\n", false)]
    #[case("tail", false)]
    #[case("tail <para style=\"p\">x</para>", false)]
    #[case("tail\n<para style=\"q1\">", true)]
    #[case(" tail <para style=\"q1\">x</para>\n", true)]
    fn test_trailing_break_rule(#[case] next: &str, #[case] expected: bool) {
        assert_eq!(needs_trailing_break(next), expected);
    }

    #[test]
    fn test_trailing_break_before_following_text() {
        assert_eq!(
            poetic("<para style=\"q1\">line</para> after\n<para style=\"p\">x</para>"),
            "    [normal]line[/]\n after\n<para style=\"p\">x</para>"
        );
    }

    #[test]
    fn test_no_trailing_break_without_following_block() {
        assert_eq!(
            poetic("<para style=\"q1\">line</para> after\nmore"),
            "    [normal]line[/] after\nmore"
        );
    }

    #[test]
    fn test_existing_break_is_not_stacked() {
        assert_eq!(
            poetic("<para style=\"q1\">line</para>\n    next\n"),
            "    [normal]line[/]\n    next\n"
        );
    }

    #[test]
    fn test_right_aligned() {
        let out = run_stage(
            &RightAlignedPoeticLine,
            r#"a<para style="qr">Amen</para>"#,
            &RenderConfig::default(),
        );
        assert_eq!(out.to_markup(), "a\n[italic,opposite]Amen[/]");
    }

    #[test]
    fn test_selah() {
        let out = run_stage(
            &Selah,
            r#"rest <char style="qs">Selah</char>"#,
            &RenderConfig::default(),
        );
        assert_eq!(out.to_markup(), "rest \n[italic,opposite]Selah[/]");
    }
}
