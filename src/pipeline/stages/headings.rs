//! Section heading stages (`ms` and `s`)

use crate::pipeline::stage::{group_text, rewrite, Stage, StageContext, StageOutcome};
use crate::styled::{StyleAttribute, StyledText};
use crate::tags::{MAJOR_SECTION_HEADING, SECTION_HEADING};

const HEADING_STYLES: [StyleAttribute; 2] = [StyleAttribute::Bold, StyleAttribute::AlignCenter];

/// Major section headings are upper-cased, centered and bold.
///
/// With leading-heading suppression configured, a heading at offset 0 is
/// removed entirely; callers hoist it with [`leading_major_section_heading`].
pub struct MajorSectionHeading;

impl Stage for MajorSectionHeading {
    fn name(&self) -> &'static str {
        "major-section-heading"
    }

    fn apply(&self, input: &StyledText, cx: &StageContext<'_>) -> StageOutcome {
        let suppress = cx.config.suppress_leading_major_section_headings();
        rewrite(input, &MAJOR_SECTION_HEADING, cx.cancel, |m| {
            if suppress && m.start() == 0 {
                return StyledText::new();
            }
            let mut out = group_text(input, m, 1)
                .map_text(str::to_uppercase)
                .with_styles(HEADING_STYLES);
            out.push_str("\n");
            out
        })
    }
}

pub struct SectionHeading;

impl Stage for SectionHeading {
    fn name(&self) -> &'static str {
        "section-heading"
    }

    fn apply(&self, input: &StyledText, cx: &StageContext<'_>) -> StageOutcome {
        rewrite(input, &SECTION_HEADING, cx.cancel, |m| {
            let mut out = group_text(input, m, 1).with_styles(HEADING_STYLES);
            out.push_str("\n");
            out
        })
    }
}

/// Content of a major section heading that starts the text, or empty text.
///
/// Does not depend on any render configuration.
pub fn leading_major_section_heading(input: &StyledText) -> StyledText {
    match MAJOR_SECTION_HEADING.find(input.as_str()) {
        Some(m) if m.start() == 0 => group_text(input, &m, 1),
        _ => StyledText::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderConfig;
    use crate::pipeline::stage::test_support::run_stage;

    const MS: &str = r#"<para style="ms">Book One</para>"#;

    fn suppressing() -> RenderConfig {
        RenderConfig::builder()
            .suppress_leading_major_section_headings(true)
            .build()
            .unwrap()
    }

    #[test]
    fn test_major_heading_is_upper_cased() {
        let out = run_stage(&MajorSectionHeading, MS, &RenderConfig::default());
        assert_eq!(out.to_markup(), "[bold,center]BOOK ONE[/]\n");
    }

    #[test]
    fn test_suppression_only_applies_at_offset_zero() {
        let input = format!("{MS} text {MS}");
        let out = run_stage(&MajorSectionHeading, &input, &suppressing());
        assert_eq!(out.to_markup(), " text [bold,center]BOOK ONE[/]\n");
    }

    #[test]
    fn test_suppression_ignores_later_heading_alone() {
        let input = format!("x{MS}");
        let out = run_stage(&MajorSectionHeading, &input, &suppressing());
        assert_eq!(out.to_markup(), "x[bold,center]BOOK ONE[/]\n");
    }

    #[test]
    fn test_section_heading() {
        let out = run_stage(
            &SectionHeading,
            r#"<para style="s">Intro</para>rest"#,
            &RenderConfig::default(),
        );
        assert_eq!(out.to_markup(), "[bold,center]Intro[/]\nrest");
    }

    #[test]
    fn test_leading_heading_query() {
        let at_start = StyledText::plain(format!("{MS}<para style=\"p\">x</para>"));
        assert_eq!(leading_major_section_heading(&at_start).as_str(), "Book One");

        let later = StyledText::plain(format!("intro {MS}"));
        assert!(leading_major_section_heading(&later).is_empty());

        let none = StyledText::plain("no headings");
        assert!(leading_major_section_heading(&none).is_empty());
    }
}
