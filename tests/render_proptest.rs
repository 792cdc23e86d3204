//! Property-based tests for normalization and the verse guarantees

use proptest::prelude::*;
use std::collections::BTreeMap;
use usx_render::pipeline::stages::{CollapseLineBreaks, CollapseWhitespace, TrimWhitespace};
use usx_render::pipeline::Stage;
use usx_render::markers::VerseMarker;
use usx_render::{ClickKind, RenderConfig, Renderer, StyledText};

const ASCII_WHITESPACE: &[char] = &[' ', '\t', '\n', '\x0B', '\x0C', '\r'];

/// Text mixing words with runs of every whitespace kind
fn spaced_text_strategy() -> impl Strategy<Value = String> {
    "[a-c \t\n\r\x0B\x0C]{0,40}"
}

fn run_stages(input: &str, stages: Vec<Box<dyn Stage>>) -> StyledText {
    Renderer::with_stages(RenderConfig::default(), stages).render(input)
}

fn collapse(input: &str) -> String {
    run_stages(
        input,
        vec![Box::new(CollapseLineBreaks), Box::new(CollapseWhitespace)],
    )
    .as_str()
    .to_string()
}

/// A verse tag for a single verse or a short ascending range
fn verse_tag_strategy() -> impl Strategy<Value = (u32, u32)> {
    (1u32..12, 0u32..3).prop_map(|(start, extra)| (start, start + extra))
}

fn verse_tag((start, end): (u32, u32)) -> String {
    if start == end {
        format!(r#"<verse number="{start}" style="v" />w "#)
    } else {
        format!(r#"<verse number="{start}-{end}" style="v" />w "#)
    }
}

proptest! {
    #[test]
    fn test_collapse_is_idempotent(input in spaced_text_strategy()) {
        let once = collapse(&input);
        let twice = collapse(&once);
        prop_assert_eq!(&once, &twice);
        prop_assert!(!once.contains('\n'));
        prop_assert!(!once.contains("  "));
    }

    #[test]
    fn test_trim_only_touches_boundaries(input in spaced_text_strategy()) {
        let out = run_stages(&input, vec![Box::new(TrimWhitespace)]);
        prop_assert_eq!(out.as_str(), input.trim_matches(ASCII_WHITESPACE));
    }

    #[test]
    fn test_emitted_verses_are_unique_and_in_range(
        tags in prop::collection::vec(verse_tag_strategy(), 0..8),
        lo in 1u32..8,
        span in 0u32..4,
    ) {
        let hi = lo + span;
        let source: String = tags.iter().copied().map(verse_tag).collect();
        let covered = covered_verses(&source, lo, hi);

        prop_assert!(covered.keys().all(|verse| (lo..=hi).contains(verse)));
        prop_assert!(covered.values().all(|count| *count == 1));
    }

    #[test]
    fn test_expected_single_verses_appear_exactly_once(
        verses in prop::collection::vec(1u32..12, 0..8),
        lo in 1u32..8,
        span in 0u32..4,
    ) {
        let hi = lo + span;
        let source: String = verses.iter().map(|&verse| verse_tag((verse, verse))).collect();
        let covered = covered_verses(&source, lo, hi);

        let expected: Vec<u32> = (lo..=hi).collect();
        prop_assert_eq!(covered.keys().copied().collect::<Vec<_>>(), expected);
        prop_assert!(covered.values().all(|count| *count == 1));
    }
}

/// How many times each verse number is covered by a rendered verse pin
fn covered_verses(source: &str, lo: u32, hi: u32) -> BTreeMap<u32, usize> {
    let config = RenderConfig::builder()
        .expected_verses(&[lo, hi])
        .on_verse_click(|_| {})
        .build()
        .unwrap();
    let out = Renderer::new(config).render(source);

    let mut covered = BTreeMap::new();
    for (_, region) in out.clickable_regions() {
        assert_eq!(region.kind, ClickKind::Verse);
        let marker = VerseMarker::parse(&region.payload).unwrap();
        for verse in marker.numbers() {
            *covered.entry(verse).or_insert(0) += 1;
        }
    }
    covered
}
