//! Terminal display adapter
//!
//! Maps a [`StyledText`] onto ratatui's `Text`: one `Line` per line break,
//! Bold/Italic as modifiers, clickable regions underlined and colored, and
//! the line alignment taken from AlignCenter/AlignOpposite runs on that line.

use crate::styled::{ClickKind, StyleAttribute, StyleSet, StyledText};
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use std::ops::Range;

const VERSE_COLOR: Color = Color::Cyan;
const NOTE_COLOR: Color = Color::Yellow;

/// Convert styled text for display
pub fn to_text(styled: &StyledText) -> Text<'static> {
    to_text_with_selection(styled, None)
}

/// Like [`to_text`], drawing the run at `selected` in reverse video
pub fn to_text_with_selection(styled: &StyledText, selected: Option<Range<usize>>) -> Text<'static> {
    let mut lines = Vec::new();
    let mut current = LineBuilder::default();

    for run in styled.runs() {
        let mut style = span_style(&run.styles);
        if selected.as_ref() == Some(&run.range) {
            style = style.add_modifier(Modifier::REVERSED);
        }

        let content = &styled.as_str()[run.range.clone()];
        let mut pieces = content.split('\n').peekable();
        while let Some(piece) = pieces.next() {
            current.push(piece, style, &run.styles);
            if pieces.peek().is_some() {
                lines.push(std::mem::take(&mut current).finish());
            }
        }
    }

    if !current.is_empty() {
        lines.push(current.finish());
    }
    Text::from(lines)
}

fn span_style(styles: &StyleSet) -> Style {
    let mut style = Style::default();
    for attr in styles {
        style = match attr {
            StyleAttribute::Bold => style.add_modifier(Modifier::BOLD),
            StyleAttribute::Italic => style.add_modifier(Modifier::ITALIC),
            StyleAttribute::Normal => style.remove_modifier(Modifier::BOLD | Modifier::ITALIC),
            StyleAttribute::AlignCenter | StyleAttribute::AlignOpposite => style,
            StyleAttribute::Clickable(region) => {
                let color = match region.kind {
                    ClickKind::Verse => VERSE_COLOR,
                    ClickKind::Note => NOTE_COLOR,
                };
                style.fg(color).add_modifier(Modifier::UNDERLINED)
            }
        };
    }
    style
}

#[derive(Default)]
struct LineBuilder {
    spans: Vec<Span<'static>>,
    alignment: Option<Alignment>,
}

impl LineBuilder {
    fn push(&mut self, text: &str, style: Style, styles: &StyleSet) {
        if text.is_empty() {
            return;
        }
        if self.alignment.is_none() {
            if styles.contains(&StyleAttribute::AlignCenter) {
                self.alignment = Some(Alignment::Center);
            } else if styles.contains(&StyleAttribute::AlignOpposite) {
                self.alignment = Some(Alignment::Right);
            }
        }
        self.spans.push(Span::styled(text.to_string(), style));
    }

    fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    fn finish(self) -> Line<'static> {
        let line = Line::from(self.spans);
        match self.alignment {
            Some(alignment) => line.alignment(alignment),
            None => line,
        }
    }
}
