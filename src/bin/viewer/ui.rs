//! UI rendering logic
//!
//! Layout structure:
//! - Title bar (1 line, fixed)
//! - Rendered document (remaining space)
//! - Status line (1 line, fixed)

use super::app::App;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;
use usx_render::display::to_text_with_selection;

const MIN_TERMINAL_WIDTH: u16 = 30;
const HELP: &str = "Tab/Shift+Tab select  Enter open  j/k scroll  q quit";

pub fn render(frame: &mut Frame, app: &App, file_name: &str) {
    let size = frame.area();

    if size.width < MIN_TERMINAL_WIDTH {
        render_error_too_narrow(frame, size);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(size);

    render_title_bar(frame, chunks[0], file_name);
    render_document(frame, chunks[1], app);
    render_status_line(frame, chunks[2], app);
}

fn render_error_too_narrow(frame: &mut Frame, area: Rect) {
    let msg = format!(
        "Terminal too narrow: {} < {} chars",
        area.width, MIN_TERMINAL_WIDTH
    );
    let paragraph =
        Paragraph::new(msg).style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD));
    frame.render_widget(paragraph, area);
}

fn render_title_bar(frame: &mut Frame, area: Rect, file_name: &str) {
    let title = format!("usx-render:: {}", file_name);
    let paragraph = Paragraph::new(title).style(
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(paragraph, area);
}

fn render_document(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!("Rendered ({} clickable)", app.regions.len());
    let block = Block::default().borders(Borders::ALL).title(title);
    let text = to_text_with_selection(&app.document, app.selected_range());
    let paragraph = Paragraph::new(text)
        .block(block)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll, 0));
    frame.render_widget(paragraph, area);
}

fn render_status_line(frame: &mut Frame, area: Rect, app: &App) {
    let status = app.status_text();
    let mut spans = Vec::new();
    if !status.is_empty() {
        spans.push(Span::styled(
            status,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw("  "));
    }
    spans.push(Span::styled(HELP, Style::default().fg(Color::DarkGray)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
