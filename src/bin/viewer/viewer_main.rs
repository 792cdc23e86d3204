//! Viewer entry point called from the `view` subcommand
use crossterm::event::{self, Event};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use ratatui::prelude::*;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use usx_render::settings::RenderSettings;
use usx_render::Renderer;

use super::app::{App, StatusLine};
use super::ui;

/// Run the viewer for the given file path
pub fn run_viewer(file_path: PathBuf, settings: RenderSettings) -> io::Result<()> {
    let content = fs::read_to_string(&file_path)?;
    let file_name = file_path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("unknown")
        .to_string();

    let status = StatusLine::default();
    let verse_status = status.clone();
    let note_status = status.clone();
    let config = settings
        .to_builder()
        .on_verse_click(move |region| {
            if let Ok(mut line) = verse_status.lock() {
                *line = format!("Verse {}", region.payload);
            }
        })
        .on_note_click(move |region| {
            if let Ok(mut line) = note_status.lock() {
                *line = format!("Note: {}", region.payload);
            }
        })
        .build()
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let mut app = App::new(Renderer::new(config), &content, status);

    enable_raw_mode()?;
    let stdout = io::stdout();
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app, &file_name);

    disable_raw_mode()?;
    terminal.clear()?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    file_name: &str,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| {
            ui::render(frame, app, file_name);
        })?;

        if event::poll(Duration::from_millis(100))? {
            // Resize needs no handling; the next draw uses the new size
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
