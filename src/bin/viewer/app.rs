//! Viewer state and key handling
//!
//! The App holds the rendered document, the list of clickable regions in it,
//! which region is selected, and the status line. Activating a region hands
//! it to the renderer, whose configured handlers write the status line.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::ops::Range;
use std::sync::{Arc, Mutex};
use usx_render::{ClickRegion, Renderer, StyledText};

/// Shared between the app and the click handlers
pub type StatusLine = Arc<Mutex<String>>;

pub struct App {
    pub renderer: Renderer,
    pub document: StyledText,
    pub regions: Vec<(Range<usize>, ClickRegion)>,
    pub selected: Option<usize>,
    pub scroll: u16,
    pub status: StatusLine,
    pub should_quit: bool,
}

impl App {
    pub fn new(renderer: Renderer, source: &str, status: StatusLine) -> Self {
        let document = renderer.render(source);
        let regions = document
            .clickable_regions()
            .map(|(range, region)| (range, region.clone()))
            .collect();
        App {
            renderer,
            document,
            regions,
            selected: None,
            scroll: 0,
            status,
            should_quit: false,
        }
    }

    pub fn selected_range(&self) -> Option<Range<usize>> {
        self.selected
            .and_then(|index| self.regions.get(index))
            .map(|(range, _)| range.clone())
    }

    pub fn status_text(&self) -> String {
        self.status
            .lock()
            .map(|status| status.clone())
            .unwrap_or_default()
    }

    fn set_status(&self, text: impl Into<String>) {
        if let Ok(mut status) = self.status.lock() {
            *status = text.into();
        }
    }

    /// Handle a keyboard event
    ///
    /// Returns whether the state changed
    pub fn handle_key(&mut self, key: KeyEvent) -> bool {
        match key.code {
            KeyCode::Char('q') if key.modifiers.is_empty() => {
                self.should_quit = true;
                true
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                true
            }
            KeyCode::Tab => self.select_next(),
            KeyCode::BackTab => self.select_previous(),
            KeyCode::Enter => self.activate(),
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                true
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                true
            }
            _ => false,
        }
    }

    fn select_next(&mut self) -> bool {
        if self.regions.is_empty() {
            return false;
        }
        let next = match self.selected {
            Some(index) => (index + 1) % self.regions.len(),
            None => 0,
        };
        self.select(next);
        true
    }

    fn select_previous(&mut self) -> bool {
        if self.regions.is_empty() {
            return false;
        }
        let previous = match self.selected {
            Some(0) | None => self.regions.len() - 1,
            Some(index) => index - 1,
        };
        self.select(previous);
        true
    }

    fn select(&mut self, index: usize) {
        self.selected = Some(index);
        if let Some((range, _)) = self.regions.get(index) {
            let line = self.document.as_str()[..range.start].matches('\n').count();
            self.scroll = u16::try_from(line.saturating_sub(2)).unwrap_or(u16::MAX);
        }
    }

    /// Dispatch the selected region to its handler
    fn activate(&mut self) -> bool {
        let Some((_, region)) = self.selected.and_then(|index| self.regions.get(index)) else {
            return false;
        };
        if !self.renderer.dispatch(region) {
            self.set_status(format!("no handler for {:?} region", region.kind));
        }
        true
    }
}
