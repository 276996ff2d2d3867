//! Browser state and key handling.
//!
//! Key handling is pure: it only updates state and returns an `Effect` for
//! the event loop to apply against the history store.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::history::{filter, ScanRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    Delete(String),
    Clear,
}

#[derive(Debug, Default)]
pub struct BrowserState {
    pub records: Vec<ScanRecord>,
    pub query: String,
    pub selected: usize,
    pub confirm_clear: bool,
    pub should_quit: bool,
    pub status: Option<String>,
}

impl BrowserState {
    pub fn new(records: Vec<ScanRecord>) -> Self {
        BrowserState {
            records,
            ..Default::default()
        }
    }

    /// Records matching the current query, in stored order.
    pub fn visible(&self) -> Vec<ScanRecord> {
        filter(&self.records, &self.query)
    }

    /// Replace records after a store mutation, keeping the selection in range.
    pub fn reload(&mut self, records: Vec<ScanRecord>) {
        self.records = records;
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        let len = self.visible().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Effect {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('c') => self.should_quit = true,
                KeyCode::Char('x') if !self.records.is_empty() => self.confirm_clear = true,
                _ => {}
            }
            return Effect::None;
        }

        if self.confirm_clear {
            self.confirm_clear = false;
            if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                self.status = Some("History cleared".to_string());
                return Effect::Clear;
            }
            return Effect::None;
        }

        match key.code {
            KeyCode::Esc if self.query.is_empty() => self.should_quit = true,
            KeyCode::Esc => {
                self.query.clear();
                self.selected = 0;
            }
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                self.selected += 1;
                self.clamp_selection();
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.selected = 0;
            }
            KeyCode::Char(c) => {
                self.query.push(c);
                self.selected = 0;
            }
            KeyCode::Delete => {
                if let Some(record) = self.visible().get(self.selected) {
                    self.status = Some(format!("Deleted {}", record.id));
                    return Effect::Delete(record.id.clone());
                }
            }
            _ => {}
        }

        Effect::None
    }
}
