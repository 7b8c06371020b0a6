//! Phase A: bulk review of classifier-flagged entries

use std::path::PathBuf;

use super::{Event, Transition};
use crate::scan::SensitiveFileItem;

/// One line of the review list as it should be drawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub label: String,
    pub reason: String,
    pub selected: bool,
    pub is_cursor: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewView {
    pub rows: Vec<ReviewRow>,
    pub cursor: usize,
    pub selected_count: usize,
    pub total: usize,
}

pub struct ReviewState {
    items: Vec<SensitiveFileItem>,
    cursor: usize,
}

impl ReviewState {
    pub fn new(items: Vec<SensitiveFileItem>) -> Self {
        Self { items, cursor: 0 }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn update(&mut self, event: Event) -> Transition<Vec<PathBuf>> {
        let last = self.items.len().saturating_sub(1);
        match event {
            Event::Up => self.cursor = self.cursor.saturating_sub(1),
            Event::Down => self.cursor = (self.cursor + 1).min(last),
            Event::Home => self.cursor = 0,
            Event::End => self.cursor = last,
            Event::Toggle => {
                if let Some(item) = self.items.get_mut(self.cursor) {
                    item.selected = !item.selected;
                }
            }
            Event::SelectAll => self.items.iter_mut().for_each(|i| i.selected = true),
            Event::DeselectAll => self.items.iter_mut().for_each(|i| i.selected = false),
            Event::Confirm => return Transition::Submit(self.selected_paths()),
            Event::Cancel => return Transition::Cancel,
            Event::PageUp | Event::PageDown | Event::Expand | Event::Collapse => {}
        }
        Transition::Continue
    }

    pub fn selected_paths(&self) -> Vec<PathBuf> {
        self.items
            .iter()
            .filter(|i| i.selected)
            .map(|i| i.absolute_path.clone())
            .collect()
    }

    pub fn view(&self) -> ReviewView {
        let rows = self
            .items
            .iter()
            .enumerate()
            .map(|(i, item)| ReviewRow {
                label: item.relative_path.display().to_string(),
                reason: item.reason.clone(),
                selected: item.selected,
                is_cursor: i == self.cursor,
            })
            .collect();

        ReviewView {
            rows,
            cursor: self.cursor,
            selected_count: self.items.iter().filter(|i| i.selected).count(),
            total: self.items.len(),
        }
    }
}
