use crate::model::{Field, ScheduleRequest};
use crate::session::Outcome;

/// Lines each request card takes in the list, including the spacer.
pub const CARD_HEIGHT: usize = 6;

pub const TAB_REQUESTS: usize = 0;
pub const TAB_HELP: usize = 1;

/// Presentation-only state. Records and the form buffer live in the `Session`.
pub struct UiState {
    pub tab: usize,
    pub info: String,
    pub selected: usize, // Index into the record list
    pub scroll_offset: usize,
    pub visible_cards: usize, // Cards that fit in the list on the last frame
    pub focus: usize, // Index into Field::ALL while the form is open
    pub last_exported_path: Option<String>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            tab: TAB_REQUESTS,
            info: String::new(),
            selected: 0,
            scroll_offset: 0,
            visible_cards: 1,
            focus: 0,
            last_exported_path: None,
        }
    }
}

impl UiState {
    pub fn focused_field(&self) -> Field {
        Field::ALL[self.focus % Field::ALL.len()]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % Field::ALL.len();
    }

    pub fn focus_prev(&mut self) {
        self.focus = (self.focus + Field::ALL.len() - 1) % Field::ALL.len();
    }

    pub fn select_next(&mut self, len: usize) {
        if len > 0 && self.selected < len - 1 {
            self.selected += 1;
        }
        self.follow_selection();
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
        self.follow_selection();
    }

    /// Scroll only when the selection leaves the window.
    fn follow_selection(&mut self) {
        self.scroll_offset = self.visible_offset(self.visible_cards);
    }

    /// Keep the selection inside the list after it shrinks.
    pub fn clamp_selection(&mut self, len: usize) {
        if len == 0 {
            self.selected = 0;
            self.scroll_offset = 0;
        } else if self.selected >= len {
            self.selected = len - 1;
        }
        if self.scroll_offset > self.selected {
            self.scroll_offset = self.selected;
        }
    }

    /// Scroll offset that keeps the selected card visible for `visible` cards.
    pub fn visible_offset(&self, visible: usize) -> usize {
        let visible = visible.max(1);
        let mut offset = self.scroll_offset;
        if self.selected < offset {
            offset = self.selected;
        } else if self.selected >= offset + visible {
            offset = self.selected + 1 - visible;
        }
        offset
    }

    /// Update status text and selection after an action ran.
    pub fn record_outcome(&mut self, outcome: &Outcome, records: &[ScheduleRequest]) {
        match outcome {
            Outcome::FieldUpdated(_) => return,
            Outcome::FormOpened(_) => self.focus = 0,
            Outcome::Saved { request, .. } => {
                if let Some(idx) = records.iter().position(|r| r.id == request.id) {
                    self.selected = idx;
                    self.follow_selection();
                }
            }
            Outcome::Deleted(_) => self.clamp_selection(records.len()),
            Outcome::Cancelled | Outcome::Rejected(_) => {}
        }
        self.info = outcome.message();
    }
}
