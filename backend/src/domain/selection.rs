//! Selected-day state for the calendar screen.

use chrono::NaiveDate;
use shared::Event;

use super::event_aggregator::EventsByDate;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionState {
    selected_date: Option<NaiveDate>,
}

impl SelectionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_date
    }

    /// Unconditional; dates outside the visible month are accepted too
    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected_date = Some(date);
    }

    pub fn clear_selection(&mut self) {
        self.selected_date = None;
    }

    /// Events on the selected date, empty when nothing is selected
    pub fn current_selection_events<'a>(&self, events: &'a EventsByDate) -> &'a [Event] {
        match self.selected_date {
            Some(date) => events.events_on(date),
            None => &[],
        }
    }
}
