//! Month navigation for the horizontal month scroller.
//!
//! A single state variable, the visible month, moved by the previous/next
//! buttons or by the scroller settling on a month. The window of
//! `[current - K, current + K]` only bounds what the scroller offers;
//! the controller itself accepts any month.

use log::{debug, warn};
use shared::{ViewportState, YearMonth};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewportController {
    state: ViewportState,
}

impl ViewportController {
    /// Start on `current_month` with `month_window` months reachable on each side
    pub fn new(current_month: YearMonth, month_window: u32) -> Self {
        let window = i32::try_from(month_window).unwrap_or(i32::MAX);
        Self {
            state: ViewportState {
                visible_month: current_month,
                start_month: current_month.plus_months(-window),
                end_month: current_month.plus_months(window),
            },
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn visible_month(&self) -> YearMonth {
        self.state.visible_month
    }

    pub fn go_to_previous_month(&mut self) -> YearMonth {
        let target = self.state.visible_month.previous();
        self.set_visible(target);
        target
    }

    pub fn go_to_next_month(&mut self) -> YearMonth {
        let target = self.state.visible_month.next();
        self.set_visible(target);
        target
    }

    /// The scroller came to rest on `month`. Returns whether it differs
    /// from the previously visible month.
    pub fn on_scroll_settled(&mut self, month: YearMonth) -> bool {
        if month == self.state.visible_month {
            return false;
        }
        self.set_visible(month);
        true
    }

    fn set_visible(&mut self, month: YearMonth) {
        if !self.state.contains(month) {
            warn!(
                "Month {} is outside the scrollable window {}..={}",
                month, self.state.start_month, self.state.end_month
            );
        }
        debug!("Visible month {} -> {}", self.state.visible_month, month);
        self.state.visible_month = month;
    }
}
