//! Calendar grid math for the month view.
//!
//! Everything here is pure: given a month and a first-day-of-week
//! convention it answers how many week rows the month needs, which dates
//! fill the grid rectangle and how tall each row is for a fixed vertical
//! budget. No state is kept, so the functions may be called from any
//! thread, e.g. while pre-computing neighbouring months.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use shared::{DayCell, DayPosition, MonthGrid, YearMonth};

use crate::config::LayoutConfig;

/// Days between `first_day_of_week` and `day` going forward (0..=6)
fn days_after_week_start(day: Weekday, first_day_of_week: Weekday) -> u32 {
    (7 + day.num_days_from_monday() - first_day_of_week.num_days_from_monday()) % 7
}

/// 1-based week-of-month ordinal of `date`.
///
/// Week 1 is the week containing the 1st of the month, however few of its
/// days belong to the month.
pub fn week_of_month(date: NaiveDate, first_day_of_week: Weekday) -> u32 {
    let first = YearMonth::from_date(date).first_day();
    let lead = days_after_week_start(first.weekday(), first_day_of_week);
    (date.day() - 1 + lead) / 7 + 1
}

/// Number of week rows needed to show `month`
pub fn weeks_in_month(month: YearMonth, first_day_of_week: Weekday) -> u32 {
    let first_week = week_of_month(month.first_day(), first_day_of_week);
    let last_week = week_of_month(month.last_day(), first_day_of_week);
    last_week - first_week + 1
}

/// Classify `date` against the month being rendered
pub fn classify_day(date: NaiveDate, month: YearMonth) -> DayPosition {
    if month.contains(date) {
        DayPosition::InMonth
    } else if date < month.first_day() {
        DayPosition::BeforeMonth
    } else {
        DayPosition::AfterMonth
    }
}

/// Height of a single week row.
///
/// # Panics
///
/// Panics when `week_count` is zero; [`weeks_in_month`] never produces that.
pub fn row_height(available_height: f32, week_count: u32) -> f32 {
    assert!(week_count >= 1, "week_count must be at least 1");
    available_height / week_count as f32
}

/// The 7 weekdays in header order, starting at `first_day_of_week`
pub fn days_of_week(first_day_of_week: Weekday) -> [Weekday; 7] {
    let mut days = [first_day_of_week; 7];
    for i in 1..7 {
        days[i] = days[i - 1].succ();
    }
    days
}

/// Height left for the grid once the fixed chrome is subtracted, never negative
pub fn available_calendar_height(
    layout: &LayoutConfig,
    screen_height: f32,
    status_bar_height: f32,
    navigation_bar_height: f32,
) -> f32 {
    let remaining = screen_height
        - status_bar_height
        - navigation_bar_height
        - layout.fixed_elements_height();
    remaining.max(0.0)
}

/// Calendar service bound to one first-day-of-week convention
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarService {
    first_day_of_week: Weekday,
}

impl CalendarService {
    pub fn new(first_day_of_week: Weekday) -> Self {
        Self { first_day_of_week }
    }

    pub fn first_day_of_week(&self) -> Weekday {
        self.first_day_of_week
    }

    pub fn weeks_in_month(&self, month: YearMonth) -> u32 {
        weeks_in_month(month, self.first_day_of_week)
    }

    pub fn classify_day(&self, date: NaiveDate, month: YearMonth) -> DayPosition {
        classify_day(date, month)
    }

    /// Grid layout of `month` for the given vertical budget
    pub fn month_grid(&self, month: YearMonth, available_height: f32) -> MonthGrid {
        let week_count = self.weeks_in_month(month);
        MonthGrid {
            month,
            first_day_of_week: self.first_day_of_week,
            week_count,
            row_height: row_height(available_height, week_count),
        }
    }

    /// Every cell of the grid rectangle, row by row.
    ///
    /// Starts on the first-day-of-week on or before the 1st and yields
    /// `weeks_in_month * 7` cells. Padding cells that fall outside chrono's
    /// date range are left out, so the first and last supported months
    /// return fewer cells; every in-month day is always present.
    pub fn grid_days(&self, month: YearMonth) -> Vec<DayCell> {
        let first = month.first_day();
        let lead = i64::from(days_after_week_start(first.weekday(), self.first_day_of_week));
        let cell_count = i64::from(self.weeks_in_month(month) * 7);

        (-lead..cell_count - lead)
            .filter_map(|offset| first.checked_add_signed(Duration::days(offset)))
            .map(|date| DayCell {
                date,
                position: classify_day(date, month),
            })
            .collect()
    }

    pub fn days_of_week(&self) -> [Weekday; 7] {
        days_of_week(self.first_day_of_week)
    }

    /// Get the human-readable name for a month number
    pub fn month_name(&self, month: u32) -> &'static str {
        match month {
            1 => "January", 2 => "February", 3 => "March", 4 => "April",
            5 => "May", 6 => "June", 7 => "July", 8 => "August",
            9 => "September", 10 => "October", 11 => "November", 12 => "December",
            _ => "Invalid Month",
        }
    }

    /// Header text for the month scroller, e.g. "May 2024"
    pub fn month_label(&self, month: YearMonth) -> String {
        format!("{} {}", self.month_name(month.month()), month.year())
    }
}

impl Default for CalendarService {
    fn default() -> Self {
        Self::new(Weekday::Sun)
    }
}
