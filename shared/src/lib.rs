use chrono::{Datelike, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single calendar-anchored item, date-granular.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Opaque identifier assigned by the event store
    pub id: String,
    /// Display text
    pub title: String,
    /// Calendar date the event is anchored to (no time of day)
    pub date: NaiveDate,
    /// Hex color string, e.g. "#FF0000". Not validated here.
    pub color: String,
}

/// Absolute instant as delivered by the event store (seconds since the Unix epoch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventTimestamp {
    pub seconds: i64,
    #[serde(default)]
    pub nanos: u32,
}

impl EventTimestamp {
    pub fn from_seconds(seconds: i64) -> Self {
        Self { seconds, nanos: 0 }
    }
}

/// Event record exactly as fetched from the store, before date resolution.
///
/// `timestamp` is `None` when the source record has no usable date field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawEventRecord {
    pub id: String,
    pub title: String,
    pub timestamp: Option<EventTimestamp>,
    pub color: String,
}

/// Errors produced when constructing or parsing a [`YearMonth`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum YearMonthError {
    #[error("Invalid month: {0}. Must be between 1 and 12")]
    InvalidMonth(u32),
    #[error("Year {0} is outside the supported calendar range")]
    YearOutOfRange(i32),
    #[error("Invalid year-month '{0}', expected YYYY-MM")]
    Malformed(String),
}

/// A calendar month identified by year and month number.
///
/// Internally anchored on the first day of the month so every value is a
/// valid proleptic Gregorian month. Serializes as `"YYYY-MM"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth(NaiveDate);

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, YearMonthError> {
        if !(1..=12).contains(&month) {
            return Err(YearMonthError::InvalidMonth(month));
        }
        NaiveDate::from_ymd_opt(year, month, 1)
            .map(Self)
            .ok_or(YearMonthError::YearOutOfRange(year))
    }

    /// The month a date belongs to
    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.with_day(1).unwrap_or(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        self.0.with_day(self.days_in_month()).unwrap_or(self.0)
    }

    pub fn days_in_month(&self) -> u32 {
        match self.month() {
            2 => {
                if is_leap_year(self.year()) {
                    29
                } else {
                    28
                }
            }
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }

    /// Whether `date` falls inside this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// Shift by `months` (negative goes backwards). `None` past chrono's supported range.
    pub fn checked_add_months(&self, months: i32) -> Option<Self> {
        let shift = Months::new(months.unsigned_abs());
        let shifted = if months >= 0 {
            self.0.checked_add_months(shift)
        } else {
            self.0.checked_sub_months(shift)
        };
        shifted.map(Self)
    }

    /// Shift by `months`, saturating at the ends of the supported range
    pub fn plus_months(&self, months: i32) -> Self {
        self.checked_add_months(months).unwrap_or(*self)
    }

    pub fn next(&self) -> Self {
        self.plus_months(1)
    }

    pub fn previous(&self) -> Self {
        self.plus_months(-1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

impl FromStr for YearMonth {
    type Err = YearMonthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || YearMonthError::Malformed(s.to_string());
        let (year, month) = s.trim().rsplit_once('-').ok_or_else(malformed)?;
        let year = year.parse::<i32>().map_err(|_| malformed())?;
        let month = month.parse::<u32>().map_err(|_| malformed())?;
        Self::new(year, month)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = YearMonthError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

/// Proleptic Gregorian leap year rule
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Where a grid cell's date sits relative to the month being rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DayPosition {
    /// Filler day from the previous month
    BeforeMonth,
    /// Day of the month being rendered
    InMonth,
    /// Filler day from the next month
    AfterMonth,
}

/// One cell of a rendered month grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayCell {
    pub date: NaiveDate,
    pub position: DayPosition,
}

impl DayCell {
    /// Only days of the rendered month accept taps
    pub fn is_selectable(&self) -> bool {
        self.position == DayPosition::InMonth
    }
}

/// Layout of one month: how many week rows it needs and how tall each row is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub month: YearMonth,
    pub first_day_of_week: Weekday,
    /// Always >= 1; 4..=6 for every Gregorian month
    pub week_count: u32,
    pub row_height: f32,
}

/// Navigation cursor of the horizontal month scroller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewportState {
    pub visible_month: YearMonth,
    pub start_month: YearMonth,
    pub end_month: YearMonth,
}

impl ViewportState {
    /// Whether `month` lies inside the scrollable window
    pub fn contains(&self, month: YearMonth) -> bool {
        self.start_month <= month && month <= self.end_month
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_year_month_validation() {
        assert!(YearMonth::new(2024, 1).is_ok());
        assert_eq!(YearMonth::new(2024, 0), Err(YearMonthError::InvalidMonth(0)));
        assert_eq!(YearMonth::new(2024, 13), Err(YearMonthError::InvalidMonth(13)));
    }

    #[test]
    fn test_year_month_rollover() {
        let december = YearMonth::new(2024, 12).unwrap();
        assert_eq!(december.next(), YearMonth::new(2025, 1).unwrap());

        let january = YearMonth::new(2025, 1).unwrap();
        assert_eq!(january.previous(), december);

        assert_eq!(january.plus_months(-25), YearMonth::new(2022, 12).unwrap());
        assert_eq!(january.plus_months(100), YearMonth::new(2033, 5).unwrap());
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(YearMonth::new(2025, 1).unwrap().days_in_month(), 31);
        assert_eq!(YearMonth::new(2025, 4).unwrap().days_in_month(), 30);
        assert_eq!(YearMonth::new(2025, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(YearMonth::new(1900, 2).unwrap().days_in_month(), 28);
        assert_eq!(YearMonth::new(2000, 2).unwrap().days_in_month(), 29);
    }

    #[test]
    fn test_first_and_last_day() {
        let feb = YearMonth::new(2024, 2).unwrap();
        assert_eq!(feb.first_day(), NaiveDate::from_ymd_opt(2024, 2, 1).unwrap());
        assert_eq!(feb.last_day(), NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert!(feb.contains(NaiveDate::from_ymd_opt(2024, 2, 15).unwrap()));
        assert!(!feb.contains(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()));
    }

    #[test]
    fn test_parse_and_display() {
        let ym: YearMonth = "2024-05".parse().unwrap();
        assert_eq!(ym, YearMonth::new(2024, 5).unwrap());
        assert_eq!(ym.to_string(), "2024-05");

        assert!(matches!("2024".parse::<YearMonth>(), Err(YearMonthError::Malformed(_))));
        assert!(matches!("2024-xx".parse::<YearMonth>(), Err(YearMonthError::Malformed(_))));
        assert_eq!("2024-13".parse::<YearMonth>(), Err(YearMonthError::InvalidMonth(13)));
    }

    #[test]
    fn test_year_month_serde_as_string() {
        let ym = YearMonth::new(2024, 12).unwrap();
        let json = serde_json::to_string(&ym).unwrap();
        assert_eq!(json, "\"2024-12\"");

        let back: YearMonth = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ym);

        assert!(serde_json::from_str::<YearMonth>("\"2024-00\"").is_err());
    }

    #[test]
    fn test_viewport_contains() {
        let state = ViewportState {
            visible_month: YearMonth::new(2024, 6).unwrap(),
            start_month: YearMonth::new(2024, 1).unwrap(),
            end_month: YearMonth::new(2024, 12).unwrap(),
        };
        assert!(state.contains(YearMonth::new(2024, 1).unwrap()));
        assert!(state.contains(YearMonth::new(2024, 12).unwrap()));
        assert!(!state.contains(YearMonth::new(2025, 1).unwrap()));
    }

    #[test]
    fn test_only_in_month_cells_are_selectable() {
        let date = NaiveDate::from_ymd_opt(2024, 5, 1).unwrap();
        assert!(DayCell { date, position: DayPosition::InMonth }.is_selectable());
        assert!(!DayCell { date, position: DayPosition::BeforeMonth }.is_selectable());
        assert!(!DayCell { date, position: DayPosition::AfterMonth }.is_selectable());
    }
}
