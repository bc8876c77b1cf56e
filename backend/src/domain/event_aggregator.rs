//! Grouping of calendar events by date.
//!
//! Raw store records are resolved to date-only [`Event`]s first; records
//! without a usable timestamp are dropped one by one instead of failing the
//! batch. The resulting list is grouped into [`EventsByDate`], which is
//! always rebuilt from scratch, never patched.

use chrono::{FixedOffset, Local, NaiveDate, TimeZone};
use log::warn;
use shared::{Event, EventTimestamp, RawEventRecord, YearMonth};
use std::collections::HashMap;

use crate::config::CalendarConfig;

/// Time zone used to turn an absolute timestamp into a calendar date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateResolver {
    /// System local time zone
    Local,
    Fixed(FixedOffset),
}

impl DateResolver {
    pub fn from_config(config: &CalendarConfig) -> Self {
        match config.fixed_offset() {
            Some(offset) => DateResolver::Fixed(offset),
            None => DateResolver::Local,
        }
    }

    /// Calendar date of `timestamp`, or `None` when it is out of range.
    /// Sub-second precision is ignored.
    pub fn resolve(&self, timestamp: EventTimestamp) -> Option<NaiveDate> {
        match self {
            DateResolver::Local => timestamp_to_date(timestamp, &Local),
            DateResolver::Fixed(offset) => timestamp_to_date(timestamp, offset),
        }
    }
}

fn timestamp_to_date<Tz: TimeZone>(timestamp: EventTimestamp, tz: &Tz) -> Option<NaiveDate> {
    tz.timestamp_opt(timestamp.seconds, 0)
        .single()
        .map(|date_time| date_time.date_naive())
}

/// Resolve one record, `None` if it has no usable timestamp
pub fn resolve_record(record: RawEventRecord, resolver: &DateResolver) -> Option<Event> {
    let date = record.timestamp.and_then(|ts| resolver.resolve(ts))?;
    Some(Event {
        id: record.id,
        title: record.title,
        date,
        color: record.color,
    })
}

/// Result of turning a fetched batch into a date map
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub events: EventsByDate,
    /// Records skipped for lack of a usable timestamp
    pub dropped: usize,
}

/// Resolve every record and group the survivors by date
pub fn aggregate_records(records: Vec<RawEventRecord>, resolver: &DateResolver) -> Aggregation {
    let mut dropped = 0;
    let events: Vec<Event> = records
        .into_iter()
        .filter_map(|record| {
            let id = record.id.clone();
            let event = resolve_record(record, resolver);
            if event.is_none() {
                warn!("Dropping event '{}': no usable timestamp", id);
                dropped += 1;
            }
            event
        })
        .collect();

    Aggregation {
        events: EventsByDate::rebuild(events),
        dropped,
    }
}

/// Events bucketed by their date.
///
/// Dates without events are absent rather than mapped to an empty list.
/// Within a bucket events are ordered by title, then id, so two rebuilds of
/// the same input compare equal regardless of fetch order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventsByDate {
    buckets: HashMap<NaiveDate, Vec<Event>>,
}

impl EventsByDate {
    pub fn rebuild<I>(events: I) -> Self
    where
        I: IntoIterator<Item = Event>,
    {
        let mut buckets: HashMap<NaiveDate, Vec<Event>> = HashMap::new();
        for event in events {
            buckets.entry(event.date).or_default().push(event);
        }
        for bucket in buckets.values_mut() {
            bucket.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        }
        Self { buckets }
    }

    pub fn has_events(&self, date: NaiveDate) -> bool {
        self.buckets.contains_key(&date)
    }

    /// Events on `date`; empty when there are none
    pub fn events_on(&self, date: NaiveDate) -> &[Event] {
        self.buckets.get(&date).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Dates of `month` that carry at least one event, ascending
    pub fn dates_in_month(&self, month: YearMonth) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .buckets
            .keys()
            .copied()
            .filter(|date| month.contains(*date))
            .collect();
        dates.sort();
        dates
    }

    /// Number of non-empty dates
    pub fn date_count(&self) -> usize {
        self.buckets.len()
    }

    /// Total number of events across all buckets
    pub fn event_count(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
