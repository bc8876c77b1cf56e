//! # Domain Module
//!
//! Calendar logic of the map app's calendar screen, independent of any UI
//! framework or event store.
//!
//! ## Module Organization
//!
//! - **calendar**: month grid math (week rows, cell classification, row height)
//! - **grid_cache**: bounded cache of month grids for the visible month and its neighbours
//! - **event_aggregator**: raw store records → date-only events → date-keyed buckets
//! - **viewport**: visible-month navigation
//! - **selection**: selected day
//! - **calendar_session**: one screen's state, change notification and event loading

pub mod calendar;
pub mod calendar_session;
pub mod event_aggregator;
pub mod grid_cache;
pub mod selection;
pub mod viewport;

pub use calendar::*;
pub use calendar_session::*;
pub use event_aggregator::*;
pub use grid_cache::*;
pub use selection::*;
pub use viewport::*;
