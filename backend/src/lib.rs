//! # Chestnut Calendar
//!
//! Calendar core of the Chestnut Map app: month grid layout, events grouped
//! by day, month navigation and day selection.
//!
//! ## Architecture
//!
//! ```text
//! Presentation (out of crate)
//!     ↓ reads grids / events, sends navigation + selection
//! Domain (CalendarSession and the pure calendar modules)
//!     ↓ fetch_all_events
//! Storage (EventStorage: CSV file, in-memory, or an app-provided store)
//! ```

pub mod config;
pub mod domain;
pub mod storage;

pub use config::{CalendarConfig, ConfigError, LayoutConfig};
pub use domain::*;
pub use storage::{CsvConnection, CsvEventRepository, EventStorage, InMemoryEventStore};
