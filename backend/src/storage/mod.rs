//! # Storage Module
//!
//! Event sources the calendar session can read from. The domain layer only
//! sees the [`EventStorage`] trait; concrete sources are chosen by the
//! embedding application and passed in explicitly.
//!
//! - **csv**: `events.csv` in a data directory
//! - **memory**: an in-process list, replaced wholesale

pub mod csv;
pub mod memory;
pub mod traits;

pub use self::csv::{CsvConnection, CsvEventRepository};
pub use memory::InMemoryEventStore;
pub use traits::EventStorage;
