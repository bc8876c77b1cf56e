//! # Storage Traits
//!
//! The calendar core only ever reads events. Whatever backs the event list
//! (a remote document store, a CSV file, memory) sits behind
//! [`EventStorage`] and is handed to the session at construction time.

use anyhow::Result;
use async_trait::async_trait;
use shared::RawEventRecord;

/// Source of calendar events
///
/// A fetch delivers the full current list, never a diff. An `Err` means
/// the whole fetch failed; individual unusable records are returned as-is
/// and filtered by the aggregator.
#[async_trait]
pub trait EventStorage: Send + Sync {
    /// Fetch every event record
    async fn fetch_all_events(&self) -> Result<Vec<RawEventRecord>>;
}
