//! # CSV Storage
//!
//! File-backed event source: a single `events.csv` in the data directory.
//!
//! ```csv
//! id,title,timestamp,color
//! evt-1,Picnic,1715331600,#FF0000
//! evt-2,Dentist,2024-05-11T09:30:00+09:00,#00AAFF
//! evt-3,Undated,,#CCCCCC
//! ```
//!
//! `timestamp` is epoch seconds or RFC 3339. A blank or unparseable value is
//! read as "no timestamp"; such rows are kept here and dropped later by the
//! aggregator.

pub mod connection;
pub mod event_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use event_repository::CsvEventRepository;
