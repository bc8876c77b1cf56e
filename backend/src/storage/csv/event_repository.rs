use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat};
use csv::{ReaderBuilder, Writer};
use log::{debug, info, warn};
use shared::{EventTimestamp, RawEventRecord};
use std::fs::OpenOptions;
use std::io::{BufWriter, ErrorKind};

use super::connection::{CsvConnection, EVENTS_HEADER};
use crate::storage::traits::EventStorage;

/// CSV-based event repository
#[derive(Clone)]
pub struct CsvEventRepository {
    connection: CsvConnection,
}

impl CsvEventRepository {
    /// Create a new CSV event repository
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    /// Read every row of the events file. A missing file reads as empty.
    ///
    /// Rows may be short; absent trailing columns read as blank. Rows that
    /// cannot be decoded at all are skipped with a warning.
    async fn read_events(&self) -> Result<Vec<RawEventRecord>> {
        let file_path = self.connection.events_file_path();
        let bytes = match tokio::fs::read(&file_path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No events file at {:?}, nothing to read", file_path);
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };
        let mut csv_reader = ReaderBuilder::new()
            .flexible(true)
            .from_reader(bytes.as_slice());

        let mut records = Vec::new();
        for result in csv_reader.records() {
            let record = match result {
                Ok(record) => record,
                Err(e) => {
                    warn!("Skipping unreadable row in {:?}: {}", file_path, e);
                    continue;
                }
            };
            records.push(RawEventRecord {
                id: record.get(0).unwrap_or("").to_string(),
                title: record.get(1).unwrap_or("").to_string(),
                timestamp: parse_timestamp(record.get(2).unwrap_or("")),
                color: record.get(3).unwrap_or("").to_string(),
            });
        }

        debug!("Read {} event rows from {:?}", records.len(), file_path);
        Ok(records)
    }

    /// Overwrite the events file with `records`
    pub fn write_events(&self, records: &[RawEventRecord]) -> Result<()> {
        let file_path = self.connection.events_file_path();

        // Create a temporary file for atomic write
        let temp_path = file_path.with_extension("tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)?;

            let mut csv_writer = Writer::from_writer(BufWriter::new(file));
            csv_writer.write_record(EVENTS_HEADER)?;

            for record in records {
                let timestamp = record.timestamp.map(format_timestamp).unwrap_or_default();
                csv_writer.write_record([
                    record.id.as_str(),
                    record.title.as_str(),
                    timestamp.as_str(),
                    record.color.as_str(),
                ])?;
            }

            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &file_path)?;

        info!("Wrote {} events to {:?}", records.len(), file_path);
        Ok(())
    }
}

/// Whole seconds are written as epoch seconds, anything finer as RFC 3339 in UTC
fn format_timestamp(timestamp: EventTimestamp) -> String {
    if timestamp.nanos == 0 {
        return timestamp.seconds.to_string();
    }
    DateTime::from_timestamp(timestamp.seconds, timestamp.nanos)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
        .unwrap_or_else(|| timestamp.seconds.to_string())
}

/// Epoch seconds or RFC 3339; anything else is treated as missing
fn parse_timestamp(value: &str) -> Option<EventTimestamp> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(seconds) = value.parse::<i64>() {
        return Some(EventTimestamp::from_seconds(seconds));
    }
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| EventTimestamp {
            seconds: dt.timestamp(),
            nanos: dt.timestamp_subsec_nanos(),
        })
}

#[async_trait]
impl EventStorage for CsvEventRepository {
    async fn fetch_all_events(&self) -> Result<Vec<RawEventRecord>> {
        self.read_events().await
    }
}
