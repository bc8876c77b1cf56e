//! In-memory event store, for embedding apps that already hold the
//! event list and for tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use shared::RawEventRecord;
use std::sync::{Arc, Mutex};

use super::traits::EventStorage;

#[derive(Clone, Default)]
pub struct InMemoryEventStore {
    records: Arc<Mutex<Vec<RawEventRecord>>>,
}

impl InMemoryEventStore {
    pub fn new(records: Vec<RawEventRecord>) -> Self {
        Self {
            records: Arc::new(Mutex::new(records)),
        }
    }

    /// Replace the whole record list; visible on the next fetch
    pub fn replace_all(&self, records: Vec<RawEventRecord>) -> Result<()> {
        let mut guard = self
            .records
            .lock()
            .map_err(|_| anyhow!("event store lock poisoned"))?;
        *guard = records;
        Ok(())
    }
}

#[async_trait]
impl EventStorage for InMemoryEventStore {
    async fn fetch_all_events(&self) -> Result<Vec<RawEventRecord>> {
        let guard = self
            .records
            .lock()
            .map_err(|_| anyhow!("event store lock poisoned"))?;
        Ok(guard.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::EventTimestamp;

    fn record(id: &str) -> RawEventRecord {
        RawEventRecord {
            id: id.to_string(),
            title: "Lunch".to_string(),
            timestamp: Some(EventTimestamp::from_seconds(1_715_331_600)),
            color: "#123456".to_string(),
        }
    }

    #[tokio::test]
    async fn test_fetch_returns_current_records() {
        let store = InMemoryEventStore::new(vec![record("1")]);
        assert_eq!(store.fetch_all_events().await.unwrap().len(), 1);

        store.replace_all(vec![record("2"), record("3")]).unwrap();
        let fetched = store.fetch_all_events().await.unwrap();
        assert_eq!(fetched.len(), 2);
        assert_eq!(fetched[0].id, "2");
    }
}
