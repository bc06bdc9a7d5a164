use async_trait::async_trait;
use dashmap::DashMap;

use super::{RecordCreated, RecordStore, StoreOutcome};
use crate::validation::{ContentRecord, Filename};

/// In-memory store keyed by filename. Useful for development and tests.
#[derive(Default)]
pub struct InMemoryRecordStore {
    records: DashMap<Filename, ContentRecord>,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, filename: &str) -> Option<ContentRecord> {
        self.records.get(filename).map(|entry| entry.value().clone())
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create(&self, filename: &Filename, record: &ContentRecord) -> StoreOutcome {
        self.records.insert(filename.clone(), record.clone());
        Ok(RecordCreated::at(filename))
    }
}
