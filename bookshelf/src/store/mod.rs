//! Record persistence.
//!
//! A [`RecordStore`] writes a validated [`ContentRecord`] under a validated [`Filename`]. The
//! request handler only depends on the trait; the backend is chosen from
//! [`StorageConfig`](crate::config::StorageConfig) by [`create_record_store`].

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::StorageConfig;
use crate::validation::{ContentRecord, Filename};

mod local;
mod memory;

pub use local::LocalRecordStore;
pub use memory::InMemoryRecordStore;

/// Errors raised while persisting a record. Never shown to clients.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The filename cannot be used as a single path segment under the storage root
    #[error("Filename {filename:?} is not a single path segment")]
    InvalidPath { filename: String },

    #[error("Store did not complete within {after:?}")]
    TimedOut { after: Duration },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Successful write, with the message returned to the client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordCreated {
    pub message: String,
}

impl RecordCreated {
    pub fn at(filename: &Filename) -> Self {
        Self {
            message: format!("record created at {filename}"),
        }
    }
}

/// Result of a single [`RecordStore::create`] call
pub type StoreOutcome = Result<RecordCreated, StoreError>;

/// Trait for record storage backends
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Durably write `record` under `filename`
    async fn create(&self, filename: &Filename, record: &ContentRecord) -> StoreOutcome;
}

/// Create a record store backend based on configuration
pub async fn create_record_store(config: &StorageConfig) -> Result<Arc<dyn RecordStore>, StoreError> {
    match config {
        StorageConfig::Local { path } => {
            tracing::info!("Creating local record store (path: {:?})", path);
            tokio::fs::create_dir_all(path).await.map_err(|e| {
                StoreError::Other(anyhow::anyhow!("Failed to create record directory {:?}: {}", path, e))
            })?;
            Ok(Arc::new(LocalRecordStore::new(path.clone())))
        }
        StorageConfig::Memory => {
            tracing::info!("Creating in-memory record store, records will not survive a restart");
            Ok(Arc::new(InMemoryRecordStore::new()))
        }
    }
}
