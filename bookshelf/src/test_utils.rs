//! Test utilities: app construction and store doubles.

use crate::config::{Config, StorageConfig};
use crate::store::{RecordCreated, RecordStore, StoreError, StoreOutcome};
use crate::validation::{ContentRecord, Filename};
use async_trait::async_trait;
use axum_test::TestServer;
use std::sync::Arc;
use std::time::Duration;

pub fn create_test_app(config: Config, store: Arc<dyn RecordStore>) -> TestServer {
    crate::Application::with_store(config, store).into_test_server()
}

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        storage: StorageConfig::Memory,
        store_timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

/// Store whose writes always fail
pub struct FailingRecordStore;

#[async_trait]
impl RecordStore for FailingRecordStore {
    async fn create(&self, _filename: &Filename, _record: &ContentRecord) -> StoreOutcome {
        Err(StoreError::Io(std::io::Error::new(
            std::io::ErrorKind::PermissionDenied,
            "read-only filesystem",
        )))
    }
}

/// Store that takes `delay` before succeeding
pub struct SlowRecordStore {
    delay: Duration,
}

impl SlowRecordStore {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl RecordStore for SlowRecordStore {
    async fn create(&self, filename: &Filename, _record: &ContentRecord) -> StoreOutcome {
        tokio::time::sleep(self.delay).await;
        Ok(RecordCreated::at(filename))
    }
}
