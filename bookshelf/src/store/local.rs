use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use super::{RecordCreated, RecordStore, StoreError, StoreOutcome};
use crate::validation::{ContentRecord, Filename};

static NEXT_TEMP_ID: AtomicU64 = AtomicU64::new(0);

/// Local filesystem store: one file per record, holding the record body.
///
/// Records are written to a temporary file in the root and renamed into place, so an existing
/// record is only ever replaced by a complete one.
pub struct LocalRecordStore {
    root: PathBuf,
}

impl LocalRecordStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Resolve `filename` under the root, refusing anything but a single normal component.
    fn record_path(&self, filename: &Filename) -> Result<PathBuf, StoreError> {
        let mut components = Path::new(filename.as_str()).components();

        match (components.next(), components.next()) {
            // `components()` drops trailing separators and `.`, so the segment must be the whole name
            (Some(Component::Normal(segment)), None) if segment == filename.as_str() => Ok(self.root.join(segment)),
            _ => Err(StoreError::InvalidPath {
                filename: filename.to_string(),
            }),
        }
    }

    fn temp_path(&self, filename: &Filename) -> PathBuf {
        let id = NEXT_TEMP_ID.fetch_add(1, Ordering::Relaxed);
        self.root.join(format!(".{}.{}-{}.tmp", filename, std::process::id(), id))
    }
}

async fn write_synced(path: &Path, body: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(body).await?;
    file.sync_all().await
}

#[async_trait]
impl RecordStore for LocalRecordStore {
    #[tracing::instrument(skip_all, fields(filename = %filename))]
    async fn create(&self, filename: &Filename, record: &ContentRecord) -> StoreOutcome {
        let path = self.record_path(filename)?;
        let temp = self.temp_path(filename);

        let written = match write_synced(&temp, record.body().as_bytes()).await {
            Ok(()) => fs::rename(&temp, &path).await,
            Err(e) => Err(e),
        };

        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&temp).await {
                tracing::debug!(path = ?temp, "Failed to remove temporary record: {}", cleanup);
            }
            return Err(e.into());
        }

        tracing::debug!(path = ?path, bytes = record.body().len(), "Record written");

        Ok(RecordCreated::at(filename))
    }
}
