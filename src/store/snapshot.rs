//! JSON snapshot files backing a store collection.
//!
//! The whole collection is rewritten after every mutation: the new contents
//! go to a sibling `.tmp` file which is then renamed over the old snapshot,
//! so a crash mid-write leaves the previous snapshot intact.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{RecordId, StoreError};

/// On-disk layout of one collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot<T> {
    /// Next id the store will hand out. Kept so ids survive deletes across restarts.
    pub next_id: RecordId,
    pub records: Vec<T>,
}

#[derive(Debug, Clone)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<dir>/<collection>.json`
    pub fn in_dir(dir: impl AsRef<Path>, collection: &str) -> Self {
        Self::new(dir.as_ref().join(format!("{collection}.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the snapshot, or `None` when no file has been written yet.
    pub async fn load<T: DeserializeOwned>(&self) -> Result<Option<Snapshot<T>>, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(io_error(&self.path, &e)),
        };

        let snapshot = serde_json::from_slice(&bytes)
            .map_err(|e| StoreError::Corrupt(format!("{}: {e}", self.path.display())))?;
        Ok(Some(snapshot))
    }

    pub async fn save<'a, T, I>(&self, next_id: RecordId, records: I) -> Result<(), StoreError>
    where
        T: Serialize + 'a,
        I: IntoIterator<Item = &'a T>,
    {
        let snapshot = Snapshot {
            next_id,
            records: records.into_iter().collect::<Vec<_>>(),
        };
        let bytes = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| StoreError::Io(format!("failed to encode snapshot: {e}")))?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_error(parent, &e))?;
        }

        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes)
            .await
            .map_err(|e| io_error(&tmp, &e))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| io_error(&self.path, &e))?;

        debug!(path = %self.path.display(), records = snapshot.records.len(), "Snapshot written");
        Ok(())
    }
}

fn io_error(path: &Path, err: &std::io::Error) -> StoreError {
    StoreError::Io(format!("{}: {err}", path.display()))
}
