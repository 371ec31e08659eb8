use std::time::Duration;

use thiserror::Error;

use super::RecordId;

/// Errors raised by a record store.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum StoreError {
    #[error("Record not found: {collection}/{id}")]
    NotFound { collection: &'static str, id: RecordId },
    #[error("Store I/O error: {0}")]
    Io(String),
    #[error("Store snapshot is corrupt: {0}")]
    Corrupt(String),
    #[error("Store request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
