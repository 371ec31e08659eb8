use thiserror::Error;

use super::ConfigError;
use crate::catalog::CatalogError;
use crate::store::StoreError;

/// Errors from starting, driving or stopping the whole system.
#[derive(Debug, Error)]
pub enum SystemError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Failed to open store: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error("Actor task failed: {0}")]
    TaskFailed(String),
}
