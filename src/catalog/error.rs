use std::time::Duration;

use thiserror::Error;

use crate::ledger::LedgerError;
use crate::store::StoreError;

/// Outcomes callers of the catalog can observe.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u64, available: u32 },
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Storage failure: {0}")]
    Store(String),
}

impl From<StoreError> for CatalogError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { collection, id } => Self::NotFound(format!("{collection}/{id}")),
            StoreError::Timeout(limit) => Self::Timeout(limit),
            other => Self::Store(other.to_string()),
        }
    }
}

impl From<LedgerError> for CatalogError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::NotFound(id) => Self::NotFound(format!("products/{id}")),
            LedgerError::InsufficientStock {
                requested,
                available,
            } => Self::InsufficientStock {
                requested,
                available,
            },
            LedgerError::InvalidQuantity(reason) | LedgerError::Overflow(reason) => {
                Self::Validation(reason)
            }
            LedgerError::Store(err) => err.into(),
        }
    }
}
