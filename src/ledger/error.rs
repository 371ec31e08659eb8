use thiserror::Error;

use crate::domain::ProductId;
use crate::store::StoreError;

/// Errors that can occur during stock operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerError {
    #[error("Product not found: {0}")]
    NotFound(ProductId),
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock { requested: u64, available: u32 },
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(String),
    #[error("Amount out of range: {0}")]
    Overflow(String),
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for LedgerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { id, .. } => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}
