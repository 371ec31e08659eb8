//! Keyed record storage.
//!
//! A store maps numeric ids to complete records. Ids are assigned on insert,
//! strictly increasing and never reused. Listing returns records in insertion
//! order. There is no partial-field update at this layer: callers replace the
//! whole record.

use std::fmt::Debug;
use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;

mod entities;
pub mod error;
pub mod snapshot;

pub use error::StoreError;
pub use snapshot::{Snapshot, SnapshotFile};

/// Identifier assigned by a store on insert.
pub type RecordId = u64;

/// A record type that can live in a store.
pub trait Entity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned + 'static {
    /// The record as supplied by a caller, before an id is assigned.
    type Draft: Clone + Debug + Send + Sync;

    /// Collection name, used in errors and snapshot file names.
    const COLLECTION: &'static str;

    fn id(&self) -> RecordId;

    /// Build the stored record once the store has picked an id.
    fn from_draft(id: RecordId, draft: Self::Draft) -> Self;
}

/// Storage contract the ledger and catalog are written against.
///
/// Each call is atomic with respect to the single record it touches.
pub trait RecordStore<T: Entity>: Clone + Send + Sync + 'static {
    fn create(&self, draft: T::Draft) -> impl Future<Output = Result<RecordId, StoreError>> + Send;

    fn get(&self, id: RecordId) -> impl Future<Output = Result<T, StoreError>> + Send;

    fn list(&self) -> impl Future<Output = Result<Vec<T>, StoreError>> + Send;

    fn update(&self, id: RecordId, record: T) -> impl Future<Output = Result<(), StoreError>> + Send;

    fn delete(&self, id: RecordId) -> impl Future<Output = Result<(), StoreError>> + Send;
}
