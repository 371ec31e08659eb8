use std::collections::BTreeMap;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, instrument, warn};

use crate::store::{Entity, RecordId, RecordStore, SnapshotFile, StoreError};

// =============================================================================
// 1. THE MESSAGES
// =============================================================================

pub type Response<T> = oneshot::Sender<Result<T, StoreError>>;

#[derive(Debug)]
pub enum ResourceRequest<T: Entity> {
    Create {
        draft: T::Draft,
        respond_to: Response<RecordId>,
    },
    Get {
        id: RecordId,
        respond_to: Response<T>,
    },
    List {
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: RecordId,
        record: T,
        respond_to: Response<()>,
    },
    Delete {
        id: RecordId,
        respond_to: Response<()>,
    },
    Shutdown,
}

// =============================================================================
// 2. THE ACTOR
// =============================================================================

/// Owns one collection of records and serves requests one at a time.
///
/// Records are kept in a `BTreeMap` keyed by id. Ids only ever grow, so key
/// order is insertion order.
pub struct ResourceActor<T: Entity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    records: BTreeMap<RecordId, T>,
    next_id: RecordId,
    snapshot: Option<SnapshotFile>,
}

impl<T: Entity> ResourceActor<T> {
    /// An in-memory actor with an empty collection.
    pub fn new(buffer_size: usize) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            records: BTreeMap::new(),
            next_id: 1,
            snapshot: None,
        };
        (actor, ResourceClient::new(sender))
    }

    /// An actor backed by a snapshot file, seeded from it when one exists.
    pub async fn with_snapshot(
        buffer_size: usize,
        snapshot: SnapshotFile,
    ) -> Result<(Self, ResourceClient<T>), StoreError> {
        let (mut actor, client) = Self::new(buffer_size);

        if let Some(saved) = snapshot.load::<T>().await? {
            let highest = saved.records.iter().map(|record| record.id()).max().unwrap_or(0);
            actor.next_id = saved.next_id.max(highest + 1);
            actor.records = saved
                .records
                .into_iter()
                .map(|record| (record.id(), record))
                .collect();
            info!(
                collection = T::COLLECTION,
                records = actor.records.len(),
                next_id = actor.next_id,
                "Loaded snapshot"
            );
        }

        actor.snapshot = Some(snapshot);
        Ok((actor, client))
    }

    #[instrument(name = "resource_actor", skip(self), fields(collection = T::COLLECTION))]
    pub async fn run(mut self) {
        info!("Store actor starting");
        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { draft, respond_to } => {
                    let result = self.handle_create(draft).await;
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let result = self
                        .records
                        .get(&id)
                        .cloned()
                        .ok_or_else(|| not_found::<T>(id));
                    let _ = respond_to.send(result);
                }
                ResourceRequest::List { respond_to } => {
                    let _ = respond_to.send(Ok(self.records.values().cloned().collect()));
                }
                ResourceRequest::Update { id, record, respond_to } => {
                    let result = self.handle_update(id, record).await;
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    let result = self.handle_delete(id).await;
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Shutdown => {
                    info!("Shutdown requested");
                    break;
                }
            }
        }
        info!("Store actor stopped");
    }

    async fn handle_create(&mut self, draft: T::Draft) -> Result<RecordId, StoreError> {
        let id = self.next_id;
        self.next_id += 1;
        self.records.insert(id, T::from_draft(id, draft));

        if let Err(e) = self.persist().await {
            self.records.remove(&id);
            return Err(e);
        }

        debug!(id, "Record created");
        Ok(id)
    }

    async fn handle_update(&mut self, id: RecordId, record: T) -> Result<(), StoreError> {
        let Some(slot) = self.records.get_mut(&id) else {
            return Err(not_found::<T>(id));
        };
        let previous = std::mem::replace(slot, record);

        if let Err(e) = self.persist().await {
            self.records.insert(id, previous);
            return Err(e);
        }

        debug!(id, "Record updated");
        Ok(())
    }

    async fn handle_delete(&mut self, id: RecordId) -> Result<(), StoreError> {
        let Some(previous) = self.records.remove(&id) else {
            return Err(not_found::<T>(id));
        };

        if let Err(e) = self.persist().await {
            self.records.insert(id, previous);
            return Err(e);
        }

        debug!(id, "Record deleted");
        Ok(())
    }

    /// Write the collection out, if this actor is snapshot-backed.
    async fn persist(&self) -> Result<(), StoreError> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };
        snapshot
            .save(self.next_id, self.records.values())
            .await
            .inspect_err(|e| error!(error = %e, "Failed to persist snapshot"))
    }
}

fn not_found<T: Entity>(id: RecordId) -> StoreError {
    StoreError::NotFound {
        collection: T::COLLECTION,
        id,
    }
}

// =============================================================================
// 3. THE CLIENT
// =============================================================================

/// Cloneable handle to a [`ResourceActor`].
#[derive(Clone)]
pub struct ResourceClient<T: Entity> {
    sender: mpsc::Sender<ResourceRequest<T>>,
    timeout: Option<Duration>,
}

impl<T: Entity> ResourceClient<T> {
    pub fn new(sender: mpsc::Sender<ResourceRequest<T>>) -> Self {
        Self {
            sender,
            timeout: None,
        }
    }

    /// Bound every round-trip to the actor by `limit`.
    pub fn with_timeout(mut self, limit: Duration) -> Self {
        self.timeout = Some(limit);
        self
    }

    /// Stop the actor. Requests already queued ahead of this one are still served.
    pub async fn shutdown(&self) -> Result<(), StoreError> {
        self.sender
            .send(ResourceRequest::Shutdown)
            .await
            .map_err(|_| closed::<T>())
    }

    /// Run a read, with the timeout covering the whole round-trip.
    async fn query<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, StoreError> {
        let round_trip = async {
            let (respond_to, response) = oneshot::channel();
            self.sender
                .send(build(respond_to))
                .await
                .map_err(|_| closed::<T>())?;
            await_reply::<T, R>(response).await
        };

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, round_trip)
                .await
                .unwrap_or_else(|_| Err(timed_out::<T>(limit))),
            None => round_trip.await,
        }
    }

    /// Run a mutation. Only the enqueue is bounded: a request the actor has
    /// accepted is always applied, so `Timeout` here means nothing changed.
    async fn command<R>(
        &self,
        build: impl FnOnce(Response<R>) -> ResourceRequest<T>,
    ) -> Result<R, StoreError> {
        let (respond_to, response) = oneshot::channel();
        let send = self.sender.send(build(respond_to));

        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, send)
                .await
                .map_err(|_| timed_out::<T>(limit))?
                .map_err(|_| closed::<T>())?,
            None => send.await.map_err(|_| closed::<T>())?,
        }
        await_reply::<T, R>(response).await
    }
}

async fn await_reply<T: Entity, R>(
    response: oneshot::Receiver<Result<R, StoreError>>,
) -> Result<R, StoreError> {
    response.await.map_err(|_| {
        StoreError::Unavailable(format!("{} store dropped the request", T::COLLECTION))
    })?
}

fn timed_out<T: Entity>(limit: Duration) -> StoreError {
    warn!(collection = T::COLLECTION, ?limit, "Store request timed out");
    StoreError::Timeout(limit)
}

fn closed<T: Entity>() -> StoreError {
    StoreError::Unavailable(format!("{} store closed", T::COLLECTION))
}

impl<T: Entity> RecordStore<T> for ResourceClient<T> {
    async fn create(&self, draft: T::Draft) -> Result<RecordId, StoreError> {
        self.command(|respond_to| ResourceRequest::Create { draft, respond_to })
            .await
    }

    async fn get(&self, id: RecordId) -> Result<T, StoreError> {
        self.query(|respond_to| ResourceRequest::Get { id, respond_to })
            .await
    }

    async fn list(&self) -> Result<Vec<T>, StoreError> {
        self.query(|respond_to| ResourceRequest::List { respond_to })
            .await
    }

    async fn update(&self, id: RecordId, record: T) -> Result<(), StoreError> {
        self.command(|respond_to| ResourceRequest::Update {
            id,
            record,
            respond_to,
        })
        .await
    }

    async fn delete(&self, id: RecordId) -> Result<(), StoreError> {
        self.command(|respond_to| ResourceRequest::Delete { id, respond_to })
            .await
    }
}

// =============================================================================
// 4. TESTS
// =============================================================================
