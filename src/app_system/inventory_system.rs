use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::{SystemConfig, SystemError};
use crate::actor_framework::{ResourceActor, ResourceClient};
use crate::catalog::CatalogService;
use crate::domain::{Product, User};
use crate::ledger::InventoryLedger;
use crate::store::{Entity, SnapshotFile, StoreError};

pub type Catalog = CatalogService<ResourceClient<Product>, ResourceClient<User>>;

/// The running application: both store actors plus the catalog wired on top.
///
/// Responsible for starting up actors, wiring them together, and handling shutdown.
pub struct InventorySystem {
    pub catalog: Catalog,
    product_store: ResourceClient<Product>,
    user_store: ResourceClient<User>,
    handles: Vec<JoinHandle<()>>,
}

impl InventorySystem {
    pub async fn start(config: &SystemConfig) -> Result<Self, SystemError> {
        info!(
            buffer = config.store_buffer,
            timeout = ?config.store_timeout,
            data_dir = ?config.data_dir,
            "Starting inventory system"
        );

        // 1. Product store
        let (product_actor, product_store) = open_store::<Product>(config).await?;
        let product_handle = tokio::spawn(product_actor.run());

        // 2. User store
        let (user_actor, user_store) = open_store::<User>(config).await?;
        let user_handle = tokio::spawn(user_actor.run());

        // 3. Ledger and catalog
        let ledger = Arc::new(InventoryLedger::new(product_store.clone()));
        let catalog = CatalogService::new(ledger, user_store.clone());

        Ok(Self {
            catalog,
            product_store,
            user_store,
            handles: vec![product_handle, user_handle],
        })
    }

    pub async fn shutdown(self) -> Result<(), SystemError> {
        info!("Shutting down system...");

        // Explicit shutdown, so catalog clones held elsewhere can't keep actors alive.
        if let Err(e) = self.product_store.shutdown().await {
            warn!(error = %e, "Product store already stopped");
        }
        if let Err(e) = self.user_store.shutdown().await {
            warn!(error = %e, "User store already stopped");
        }

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(SystemError::TaskFailed(e.to_string()));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}

async fn open_store<T: Entity>(
    config: &SystemConfig,
) -> Result<(ResourceActor<T>, ResourceClient<T>), StoreError> {
    let (actor, client) = match &config.data_dir {
        Some(dir) => {
            ResourceActor::with_snapshot(config.store_buffer, SnapshotFile::in_dir(dir, T::COLLECTION))
                .await?
        }
        None => ResourceActor::new(config.store_buffer),
    };

    let client = match config.store_timeout {
        Some(limit) => client.with_timeout(limit),
        None => client,
    };
    Ok((actor, client))
}
