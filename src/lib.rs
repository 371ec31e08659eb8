//! # Cafe Inventory
//!
//! Stock tracking for a small cafe: a product catalog with quantities on
//! hand, a user directory, and the operations that sell, restock and flag low
//! inventory.
//!
//! ## Layers
//!
//! - **Store** - one [`ResourceActor`](actor_framework::ResourceActor) per
//!   collection owns the records and answers requests in order, optionally
//!   backed by a JSON snapshot file → [`store`], [`actor_framework`]
//! - **Ledger** - the only code that changes quantities; serializes work per
//!   product and refuses anything that would take stock below zero →
//!   [`ledger::InventoryLedger`]
//! - **Monitor** - low-stock list and dashboard totals computed from the
//!   current store contents → [`monitor::LowStockMonitor`]
//! - **Catalog** - validates typed requests and maps failures to
//!   [`catalog::CatalogError`] → [`catalog::CatalogService`]
//! - **System** - configuration, tracing and actor lifecycle →
//!   [`app_system::InventorySystem`]
//!
//! ## Example Usage
//!
//! ```no_run
//! # async fn demo() -> Result<(), cafe_inventory::app_system::SystemError> {
//! use cafe_inventory::app_system::{InventorySystem, SystemConfig};
//!
//! let system = InventorySystem::start(&SystemConfig::from_env()?).await?;
//! let low = system.catalog.low_stock().await?;
//! system.shutdown().await?;
//! # Ok(())
//! # }
//! ```

pub mod actor_framework;
pub mod app_system;
pub mod catalog;
pub mod domain;
pub mod ledger;
pub mod monitor;
pub mod store;

#[cfg(test)]
mod mock_framework;
#[cfg(test)]
mod integration_tests;
