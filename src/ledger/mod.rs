//! The inventory ledger: sole owner of quantity changes.
//!
//! Every read-modify-write of a product happens while holding that
//! product's lock from [`ProductLocks`], so concurrent sales, restocks and
//! edits of one product run in some serial order. Different products never
//! wait on each other.

mod error;
mod journal;
mod locks;

pub use error::LedgerError;
pub use journal::{MovementKind, StockJournal, StockMovement};
pub use locks::ProductLocks;

use rust_decimal::Decimal;
use tokio::sync::OwnedMutexGuard;
use tracing::{debug, info, instrument, warn};

use crate::domain::{Product, ProductDetails, ProductDraft, ProductId};
use crate::store::{Entity, RecordStore};

/// Products with fewer units than this are flagged for reorder.
pub const LOW_STOCK_THRESHOLD: u32 = 5;

pub fn is_low(product: &Product) -> bool {
    product.quantity < LOW_STOCK_THRESHOLD
}

/// A completed sale: the record after the decrement and what it cost.
#[derive(Debug, Clone, PartialEq)]
pub struct Sale {
    pub product: Product,
    pub total: Decimal,
}

pub struct InventoryLedger<S> {
    store: S,
    locks: ProductLocks,
    journal: StockJournal,
}

impl<S: RecordStore<Product>> InventoryLedger<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            locks: ProductLocks::default(),
            journal: StockJournal::default(),
        }
    }

    #[instrument(skip(self, draft), fields(product_name = %draft.name))]
    pub async fn register(&self, draft: ProductDraft) -> Result<Product, LedgerError> {
        let id = self.store.create(draft.clone()).await?;
        info!(product_id = id, quantity = draft.quantity, "Product registered");
        Ok(Product::from_draft(id, draft))
    }

    pub async fn get(&self, product_id: ProductId) -> Result<Product, LedgerError> {
        Ok(self.store.get(product_id).await?)
    }

    /// Current contents of the store, in store order.
    pub async fn snapshot(&self) -> Result<Vec<Product>, LedgerError> {
        Ok(self.store.list().await?)
    }

    /// Apply `quantity += delta` atomically for one product.
    ///
    /// # Errors
    /// - `InsufficientStock` if the result would go below zero
    /// - `NotFound` if the product does not exist
    /// - `InvalidQuantity` if the result does not fit in a `u32`
    pub async fn adjust_quantity(
        &self,
        product_id: ProductId,
        delta: i64,
    ) -> Result<Product, LedgerError> {
        let (product, ()) = self
            .apply_delta(product_id, delta, MovementKind::Adjustment, |_| Ok(()))
            .await?;
        Ok(product)
    }

    /// Take `quantity` units out of stock and price them.
    ///
    /// The total is computed from the record read under the lock, before
    /// anything is written, so a sale that cannot be priced changes nothing.
    #[instrument(skip(self))]
    pub async fn sell(&self, product_id: ProductId, quantity: u32) -> Result<Sale, LedgerError> {
        require_positive(quantity)?;
        let price_sale = |product: &Product| {
            product.value_of(quantity).ok_or_else(|| {
                LedgerError::Overflow(format!(
                    "total for {quantity} x {} is out of range",
                    product.price
                ))
            })
        };

        let (product, total) = self
            .apply_delta(product_id, -i64::from(quantity), MovementKind::Sale, price_sale)
            .await
            .inspect_err(|e| warn!(error = %e, "Sale rejected"))?;
        Ok(Sale { product, total })
    }

    #[instrument(skip(self))]
    pub async fn restock(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Product, LedgerError> {
        require_positive(quantity)?;
        let (product, ()) = self
            .apply_delta(product_id, i64::from(quantity), MovementKind::Restock, |_| Ok(()))
            .await?;
        Ok(product)
    }

    /// Replace the descriptive fields and, optionally, set the quantity outright.
    ///
    /// The quantity override is an administrative correction and is not
    /// written to the journal.
    #[instrument(skip(self, details))]
    pub async fn edit(
        &self,
        product_id: ProductId,
        details: ProductDetails,
        quantity: Option<u32>,
    ) -> Result<Product, LedgerError> {
        let (_guard, mut product) = self.lock_and_load(product_id).await?;

        product.apply_details(details);
        if let Some(quantity) = quantity {
            product.quantity = quantity;
        }
        self.store.update(product_id, product.clone()).await?;

        info!(quantity = product.quantity, "Product edited");
        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn remove(&self, product_id: ProductId) -> Result<(), LedgerError> {
        {
            let _guard = self.locks.acquire(product_id).await;
            self.store.delete(product_id).await?;
        }
        self.locks.forget(product_id).await;

        info!("Product removed");
        Ok(())
    }

    pub async fn movements(&self) -> Vec<StockMovement> {
        self.journal.entries().await
    }

    pub async fn movements_for(&self, product_id: ProductId) -> Vec<StockMovement> {
        self.journal.for_product(product_id).await
    }

    /// Lock `product_id` and read its current record.
    ///
    /// On `NotFound` the lock-table entry is released again, so lookups of
    /// ids that never existed leave nothing behind.
    async fn lock_and_load(
        &self,
        product_id: ProductId,
    ) -> Result<(OwnedMutexGuard<()>, Product), LedgerError> {
        let guard = self.locks.acquire(product_id).await;
        match self.store.get(product_id).await.map_err(LedgerError::from) {
            Ok(product) => Ok((guard, product)),
            Err(LedgerError::NotFound(id)) => {
                self.locks.release_if_idle(product_id, guard).await;
                Err(LedgerError::NotFound(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Read, check and write one product under its lock.
    ///
    /// `before_write` sees the record as it will be stored and may veto the
    /// change; its output is handed back next to the stored record.
    async fn apply_delta<R>(
        &self,
        product_id: ProductId,
        delta: i64,
        kind: MovementKind,
        before_write: impl FnOnce(&Product) -> Result<R, LedgerError>,
    ) -> Result<(Product, R), LedgerError> {
        let (_guard, mut product) = self.lock_and_load(product_id).await?;

        product.quantity = next_quantity(product.quantity, delta)?;
        let checked = before_write(&product)?;
        self.store.update(product_id, product.clone()).await?;

        // Recorded under the product lock so journal order matches apply order.
        let movement = self
            .journal
            .record(product_id, kind, delta, product.quantity)
            .await;
        debug!(
            product_id,
            ?kind,
            delta,
            quantity = product.quantity,
            sequence = movement.sequence,
            "Stock adjusted"
        );
        Ok((product, checked))
    }
}

fn require_positive(quantity: u32) -> Result<(), LedgerError> {
    if quantity == 0 {
        return Err(LedgerError::InvalidQuantity(
            "quantity must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn next_quantity(current: u32, delta: i64) -> Result<u32, LedgerError> {
    let next = i64::from(current)
        .checked_add(delta)
        .ok_or_else(|| LedgerError::InvalidQuantity(format!("adjustment {delta} overflows")))?;

    if next < 0 {
        return Err(LedgerError::InsufficientStock {
            requested: delta.unsigned_abs(),
            available: current,
        });
    }

    u32::try_from(next).map_err(|_| {
        LedgerError::InvalidQuantity(format!("resulting quantity {next} exceeds {}", u32::MAX))
    })
}
