//! Low-stock reporting, recomputed from the ledger's read path on every call.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{debug, instrument};

use crate::domain::Product;
use crate::ledger::{is_low, InventoryLedger, LedgerError};
use crate::store::RecordStore;

/// Dashboard totals over the current catalog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InventorySummary {
    pub product_count: usize,
    pub total_units: u64,
    pub stock_value: Decimal,
    pub low_stock_count: usize,
}

pub struct LowStockMonitor<S> {
    ledger: Arc<InventoryLedger<S>>,
}

impl<S> Clone for LowStockMonitor<S> {
    fn clone(&self) -> Self {
        Self {
            ledger: Arc::clone(&self.ledger),
        }
    }
}

impl<S: RecordStore<Product>> LowStockMonitor<S> {
    pub fn new(ledger: Arc<InventoryLedger<S>>) -> Self {
        Self { ledger }
    }

    /// Products below the reorder threshold, in store order.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Product>, LedgerError> {
        let low: Vec<Product> = self
            .ledger
            .snapshot()
            .await?
            .into_iter()
            .filter(is_low)
            .collect();
        debug!(count = low.len(), "Low stock computed");
        Ok(low)
    }

    pub async fn summary(&self) -> Result<InventorySummary, LedgerError> {
        let products = self.ledger.snapshot().await?;
        let stock_value = products
            .iter()
            .try_fold(Decimal::ZERO, |total, product| {
                product.stock_value()?.checked_add(total)
            })
            .ok_or_else(|| LedgerError::Overflow("total stock value is out of range".to_string()))?;

        Ok(InventorySummary {
            product_count: products.len(),
            total_units: products.iter().map(|p| u64::from(p.quantity)).sum(),
            stock_value,
            low_stock_count: products.iter().filter(|p| is_low(p)).count(),
        })
    }
}
