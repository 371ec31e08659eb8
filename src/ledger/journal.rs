use serde::Serialize;
use tokio::sync::Mutex;

use crate::domain::ProductId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MovementKind {
    Sale,
    Restock,
    Adjustment,
}

/// One successful quantity change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockMovement {
    pub sequence: u64,
    pub product_id: ProductId,
    pub kind: MovementKind,
    pub delta: i64,
    pub resulting_quantity: u32,
}

/// Append-only, in-memory log of stock movements.
#[derive(Debug, Default)]
pub struct StockJournal {
    entries: Mutex<Vec<StockMovement>>,
}

impl StockJournal {
    pub async fn record(
        &self,
        product_id: ProductId,
        kind: MovementKind,
        delta: i64,
        resulting_quantity: u32,
    ) -> StockMovement {
        let mut entries = self.entries.lock().await;
        let movement = StockMovement {
            sequence: entries.len() as u64 + 1,
            product_id,
            kind,
            delta,
            resulting_quantity,
        };
        entries.push(movement.clone());
        movement
    }

    pub async fn entries(&self) -> Vec<StockMovement> {
        self.entries.lock().await.clone()
    }

    pub async fn for_product(&self, product_id: ProductId) -> Vec<StockMovement> {
        self.entries
            .lock()
            .await
            .iter()
            .filter(|m| m.product_id == product_id)
            .cloned()
            .collect()
    }
}
