use std::fmt;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::Product;
use crate::ledger::Sale;

/// Result of a successful sale: the post-sale record plus what was charged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SaleReceipt {
    pub product: Product,
    pub quantity: u32,
    pub total: Decimal,
}

impl SaleReceipt {
    /// Receipt for `quantity` units, charging the total the ledger priced.
    pub fn new(sale: Sale, quantity: u32) -> Self {
        let mut total = sale.total.round_dp(2);
        total.rescale(2);
        Self {
            product: sale.product,
            quantity,
            total,
        }
    }
}

impl fmt::Display for SaleReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Sold {} of {} for ${}",
            self.quantity, self.product.name, self.total
        )
    }
}
