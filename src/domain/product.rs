use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::RecordId;

pub type ProductId = RecordId;

/// A product in the cafe catalog together with its quantity on hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// Payload for creating a new product.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// The non-quantity attributes of a product, replaced together on edit.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDetails {
    pub name: String,
    pub description: String,
    pub category: String,
    pub price: Decimal,
}

impl Product {
    pub fn apply_details(&mut self, details: ProductDetails) {
        self.name = details.name;
        self.description = details.description;
        self.category = details.category;
        self.price = details.price;
    }

    /// Price of `units` of this product, or `None` if it leaves the `Decimal` range.
    pub fn value_of(&self, units: u32) -> Option<Decimal> {
        self.price.checked_mul(Decimal::from(units))
    }

    /// Price of everything on hand.
    pub fn stock_value(&self) -> Option<Decimal> {
        self.value_of(self.quantity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn priced(price: Decimal, quantity: u32) -> Product {
        Product {
            id: 1,
            name: "Cold brew".to_string(),
            description: "Bottled".to_string(),
            category: "Coffee".to_string(),
            price,
            quantity,
        }
    }

    #[test]
    fn test_stock_value() {
        assert_eq!(
            priced(Decimal::new(325, 2), 4).stock_value(),
            Some(Decimal::new(1300, 2))
        );
        assert_eq!(priced(Decimal::new(325, 2), 0).stock_value(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_value_out_of_range_is_none() {
        let product = priced(Decimal::MAX, 10);
        assert_eq!(product.value_of(1), Some(Decimal::MAX));
        assert_eq!(product.value_of(2), None);
        assert_eq!(product.stock_value(), None);
    }
}
