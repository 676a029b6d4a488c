use serde::{Deserialize, Serialize};

use super::Category;

/// A stocked product. The owning category is embedded by value and is always
/// fully populated when read back from storage.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Option<i64>,
    pub description: String,
    pub unit_price: f64,
    /// `None` when the stored quantity is NULL.
    pub stock_quantity: Option<i64>,
    pub category: Category,
}

impl Product {
    /// `unit_price * stock_quantity`, counting a missing quantity as zero.
    pub fn stock_value(&self) -> f64 {
        self.unit_price * self.stock_quantity.unwrap_or(0) as f64
    }

    /// A missing quantity is never considered low.
    pub fn is_low_stock(&self, threshold: i64) -> bool {
        matches!(self.stock_quantity, Some(qty) if qty < threshold)
    }
}

/// Caller-supplied fields for creating or replacing a product.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub description: String,
    pub unit_price: f64,
    pub stock_quantity: i64,
    pub category_id: i64,
}
