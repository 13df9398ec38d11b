use crate::error::OrderError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inventory projection of a product: the fields capture needs to decrement
/// stock, nothing more.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub title: String,
    pub price: Decimal,
    /// Stock count. Never driven negative; a decrement that would do so
    /// fails instead.
    pub total_stock: u32,
}

impl Product {
    pub fn new(id: impl Into<String>, title: impl Into<String>, price: Decimal, total_stock: u32) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            price,
            total_stock,
        }
    }

    pub fn has_stock(&self, quantity: u32) -> bool {
        self.total_stock >= quantity
    }

    /// Removes `quantity` units from stock if sufficient.
    pub fn deduct_stock(&mut self, quantity: u32) -> Result<(), OrderError> {
        if !self.has_stock(quantity) {
            return Err(OrderError::InsufficientStock(self.title.clone()));
        }
        self.total_stock -= quantity;
        Ok(())
    }
}
