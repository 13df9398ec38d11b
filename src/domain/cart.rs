use serde::{Deserialize, Serialize};

/// An item sitting in a cart before checkout.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub product_id: String,
    pub quantity: u32,
}

/// Pre-order collection of selected items.
///
/// The workflow only ever deletes a cart, and only once its order reaches
/// confirmed/paid. Every failure path leaves the cart intact for retry.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub id: String,
    pub user_id: String,
    pub items: Vec<CartItem>,
}
