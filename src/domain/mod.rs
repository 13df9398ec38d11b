//! Domain layer: order/product/cart entities and the ports the workflow
//! depends on (stores and the Remote Payment Authority).

pub mod cart;
pub mod order;
pub mod ports;
pub mod product;
