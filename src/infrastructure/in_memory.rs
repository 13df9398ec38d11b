use crate::domain::cart::Cart;
use crate::domain::order::Order;
use crate::domain::ports::{CartStore, OrderStore, ProductStore};
use crate::domain::product::Product;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for orders.
///
/// Uses `Arc<RwLock<HashMap>>` to allow shared concurrent access. Ideal for
/// testing or small deployments where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<String, Order>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn store(&self, order: Order) -> Result<()> {
        let mut orders = self.orders.write().await;
        orders.insert(order.id.clone(), order);
        Ok(())
    }

    async fn get(&self, order_id: &str) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.get(order_id).cloned())
    }

    async fn get_all_for_user(&self, user_id: &str) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut result: Vec<Order> = orders
            .values()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.order_date.cmp(&a.order_date));
        Ok(result)
    }
}

/// A thread-safe in-memory store for product inventory.
#[derive(Default, Clone)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<HashMap<String, Product>>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn store(&self, product: Product) -> Result<()> {
        let mut products = self.products.write().await;
        products.insert(product.id.clone(), product);
        Ok(())
    }

    async fn get(&self, product_id: &str) -> Result<Option<Product>> {
        let products = self.products.read().await;
        Ok(products.get(product_id).cloned())
    }
}

/// A thread-safe in-memory store for carts.
#[derive(Default, Clone)]
pub struct InMemoryCartStore {
    carts: Arc<RwLock<HashMap<String, Cart>>>,
}

impl InMemoryCartStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CartStore for InMemoryCartStore {
    async fn store(&self, cart: Cart) -> Result<()> {
        let mut carts = self.carts.write().await;
        carts.insert(cart.id.clone(), cart);
        Ok(())
    }

    async fn get(&self, cart_id: &str) -> Result<Option<Cart>> {
        let carts = self.carts.read().await;
        Ok(carts.get(cart_id).cloned())
    }

    async fn delete(&self, cart_id: &str) -> Result<()> {
        let mut carts = self.carts.write().await;
        carts.remove(cart_id);
        Ok(())
    }
}
