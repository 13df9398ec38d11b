use super::cart::Cart;
use super::order::Order;
use super::product::Product;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

#[async_trait]
pub trait OrderStore: Send + Sync {
    async fn store(&self, order: Order) -> Result<()>;
    async fn get(&self, order_id: &str) -> Result<Option<Order>>;
    async fn get_all_for_user(&self, user_id: &str) -> Result<Vec<Order>>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn store(&self, product: Product) -> Result<()>;
    async fn get(&self, product_id: &str) -> Result<Option<Product>>;
}

#[async_trait]
pub trait CartStore: Send + Sync {
    async fn store(&self, cart: Cart) -> Result<()>;
    async fn get(&self, cart_id: &str) -> Result<Option<Cart>>;
    async fn delete(&self, cart_id: &str) -> Result<()>;
}

/// One line of a payment-intent request, mirroring an order item.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequestItem {
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// Payment-intent request handed to the Remote Payment Authority.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentRequest {
    pub items: Vec<PaymentRequestItem>,
    pub total: Decimal,
    pub currency: String,
    pub return_url: String,
    pub cancel_url: String,
}

/// A payment intent registered at the authority, awaiting out-of-band
/// authorization by the end user.
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedPayment {
    pub payment_id: String,
    /// Location the end user must be redirected to for authorization.
    pub approval_url: String,
}

/// Authoritative state of a payment as reported by the authority. Anything
/// other than `Approved` must not be captured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentState {
    Approved,
    Created,
    Failed,
    Other(String),
}

impl PaymentState {
    pub fn is_approved(&self) -> bool {
        *self == PaymentState::Approved
    }
}

/// Client for the Remote Payment Authority.
///
/// The authority is untrusted-until-verified: capture always re-fetches the
/// payment state through [`PaymentAuthority::get_payment`] instead of
/// believing identifiers asserted by the caller.
#[async_trait]
pub trait PaymentAuthority: Send + Sync {
    async fn create_payment(&self, request: PaymentRequest) -> Result<CreatedPayment>;
    async fn get_payment(&self, payment_id: &str) -> Result<PaymentState>;
}

pub type OrderStoreBox = Box<dyn OrderStore>;
pub type ProductStoreBox = Box<dyn ProductStore>;
pub type CartStoreBox = Box<dyn CartStore>;
pub type PaymentAuthorityBox = Box<dyn PaymentAuthority>;
