use crate::config::WorkflowConfig;
use crate::domain::order::{AddressInfo, Order, OrderItem};
use crate::domain::ports::{
    CartStoreBox, CreatedPayment, OrderStoreBox, PaymentAuthorityBox, PaymentRequest,
    PaymentRequestItem, ProductStoreBox,
};
use crate::domain::product::Product;
use crate::error::{OrderError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Caller-supplied fields for a new order. Copied verbatim onto the
/// persisted order; totals are not recomputed against current product
/// prices at this stage.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: String,
    pub cart_id: Option<String>,
    pub cart_items: Vec<OrderItem>,
    pub address_info: AddressInfo,
    pub payment_method: String,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub order_update_date: DateTime<Utc>,
}

/// Outcome of phase 1: the pending order's identifier plus the location the
/// end user must visit to authorize the payment.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingOrder {
    pub order_id: String,
    pub approval_url: String,
}

/// The order/payment capture workflow.
///
/// Phase 1 ([`OrderWorkflow::create_order`]) registers a payment intent at
/// the Remote Payment Authority and persists a pending order. Phase 2
/// ([`OrderWorkflow::capture_payment`]) re-verifies the payment with the
/// authority, then decrements stock, confirms the order, and deletes the
/// originating cart. Each call is a single unit of work; nothing retries
/// internally.
pub struct OrderWorkflow {
    config: WorkflowConfig,
    orders: OrderStoreBox,
    products: ProductStoreBox,
    carts: CartStoreBox,
    payment_authority: PaymentAuthorityBox,
    /// Per-order leases serializing concurrent capture calls. Entries are
    /// never pruned; they are bounded by the number of orders captured
    /// in-process.
    capture_leases: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl OrderWorkflow {
    pub fn new(
        config: WorkflowConfig,
        orders: OrderStoreBox,
        products: ProductStoreBox,
        carts: CartStoreBox,
        payment_authority: PaymentAuthorityBox,
    ) -> Self {
        Self {
            config,
            orders,
            products,
            carts,
            payment_authority,
            capture_leases: Mutex::new(HashMap::new()),
        }
    }

    /// Phase 1: registers a payment intent and persists a pending order.
    ///
    /// The remote call happens first. If it fails, nothing is persisted and
    /// the caller receives the failure with no partial state; retry policy
    /// belongs to the caller.
    pub async fn create_order(&self, new_order: NewOrder) -> Result<PendingOrder> {
        let request = PaymentRequest {
            items: new_order
                .cart_items
                .iter()
                .map(|item| PaymentRequestItem {
                    name: item.title.clone(),
                    sku: item.product_id.clone(),
                    price: item.price,
                    quantity: item.quantity,
                })
                .collect(),
            total: new_order.total_amount,
            currency: self.config.currency.clone(),
            return_url: self.config.return_url(),
            cancel_url: self.config.cancel_url(),
        };

        let CreatedPayment { approval_url, .. } =
            self.payment_authority.create_payment(request).await?;

        let order = Order::new_pending(
            new_order.user_id,
            new_order.cart_id,
            new_order.cart_items,
            new_order.address_info,
            new_order.payment_method,
            new_order.total_amount,
            new_order.order_date,
            new_order.order_update_date,
        );
        let order_id = order.id.clone();
        self.orders.store(order).await?;

        tracing::info!(order_id = %order_id, "created pending order");
        Ok(PendingOrder {
            order_id,
            approval_url,
        })
    }

    /// Phase 2: verifies the payment with the authority and finalizes the
    /// order.
    ///
    /// Captures for the same order are serialized by a per-order lease, so
    /// two concurrent calls cannot both pass the already-paid guard. Stock
    /// is checked for every line item before any decrement, making the
    /// inventory update all-or-nothing.
    pub async fn capture_payment(
        &self,
        payment_id: &str,
        payer_id: &str,
        order_id: &str,
    ) -> Result<Order> {
        let lease = self.capture_lease(order_id).await;
        let _guard = lease.lock().await;

        let mut order = self
            .orders
            .get(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound)?;

        if order.is_paid() {
            return Err(OrderError::OrderAlreadyPaid);
        }

        // The capture endpoint is reachable from the end user's browser, so
        // the asserted payment/payer ids are never trusted on their own
        // word; the authoritative state is fetched again here.
        let state = self.payment_authority.get_payment(payment_id).await?;
        if !state.is_approved() {
            tracing::warn!(order_id = %order.id, ?state, "capture rejected, payment not approved");
            return Err(OrderError::PaymentNotApproved);
        }

        // Check every line item before decrementing any, so a failure
        // mid-list leaves no partial stock mutation behind.
        let mut updates: Vec<(Product, u32)> = Vec::with_capacity(order.cart_items.len());
        for item in &order.cart_items {
            let product = self
                .products
                .get(&item.product_id)
                .await?
                .ok_or_else(|| OrderError::ProductNotFound(item.title.clone()))?;
            if !product.has_stock(item.quantity) {
                return Err(OrderError::InsufficientStock(product.title));
            }
            updates.push((product, item.quantity));
        }

        for (mut product, quantity) in updates {
            product.deduct_stock(quantity)?;
            self.products.store(product).await?;
        }

        order.confirm_payment(payment_id, payer_id)?;

        // The cart reference is optional; an order that did not originate
        // from a cart has nothing to delete.
        if let Some(cart_id) = &order.cart_id {
            self.carts.delete(cart_id).await?;
        }

        self.orders.store(order.clone()).await?;

        tracing::info!(order_id = %order.id, payment_id, "payment captured, order confirmed");
        Ok(order)
    }

    /// Fetches all orders belonging to a user. An empty result set is a
    /// not-found failure, matching the existing external contract.
    pub async fn orders_for_user(&self, user_id: &str) -> Result<Vec<Order>> {
        let orders = self.orders.get_all_for_user(user_id).await?;
        if orders.is_empty() {
            return Err(OrderError::NoOrdersForUser);
        }
        Ok(orders)
    }

    /// Fetches one order by identifier.
    pub async fn order_details(&self, order_id: &str) -> Result<Order> {
        self.orders
            .get(order_id)
            .await?
            .ok_or(OrderError::OrderNotFound)
    }

    async fn capture_lease(&self, order_id: &str) -> Arc<Mutex<()>> {
        let mut leases = self.capture_leases.lock().await;
        leases.entry(order_id.to_string()).or_default().clone()
    }
}
