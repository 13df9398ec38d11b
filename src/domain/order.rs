use crate::error::OrderError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fulfillment state of an order. The only legal transition is
/// `Pending -> Confirmed`, performed by [`Order::confirm_payment`].
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
}

/// Payment state of an order. The only legal transition is
/// `Pending -> Paid`, and it is never reversed.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

/// A line item snapshotted onto the order at creation time.
///
/// Holds a copy of title/price/quantity rather than a live product
/// reference, so later product or cart mutation cannot corrupt historical
/// order data. `product_id` remains as a weak reference for the one-time
/// stock decrement at capture.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub product_id: String,
    pub title: String,
    pub price: Decimal,
    pub quantity: u32,
}

/// Shipping address snapshot taken at order time.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct AddressInfo {
    pub address_id: String,
    pub address: String,
    pub city: String,
    pub pincode: String,
    pub phone: String,
    #[serde(default)]
    pub notes: String,
}

/// Persistent record of a purchase attempt and its payment lifecycle.
///
/// Created in `Pending`/`Pending` state together with a payment intent at
/// the Remote Payment Authority, mutated exactly once at capture time, and
/// never deleted by the workflow.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub user_id: String,
    /// Weak reference to the originating cart, used for the one-time
    /// deletion at capture. `None` when the order did not come from a cart.
    pub cart_id: Option<String>,
    pub cart_items: Vec<OrderItem>,
    pub address_info: AddressInfo,
    pub order_status: OrderStatus,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub order_update_date: DateTime<Utc>,
    /// External payment-intent identifier, set once at capture.
    pub payment_id: String,
    /// External payer identifier, set once at capture.
    pub payer_id: String,
}

impl Order {
    /// Creates a new pending order with caller-supplied fields copied
    /// verbatim. Totals are trusted at this stage; verification against the
    /// payment authority happens at capture.
    #[allow(clippy::too_many_arguments)]
    pub fn new_pending(
        user_id: String,
        cart_id: Option<String>,
        cart_items: Vec<OrderItem>,
        address_info: AddressInfo,
        payment_method: String,
        total_amount: Decimal,
        order_date: DateTime<Utc>,
        order_update_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id,
            cart_id,
            cart_items,
            address_info,
            order_status: OrderStatus::Pending,
            payment_method,
            payment_status: PaymentStatus::Pending,
            total_amount,
            order_date,
            order_update_date,
            payment_id: String::new(),
            payer_id: String::new(),
        }
    }

    pub fn is_paid(&self) -> bool {
        self.payment_status == PaymentStatus::Paid
    }

    /// Performs the single legal state transition
    /// `pending/pending -> confirmed/paid`, recording the external payment
    /// and payer identifiers. Rejects a second transition so duplicate
    /// capture calls surface as a conflict instead of re-running side
    /// effects.
    pub fn confirm_payment(
        &mut self,
        payment_id: impl Into<String>,
        payer_id: impl Into<String>,
    ) -> Result<(), OrderError> {
        if self.is_paid() {
            return Err(OrderError::OrderAlreadyPaid);
        }
        self.payment_status = PaymentStatus::Paid;
        self.order_status = OrderStatus::Confirmed;
        self.payment_id = payment_id.into();
        self.payer_id = payer_id.into();
        self.order_update_date = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_order() -> Order {
        Order::new_pending(
            "user-1".to_string(),
            Some("cart-1".to_string()),
            vec![OrderItem {
                product_id: "product-1".to_string(),
                title: "Sneakers".to_string(),
                price: dec!(49.99),
                quantity: 2,
            }],
            AddressInfo {
                address_id: "addr-1".to_string(),
                address: "1 Main St".to_string(),
                city: "Springfield".to_string(),
                pincode: "12345".to_string(),
                phone: "555-0100".to_string(),
                notes: String::new(),
            },
            "paypal".to_string(),
            dec!(99.98),
            Utc::now(),
            Utc::now(),
        )
    }

    #[test]
    fn test_new_order_is_pending() {
        let order = sample_order();
        assert_eq!(order.order_status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Pending);
        assert!(order.payment_id.is_empty());
        assert!(order.payer_id.is_empty());
    }

    #[test]
    fn test_confirm_payment_transition() {
        let mut order = sample_order();
        order.confirm_payment("PAY-123", "PAYER-456").unwrap();

        assert_eq!(order.order_status, OrderStatus::Confirmed);
        assert_eq!(order.payment_status, PaymentStatus::Paid);
        assert_eq!(order.payment_id, "PAY-123");
        assert_eq!(order.payer_id, "PAYER-456");
    }

    #[test]
    fn test_confirm_payment_rejects_double_transition() {
        let mut order = sample_order();
        order.confirm_payment("PAY-123", "PAYER-456").unwrap();

        let result = order.confirm_payment("PAY-999", "PAYER-999");
        assert!(matches!(result, Err(OrderError::OrderAlreadyPaid)));
        // Identifiers from the first capture stay untouched.
        assert_eq!(order.payment_id, "PAY-123");
        assert_eq!(order.payer_id, "PAYER-456");
    }

    #[test]
    fn test_order_serializes_camel_case() {
        let order = sample_order();
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["orderStatus"], "pending");
        assert_eq!(json["paymentStatus"], "pending");
        assert_eq!(json["cartItems"][0]["productId"], "product-1");
        assert_eq!(json["addressInfo"]["addressId"], "addr-1");
    }
}
