use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use storefront_orders::application::workflow::{NewOrder, OrderWorkflow};
use storefront_orders::config::WorkflowConfig;
use storefront_orders::domain::cart::{Cart, CartItem};
use storefront_orders::domain::order::{AddressInfo, OrderItem};
use storefront_orders::domain::ports::{
    CartStore, CreatedPayment, PaymentAuthority, PaymentRequest, PaymentState, ProductStore,
};
use storefront_orders::domain::product::Product;
use storefront_orders::error::{OrderError, Result};
use storefront_orders::infrastructure::in_memory::{
    InMemoryCartStore, InMemoryOrderStore, InMemoryProductStore,
};
use tokio::sync::Mutex;

/// Scripted stand-in for the Remote Payment Authority.
///
/// Defaults to succeeding intent creation and reporting `Created`; tests
/// flip it to approved/failing as the scenario requires.
#[derive(Clone)]
pub struct MockAuthority {
    inner: Arc<Mutex<MockAuthorityState>>,
}

struct MockAuthorityState {
    fail_create: bool,
    fail_get: bool,
    state: PaymentState,
    create_calls: u32,
    get_calls: u32,
}

impl Default for MockAuthority {
    fn default() -> Self {
        Self {
            inner: Arc::new(Mutex::new(MockAuthorityState {
                fail_create: false,
                fail_get: false,
                state: PaymentState::Created,
                create_calls: 0,
                get_calls: 0,
            })),
        }
    }
}

#[allow(dead_code)]
impl MockAuthority {
    pub async fn approve(&self) {
        self.inner.lock().await.state = PaymentState::Approved;
    }

    pub async fn set_state(&self, state: PaymentState) {
        self.inner.lock().await.state = state;
    }

    pub async fn fail_create(&self) {
        self.inner.lock().await.fail_create = true;
    }

    pub async fn fail_get(&self, fail: bool) {
        self.inner.lock().await.fail_get = fail;
    }

    pub async fn create_calls(&self) -> u32 {
        self.inner.lock().await.create_calls
    }

    pub async fn get_calls(&self) -> u32 {
        self.inner.lock().await.get_calls
    }
}

#[async_trait::async_trait]
impl PaymentAuthority for MockAuthority {
    async fn create_payment(&self, _request: PaymentRequest) -> Result<CreatedPayment> {
        let mut state = self.inner.lock().await;
        state.create_calls += 1;
        if state.fail_create {
            return Err(OrderError::PaymentAuthority(
                "intent creation refused".to_string(),
            ));
        }
        Ok(CreatedPayment {
            payment_id: format!("PAY-{}", state.create_calls),
            approval_url: "https://authority.test/approve?token=EC-1".to_string(),
        })
    }

    async fn get_payment(&self, _payment_id: &str) -> Result<PaymentState> {
        let mut state = self.inner.lock().await;
        state.get_calls += 1;
        if state.fail_get {
            return Err(OrderError::PaymentAuthority(
                "verification unavailable".to_string(),
            ));
        }
        Ok(state.state.clone())
    }
}

/// A workflow wired to in-memory stores, with handles kept so tests can
/// inspect stock and cart state directly.
pub struct Harness {
    pub workflow: Arc<OrderWorkflow>,
    pub products: InMemoryProductStore,
    pub carts: InMemoryCartStore,
    pub authority: MockAuthority,
}

impl Harness {
    pub fn new() -> Self {
        let products = InMemoryProductStore::new();
        let carts = InMemoryCartStore::new();
        let authority = MockAuthority::default();

        let workflow = Arc::new(OrderWorkflow::new(
            WorkflowConfig::new("https://shop.test", "USD"),
            Box::new(InMemoryOrderStore::new()),
            Box::new(products.clone()),
            Box::new(carts.clone()),
            Box::new(authority.clone()),
        ));

        Self {
            workflow,
            products,
            carts,
            authority,
        }
    }

    pub async fn seed_product(&self, id: &str, title: &str, price: Decimal, stock: u32) {
        self.products
            .store(Product::new(id, title, price, stock))
            .await
            .unwrap();
    }

    pub async fn seed_cart(&self, cart_id: &str, user_id: &str, items: &[(&str, u32)]) {
        self.carts
            .store(Cart {
                id: cart_id.to_string(),
                user_id: user_id.to_string(),
                items: items
                    .iter()
                    .map(|(product_id, quantity)| CartItem {
                        product_id: product_id.to_string(),
                        quantity: *quantity,
                    })
                    .collect(),
            })
            .await
            .unwrap();
    }

    pub async fn stock_of(&self, product_id: &str) -> u32 {
        self.products
            .get(product_id)
            .await
            .unwrap()
            .expect("product should exist")
            .total_stock
    }

    pub async fn cart_exists(&self, cart_id: &str) -> bool {
        self.carts.get(cart_id).await.unwrap().is_some()
    }
}

#[allow(dead_code)]
pub fn address() -> AddressInfo {
    AddressInfo {
        address_id: "addr-1".to_string(),
        address: "1 Main St".to_string(),
        city: "Springfield".to_string(),
        pincode: "12345".to_string(),
        phone: "555-0100".to_string(),
        notes: String::new(),
    }
}

/// A single-item order for `user-1` drawn from `cart-1`.
#[allow(dead_code)]
pub fn single_item_order(product_id: &str, title: &str, price: Decimal, quantity: u32) -> NewOrder {
    let total = price * Decimal::from(quantity);
    NewOrder {
        user_id: "user-1".to_string(),
        cart_id: Some("cart-1".to_string()),
        cart_items: vec![OrderItem {
            product_id: product_id.to_string(),
            title: title.to_string(),
            price,
            quantity,
        }],
        address_info: address(),
        payment_method: "paypal".to_string(),
        total_amount: total,
        order_date: Utc::now(),
        order_update_date: Utc::now(),
    }
}
