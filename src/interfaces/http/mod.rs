//! REST surface for the order workflow.
//!
//! Routes mirror the existing external contract, including its exact
//! status codes and JSON bodies.

pub mod orders;

use crate::application::workflow::OrderWorkflow;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

pub type AppState = Arc<OrderWorkflow>;

pub fn router(workflow: AppState) -> Router {
    Router::new()
        .route("/api/shop/order/create", post(orders::create_order))
        .route("/api/shop/order/capture", post(orders::capture_payment))
        .route("/api/shop/order/list/{user_id}", get(orders::list_orders_by_user))
        .route("/api/shop/order/details/{id}", get(orders::get_order_details))
        .with_state(workflow)
}
