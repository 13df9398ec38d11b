use crate::application::workflow::NewOrder;
use crate::domain::order::{AddressInfo, Order, OrderItem};
use crate::error::OrderError;
use crate::interfaces::http::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Failure payload: `{success: false, message, [error]}` with an
/// endpoint-specific status code.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: Option<&'static str>,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            error: None,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            error: Some("Internal Server Error"),
            message: message.into(),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'static str>,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.error,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    pub user_id: String,
    #[serde(default)]
    pub cart_id: Option<String>,
    pub cart_items: Vec<OrderItem>,
    pub address_info: AddressInfo,
    pub payment_method: String,
    pub total_amount: Decimal,
    pub order_date: DateTime<Utc>,
    pub order_update_date: DateTime<Utc>,
    // Sent by the existing client but ignored: a fresh order always starts
    // pending/pending with empty payment identifiers.
    #[serde(default)]
    pub order_status: Option<String>,
    #[serde(default)]
    pub payment_status: Option<String>,
    #[serde(default)]
    pub payment_id: Option<String>,
    #[serde(default)]
    pub payer_id: Option<String>,
}

#[derive(Serialize)]
pub struct CreateOrderResponse {
    pub success: bool,
    #[serde(rename = "approvalURL")]
    pub approval_url: String,
    #[serde(rename = "orderId")]
    pub order_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapturePaymentRequest {
    pub payment_id: String,
    pub payer_id: String,
    pub order_id: String,
}

#[derive(Serialize)]
pub struct CaptureResponse {
    pub success: bool,
    pub message: String,
    pub data: Order,
}

#[derive(Serialize)]
pub struct DataResponse<T> {
    pub success: bool,
    pub data: T,
}

/// POST /api/shop/order/create
pub async fn create_order(
    State(workflow): State<AppState>,
    Json(request): Json<CreateOrderRequest>,
) -> Result<(StatusCode, Json<CreateOrderResponse>), ApiError> {
    let pending = workflow
        .create_order(NewOrder {
            user_id: request.user_id,
            cart_id: request.cart_id,
            cart_items: request.cart_items,
            address_info: request.address_info,
            payment_method: request.payment_method,
            total_amount: request.total_amount,
            order_date: request.order_date,
            order_update_date: request.order_update_date,
        })
        .await
        .map_err(|err| match err {
            OrderError::PaymentAuthority(_) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error while creating payment",
            ),
            other => ApiError::internal(other.to_string()),
        })?;

    Ok((
        StatusCode::CREATED,
        Json(CreateOrderResponse {
            success: true,
            approval_url: pending.approval_url,
            order_id: pending.order_id,
        }),
    ))
}

/// POST /api/shop/order/capture
pub async fn capture_payment(
    State(workflow): State<AppState>,
    Json(request): Json<CapturePaymentRequest>,
) -> Result<Json<CaptureResponse>, ApiError> {
    let order = workflow
        .capture_payment(&request.payment_id, &request.payer_id, &request.order_id)
        .await
        .map_err(|err| match err {
            OrderError::OrderNotFound => {
                ApiError::new(StatusCode::NOT_FOUND, "Order can not be found")
            }
            OrderError::OrderAlreadyPaid => {
                ApiError::new(StatusCode::BAD_REQUEST, "Order is already paid")
            }
            OrderError::PaymentAuthority(_) => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error verifying payment with the payment provider",
            ),
            OrderError::PaymentNotApproved => {
                ApiError::new(StatusCode::BAD_REQUEST, "Payment not approved")
            }
            OrderError::ProductNotFound(title) => ApiError::new(
                StatusCode::NOT_FOUND,
                format!("Product not found: {title}"),
            ),
            OrderError::InsufficientStock(title) => ApiError::new(
                StatusCode::BAD_REQUEST,
                format!("Not enough stock for product: {title}"),
            ),
            other => ApiError::internal(other.to_string()),
        })?;

    Ok(Json(CaptureResponse {
        success: true,
        message: "Payment successful and order confirmed".to_string(),
        data: order,
    }))
}

/// GET /api/shop/order/list/{user_id}
pub async fn list_orders_by_user(
    State(workflow): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<DataResponse<Vec<Order>>>, ApiError> {
    let orders = workflow
        .orders_for_user(&user_id)
        .await
        .map_err(|err| match err {
            OrderError::NoOrdersForUser => {
                ApiError::new(StatusCode::NOT_FOUND, "No orders found!")
            }
            other => ApiError::internal(other.to_string()),
        })?;

    Ok(Json(DataResponse {
        success: true,
        data: orders,
    }))
}

/// GET /api/shop/order/details/{id}
pub async fn get_order_details(
    State(workflow): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<DataResponse<Order>>, ApiError> {
    let order = workflow
        .order_details(&id)
        .await
        .map_err(|err| match err {
            OrderError::OrderNotFound => ApiError::new(StatusCode::NOT_FOUND, "Order not found!"),
            other => ApiError::internal(other.to_string()),
        })?;

    Ok(Json(DataResponse {
        success: true,
        data: order,
    }))
}
