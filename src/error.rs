use thiserror::Error;

pub type Result<T> = std::result::Result<T, OrderError>;

#[derive(Error, Debug)]
pub enum OrderError {
    /// The Remote Payment Authority rejected or failed a call. Fatal to the
    /// current attempt; nothing is persisted past the failing step.
    #[error("payment authority error: {0}")]
    PaymentAuthority(String),
    #[error("order can not be found")]
    OrderNotFound,
    #[error("no orders found for user")]
    NoOrdersForUser,
    #[error("product not found: {0}")]
    ProductNotFound(String),
    #[error("order is already paid")]
    OrderAlreadyPaid,
    #[error("payment not approved")]
    PaymentNotApproved,
    #[error("not enough stock for product: {0}")]
    InsufficientStock(String),
    /// Failure in a backing store. The in-memory stores never produce this;
    /// persistent implementations of the store ports report through it.
    #[error("storage error: {0}")]
    Storage(String),
}

impl From<reqwest::Error> for OrderError {
    fn from(err: reqwest::Error) -> Self {
        OrderError::PaymentAuthority(err.to_string())
    }
}
