//! Infrastructure adapters: in-memory store implementations and the PayPal
//! REST client backing the payment-authority port.

pub mod in_memory;
pub mod paypal;
