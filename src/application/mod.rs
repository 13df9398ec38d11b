//! Application layer orchestrating the two-phase order/payment saga.
//!
//! [`workflow::OrderWorkflow`] owns the store and payment-authority ports
//! and drives each request as a single unit of work with no internal
//! retries.

pub mod workflow;
