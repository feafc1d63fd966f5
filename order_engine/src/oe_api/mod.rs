//! The public-facing engine APIs.
//!
//! Each API is a thin, logging wrapper over a backend `B` that implements the relevant [`crate::traits`] seams.
//! Routes construct these once at startup and share them via application data.

pub mod checkout_api;
pub mod fulfillment_api;
pub mod order_objects;
pub mod payment_events_api;
pub mod refund_api;

pub use checkout_api::CheckoutApi;
pub use fulfillment_api::FulfillmentApi;
pub use payment_events_api::PaymentEventApi;
pub use refund_api::RefundApi;
