mod api;
mod config;
mod data_objects;
mod error;
pub mod webhook;

pub use api::PaymentProcessorApi;
pub use config::PaymentsConfig;
pub use data_objects::{PaymentIntent, RefundOutcome};
pub use error::PaymentsError;
pub use webhook::PaymentEvent;
