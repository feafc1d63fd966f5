//! # Marketplace Order Engine
//!
//! The order engine turns a multi-seller cart into a paid, inventory-deducted, shipped, and trackable order while
//! staying consistent in the face of two independent asynchronous external systems (a payment processor and a
//! shipping-carrier aggregator) that communicate exclusively through at-least-once, possibly out-of-order webhook
//! deliveries.
//!
//! The library is divided into two main sections:
//! 1. Database management and control ([`mod@sqlite`]). SQLite is the supported backend. You should never need to
//!    access the database directly. Instead, use the public API provided by the engine. The exception is the data
//!    types used in the database. These are defined in the `db_types` module and are public.
//! 2. The engine public API ([`mod@oe_api`]). This provides the public-facing functionality of the order engine:
//!    checkout orchestration, webhook reconciliation, fulfillment, and refunds. Backends implement the traits in the
//!    [`mod@traits`] module to serve the marketplace server.
//!
//! Everything the engine persists is written inside a single database transaction spanning every row the operation
//! touches, so a crash mid-operation leaves no partially-applied state. Webhook-driven mutations are idempotent:
//! handlers look up the current row by the provider's external id and write absolute field values. The single
//! genuinely additive operation, inventory adjustment, is one atomic conditional update (see
//! [`traits::InventoryLedger`]).
pub mod db_types;
pub mod helpers;
mod oe_api;
mod sqlite;
pub mod traits;

#[cfg(any(feature = "test_utils", test))]
pub mod test_utils;

pub use oe_api::{
    order_objects,
    CheckoutApi,
    FulfillmentApi,
    PaymentEventApi,
    RefundApi,
};
pub use sqlite::SqliteDatabase;
pub use traits::{
    InventoryLedger,
    MarketplaceError,
    OrderManagement,
    PaymentReconciliation,
    RefundManagement,
    ShipmentManagement,
};

/// The flat sales-tax rate applied to every order subtotal. Not geo-aware.
pub const TAX_RATE_PERCENT: i64 = 8;

/// Refunds are only accepted within this many days of order creation.
pub const REFUND_WINDOW_DAYS: i64 = 30;
