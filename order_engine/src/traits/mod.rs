//! Trait seams implemented by storage backends.
//!
//! Each trait covers one concern of the order lifecycle so that the server's route handlers can be generic over the
//! backend and tested against mocks. [`crate::SqliteDatabase`] implements all of them.
mod errors;
mod inventory_ledger;
mod order_management;
mod payment_reconciliation;
mod refund_management;
mod shipment_management;

pub use errors::MarketplaceError;
pub use inventory_ledger::InventoryLedger;
pub use order_management::OrderManagement;
pub use payment_reconciliation::PaymentReconciliation;
pub use refund_management::RefundManagement;
pub use shipment_management::ShipmentManagement;
