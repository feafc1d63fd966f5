use crate::{db_types::RefundStatus, order_objects::PaymentSettled, traits::MarketplaceError};

/// Application of payment-processor webhook events to internal state.
///
/// Delivery is at-least-once and not guaranteed ordered. Every method must therefore be safe to run twice with the
/// same payload and safe to run with events arriving out of logical order. Implementations achieve this by looking
/// up the current row by the provider's external id and writing idempotent absolute field values; the single
/// genuinely additive operation (inventory adjustment) is guarded by the payment-status transition so a replay never
/// adjusts stock twice.
#[allow(async_fn_in_trait)]
pub trait PaymentReconciliation: Clone {
    /// Handles a `succeeded` event. In one transaction: marks the payment succeeded (recording the charge id),
    /// marks the order paid, decrements inventory through the ledger for every order item, and moves the items to
    /// `Processing`.
    ///
    /// Returns `Ok(None)` when the intent id is unknown (benign no-op, logged, not retried) or when the payment has
    /// already left the states from which `Succeeded` is reachable (replayed or stale event).
    async fn apply_payment_succeeded(
        &self,
        payment_intent_id: &str,
        charge_id: Option<&str>,
    ) -> Result<Option<PaymentSettled>, MarketplaceError>;

    /// Handles a `payment_failed` event: records the failure code/message and regresses the order to
    /// `PaymentFailed`. Inventory is untouched; it was never reserved.
    async fn apply_payment_failed(
        &self,
        payment_intent_id: &str,
        failure_code: Option<&str>,
        failure_message: Option<&str>,
    ) -> Result<(), MarketplaceError>;

    /// Handles a `canceled` event: cancels the payment and the order.
    async fn apply_payment_cancelled(&self, payment_intent_id: &str) -> Result<(), MarketplaceError>;

    /// Handles `refund.created` / `refund.updated` events. On the transition into `Succeeded`, restores inventory
    /// for the refunded item iff the item is still unshipped (the optimistic restore at request time has already
    /// moved it to `Refunded` in the common case, so this is a safety net, not a double restore).
    async fn apply_refund_update(&self, refund_id: &str, status: RefundStatus) -> Result<(), MarketplaceError>;

    /// Handles a `charge.refunded` event: marks the payment `Refunded` or `PartiallyRefunded` and mirrors that onto
    /// the order's payment status.
    async fn apply_charge_refunded(&self, charge_id: &str, fully_refunded: bool) -> Result<(), MarketplaceError>;
}
