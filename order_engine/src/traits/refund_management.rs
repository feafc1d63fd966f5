use crate::{
    db_types::Refund,
    order_objects::{RefundEligibility, RefundRequest},
    traits::MarketplaceError,
};

/// Refund eligibility and persistence. The actual refund is requested from the payment processor between the two
/// calls; its final state arrives later through the payment-webhook refund branch.
#[allow(async_fn_in_trait)]
pub trait RefundManagement: Clone {
    /// Validates a refund request: the caller owns the order, the payment succeeded and carries a charge id, no
    /// refund already exists for the item, the order is within the policy window, and the amount (when given) does
    /// not exceed the item's subtotal plus shipping.
    async fn validate_refund(&self, request: &RefundRequest) -> Result<RefundEligibility, MarketplaceError>;

    /// Persists the refund in one transaction: inserts the refund row (status `Pending`), moves the order item to
    /// `Refunded`, and, when the item had not yet shipped, immediately restores inventory through the ledger.
    async fn record_refund(
        &self,
        eligibility: &RefundEligibility,
        external_refund_id: &str,
        reason: &str,
    ) -> Result<Refund, MarketplaceError>;
}
