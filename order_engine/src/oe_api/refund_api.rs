use std::fmt::Debug;

use log::*;

use crate::{
    db_types::Refund,
    order_objects::{RefundEligibility, RefundRequest},
    traits::{MarketplaceError, RefundManagement},
};

/// `RefundApi` sits on either side of the processor's refund call: eligibility first, persistence after the
/// processor accepted the refund.
pub struct RefundApi<B> {
    db: B,
}

impl<B> Debug for RefundApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "RefundApi")
    }
}

impl<B> RefundApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> RefundApi<B>
where B: RefundManagement
{
    pub async fn validate_refund(&self, request: &RefundRequest) -> Result<RefundEligibility, MarketplaceError> {
        self.db.validate_refund(request).await
    }

    pub async fn record_refund(
        &self,
        eligibility: &RefundEligibility,
        external_refund_id: &str,
        reason: &str,
    ) -> Result<Refund, MarketplaceError> {
        let refund = self.db.record_refund(eligibility, external_refund_id, reason).await?;
        info!("💸️ Refund {} recorded against order {}", refund.refund_id, refund.order_id);
        Ok(refund)
    }
}
