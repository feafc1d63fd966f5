use std::fmt::Debug;

use log::*;

use crate::{
    db_types::RefundStatus,
    order_objects::PaymentSettled,
    traits::{MarketplaceError, PaymentReconciliation},
};

/// `PaymentEventApi` is the reconciliation entry point for the payment-processor webhook. The webhook route has
/// already verified the event signature and translated the payload into typed calls by the time this API runs.
pub struct PaymentEventApi<B> {
    db: B,
}

impl<B> Debug for PaymentEventApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "PaymentEventApi")
    }
}

impl<B> PaymentEventApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> PaymentEventApi<B>
where B: PaymentReconciliation
{
    pub async fn payment_succeeded(
        &self,
        payment_intent_id: &str,
        charge_id: Option<&str>,
    ) -> Result<Option<PaymentSettled>, MarketplaceError> {
        let settled = self.db.apply_payment_succeeded(payment_intent_id, charge_id).await?;
        if let Some(s) = &settled {
            info!("🔄️💰️ Payment settled for order {}: {}", s.order_number, s.amount);
        }
        Ok(settled)
    }

    pub async fn payment_failed(
        &self,
        payment_intent_id: &str,
        failure_code: Option<&str>,
        failure_message: Option<&str>,
    ) -> Result<(), MarketplaceError> {
        self.db.apply_payment_failed(payment_intent_id, failure_code, failure_message).await
    }

    pub async fn payment_cancelled(&self, payment_intent_id: &str) -> Result<(), MarketplaceError> {
        self.db.apply_payment_cancelled(payment_intent_id).await
    }

    pub async fn refund_updated(&self, refund_id: &str, status: RefundStatus) -> Result<(), MarketplaceError> {
        trace!("🔄️💰️ Refund {refund_id} reported as {status}");
        self.db.apply_refund_update(refund_id, status).await
    }

    pub async fn charge_refunded(&self, charge_id: &str, fully_refunded: bool) -> Result<(), MarketplaceError> {
        self.db.apply_charge_refunded(charge_id, fully_refunded).await
    }
}
