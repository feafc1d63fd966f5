use serde::{Deserialize, Serialize};

/// The processor's payment-intent resource, pared down to the fields the marketplace uses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentIntent {
    pub id: String,
    pub client_secret: String,
    pub status: String,
    /// Amount in the currency's minor unit (cents).
    pub amount: i64,
    pub currency: String,
}

/// The processor's acknowledgement of a refund request. The authoritative outcome arrives later by webhook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefundOutcome {
    pub id: String,
    pub status: String,
}
