use std::fmt::Debug;

use log::*;

use crate::{
    db_types::Order,
    order_objects::{
        CheckoutQuote,
        CheckoutRequest,
        OrderDetails,
        PaymentAuthorization,
        SellerParcel,
        ShippingQuoteRequest,
    },
    traits::{MarketplaceError, OrderManagement},
};

/// `CheckoutApi` drives the two-phase checkout: a read-only validation pass that produces a priced quote, a call
/// out to the payment processor made by the server in between, and a single-transaction commit that persists the
/// order with the processor's authorization attached.
pub struct CheckoutApi<B> {
    db: B,
}

impl<B> Debug for CheckoutApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi")
    }
}

impl<B> CheckoutApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> CheckoutApi<B>
where B: OrderManagement
{
    /// Per-seller parcel estimates for a cart, ready to be sent to the rate aggregator.
    pub async fn quote_seller_parcels(
        &self,
        request: &ShippingQuoteRequest,
    ) -> Result<Vec<SellerParcel>, MarketplaceError> {
        self.db.quote_seller_parcels(request).await
    }

    /// Validates the cart and fixes the totals. Nothing is persisted yet.
    pub async fn prepare_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutQuote, MarketplaceError> {
        let quote = self.db.prepare_checkout(request).await?;
        debug!("🛒️ Quote {} prepared: {} line(s), total {}", quote.order_number, quote.lines.len(), quote.total);
        Ok(quote)
    }

    /// Persists the order once the payment processor has authorized the quote's total.
    pub async fn commit_checkout(
        &self,
        quote: CheckoutQuote,
        auth: PaymentAuthorization,
    ) -> Result<Order, MarketplaceError> {
        let order = self.db.commit_checkout(quote, auth).await?;
        info!("🛒️ Order {} created for buyer {}", order.order_number, order.buyer_id);
        Ok(order)
    }

    pub async fn order_for_buyer(&self, order_id: i64, buyer_id: i64) -> Result<OrderDetails, MarketplaceError> {
        self.db.fetch_order_for_buyer(order_id, buyer_id).await
    }

    pub async fn orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<Order>, MarketplaceError> {
        self.db.fetch_orders_for_buyer(buyer_id).await
    }

    /// The intent id the server must cancel at the processor when a buyer abandons a pending order. The engine's
    /// own cancellation happens when the processor's cancellation webhook lands.
    pub async fn pending_payment_intent(&self, order_id: i64, buyer_id: i64) -> Result<String, MarketplaceError> {
        self.db.pending_payment_intent(order_id, buyer_id).await
    }
}
