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
    traits::MarketplaceError,
};

/// Checkout orchestration and buyer-facing order queries.
#[allow(async_fn_in_trait)]
pub trait OrderManagement: Clone {
    /// Groups the cart by seller and reduces each group to a single-parcel estimate plus the rate-request
    /// endpoints. Hard errors: a seller without a default address, or a group whose total declared weight is zero.
    /// A failure for any one seller group fails the whole call; there are no partial results.
    async fn quote_seller_parcels(
        &self,
        request: &ShippingQuoteRequest,
    ) -> Result<Vec<SellerParcel>, MarketplaceError>;

    /// Validates the cart and addresses and computes the fixed totals (subtotal, quoted shipping, flat tax).
    /// Rejects missing/inactive/insufficient parts, identifying the offending part, and addresses not owned by the
    /// buyer. Read-only; the authoritative re-check happens inside [`Self::commit_checkout`]'s transaction.
    async fn prepare_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutQuote, MarketplaceError>;

    /// Persists the order, its items, and the pending payment row in a single transaction, re-validating inventory
    /// first. No partial order is ever visible: any failure rolls the whole transaction back.
    ///
    /// Inventory is NOT decremented here. Reservation happens only on confirmed payment; see
    /// [`crate::traits::PaymentReconciliation::apply_payment_succeeded`].
    async fn commit_checkout(
        &self,
        quote: CheckoutQuote,
        auth: PaymentAuthorization,
    ) -> Result<Order, MarketplaceError>;

    /// Fetches one order with its items. Owner-scoped: returns `OrderNotFound` for orders that exist but belong to
    /// another buyer, so the route does not leak existence.
    async fn fetch_order_for_buyer(&self, order_id: i64, buyer_id: i64) -> Result<OrderDetails, MarketplaceError>;

    /// All orders for a buyer, newest first.
    async fn fetch_orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<Order>, MarketplaceError>;

    /// Returns the payment-intent id of the order's still-pending payment, validating ownership. Used to cancel an
    /// authorization before the buyer completes it.
    async fn pending_payment_intent(&self, order_id: i64, buyer_id: i64) -> Result<String, MarketplaceError>;
}
