use mockall::mock;
use order_engine::{
    db_types::{Order, Refund, RefundStatus, Shipment, TrackingEvent},
    order_objects::{
        CheckoutQuote,
        CheckoutRequest,
        FulfillableItem,
        LabelOrder,
        LabelRequest,
        OrderDetails,
        PaymentAuthorization,
        PaymentSettled,
        PurchasedLabel,
        RefundEligibility,
        RefundRequest,
        SellerParcel,
        ShippingQuoteRequest,
        TrackingUpdate,
    },
    traits::{MarketplaceError, OrderManagement, PaymentReconciliation, RefundManagement, ShipmentManagement},
};

mock! {
    pub OrderManager {}
    impl Clone for OrderManager {
        fn clone(&self) -> Self;
    }
    impl OrderManagement for OrderManager {
        async fn quote_seller_parcels(&self, request: &ShippingQuoteRequest) -> Result<Vec<SellerParcel>, MarketplaceError>;
        async fn prepare_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutQuote, MarketplaceError>;
        async fn commit_checkout(&self, quote: CheckoutQuote, auth: PaymentAuthorization) -> Result<Order, MarketplaceError>;
        async fn fetch_order_for_buyer(&self, order_id: i64, buyer_id: i64) -> Result<OrderDetails, MarketplaceError>;
        async fn fetch_orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<Order>, MarketplaceError>;
        async fn pending_payment_intent(&self, order_id: i64, buyer_id: i64) -> Result<String, MarketplaceError>;
    }
}

mock! {
    pub ShipmentManager {}
    impl Clone for ShipmentManager {
        fn clone(&self) -> Self;
    }
    impl ShipmentManagement for ShipmentManager {
        async fn fulfillable_items(&self, seller_id: i64) -> Result<Vec<FulfillableItem>, MarketplaceError>;
        async fn prepare_label_purchase(&self, request: &LabelRequest) -> Result<LabelOrder, MarketplaceError>;
        async fn record_label_purchase(&self, order: &LabelOrder, label: PurchasedLabel) -> Result<Shipment, MarketplaceError>;
        async fn fetch_shipment_for_user(&self, shipment_id: i64, user_id: i64) -> Result<(Shipment, Vec<TrackingEvent>), MarketplaceError>;
        async fn apply_tracking_update(&self, update: TrackingUpdate) -> Result<Option<Shipment>, MarketplaceError>;
    }
}

mock! {
    pub RefundManager {}
    impl Clone for RefundManager {
        fn clone(&self) -> Self;
    }
    impl RefundManagement for RefundManager {
        async fn validate_refund(&self, request: &RefundRequest) -> Result<RefundEligibility, MarketplaceError>;
        async fn record_refund(&self, eligibility: &RefundEligibility, external_refund_id: &str, reason: &str) -> Result<Refund, MarketplaceError>;
    }
}

mock! {
    pub PaymentReconciler {}
    impl Clone for PaymentReconciler {
        fn clone(&self) -> Self;
    }
    impl PaymentReconciliation for PaymentReconciler {
        async fn apply_payment_succeeded<'a>(&self, payment_intent_id: &str, charge_id: Option<&'a str>) -> Result<Option<PaymentSettled>, MarketplaceError>;
        async fn apply_payment_failed<'a, 'b>(&self, payment_intent_id: &str, failure_code: Option<&'a str>, failure_message: Option<&'b str>) -> Result<(), MarketplaceError>;
        async fn apply_payment_cancelled(&self, payment_intent_id: &str) -> Result<(), MarketplaceError>;
        async fn apply_refund_update(&self, refund_id: &str, status: RefundStatus) -> Result<(), MarketplaceError>;
        async fn apply_charge_refunded(&self, charge_id: &str, fully_refunded: bool) -> Result<(), MarketplaceError>;
    }
}
