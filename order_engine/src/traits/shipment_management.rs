use crate::{
    db_types::{Shipment, TrackingEvent},
    order_objects::{FulfillableItem, LabelOrder, LabelRequest, PurchasedLabel, TrackingUpdate},
    traits::MarketplaceError,
};

/// Label purchase and carrier-event reconciliation.
#[allow(async_fn_in_trait)]
pub trait ShipmentManagement: Clone {
    /// The seller's paid, not-yet-shipped order items.
    async fn fulfillable_items(&self, seller_id: i64) -> Result<Vec<FulfillableItem>, MarketplaceError>;

    /// Validates a label request: the items exist, all belong to the calling seller and to a single order, none has
    /// been shipped already, and the order's payment has succeeded. A label must never be purchased against an
    /// unpaid order. Resolves the seller's default address (hard error if absent) and the combined parcel.
    async fn prepare_label_purchase(&self, request: &LabelRequest) -> Result<LabelOrder, MarketplaceError>;

    /// Persists the purchased label in one transaction: inserts the shipment (status `LabelCreated`) with both
    /// address snapshots, links every order item through shipment items, moves the items to `Shipped`, and advances
    /// the order to `Shipped` once no unshipped items remain.
    async fn record_label_purchase(
        &self,
        order: &LabelOrder,
        label: PurchasedLabel,
    ) -> Result<Shipment, MarketplaceError>;

    /// Fetches a shipment with its tracking log. Visible to the owning seller and the order's buyer only.
    async fn fetch_shipment_for_user(
        &self,
        shipment_id: i64,
        user_id: i64,
    ) -> Result<(Shipment, Vec<TrackingEvent>), MarketplaceError>;

    /// Applies a carrier tracking event. Unknown tracking numbers return `Ok(None)` (logged no-op). Status
    /// timestamps are monotonic: `shipped_at`/`delivered_at` are set the first time the state is reached and never
    /// overwritten. The appended tracking event is deduplicated by `(shipment, status, occurred_at)`, so replays
    /// change nothing.
    async fn apply_tracking_update(&self, update: TrackingUpdate) -> Result<Option<Shipment>, MarketplaceError>;
}
