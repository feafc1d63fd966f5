use std::fmt::Debug;

use log::*;

use crate::{
    db_types::{Shipment, TrackingEvent},
    order_objects::{FulfillableItem, LabelOrder, LabelRequest, PurchasedLabel, TrackingUpdate},
    traits::{MarketplaceError, ShipmentManagement},
};

/// `FulfillmentApi` covers the seller side of an order: the fulfillment queue, label purchases and carrier
/// tracking reconciliation.
pub struct FulfillmentApi<B> {
    db: B,
}

impl<B> Debug for FulfillmentApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "FulfillmentApi")
    }
}

impl<B> FulfillmentApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> FulfillmentApi<B>
where B: ShipmentManagement
{
    pub async fn fulfillable_items(&self, seller_id: i64) -> Result<Vec<FulfillableItem>, MarketplaceError> {
        self.db.fulfillable_items(seller_id).await
    }

    /// Validates the label request against the order and returns everything the carrier purchase needs.
    pub async fn prepare_label_purchase(&self, request: &LabelRequest) -> Result<LabelOrder, MarketplaceError> {
        self.db.prepare_label_purchase(request).await
    }

    /// Records a purchased label after the carrier transaction went through.
    pub async fn record_label_purchase(
        &self,
        order: &LabelOrder,
        label: PurchasedLabel,
    ) -> Result<Shipment, MarketplaceError> {
        let shipment = self.db.record_label_purchase(order, label).await?;
        info!("📦️ Shipment {} recorded for order {}", shipment.id, shipment.order_id);
        Ok(shipment)
    }

    pub async fn shipment_for_user(
        &self,
        shipment_id: i64,
        user_id: i64,
    ) -> Result<(Shipment, Vec<TrackingEvent>), MarketplaceError> {
        self.db.fetch_shipment_for_user(shipment_id, user_id).await
    }

    pub async fn apply_tracking_update(
        &self,
        update: TrackingUpdate,
    ) -> Result<Option<Shipment>, MarketplaceError> {
        trace!("📦️ Tracking event {} for {}", update.status, update.tracking_number);
        self.db.apply_tracking_update(update).await
    }
}
