//! Wire-format objects for the REST routes. Engine types that already serialize cleanly (orders, shipments,
//! tracking events) are returned as-is; this module only defines the shapes that exist purely at the HTTP boundary.

use apm_common::Cents;
use order_engine::{
    db_types::{AddressSnapshot, Shipment, TrackingEvent},
    order_objects::{CartLine, ShippingQuoteItem},
};
use provider_clients::{shipping::TrackingCheckpoint, ShippingRate};
use serde::{Deserialize, Serialize};

//--------------------------------------   Shipping quotes    -------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct ShippingQuoteBody {
    pub items: Vec<ShippingQuoteItem>,
    pub shipping_address_id: i64,
}

/// The live rates for one seller group of the cart. The buyer picks one rate per group and sends the chosen
/// `rate_id`s back on checkout.
#[derive(Debug, Clone, Serialize)]
pub struct SellerRates {
    pub seller_id: i64,
    pub parcel_weight_grams: i64,
    pub rates: Vec<ShippingRate>,
}

//--------------------------------------       Checkout       -------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutBody {
    pub items: Vec<CartLine>,
    pub shipping_address_id: i64,
    /// Falls back to the shipping address when omitted.
    pub billing_address_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelResponse {
    pub order_id: i64,
    /// The processor intent that was cancelled. The order itself moves to `Cancelled` when the processor's
    /// cancellation event arrives on the webhook.
    pub payment_intent_id: String,
}

//--------------------------------------      Fulfillment      ------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct LabelBody {
    pub order_item_ids: Vec<i64>,
    pub rate_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrackingView {
    pub shipment: Shipment,
    pub events: Vec<TrackingEvent>,
}

//--------------------------------------        Refunds        ------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct RefundBody {
    pub order_item_id: i64,
    pub reason: String,
    /// Partial refund amount in cents. Defaults to the item subtotal plus shipping.
    pub amount: Option<Cents>,
}

//--------------------------------------       Webhooks        ------------------------------------------------------

/// The aggregator's tracking webhook delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct CarrierWebhookPayload {
    pub event: String,
    pub data: CarrierTrackingData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CarrierTrackingData {
    pub carrier: String,
    pub tracking_number: String,
    pub tracking_status: Option<TrackingCheckpoint>,
}

//--------------------------------------        Helpers        ------------------------------------------------------

pub fn address_payload(snapshot: &AddressSnapshot) -> provider_clients::shipping::AddressPayload {
    provider_clients::shipping::AddressPayload {
        name: snapshot.recipient.clone(),
        street1: snapshot.street1.clone(),
        street2: snapshot.street2.clone(),
        city: snapshot.city.clone(),
        state: snapshot.state.clone(),
        zip: snapshot.postal_code.clone(),
        country: snapshot.country.clone(),
        phone: snapshot.phone.clone(),
    }
}

pub fn parcel_payload(parcel: &order_engine::helpers::CombinedParcel) -> provider_clients::shipping::ParcelPayload {
    provider_clients::shipping::ParcelPayload {
        weight_grams: parcel.weight_grams,
        length_mm: parcel.length_mm,
        width_mm: parcel.width_mm,
        height_mm: parcel.height_mm,
    }
}
