//! Request/response objects for the engine APIs.
//!
//! A checkout is modelled as an explicit session payload (a cart snapshot plus address ids) supplied by the caller on
//! every request. There is no long-lived server-side cart.

use apm_common::Cents;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    db_types::{AddressSnapshot, Order, OrderItem, OrderNumber, ShipmentStatus},
    helpers::CombinedParcel,
};

//--------------------------------------    Shipping quotes   -------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingQuoteItem {
    pub part_id: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone)]
pub struct ShippingQuoteRequest {
    pub buyer_id: i64,
    pub items: Vec<ShippingQuoteItem>,
    pub shipping_address_id: i64,
}

/// One seller group of a cart, reduced to the single-parcel estimate and the two endpoints a rate request needs.
#[derive(Debug, Clone)]
pub struct SellerParcel {
    pub seller_id: i64,
    pub parcel: CombinedParcel,
    pub from: AddressSnapshot,
    pub to: AddressSnapshot,
}

//--------------------------------------       Checkout       -------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLine {
    pub part_id: i64,
    pub quantity: i64,
    /// The aggregator rate id the buyer selected for this item's seller group.
    pub rate_id: String,
    /// The shipping cost quoted for this line when the rate was selected.
    pub shipping_cost: Cents,
}

#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub buyer_id: i64,
    pub items: Vec<CartLine>,
    pub shipping_address_id: i64,
    pub billing_address_id: Option<i64>,
}

/// A validated, priced cart line carrying the part snapshot that will be copied onto the order item.
#[derive(Debug, Clone)]
pub struct QuotedLine {
    pub part_id: i64,
    pub seller_id: i64,
    pub title: String,
    pub part_number: Option<String>,
    pub condition: String,
    pub image_url: Option<String>,
    pub unit_price: Cents,
    pub quantity: i64,
    pub subtotal: Cents,
    pub shipping_cost: Cents,
}

/// The output of checkout validation: everything needed to request a payment authorization and then persist the
/// order, with totals fixed.
#[derive(Debug, Clone)]
pub struct CheckoutQuote {
    pub buyer_id: i64,
    pub order_number: OrderNumber,
    pub lines: Vec<QuotedLine>,
    pub subtotal: Cents,
    pub shipping_total: Cents,
    pub tax_total: Cents,
    pub total: Cents,
    pub shipping_address: AddressSnapshot,
    pub billing_address: AddressSnapshot,
}

/// The payment authorization obtained from the payment processor for a checkout quote.
#[derive(Debug, Clone)]
pub struct PaymentAuthorization {
    pub payment_intent_id: String,
    pub client_secret: String,
    pub amount: Cents,
}

/// What the buyer's payment UI needs to complete the authorization.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutReceipt {
    pub order_id: i64,
    pub order_number: OrderNumber,
    pub client_secret: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderDetails {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

//--------------------------------------  Payment reconciliation  ---------------------------------------------------

/// The outcome of applying a payment-succeeded event, returned for logging and downstream notification.
#[derive(Debug, Clone)]
pub struct PaymentSettled {
    pub order_id: i64,
    pub order_number: OrderNumber,
    pub amount: Cents,
}

//--------------------------------------      Fulfillment      ------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillableItem {
    pub item: OrderItem,
    pub order_number: OrderNumber,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone)]
pub struct LabelRequest {
    pub seller_id: i64,
    pub order_item_ids: Vec<i64>,
    pub rate_id: String,
}

/// A validated label purchase: the items all belong to one paid order and to the requesting seller.
#[derive(Debug, Clone)]
pub struct LabelOrder {
    pub order_id: i64,
    pub seller_id: i64,
    pub rate_id: String,
    pub order_item_ids: Vec<i64>,
    pub parcel: CombinedParcel,
    pub from: AddressSnapshot,
    pub to: AddressSnapshot,
}

/// The carrier aggregator's response to a label purchase.
#[derive(Debug, Clone)]
pub struct PurchasedLabel {
    pub transaction_id: String,
    pub carrier: String,
    pub tracking_number: String,
    pub tracking_url: Option<String>,
    pub label_url: Option<String>,
}

/// A carrier tracking event, already translated into the internal status vocabulary at the webhook boundary.
#[derive(Debug, Clone)]
pub struct TrackingUpdate {
    pub tracking_number: String,
    pub status: ShipmentStatus,
    pub detail: Option<String>,
    pub location: Option<String>,
    pub occurred_at: DateTime<Utc>,
}

//--------------------------------------        Refunds        ------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RefundRequest {
    pub buyer_id: i64,
    pub order_item_id: i64,
    pub reason: String,
    /// Partial refund amount. Defaults to the item's subtotal plus shipping when omitted.
    pub amount: Option<Cents>,
}

/// The outcome of refund eligibility validation: the rows a refund will be recorded against and the amount that
/// will be requested from the processor.
#[derive(Debug, Clone)]
pub struct RefundEligibility {
    pub payment_id: i64,
    pub order_id: i64,
    pub order_item_id: i64,
    pub charge_id: String,
    pub amount: Cents,
}
