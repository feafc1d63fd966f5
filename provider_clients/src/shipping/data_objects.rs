use apm_common::Cents;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An address in the aggregator's wire shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressPayload {
    pub name: String,
    pub street1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Parcel dimensions in the aggregator's wire shape. The aggregator wants metric units, which is what the
/// marketplace stores, so no conversion happens here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParcelPayload {
    pub weight_grams: i64,
    pub length_mm: i64,
    pub width_mm: i64,
    pub height_mm: i64,
}

/// One purchasable rate from a rate request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShippingRate {
    #[serde(rename = "object_id")]
    pub rate_id: String,
    pub carrier: String,
    pub service: String,
    /// Quoted price in cents.
    pub amount: Cents,
    pub estimated_days: Option<i64>,
}

/// A purchased label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LabelPurchase {
    #[serde(rename = "object_id")]
    pub transaction_id: String,
    pub carrier: String,
    pub tracking_number: String,
    pub tracking_url: Option<String>,
    pub label_url: Option<String>,
    pub status: String,
}

/// A point-in-time tracking snapshot, as returned by the polling endpoint and by tracking webhooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingInfo {
    pub carrier: String,
    pub tracking_number: String,
    pub tracking_status: Option<TrackingCheckpoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackingCheckpoint {
    /// The vendor's status string; translate with [`crate::shipping::TrackingStatus::from_vendor`].
    pub status: String,
    pub status_details: Option<String>,
    pub location: Option<String>,
    pub status_date: DateTime<Utc>,
}
