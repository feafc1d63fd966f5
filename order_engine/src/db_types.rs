use apm_common::Cents;
use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow, Type};
use std::fmt::Display;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("Invalid status value: {0}")]
pub struct ConversionError(String);

//--------------------------------------    OrderNumber     ---------------------------------------------------------
/// The human-readable, unique order reference shown to buyers and attached to payment-intent metadata.
#[derive(Debug, Clone, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct OrderNumber(pub String);

impl FromStr for OrderNumber {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderNumber {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OrderNumber {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------    OrderStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    /// The order has been created but no payment outcome has been received.
    Pending,
    /// The payment processor confirmed the charge; inventory has been deducted.
    Paid,
    /// The payment processor reported a failed charge. Inventory was never reserved.
    PaymentFailed,
    /// Every item on the order has had a label purchased.
    Shipped,
    /// Every item on the order has been delivered.
    Delivered,
    /// The order (or its pending payment) was cancelled.
    Cancelled,
}

impl Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Paid => "Paid",
            OrderStatus::PaymentFailed => "PaymentFailed",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        };
        write!(f, "{s}")
    }
}

impl FromStr for OrderStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Paid" => Ok(Self::Paid),
            "PaymentFailed" => Ok(Self::PaymentFailed),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

impl From<String> for OrderStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to Pending");
            OrderStatus::Pending
        })
    }
}

//--------------------------------------    PaymentStatus    --------------------------------------------------------
/// The shared payment-state vocabulary used on both the payment row and the order's `payment_status` mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Pending,
    Succeeded,
    Failed,
    Cancelled,
    Refunded,
    PartiallyRefunded,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::Succeeded => "Succeeded",
            PaymentStatus::Failed => "Failed",
            PaymentStatus::Cancelled => "Cancelled",
            PaymentStatus::Refunded => "Refunded",
            PaymentStatus::PartiallyRefunded => "PartiallyRefunded",
        };
        write!(f, "{s}")
    }
}

impl FromStr for PaymentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Succeeded" => Ok(Self::Succeeded),
            "Failed" => Ok(Self::Failed),
            "Cancelled" => Ok(Self::Cancelled),
            "Refunded" => Ok(Self::Refunded),
            "PartiallyRefunded" => Ok(Self::PartiallyRefunded),
            s => Err(ConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid payment status: {value}. But this conversion cannot fail. Defaulting to Pending");
            PaymentStatus::Pending
        })
    }
}

//--------------------------------------   OrderItemStatus   --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderItemStatus {
    /// Created at checkout; payment outcome not yet known.
    Pending,
    /// Paid for and awaiting a shipping label from the seller.
    Processing,
    /// A label has been purchased for this item.
    Shipped,
    /// The carrier reported delivery.
    Delivered,
    /// The shipment failed or the payment was cancelled.
    Cancelled,
    /// The carrier returned the parcel to the seller.
    Returned,
    /// A refund has been requested or completed for this item.
    Refunded,
}

impl OrderItemStatus {
    /// True while the item has not yet had a label purchased. Inventory restoration on refund is only valid in
    /// these states.
    pub fn is_unshipped(&self) -> bool {
        matches!(self, OrderItemStatus::Pending | OrderItemStatus::Processing)
    }
}

impl Display for OrderItemStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderItemStatus::Pending => "Pending",
            OrderItemStatus::Processing => "Processing",
            OrderItemStatus::Shipped => "Shipped",
            OrderItemStatus::Delivered => "Delivered",
            OrderItemStatus::Cancelled => "Cancelled",
            OrderItemStatus::Returned => "Returned",
            OrderItemStatus::Refunded => "Refunded",
        };
        write!(f, "{s}")
    }
}

impl FromStr for OrderItemStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Processing" => Ok(Self::Processing),
            "Shipped" => Ok(Self::Shipped),
            "Delivered" => Ok(Self::Delivered),
            "Cancelled" => Ok(Self::Cancelled),
            "Returned" => Ok(Self::Returned),
            "Refunded" => Ok(Self::Refunded),
            s => Err(ConversionError(format!("Invalid order item status: {s}"))),
        }
    }
}

impl From<String> for OrderItemStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order item status: {value}. But this conversion cannot fail. Defaulting to Pending");
            OrderItemStatus::Pending
        })
    }
}

//--------------------------------------   ShipmentStatus    --------------------------------------------------------
/// The closed internal shipment vocabulary. Carrier status strings are translated into this enum at the webhook
/// boundary and never stored raw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipmentStatus {
    Pending,
    LabelCreated,
    InTransit,
    Delivered,
    Failed,
    Cancelled,
    Returned,
}

impl Display for ShipmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ShipmentStatus::Pending => "Pending",
            ShipmentStatus::LabelCreated => "LabelCreated",
            ShipmentStatus::InTransit => "InTransit",
            ShipmentStatus::Delivered => "Delivered",
            ShipmentStatus::Failed => "Failed",
            ShipmentStatus::Cancelled => "Cancelled",
            ShipmentStatus::Returned => "Returned",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ShipmentStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "LabelCreated" => Ok(Self::LabelCreated),
            "InTransit" => Ok(Self::InTransit),
            "Delivered" => Ok(Self::Delivered),
            "Failed" => Ok(Self::Failed),
            "Cancelled" => Ok(Self::Cancelled),
            "Returned" => Ok(Self::Returned),
            s => Err(ConversionError(format!("Invalid shipment status: {s}"))),
        }
    }
}

impl From<String> for ShipmentStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid shipment status: {value}. But this conversion cannot fail. Defaulting to Pending");
            ShipmentStatus::Pending
        })
    }
}

//--------------------------------------    RefundStatus     --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefundStatus {
    Pending,
    Succeeded,
    Failed,
}

impl Display for RefundStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RefundStatus::Pending => "Pending",
            RefundStatus::Succeeded => "Succeeded",
            RefundStatus::Failed => "Failed",
        };
        write!(f, "{s}")
    }
}

impl FromStr for RefundStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(Self::Pending),
            "Succeeded" => Ok(Self::Succeeded),
            "Failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid refund status: {s}"))),
        }
    }
}

impl From<String> for RefundStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid refund status: {value}. But this conversion cannot fail. Defaulting to Pending");
            RefundStatus::Pending
        })
    }
}

//--------------------------------------     PartStatus      --------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartStatus {
    /// Listed and purchasable.
    Active,
    /// Stock reached zero through a ledger adjustment.
    Sold,
    /// Delisted by the seller.
    Inactive,
}

impl Display for PartStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PartStatus::Active => "Active",
            PartStatus::Sold => "Sold",
            PartStatus::Inactive => "Inactive",
        };
        write!(f, "{s}")
    }
}

impl FromStr for PartStatus {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Active" => Ok(Self::Active),
            "Sold" => Ok(Self::Sold),
            "Inactive" => Ok(Self::Inactive),
            s => Err(ConversionError(format!("Invalid part status: {s}"))),
        }
    }
}

impl From<String> for PartStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid part status: {value}. But this conversion cannot fail. Defaulting to Inactive");
            PartStatus::Inactive
        })
    }
}

//--------------------------------------       Address       --------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Address {
    pub id: i64,
    pub user_id: i64,
    pub recipient: String,
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// The immutable copy of an address stored on orders and shipments at creation time. Later edits to the live
/// address never alter historical records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressSnapshot {
    pub recipient: String,
    pub street1: String,
    pub street2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub phone: Option<String>,
}

impl From<&Address> for AddressSnapshot {
    fn from(a: &Address) -> Self {
        Self {
            recipient: a.recipient.clone(),
            street1: a.street1.clone(),
            street2: a.street2.clone(),
            city: a.city.clone(),
            state: a.state.clone(),
            postal_code: a.postal_code.clone(),
            country: a.country.clone(),
            phone: a.phone.clone(),
        }
    }
}

//--------------------------------------        Part         --------------------------------------------------------
/// A live inventory record. `quantity` and `status` are shared mutable state owned by the inventory ledger; all
/// stock changes go through its single atomic adjustment, never a read-then-write from a caller.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Part {
    pub id: i64,
    pub seller_id: i64,
    pub title: String,
    pub part_number: Option<String>,
    pub condition: String,
    pub price: Cents,
    pub quantity: i64,
    pub status: PartStatus,
    pub weight_grams: Option<i64>,
    pub length_mm: Option<i64>,
    pub width_mm: Option<i64>,
    pub height_mm: Option<i64>,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------        Order        --------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub buyer_id: i64,
    pub order_number: OrderNumber,
    pub subtotal: Cents,
    pub shipping_total: Cents,
    pub tax_total: Cents,
    /// Always `subtotal + shipping_total + tax_total`, fixed at creation and never recomputed from live item state.
    pub total: Cents,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub shipping_address: Json<AddressSnapshot>,
    pub billing_address: Json<AddressSnapshot>,
    pub payment_intent_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

//--------------------------------------      OrderItem      --------------------------------------------------------
/// One line of an order, tied to one seller and one part. Price, condition, title, part number and primary image
/// are copied from the part at checkout so later edits don't retroactively alter historical orders.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
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
    pub status: OrderItemStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------       Payment       --------------------------------------------------------
/// The single active payment for an order. At most one row per order ever reaches `Succeeded`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Payment {
    pub id: i64,
    pub order_id: i64,
    /// The processor's payment-intent id. Unique; webhook reconciliation keys off this.
    pub payment_intent_id: String,
    /// The processor's charge id, recorded when the payment succeeds. Refunds are issued against it.
    pub charge_id: Option<String>,
    pub amount: Cents,
    pub status: PaymentStatus,
    pub failure_code: Option<String>,
    pub failure_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub succeeded_at: Option<DateTime<Utc>>,
    pub failed_at: Option<DateTime<Utc>>,
}

//--------------------------------------      Shipment       --------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Shipment {
    pub id: i64,
    pub order_id: i64,
    pub seller_id: i64,
    /// The aggregator's rate id that was consumed to purchase the label.
    pub rate_id: String,
    /// The aggregator's transaction id for the label purchase.
    pub transaction_id: String,
    pub carrier: String,
    pub tracking_number: String,
    pub tracking_url: Option<String>,
    pub label_url: Option<String>,
    pub status: ShipmentStatus,
    pub from_address: Json<AddressSnapshot>,
    pub to_address: Json<AddressSnapshot>,
    pub weight_grams: i64,
    pub length_mm: i64,
    pub width_mm: i64,
    pub height_mm: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Set the first time the carrier reports movement; never overwritten.
    pub shipped_at: Option<DateTime<Utc>>,
    /// Set the first time the carrier reports delivery; never overwritten.
    pub delivered_at: Option<DateTime<Utc>>,
}

//--------------------------------------    ShipmentItem     --------------------------------------------------------
/// Links a shipment to an order item with a quantity, supporting partial/split shipments from one order.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ShipmentItem {
    pub id: i64,
    pub shipment_id: i64,
    pub order_item_id: i64,
    pub quantity: i64,
}

//--------------------------------------    TrackingEvent    --------------------------------------------------------
/// Append-only tracking log row. Deduplicated by `(shipment_id, status, occurred_at)`.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TrackingEvent {
    pub id: i64,
    pub shipment_id: i64,
    pub status: ShipmentStatus,
    pub detail: Option<String>,
    pub location: Option<String>,
    pub occurred_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

//--------------------------------------       Refund        --------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Refund {
    pub id: i64,
    pub payment_id: i64,
    pub order_id: i64,
    pub order_item_id: i64,
    /// The processor's refund id. Unique; refund webhook events are matched against it.
    pub refund_id: String,
    pub amount: Cents,
    pub reason: String,
    pub status: RefundStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub processed_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn status_round_trips() {
        for s in ["Pending", "Paid", "PaymentFailed", "Shipped", "Delivered", "Cancelled"] {
            assert_eq!(s.parse::<OrderStatus>().unwrap().to_string(), s);
        }
        for s in ["Pending", "Succeeded", "Failed", "Cancelled", "Refunded", "PartiallyRefunded"] {
            assert_eq!(s.parse::<PaymentStatus>().unwrap().to_string(), s);
        }
        for s in ["Pending", "LabelCreated", "InTransit", "Delivered", "Failed", "Cancelled", "Returned"] {
            assert_eq!(s.parse::<ShipmentStatus>().unwrap().to_string(), s);
        }
    }

    #[test]
    fn invalid_status_is_rejected() {
        assert!("paid".parse::<OrderStatus>().is_err());
        assert!("DELIVERED".parse::<ShipmentStatus>().is_err());
    }

    #[test]
    fn unshipped_states() {
        assert!(OrderItemStatus::Pending.is_unshipped());
        assert!(OrderItemStatus::Processing.is_unshipped());
        assert!(!OrderItemStatus::Shipped.is_unshipped());
        assert!(!OrderItemStatus::Refunded.is_unshipped());
    }
}
