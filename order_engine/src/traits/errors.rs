use apm_common::Cents;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum MarketplaceError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("The cart is empty")]
    EmptyCart,
    #[error("Part {0} does not exist")]
    PartNotFound(i64),
    #[error("Part {0} is not active")]
    PartInactive(i64),
    #[error("Insufficient inventory for part {part_id}: requested {requested}, available {available}")]
    InsufficientInventory { part_id: i64, requested: i64, available: i64 },
    #[error("Address {0} does not exist")]
    AddressNotFound(i64),
    #[error("Address {0} does not belong to the caller")]
    AddressNotOwned(i64),
    #[error("Seller {0} has no default address configured")]
    MissingDefaultAddress(i64),
    #[error("No part in the seller {0} group declares a weight; cannot estimate a parcel")]
    ZeroParcelWeight(i64),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(i64),
    #[error("Order item {0} does not exist")]
    OrderItemNotFound(i64),
    #[error("The requested items do not all belong to the same order")]
    MixedOrders,
    #[error("A label request must name at least one order item")]
    EmptyLabelRequest,
    #[error("Order item {0} does not belong to the calling seller")]
    NotItemSeller(i64),
    #[error("Order item {0} has already been shipped or is not fulfillable")]
    ItemNotFulfillable(i64),
    #[error("Order {0} has not been paid; a label cannot be purchased")]
    OrderNotPaid(i64),
    #[error("The requested shipment {0} does not exist")]
    ShipmentNotFound(i64),
    #[error("Order {0} does not have a cancellable pending payment")]
    PaymentNotCancellable(i64),
    #[error("The payment for order {0} has not succeeded or carries no charge; it cannot be refunded")]
    PaymentNotRefundable(i64),
    #[error("A refund already exists for order item {0}")]
    DuplicateRefund(i64),
    #[error("The refund window of {0} days has expired for this order")]
    RefundWindowExpired(i64),
    #[error("Refund amount {0} is not a positive amount")]
    InvalidRefundAmount(Cents),
    #[error("Refund amount {requested} exceeds the item total {max}")]
    RefundAmountTooLarge { requested: Cents, max: Cents },
}

impl From<sqlx::Error> for MarketplaceError {
    fn from(e: sqlx::Error) -> Self {
        MarketplaceError::DatabaseError(e.to_string())
    }
}
