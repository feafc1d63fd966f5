//! `SqliteDatabase` is a concrete implementation of the marketplace order engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements all the traits defined in the [`crate::traits`]
//! module. Every multi-row mutation runs inside a single transaction so that a failure never leaves a partially
//! applied order, shipment or refund behind.
use std::{collections::BTreeMap, fmt::Debug};

use log::*;
use sqlx::SqlitePool;

use super::db::{addresses, db_url, new_pool, orders, parts, payments, refunds, shipments};
use crate::{
    db_types::{
        Order,
        OrderItemStatus,
        OrderStatus,
        Part,
        PaymentStatus,
        Refund,
        RefundStatus,
        Shipment,
        ShipmentStatus,
        TrackingEvent,
    },
    helpers::{generate_order_number, CombinedParcel, ParcelItem},
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
        QuotedLine,
        RefundEligibility,
        RefundRequest,
        SellerParcel,
        ShippingQuoteRequest,
        TrackingUpdate,
    },
    traits::{
        InventoryLedger,
        MarketplaceError,
        OrderManagement,
        PaymentReconciliation,
        RefundManagement,
        ShipmentManagement,
    },
    REFUND_WINDOW_DAYS,
    TAX_RATE_PERCENT,
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl InventoryLedger for SqliteDatabase {
    async fn adjust_inventory(&self, part_id: i64, delta: i64) -> Result<Part, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let part = parts::adjust_quantity(part_id, delta, &mut conn).await?;
        Ok(part)
    }
}

impl OrderManagement for SqliteDatabase {
    async fn quote_seller_parcels(
        &self,
        request: &ShippingQuoteRequest,
    ) -> Result<Vec<SellerParcel>, MarketplaceError> {
        if request.items.is_empty() {
            return Err(MarketplaceError::EmptyCart);
        }
        let mut conn = self.pool.acquire().await?;
        let to = addresses::fetch_address(request.shipping_address_id, &mut conn)
            .await?
            .ok_or(MarketplaceError::AddressNotFound(request.shipping_address_id))?;
        if to.user_id != request.buyer_id {
            return Err(MarketplaceError::AddressNotOwned(to.id));
        }
        // Group the cart by seller. BTreeMap keeps the output order deterministic.
        let mut groups: BTreeMap<i64, Vec<ParcelItem>> = BTreeMap::new();
        for line in &request.items {
            let part = parts::fetch_part(line.part_id, &mut conn)
                .await?
                .ok_or(MarketplaceError::PartNotFound(line.part_id))?;
            groups.entry(part.seller_id).or_default().push(ParcelItem {
                weight_grams: part.weight_grams,
                length_mm: part.length_mm,
                width_mm: part.width_mm,
                height_mm: part.height_mm,
                quantity: line.quantity,
            });
        }
        // Any seller group that cannot be quoted fails the whole request; no partial results.
        let mut result = Vec::with_capacity(groups.len());
        for (seller_id, items) in groups {
            let parcel =
                CombinedParcel::combine(&items).ok_or(MarketplaceError::ZeroParcelWeight(seller_id))?;
            let from = addresses::fetch_default_address(seller_id, &mut conn)
                .await?
                .ok_or(MarketplaceError::MissingDefaultAddress(seller_id))?;
            result.push(SellerParcel { seller_id, parcel, from: (&from).into(), to: (&to).into() });
        }
        trace!("🗃️ Quoted {} seller parcel(s) for buyer {}", result.len(), request.buyer_id);
        Ok(result)
    }

    async fn prepare_checkout(&self, request: &CheckoutRequest) -> Result<CheckoutQuote, MarketplaceError> {
        if request.items.is_empty() {
            return Err(MarketplaceError::EmptyCart);
        }
        let mut conn = self.pool.acquire().await?;
        let shipping = addresses::fetch_address(request.shipping_address_id, &mut conn)
            .await?
            .ok_or(MarketplaceError::AddressNotFound(request.shipping_address_id))?;
        if shipping.user_id != request.buyer_id {
            return Err(MarketplaceError::AddressNotOwned(shipping.id));
        }
        let billing = match request.billing_address_id {
            Some(id) => {
                let billing = addresses::fetch_address(id, &mut conn)
                    .await?
                    .ok_or(MarketplaceError::AddressNotFound(id))?;
                if billing.user_id != request.buyer_id {
                    return Err(MarketplaceError::AddressNotOwned(billing.id));
                }
                billing
            },
            None => shipping.clone(),
        };
        let mut lines = Vec::with_capacity(request.items.len());
        for line in &request.items {
            let part = validate_purchasable(line.part_id, line.quantity, &mut conn).await?;
            lines.push(QuotedLine {
                part_id: part.id,
                seller_id: part.seller_id,
                title: part.title,
                part_number: part.part_number,
                condition: part.condition,
                image_url: part.image_url,
                unit_price: part.price,
                quantity: line.quantity,
                subtotal: part.price * line.quantity,
                shipping_cost: line.shipping_cost,
            });
        }
        let subtotal = lines.iter().map(|l| l.subtotal).sum::<apm_common::Cents>();
        let shipping_total = lines.iter().map(|l| l.shipping_cost).sum::<apm_common::Cents>();
        let tax_total = subtotal.percent(TAX_RATE_PERCENT);
        let total = subtotal + shipping_total + tax_total;
        let order_number = generate_order_number();
        debug!("🗃️ Checkout {order_number} prepared for buyer {}. Total: {total}", request.buyer_id);
        Ok(CheckoutQuote {
            buyer_id: request.buyer_id,
            order_number: order_number.into(),
            lines,
            subtotal,
            shipping_total,
            tax_total,
            total,
            shipping_address: (&shipping).into(),
            billing_address: (&billing).into(),
        })
    }

    async fn commit_checkout(
        &self,
        quote: CheckoutQuote,
        auth: PaymentAuthorization,
    ) -> Result<Order, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        // Inventory may have moved since the quote was prepared. Re-validate inside the transaction; a conflict
        // rolls the whole checkout back before any row is written.
        for line in &quote.lines {
            validate_purchasable(line.part_id, line.quantity, &mut tx).await?;
        }
        let order = orders::insert_order(&quote, &auth.payment_intent_id, &mut tx).await?;
        for line in &quote.lines {
            orders::insert_order_item(order.id, line, &mut tx).await?;
        }
        payments::insert_payment(order.id, &auth.payment_intent_id, auth.amount, &mut tx).await?;
        tx.commit().await?;
        info!("🗃️ Order {} committed for buyer {} with intent {}", order.order_number, order.buyer_id, auth.payment_intent_id);
        Ok(order)
    }

    async fn fetch_order_for_buyer(&self, order_id: i64, buyer_id: i64) -> Result<OrderDetails, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order(order_id, &mut conn)
            .await?
            .filter(|o| o.buyer_id == buyer_id)
            .ok_or(MarketplaceError::OrderNotFound(order_id))?;
        let items = orders::fetch_order_items(order_id, &mut conn).await?;
        Ok(OrderDetails { order, items })
    }

    async fn fetch_orders_for_buyer(&self, buyer_id: i64) -> Result<Vec<Order>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let result = orders::fetch_orders_for_buyer(buyer_id, &mut conn).await?;
        Ok(result)
    }

    async fn pending_payment_intent(&self, order_id: i64, buyer_id: i64) -> Result<String, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order(order_id, &mut conn)
            .await?
            .filter(|o| o.buyer_id == buyer_id)
            .ok_or(MarketplaceError::OrderNotFound(order_id))?;
        let payment = payments::fetch_payment_for_order(order.id, &mut conn)
            .await?
            .ok_or(MarketplaceError::PaymentNotCancellable(order_id))?;
        if payment.status != PaymentStatus::Pending {
            return Err(MarketplaceError::PaymentNotCancellable(order_id));
        }
        Ok(payment.payment_intent_id)
    }
}

impl PaymentReconciliation for SqliteDatabase {
    async fn apply_payment_succeeded(
        &self,
        payment_intent_id: &str,
        charge_id: Option<&str>,
    ) -> Result<Option<PaymentSettled>, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let Some(payment) = payments::fetch_payment_by_intent(payment_intent_id, &mut tx).await? else {
            warn!("🗃️ Received a success event for unknown intent {payment_intent_id}. Ignoring.");
            return Ok(None);
        };
        match payment.status {
            PaymentStatus::Succeeded => {
                debug!("🗃️ Intent {payment_intent_id} is already settled. Replay ignored.");
                return Ok(None);
            },
            PaymentStatus::Pending | PaymentStatus::Failed => {},
            other => {
                warn!("🗃️ Stale success event for intent {payment_intent_id} in state {other}. Ignoring.");
                return Ok(None);
            },
        }
        let payment = payments::mark_succeeded(payment.id, charge_id, &mut tx).await?;
        let order = orders::mark_order_paid(payment.order_id, &mut tx).await?;
        let items = orders::fetch_order_items(order.id, &mut tx).await?;
        for item in &items {
            parts::adjust_quantity(item.part_id, -item.quantity, &mut tx).await?;
            orders::update_item_status(item.id, OrderItemStatus::Processing, &mut tx).await?;
        }
        tx.commit().await?;
        info!("🗃️ Order {} paid. {} item(s) moved to fulfillment.", order.order_number, items.len());
        Ok(Some(PaymentSettled { order_id: order.id, order_number: order.order_number, amount: payment.amount }))
    }

    async fn apply_payment_failed(
        &self,
        payment_intent_id: &str,
        failure_code: Option<&str>,
        failure_message: Option<&str>,
    ) -> Result<(), MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let Some(payment) = payments::fetch_payment_by_intent(payment_intent_id, &mut tx).await? else {
            warn!("🗃️ Received a failure event for unknown intent {payment_intent_id}. Ignoring.");
            return Ok(());
        };
        if payment.status != PaymentStatus::Pending {
            debug!("🗃️ Failure event for intent {payment_intent_id} in state {}. Ignoring.", payment.status);
            return Ok(());
        }
        payments::mark_failed(payment.id, failure_code, failure_message, &mut tx).await?;
        orders::update_order_status(payment.order_id, OrderStatus::PaymentFailed, &mut tx).await?;
        orders::set_order_payment_status(payment.order_id, PaymentStatus::Failed, &mut tx).await?;
        tx.commit().await?;
        info!(
            "🗃️ Payment failed for intent {payment_intent_id}: {}",
            failure_message.unwrap_or("no reason given")
        );
        Ok(())
    }

    async fn apply_payment_cancelled(&self, payment_intent_id: &str) -> Result<(), MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let Some(payment) = payments::fetch_payment_by_intent(payment_intent_id, &mut tx).await? else {
            warn!("🗃️ Received a cancellation event for unknown intent {payment_intent_id}. Ignoring.");
            return Ok(());
        };
        if payment.status != PaymentStatus::Pending {
            debug!("🗃️ Cancellation event for intent {payment_intent_id} in state {}. Ignoring.", payment.status);
            return Ok(());
        }
        payments::mark_cancelled(payment.id, &mut tx).await?;
        let order = orders::cancel_order(payment.order_id, &mut tx).await?;
        orders::update_items_status_for_order(order.id, OrderItemStatus::Cancelled, &mut tx).await?;
        tx.commit().await?;
        info!("🗃️ Order {} cancelled via intent {payment_intent_id}", order.order_number);
        Ok(())
    }

    async fn apply_refund_update(&self, refund_id: &str, status: RefundStatus) -> Result<(), MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let Some(refund) = refunds::set_status(refund_id, status, &mut tx).await? else {
            warn!("🗃️ Received a refund event for unknown refund {refund_id}. Ignoring.");
            return Ok(());
        };
        match status {
            RefundStatus::Succeeded => {
                // Inventory was already restored optimistically when the refund was recorded, with the item moved
                // to Refunded in the same transaction. The unshipped guard here only fires for rows that predate
                // that flow (or were recorded externally); it can never restore twice.
                let item = orders::fetch_order_item(refund.order_item_id, &mut tx)
                    .await?
                    .ok_or(MarketplaceError::OrderItemNotFound(refund.order_item_id))?;
                if item.status.is_unshipped() {
                    parts::adjust_quantity(item.part_id, item.quantity, &mut tx).await?;
                    orders::update_item_status(item.id, OrderItemStatus::Refunded, &mut tx).await?;
                }
                info!("🗃️ Refund {refund_id} succeeded for order item {}", refund.order_item_id);
            },
            RefundStatus::Failed => {
                // The money did not move. The item stays Refunded for manual review rather than silently
                // re-entering fulfillment.
                error!(
                    "🗃️ Refund {refund_id} FAILED at the processor for order item {}. Manual intervention needed.",
                    refund.order_item_id
                );
            },
            RefundStatus::Pending => {
                debug!("🗃️ Refund {refund_id} acknowledged as pending");
            },
        }
        tx.commit().await?;
        Ok(())
    }

    async fn apply_charge_refunded(&self, charge_id: &str, fully_refunded: bool) -> Result<(), MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let Some(payment) = payments::fetch_payment_by_charge(charge_id, &mut tx).await? else {
            warn!("🗃️ Received a charge.refunded event for unknown charge {charge_id}. Ignoring.");
            return Ok(());
        };
        let payment = payments::set_refund_state(payment.id, fully_refunded, &mut tx).await?;
        orders::set_order_payment_status(payment.order_id, payment.status, &mut tx).await?;
        tx.commit().await?;
        info!("🗃️ Charge {charge_id} marked {} on order {}", payment.status, payment.order_id);
        Ok(())
    }
}

impl ShipmentManagement for SqliteDatabase {
    async fn fulfillable_items(&self, seller_id: i64) -> Result<Vec<FulfillableItem>, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let items = orders::fetch_fulfillable_items(seller_id, &mut conn).await?;
        Ok(items)
    }

    async fn prepare_label_purchase(&self, request: &LabelRequest) -> Result<LabelOrder, MarketplaceError> {
        if request.order_item_ids.is_empty() {
            return Err(MarketplaceError::EmptyLabelRequest);
        }
        let mut conn = self.pool.acquire().await?;
        let items = orders::fetch_order_items_by_ids(&request.order_item_ids, &mut conn).await?;
        if items.len() != request.order_item_ids.len() {
            let found: Vec<i64> = items.iter().map(|i| i.id).collect();
            let missing = request.order_item_ids.iter().find(|id| !found.contains(id)).copied().unwrap_or_default();
            return Err(MarketplaceError::OrderItemNotFound(missing));
        }
        let order_id = items[0].order_id;
        if items.iter().any(|i| i.order_id != order_id) {
            return Err(MarketplaceError::MixedOrders);
        }
        if let Some(foreign) = items.iter().find(|i| i.seller_id != request.seller_id) {
            return Err(MarketplaceError::NotItemSeller(foreign.id));
        }
        if let Some(done) = items.iter().find(|i| i.status != OrderItemStatus::Processing) {
            return Err(MarketplaceError::ItemNotFulfillable(done.id));
        }
        let order =
            orders::fetch_order(order_id, &mut conn).await?.ok_or(MarketplaceError::OrderNotFound(order_id))?;
        if order.payment_status != PaymentStatus::Succeeded {
            return Err(MarketplaceError::OrderNotPaid(order_id));
        }
        let mut parcel_items = Vec::with_capacity(items.len());
        for item in &items {
            let part = parts::fetch_part(item.part_id, &mut conn)
                .await?
                .ok_or(MarketplaceError::PartNotFound(item.part_id))?;
            parcel_items.push(ParcelItem {
                weight_grams: part.weight_grams,
                length_mm: part.length_mm,
                width_mm: part.width_mm,
                height_mm: part.height_mm,
                quantity: item.quantity,
            });
        }
        let parcel = CombinedParcel::combine(&parcel_items)
            .ok_or(MarketplaceError::ZeroParcelWeight(request.seller_id))?;
        let from = addresses::fetch_default_address(request.seller_id, &mut conn)
            .await?
            .ok_or(MarketplaceError::MissingDefaultAddress(request.seller_id))?;
        Ok(LabelOrder {
            order_id,
            seller_id: request.seller_id,
            rate_id: request.rate_id.clone(),
            order_item_ids: request.order_item_ids.clone(),
            parcel,
            from: (&from).into(),
            to: order.shipping_address.0.clone(),
        })
    }

    async fn record_label_purchase(
        &self,
        order: &LabelOrder,
        label: PurchasedLabel,
    ) -> Result<Shipment, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let shipment = shipments::insert_shipment(order, &label, &mut tx).await?;
        for item_id in &order.order_item_ids {
            let item = orders::fetch_order_item(*item_id, &mut tx)
                .await?
                .ok_or(MarketplaceError::OrderItemNotFound(*item_id))?;
            shipments::insert_shipment_item(shipment.id, item.id, item.quantity, &mut tx).await?;
            orders::update_item_status(item.id, OrderItemStatus::Shipped, &mut tx).await?;
        }
        if orders::unshipped_item_count(order.order_id, &mut tx).await? == 0 {
            orders::update_order_status(order.order_id, OrderStatus::Shipped, &mut tx).await?;
            debug!("🗃️ All items on order {} have labels. Order marked Shipped.", order.order_id);
        }
        tx.commit().await?;
        info!("🗃️ Label recorded: shipment {} tracking {}", shipment.id, shipment.tracking_number);
        Ok(shipment)
    }

    async fn fetch_shipment_for_user(
        &self,
        shipment_id: i64,
        user_id: i64,
    ) -> Result<(Shipment, Vec<TrackingEvent>), MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let shipment = shipments::fetch_shipment(shipment_id, &mut conn)
            .await?
            .ok_or(MarketplaceError::ShipmentNotFound(shipment_id))?;
        let order = orders::fetch_order(shipment.order_id, &mut conn)
            .await?
            .ok_or(MarketplaceError::OrderNotFound(shipment.order_id))?;
        // Existence is not leaked to third parties.
        if shipment.seller_id != user_id && order.buyer_id != user_id {
            return Err(MarketplaceError::ShipmentNotFound(shipment_id));
        }
        let events = shipments::fetch_tracking_events(shipment.id, &mut conn).await?;
        Ok((shipment, events))
    }

    async fn apply_tracking_update(&self, update: TrackingUpdate) -> Result<Option<Shipment>, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let Some(shipment) = shipments::fetch_shipment_by_tracking(&update.tracking_number, &mut tx).await? else {
            warn!("🗃️ Tracking event for unknown tracking number {}. Ignoring.", update.tracking_number);
            return Ok(None);
        };
        let fresh = shipments::append_tracking_event(shipment.id, &update, &mut tx).await?;
        if !fresh {
            trace!("🗃️ Duplicate tracking event for shipment {}. Replay ignored.", shipment.id);
        }
        let shipment = shipments::apply_status(shipment.id, update.status, update.occurred_at, &mut tx).await?;
        let item_status = match update.status {
            ShipmentStatus::Delivered => Some(OrderItemStatus::Delivered),
            ShipmentStatus::Failed => Some(OrderItemStatus::Cancelled),
            ShipmentStatus::Returned => Some(OrderItemStatus::Returned),
            _ => None,
        };
        if let Some(status) = item_status {
            for item_id in shipments::shipment_order_item_ids(shipment.id, &mut tx).await? {
                orders::update_item_status(item_id, status, &mut tx).await?;
            }
        }
        if update.status == ShipmentStatus::Delivered
            && orders::undelivered_item_count(shipment.order_id, &mut tx).await? == 0
        {
            orders::update_order_status(shipment.order_id, OrderStatus::Delivered, &mut tx).await?;
            debug!("🗃️ Every item on order {} is delivered. Order marked Delivered.", shipment.order_id);
        }
        tx.commit().await?;
        info!("🗃️ Shipment {} is now {} ({})", shipment.id, shipment.status, update.tracking_number);
        Ok(Some(shipment))
    }
}

impl RefundManagement for SqliteDatabase {
    async fn validate_refund(&self, request: &RefundRequest) -> Result<RefundEligibility, MarketplaceError> {
        let mut conn = self.pool.acquire().await?;
        let item = orders::fetch_order_item(request.order_item_id, &mut conn)
            .await?
            .ok_or(MarketplaceError::OrderItemNotFound(request.order_item_id))?;
        let order = orders::fetch_order(item.order_id, &mut conn)
            .await?
            .filter(|o| o.buyer_id == request.buyer_id)
            .ok_or(MarketplaceError::OrderItemNotFound(request.order_item_id))?;
        let payment = payments::fetch_payment_for_order(order.id, &mut conn)
            .await?
            .ok_or(MarketplaceError::PaymentNotRefundable(order.id))?;
        if payment.status != PaymentStatus::Succeeded {
            return Err(MarketplaceError::PaymentNotRefundable(order.id));
        }
        let charge_id = payment.charge_id.ok_or(MarketplaceError::PaymentNotRefundable(order.id))?;
        if refunds::fetch_active_refund_for_item(item.id, &mut conn).await?.is_some() {
            return Err(MarketplaceError::DuplicateRefund(item.id));
        }
        // The window runs from order creation; a payment that settles late does not stretch it.
        if chrono::Utc::now() - order.created_at > chrono::Duration::days(REFUND_WINDOW_DAYS) {
            return Err(MarketplaceError::RefundWindowExpired(REFUND_WINDOW_DAYS));
        }
        let max = item.subtotal + item.shipping_cost;
        let amount = request.amount.unwrap_or(max);
        if !amount.is_positive() {
            return Err(MarketplaceError::InvalidRefundAmount(amount));
        }
        if amount > max {
            return Err(MarketplaceError::RefundAmountTooLarge { requested: amount, max });
        }
        Ok(RefundEligibility { payment_id: payment.id, order_id: order.id, order_item_id: item.id, charge_id, amount })
    }

    async fn record_refund(
        &self,
        eligibility: &RefundEligibility,
        external_refund_id: &str,
        reason: &str,
    ) -> Result<Refund, MarketplaceError> {
        let mut tx = self.pool.begin().await?;
        let refund = refunds::insert_refund(eligibility, external_refund_id, reason, &mut tx).await?;
        let item = orders::fetch_order_item(eligibility.order_item_id, &mut tx)
            .await?
            .ok_or(MarketplaceError::OrderItemNotFound(eligibility.order_item_id))?;
        // Restore stock right away for items the seller never shipped. The status move to Refunded in the same
        // transaction is what makes a later webhook replay unable to restore again.
        if item.status.is_unshipped() {
            parts::adjust_quantity(item.part_id, item.quantity, &mut tx).await?;
        }
        orders::update_item_status(item.id, OrderItemStatus::Refunded, &mut tx).await?;
        tx.commit().await?;
        info!("🗃️ Refund {external_refund_id} recorded for order item {}", item.id);
        Ok(refund)
    }
}

/// Cart-line validation shared by quote preparation and the commit-time re-check.
async fn validate_purchasable(
    part_id: i64,
    quantity: i64,
    conn: &mut sqlx::SqliteConnection,
) -> Result<Part, MarketplaceError> {
    use crate::db_types::PartStatus;
    let part = parts::fetch_part(part_id, conn).await?.ok_or(MarketplaceError::PartNotFound(part_id))?;
    if part.status != PartStatus::Active {
        return Err(MarketplaceError::PartInactive(part_id));
    }
    if part.quantity < quantity {
        return Err(MarketplaceError::InsufficientInventory {
            part_id,
            requested: quantity,
            available: part.quantity,
        });
    }
    Ok(part)
}

impl SqliteDatabase {
    /// Creates a new database API object
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        SqliteDatabase::new_with_url(url.as_str(), max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        trace!("Creating new database connection pool with url {url}");
        let pool = new_pool(url, max_connections).await?;
        let url = url.to_string();
        Ok(Self { url, pool })
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    /// Returns a reference to the database connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}
