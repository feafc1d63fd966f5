mod support;

use chrono::{Duration, Utc};
use order_engine::{
    db_types::{OrderItemStatus, OrderStatus, ShipmentStatus},
    order_objects::{LabelRequest, PurchasedLabel, TrackingUpdate},
    CheckoutApi,
    FulfillmentApi,
    MarketplaceError,
};
use support::{cart_line, checkout, settle_payment, setup};

fn label() -> PurchasedLabel {
    PurchasedLabel {
        transaction_id: "txn_1".into(),
        carrier: "usps".into(),
        tracking_number: "9400100000000000000001".into(),
        tracking_url: Some("https://tools.usps.com/track?n=9400100000000000000001".into()),
        label_url: Some("https://labels.example.com/txn_1.pdf".into()),
    }
}

fn tracking(status: ShipmentStatus, minutes_ago: i64) -> TrackingUpdate {
    TrackingUpdate {
        tracking_number: "9400100000000000000001".into(),
        status,
        detail: None,
        location: Some("SPRINGFIELD IL".into()),
        occurred_at: Utc::now() - Duration::minutes(minutes_ago),
    }
}

/// Checkout, settle, and return the paid order's item id.
async fn paid_item(world: &support::TestWorld, intent: &str) -> (i64, i64) {
    let order = checkout(&world.db, world, vec![cart_line(world.part.id, 2, 10)], intent).await;
    settle_payment(&world.db, intent).await;
    let details = CheckoutApi::new(world.db.clone()).order_for_buyer(order.id, world.buyer_id).await.unwrap();
    (order.id, details.items[0].id)
}

#[tokio::test]
async fn fulfillment_queue_lists_paid_items_only() {
    let world = setup().await;
    let api = FulfillmentApi::new(world.db.clone());
    // Unpaid order: not fulfillable yet.
    checkout(&world.db, &world, vec![cart_line(world.part.id, 1, 5)], "pi_q1").await;
    assert!(api.fulfillable_items(world.seller_id).await.unwrap().is_empty());

    settle_payment(&world.db, "pi_q1").await;
    let queue = api.fulfillable_items(world.seller_id).await.unwrap();
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].item.status, OrderItemStatus::Processing);
    assert!(queue[0].paid_at.is_some());
}

#[tokio::test]
async fn label_purchase_ships_the_item_and_the_order() {
    let world = setup().await;
    let (order_id, item_id) = paid_item(&world, "pi_label").await;
    let api = FulfillmentApi::new(world.db.clone());

    let request = LabelRequest { seller_id: world.seller_id, order_item_ids: vec![item_id], rate_id: "rate_1".into() };
    let label_order = api.prepare_label_purchase(&request).await.unwrap();
    assert_eq!(label_order.order_id, order_id);
    assert_eq!(label_order.parcel.weight_grams, 9_000);
    assert_eq!(label_order.from.street1, world.seller_address.street1);

    let shipment = api.record_label_purchase(&label_order, label()).await.unwrap();
    assert_eq!(shipment.status, ShipmentStatus::LabelCreated);

    let details = CheckoutApi::new(world.db.clone()).order_for_buyer(order_id, world.buyer_id).await.unwrap();
    assert_eq!(details.items[0].status, OrderItemStatus::Shipped);
    assert_eq!(details.order.status, OrderStatus::Shipped);
}

#[tokio::test]
async fn labels_cannot_be_purchased_for_unpaid_orders() {
    let world = setup().await;
    let order = checkout(&world.db, &world, vec![cart_line(world.part.id, 1, 5)], "pi_nopay").await;
    let details = CheckoutApi::new(world.db.clone()).order_for_buyer(order.id, world.buyer_id).await.unwrap();
    let api = FulfillmentApi::new(world.db.clone());
    let request = LabelRequest {
        seller_id: world.seller_id,
        order_item_ids: vec![details.items[0].id],
        rate_id: "rate_1".into(),
    };
    // The item is still Pending, so it is caught before the order-level check.
    assert!(matches!(api.prepare_label_purchase(&request).await, Err(MarketplaceError::ItemNotFulfillable(_))));
}

#[tokio::test]
async fn labels_are_scoped_to_the_items_seller() {
    let world = setup().await;
    let (_, item_id) = paid_item(&world, "pi_foreign").await;
    let api = FulfillmentApi::new(world.db.clone());
    let request = LabelRequest { seller_id: world.buyer_id, order_item_ids: vec![item_id], rate_id: "rate_1".into() };
    assert!(matches!(api.prepare_label_purchase(&request).await, Err(MarketplaceError::NotItemSeller(_))));
}

#[tokio::test]
async fn tracking_updates_advance_the_shipment_monotonically() {
    let world = setup().await;
    let (order_id, item_id) = paid_item(&world, "pi_track").await;
    let api = FulfillmentApi::new(world.db.clone());
    let request = LabelRequest { seller_id: world.seller_id, order_item_ids: vec![item_id], rate_id: "rate_1".into() };
    let label_order = api.prepare_label_purchase(&request).await.unwrap();
    api.record_label_purchase(&label_order, label()).await.unwrap();

    let shipment = api.apply_tracking_update(tracking(ShipmentStatus::InTransit, 60)).await.unwrap().unwrap();
    assert_eq!(shipment.status, ShipmentStatus::InTransit);
    let first_shipped_at = shipment.shipped_at.unwrap();

    // A later delivery event keeps the original shipped_at and stamps delivered_at.
    let shipment = api.apply_tracking_update(tracking(ShipmentStatus::Delivered, 5)).await.unwrap().unwrap();
    assert_eq!(shipment.status, ShipmentStatus::Delivered);
    assert_eq!(shipment.shipped_at.unwrap(), first_shipped_at);
    assert!(shipment.delivered_at.is_some());

    let details = CheckoutApi::new(world.db.clone()).order_for_buyer(order_id, world.buyer_id).await.unwrap();
    assert_eq!(details.items[0].status, OrderItemStatus::Delivered);
    assert_eq!(details.order.status, OrderStatus::Delivered);
}

#[tokio::test]
async fn replayed_tracking_events_do_not_duplicate_the_log() {
    let world = setup().await;
    let (_, item_id) = paid_item(&world, "pi_dup_track").await;
    let api = FulfillmentApi::new(world.db.clone());
    let request = LabelRequest { seller_id: world.seller_id, order_item_ids: vec![item_id], rate_id: "rate_1".into() };
    let label_order = api.prepare_label_purchase(&request).await.unwrap();
    let shipment = api.record_label_purchase(&label_order, label()).await.unwrap();

    let event = tracking(ShipmentStatus::InTransit, 30);
    api.apply_tracking_update(event.clone()).await.unwrap();
    api.apply_tracking_update(event).await.unwrap();

    let (_, events) = api.shipment_for_user(shipment.id, world.seller_id).await.unwrap();
    let in_transit = events.iter().filter(|e| e.status == ShipmentStatus::InTransit).count();
    assert_eq!(in_transit, 1);
}

#[tokio::test]
async fn unknown_tracking_numbers_are_ignored() {
    let world = setup().await;
    let api = FulfillmentApi::new(world.db.clone());
    let update = TrackingUpdate {
        tracking_number: "no-such-tracking".into(),
        status: ShipmentStatus::InTransit,
        detail: None,
        location: None,
        occurred_at: Utc::now(),
    };
    assert!(api.apply_tracking_update(update).await.unwrap().is_none());
}

#[tokio::test]
async fn failed_delivery_cancels_the_shipments_items() {
    let world = setup().await;
    let (order_id, item_id) = paid_item(&world, "pi_fail_ship").await;
    let api = FulfillmentApi::new(world.db.clone());
    let request = LabelRequest { seller_id: world.seller_id, order_item_ids: vec![item_id], rate_id: "rate_1".into() };
    let label_order = api.prepare_label_purchase(&request).await.unwrap();
    api.record_label_purchase(&label_order, label()).await.unwrap();

    api.apply_tracking_update(tracking(ShipmentStatus::Failed, 1)).await.unwrap();
    let details = CheckoutApi::new(world.db.clone()).order_for_buyer(order_id, world.buyer_id).await.unwrap();
    assert_eq!(details.items[0].status, OrderItemStatus::Cancelled);
}

#[tokio::test]
async fn shipment_visibility_is_limited_to_buyer_and_seller() {
    let world = setup().await;
    let (_, item_id) = paid_item(&world, "pi_visible").await;
    let api = FulfillmentApi::new(world.db.clone());
    let request = LabelRequest { seller_id: world.seller_id, order_item_ids: vec![item_id], rate_id: "rate_1".into() };
    let label_order = api.prepare_label_purchase(&request).await.unwrap();
    let shipment = api.record_label_purchase(&label_order, label()).await.unwrap();

    assert!(api.shipment_for_user(shipment.id, world.buyer_id).await.is_ok());
    assert!(api.shipment_for_user(shipment.id, world.seller_id).await.is_ok());
    let outsider = 999_999;
    assert!(matches!(
        api.shipment_for_user(shipment.id, outsider).await,
        Err(MarketplaceError::ShipmentNotFound(_))
    ));
}
