mod support;

use order_engine::{
    db_types::{OrderItemStatus, OrderStatus, PartStatus, PaymentStatus},
    CheckoutApi,
    InventoryLedger,
    PaymentEventApi,
};
use support::{cart_line, checkout, settle_payment, setup};

#[tokio::test]
async fn successful_payment_deducts_inventory_and_marks_the_order_paid() {
    let world = setup().await;
    let order = checkout(&world.db, &world, vec![cart_line(world.part.id, 2, 10)], "pi_success").await;
    settle_payment(&world.db, "pi_success").await;

    let api = CheckoutApi::new(world.db.clone());
    let details = api.order_for_buyer(order.id, world.buyer_id).await.unwrap();
    assert_eq!(details.order.status, OrderStatus::Paid);
    assert_eq!(details.order.payment_status, PaymentStatus::Succeeded);
    assert!(details.order.paid_at.is_some());
    assert_eq!(details.items[0].status, OrderItemStatus::Processing);

    // 5 - 2 = 3 remaining
    let part = world.db.adjust_inventory(world.part.id, 0).await.unwrap();
    assert_eq!(part.quantity, 3);
    assert_eq!(part.status, PartStatus::Active);
}

#[tokio::test]
async fn replayed_success_event_is_a_no_op() {
    let world = setup().await;
    checkout(&world.db, &world, vec![cart_line(world.part.id, 2, 10)], "pi_replay").await;
    settle_payment(&world.db, "pi_replay").await;

    let api = PaymentEventApi::new(world.db.clone());
    let second = api.payment_succeeded("pi_replay", Some("ch_pi_replay")).await.unwrap();
    assert!(second.is_none(), "a replay must not settle twice");

    // Inventory deducted exactly once.
    let part = world.db.adjust_inventory(world.part.id, 0).await.unwrap();
    assert_eq!(part.quantity, 3);
}

#[tokio::test]
async fn selling_out_flips_the_part_to_sold() {
    let world = setup().await;
    checkout(&world.db, &world, vec![cart_line(world.part.id, 5, 10)], "pi_sellout").await;
    settle_payment(&world.db, "pi_sellout").await;
    let part = world.db.adjust_inventory(world.part.id, 0).await.unwrap();
    assert_eq!(part.quantity, 0);
    assert_eq!(part.status, PartStatus::Sold);
}

#[tokio::test]
async fn unknown_intent_is_ignored() {
    let world = setup().await;
    let api = PaymentEventApi::new(world.db.clone());
    let settled = api.payment_succeeded("pi_never_seen", None).await.unwrap();
    assert!(settled.is_none());
}

#[tokio::test]
async fn failed_payment_regresses_the_order_without_touching_inventory() {
    let world = setup().await;
    let order = checkout(&world.db, &world, vec![cart_line(world.part.id, 2, 10)], "pi_fail").await;
    let api = PaymentEventApi::new(world.db.clone());
    api.payment_failed("pi_fail", Some("card_declined"), Some("Your card was declined.")).await.unwrap();

    let details = CheckoutApi::new(world.db.clone()).order_for_buyer(order.id, world.buyer_id).await.unwrap();
    assert_eq!(details.order.status, OrderStatus::PaymentFailed);
    assert_eq!(details.order.payment_status, PaymentStatus::Failed);

    let part = world.db.adjust_inventory(world.part.id, 0).await.unwrap();
    assert_eq!(part.quantity, 5, "inventory is only reserved on success");
}

#[tokio::test]
async fn failure_after_success_is_stale_and_ignored() {
    let world = setup().await;
    let order = checkout(&world.db, &world, vec![cart_line(world.part.id, 1, 10)], "pi_ooo").await;
    settle_payment(&world.db, "pi_ooo").await;

    // The out-of-order failure event must not regress a settled order.
    let api = PaymentEventApi::new(world.db.clone());
    api.payment_failed("pi_ooo", Some("card_declined"), None).await.unwrap();
    let details = CheckoutApi::new(world.db.clone()).order_for_buyer(order.id, world.buyer_id).await.unwrap();
    assert_eq!(details.order.status, OrderStatus::Paid);
    assert_eq!(details.order.payment_status, PaymentStatus::Succeeded);
}

#[tokio::test]
async fn cancelled_payment_cancels_the_order_and_its_items() {
    let world = setup().await;
    let order = checkout(&world.db, &world, vec![cart_line(world.part.id, 1, 10)], "pi_cancel").await;
    let api = PaymentEventApi::new(world.db.clone());
    api.payment_cancelled("pi_cancel").await.unwrap();

    let details = CheckoutApi::new(world.db.clone()).order_for_buyer(order.id, world.buyer_id).await.unwrap();
    assert_eq!(details.order.status, OrderStatus::Cancelled);
    assert!(details.order.cancelled_at.is_some());
    assert_eq!(details.items[0].status, OrderItemStatus::Cancelled);
}
