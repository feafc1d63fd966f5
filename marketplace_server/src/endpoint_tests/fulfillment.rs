use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use apm_common::Cents;
use chrono::{DateTime, TimeZone, Utc};
use order_engine::{
    db_types::{AddressSnapshot, OrderItem, OrderItemStatus, Shipment, ShipmentStatus, TrackingEvent},
    helpers::CombinedParcel,
    order_objects::{FulfillableItem, LabelOrder},
    FulfillmentApi,
};
use provider_clients::{CarrierApi, ShippingConfig};
use sqlx::types::Json;

use super::helpers::{get_auth_config, get_request, issue_token, serve_canned_responses};
use crate::{
    auth::{Role, TokenIssuer},
    config::TrackingWebhookUrl,
    endpoint_tests::mocks::MockShipmentManager,
    routes::{FulfillableItemsRoute, PurchaseLabelRoute, ShipmentTrackingRoute},
};

#[actix_web::test]
async fn the_fulfillment_queue_requires_the_seller_role() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, vec![Role::Buyer]);
    let err = get_request(&token, "/fulfillment/items", configure).await.expect_err("Expected error");
    assert_eq!(err, "You do not have permission to carry out that request. The seller role is required for this endpoint");
}

#[actix_web::test]
async fn sellers_see_their_fulfillment_queue() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, vec![Role::Seller]);
    let (status, body) = get_request(&token, "/fulfillment/items", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let items: Vec<FulfillableItem> = serde_json::from_str(&body).expect("Body was not a fulfillment queue");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].item.title, "Alternator");
    assert_eq!(items[0].item.status, OrderItemStatus::Processing);
}

#[actix_web::test]
async fn admins_can_read_any_queue() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(99, vec![Role::Admin]);
    let (status, _) = get_request(&token, "/fulfillment/items", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
}

#[actix_web::test]
async fn tracking_view_returns_the_shipment_and_its_events() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(7, vec![Role::Seller]);
    let (status, body) = get_request(&token, "/shipments/4/tracking", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let view: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert_eq!(view["shipment"]["tracking_number"], "9400100000000000000001");
    assert_eq!(view["events"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn a_failed_webhook_registration_does_not_fail_the_label_purchase() {
    let _ = env_logger::try_init().ok();
    // The aggregator sells the label but refuses the webhook registration (no canned route, so a 503).
    let base_url = serve_canned_responses(vec![(
        "POST /transactions",
        r#"{
            "object_id": "txn_stub_1",
            "carrier": "usps",
            "tracking_number": "9400100000000000000042",
            "tracking_url": null,
            "label_url": null,
            "status": "SUCCESS"
        }"#
        .to_string(),
    )]);
    let mut shipments = MockShipmentManager::new();
    shipments.expect_prepare_label_purchase().returning(|request| Ok(label_order_response(request.rate_id.clone())));
    shipments.expect_record_label_purchase().returning(|_, label| {
        let mut shipment = shipment_response(4);
        shipment.tracking_number = label.tracking_number;
        Ok(shipment)
    });
    let api = FulfillmentApi::new(shipments);
    let carrier = CarrierApi::new(ShippingConfig { base_url, ..Default::default() }).unwrap();
    let issuer = TokenIssuer::new(&get_auth_config());
    let app = App::new()
        .app_data(web::Data::new(issuer))
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(carrier))
        .app_data(web::Data::new(TrackingWebhookUrl::new("http://localhost:4460")))
        .service(PurchaseLabelRoute::<MockShipmentManager>::new());
    let service = test::init_service(app).await;

    let token = issue_token(7, vec![Role::Seller]);
    let req = TestRequest::post()
        .uri("/fulfillment/labels")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(serde_json::json!({ "order_item_ids": [11], "rate_id": "rate_abc123" }))
        .to_request();
    let res = test::try_call_service(&service, req)
        .await
        .expect("A registration failure must not fail the label purchase");
    assert_eq!(res.status(), StatusCode::OK);
    let shipment: Shipment = test::read_body_json(res).await;
    assert_eq!(shipment.tracking_number, "9400100000000000000042");
}

fn configure(cfg: &mut ServiceConfig) {
    let mut shipments = MockShipmentManager::new();
    shipments.expect_fulfillable_items().returning(move |seller_id| Ok(queue_response(seller_id)));
    shipments.expect_fetch_shipment_for_user().returning(|id, _| Ok((shipment_response(id), events_response(id))));
    let api = FulfillmentApi::new(shipments);
    cfg.service(FulfillableItemsRoute::<MockShipmentManager>::new())
        .service(ShipmentTrackingRoute::<MockShipmentManager>::new())
        .app_data(web::Data::new(api));
}

fn ts() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 10, 0, 0).unwrap()
}

fn queue_response(seller_id: i64) -> Vec<FulfillableItem> {
    vec![FulfillableItem {
        item: OrderItem {
            id: 11,
            order_id: 3,
            part_id: 5,
            seller_id,
            title: "Alternator".to_string(),
            part_number: Some("ALT-8944".to_string()),
            condition: "used".to_string(),
            image_url: None,
            unit_price: Cents::from_dollars(50),
            quantity: 1,
            subtotal: Cents::from_dollars(50),
            shipping_cost: Cents::from_dollars(10),
            status: OrderItemStatus::Processing,
            created_at: ts(),
            updated_at: ts(),
        },
        order_number: "APM-20240601-000003".parse().unwrap(),
        paid_at: Some(ts()),
    }]
}

fn snapshot() -> AddressSnapshot {
    AddressSnapshot {
        recipient: "Sam Harper".to_string(),
        street1: "123 Main St".to_string(),
        street2: None,
        city: "Springfield".to_string(),
        state: "IL".to_string(),
        postal_code: "62701".to_string(),
        country: "US".to_string(),
        phone: None,
    }
}

fn label_order_response(rate_id: String) -> LabelOrder {
    LabelOrder {
        order_id: 3,
        seller_id: 7,
        rate_id,
        order_item_ids: vec![11],
        parcel: CombinedParcel { weight_grams: 4500, length_mm: 300, width_mm: 200, height_mm: 200 },
        from: snapshot(),
        to: snapshot(),
    }
}

fn shipment_response(id: i64) -> Shipment {
    let snapshot = snapshot();
    Shipment {
        id,
        order_id: 3,
        seller_id: 7,
        rate_id: "rate_abc123".to_string(),
        transaction_id: "txn_abc123".to_string(),
        carrier: "usps".to_string(),
        tracking_number: "9400100000000000000001".to_string(),
        tracking_url: None,
        label_url: None,
        status: ShipmentStatus::InTransit,
        from_address: Json(snapshot.clone()),
        to_address: Json(snapshot),
        weight_grams: 4500,
        length_mm: 300,
        width_mm: 200,
        height_mm: 200,
        created_at: ts(),
        updated_at: ts(),
        shipped_at: Some(ts()),
        delivered_at: None,
    }
}

fn events_response(shipment_id: i64) -> Vec<TrackingEvent> {
    vec![TrackingEvent {
        id: 1,
        shipment_id,
        status: ShipmentStatus::InTransit,
        detail: Some("Departed facility".to_string()),
        location: Some("Chicago IL".to_string()),
        occurred_at: ts(),
        created_at: ts(),
    }]
}
