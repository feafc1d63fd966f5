use actix_web::{http::StatusCode, test, test::TestRequest, web, web::ServiceConfig, App};
use apm_common::Cents;
use chrono::{TimeZone, Utc};
use order_engine::{
    db_types::{AddressSnapshot, Order, OrderStatus, PaymentStatus},
    helpers::CombinedParcel,
    order_objects::SellerParcel,
    traits::MarketplaceError,
    CheckoutApi,
};
use provider_clients::{CarrierApi, PaymentProcessorApi, PaymentsConfig, ShippingConfig};
use serde_json::json;
use sqlx::types::Json;

use super::helpers::{get_auth_config, get_request, issue_token, post_request, serve_canned_responses};
use crate::{
    auth::{Role, TokenIssuer},
    endpoint_tests::mocks::MockOrderManager,
    routes::{CheckoutRoute, MyOrdersRoute, OrderByIdRoute, ShippingQuoteRoute},
};

#[actix_web::test]
async fn fetch_my_orders_no_token() {
    let _ = env_logger::try_init().ok();
    let err = get_request("", "/orders", configure).await.expect_err("Expected error");
    assert_eq!(err, "Authentication error. No access token provided");
}

#[actix_web::test]
async fn fetch_my_orders() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(1, vec![Role::Buyer]);
    let (status, body) = get_request(&token, "/orders", configure).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    let orders: Vec<Order> = serde_json::from_str(&body).expect("Body was not a list of orders");
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].order_number.as_str(), "APM-20240510-000002");
    assert_eq!(orders[1].total, Cents::from_dollars(118));
}

#[actix_web::test]
async fn fetch_my_orders_tampered_token() {
    let _ = env_logger::try_init().ok();
    let mut token = issue_token(1, vec![Role::Buyer]);
    token.replace_range(token.len() - 10..token.len() - 5, "00000");
    let err = get_request(&token, "/orders", configure).await.expect_err("Expected error");
    assert!(err.starts_with("Authentication error. Invalid access token."), "Unexpected error: {err}");
}

#[actix_web::test]
async fn another_buyers_order_is_a_404() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(2, vec![Role::Buyer]);
    let err = get_request(&token, "/orders/10", configure).await.expect_err("Expected error");
    assert!(err.contains("order 10 does not exist"), "Unexpected error: {err}");
}

#[actix_web::test]
async fn checkout_with_an_empty_cart_is_rejected_before_the_processor_is_called() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(1, vec![Role::Buyer]);
    let body = json!({ "items": [], "shipping_address_id": 1 });
    let err = post_request(&token, "/orders", body, configure).await.expect_err("Expected error");
    assert!(err.contains("cart is empty"), "Unexpected error: {err}");
}

#[actix_web::test]
async fn quotes_stop_at_an_address_the_aggregator_rejects() {
    let _ = env_logger::try_init().ok();
    // The aggregator deems the destination undeliverable; no rates may be fetched for it.
    let base_url = serve_canned_responses(vec![(
        "POST /addresses/validate",
        json!({
            "is_valid": false,
            "messages": ["Undeliverable postal code"],
            "address": {
                "name": "Sam Harper",
                "street1": "123 Main St",
                "city": "Springfield",
                "state": "IL",
                "zip": "62701",
                "country": "US"
            }
        })
        .to_string(),
    )]);
    let mut orders = MockOrderManager::new();
    orders.expect_quote_seller_parcels().returning(|_| Ok(vec![seller_parcel()]));
    let api = CheckoutApi::new(orders);
    let carrier = CarrierApi::new(ShippingConfig { base_url, ..Default::default() }).unwrap();
    let issuer = TokenIssuer::new(&get_auth_config());
    let app = App::new()
        .app_data(web::Data::new(issuer))
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(carrier))
        .service(ShippingQuoteRoute::<MockOrderManager>::new());
    let service = test::init_service(app).await;

    let token = issue_token(1, vec![Role::Buyer]);
    let req = TestRequest::post()
        .uri("/shipping/quote")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .set_json(json!({ "items": [{ "part_id": 5, "quantity": 1 }], "shipping_address_id": 1 }))
        .to_request();
    let res = test::try_call_service(&service, req).await.expect("Request failed");
    let err = res.response().error().expect("Expected the quote to be rejected").to_string();
    assert!(err.contains("rejected the address"), "Unexpected error: {err}");
    assert!(err.contains("Undeliverable postal code"), "Unexpected error: {err}");
}

fn configure(cfg: &mut ServiceConfig) {
    let mut orders = MockOrderManager::new();
    orders.expect_fetch_orders_for_buyer().returning(move |_| Ok(orders_response()));
    orders.expect_fetch_order_for_buyer().returning(|id, _| Err(MarketplaceError::OrderNotFound(id)));
    orders.expect_prepare_checkout().returning(|_| Err(MarketplaceError::EmptyCart));
    let api = CheckoutApi::new(orders);
    // The checkout route extracts the processor client; a default config builds one that never gets called here.
    let payments = PaymentProcessorApi::new(PaymentsConfig::default()).unwrap();
    cfg.service(MyOrdersRoute::<MockOrderManager>::new())
        .service(OrderByIdRoute::<MockOrderManager>::new())
        .service(CheckoutRoute::<MockOrderManager>::new())
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(payments));
}

fn seller_parcel() -> SellerParcel {
    SellerParcel {
        seller_id: 7,
        parcel: CombinedParcel { weight_grams: 4500, length_mm: 300, width_mm: 200, height_mm: 200 },
        from: snapshot(),
        to: snapshot(),
    }
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

// Mock response to `fetch_orders_for_buyer`, newest first
fn orders_response() -> Vec<Order> {
    let t0 = Utc.with_ymd_and_hms(2024, 5, 2, 13, 30, 0).unwrap();
    let t1 = Utc.with_ymd_and_hms(2024, 5, 10, 9, 15, 0).unwrap();
    vec![
        Order {
            id: 2,
            buyer_id: 1,
            order_number: "APM-20240510-000002".parse().unwrap(),
            subtotal: Cents::from_dollars(40),
            shipping_total: Cents::from_dollars(8),
            tax_total: Cents::from(320),
            total: Cents::from(5120),
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
            shipping_address: Json(snapshot()),
            billing_address: Json(snapshot()),
            payment_intent_id: Some("pi_test_2".to_string()),
            created_at: t1,
            updated_at: t1,
            paid_at: None,
            cancelled_at: None,
        },
        Order {
            id: 1,
            buyer_id: 1,
            order_number: "APM-20240502-000001".parse().unwrap(),
            subtotal: Cents::from_dollars(100),
            shipping_total: Cents::from_dollars(10),
            tax_total: Cents::from_dollars(8),
            total: Cents::from_dollars(118),
            status: OrderStatus::Paid,
            payment_status: PaymentStatus::Succeeded,
            shipping_address: Json(snapshot()),
            billing_address: Json(snapshot()),
            payment_intent_id: Some("pi_test_1".to_string()),
            created_at: t0,
            updated_at: t0,
            paid_at: Some(t0),
            cancelled_at: None,
        },
    ]
}
