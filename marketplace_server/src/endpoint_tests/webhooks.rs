use actix_web::{http::StatusCode, test::TestRequest, web, web::ServiceConfig};
use apm_common::Secret;
use chrono::Utc;
use hmac::{Hmac, Mac};
use order_engine::{db_types::ShipmentStatus, FulfillmentApi, PaymentEventApi};
use provider_clients::{PaymentProcessorApi, PaymentsConfig};
use serde_json::json;
use sha2::Sha256;

use super::helpers::send_request;
use crate::{
    endpoint_tests::mocks::{MockPaymentReconciler, MockShipmentManager},
    webhook_routes::{PaymentWebhookRoute, ShippingWebhookRoute, PAYMENT_SIGNATURE_HEADER},
};

const WEBHOOK_SECRET: &str = "whsec_endpoint_test";

/// Signs a body the way the processor does: hex HMAC-SHA256 over `"{t}.{body}"`.
fn sign(body: &str, timestamp: i64) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(format!("{timestamp}.{body}").as_bytes());
    format!("t={timestamp},v1={}", hex::encode(mac.finalize().into_bytes()))
}

fn succeeded_event() -> String {
    json!({
        "type": "payment_intent.succeeded",
        "data": { "object": { "id": "pi_endpoint_1", "latest_charge": "ch_endpoint_1" } }
    })
    .to_string()
}

#[actix_web::test]
async fn a_correctly_signed_payment_event_is_applied_and_acknowledged() {
    let _ = env_logger::try_init().ok();
    let body = succeeded_event();
    let signature = sign(&body, Utc::now().timestamp());
    let req = TestRequest::post()
        .uri("/payments")
        .insert_header((PAYMENT_SIGNATURE_HEADER, signature))
        .set_payload(body);
    let (status, body) = send_request(req, configure_payments).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"received":true}"#);
}

#[actix_web::test]
async fn a_tampered_payment_event_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = succeeded_event();
    let signature = sign(&body.replace("pi_endpoint_1", "pi_attacker"), Utc::now().timestamp());
    let req = TestRequest::post()
        .uri("/payments")
        .insert_header((PAYMENT_SIGNATURE_HEADER, signature))
        .set_payload(body);
    let err = send_request(req, configure_payments).await.expect_err("Expected error");
    assert!(err.starts_with("The webhook signature did not verify."), "Unexpected error: {err}");
}

#[actix_web::test]
async fn a_stale_payment_event_is_rejected() {
    let _ = env_logger::try_init().ok();
    let body = succeeded_event();
    let signature = sign(&body, Utc::now().timestamp() - 4000);
    let req = TestRequest::post()
        .uri("/payments")
        .insert_header((PAYMENT_SIGNATURE_HEADER, signature))
        .set_payload(body);
    let err = send_request(req, configure_payments).await.expect_err("Expected error");
    assert!(err.contains("outside the accepted tolerance"), "Unexpected error: {err}");
}

#[actix_web::test]
async fn an_unsigned_payment_event_is_rejected() {
    let _ = env_logger::try_init().ok();
    let req = TestRequest::post().uri("/payments").set_payload(succeeded_event());
    let err = send_request(req, configure_payments).await.expect_err("Expected error");
    assert!(err.contains("Missing signature header"), "Unexpected error: {err}");
}

fn configure_payments(cfg: &mut ServiceConfig) {
    let mut reconciler = MockPaymentReconciler::new();
    reconciler
        .expect_apply_payment_succeeded()
        .withf(|intent, charge| intent == "pi_endpoint_1" && charge == &Some("ch_endpoint_1"))
        .returning(|_, _| Ok(None));
    let api = PaymentEventApi::new(reconciler);
    let config = PaymentsConfig { webhook_secret: Secret::new(WEBHOOK_SECRET.to_string()), ..Default::default() };
    let payments = PaymentProcessorApi::new(config).unwrap();
    cfg.service(PaymentWebhookRoute::<MockPaymentReconciler>::new())
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(payments));
}

//-------------------------------------   Carrier tracking events  --------------------------------------------------

#[actix_web::test]
async fn carrier_checkpoints_are_translated_and_applied() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "event": "track_updated",
        "data": {
            "carrier": "usps",
            "tracking_number": "9400100000000000000001",
            "tracking_status": {
                "status": "TRANSIT",
                "status_details": "Departed facility",
                "location": "Chicago IL",
                "status_date": "2024-06-02T08:00:00Z"
            }
        }
    });
    let req = TestRequest::post().uri("/shipping").set_json(body);
    let (status, body) = send_request(req, configure_shipping).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"{"received":true}"#);
}

#[actix_web::test]
async fn unhandled_carrier_event_types_are_acknowledged_without_action() {
    let _ = env_logger::try_init().ok();
    let body = json!({
        "event": "batch_created",
        "data": { "carrier": "usps", "tracking_number": "9400100000000000000001", "tracking_status": null }
    });
    let req = TestRequest::post().uri("/shipping").set_json(body);
    let (status, _) = send_request(req, configure_shipping).await.expect("Request failed");
    assert_eq!(status, StatusCode::OK);
}

fn configure_shipping(cfg: &mut ServiceConfig) {
    let mut shipments = MockShipmentManager::new();
    shipments
        .expect_apply_tracking_update()
        .withf(|update| {
            update.tracking_number == "9400100000000000000001" && update.status == ShipmentStatus::InTransit
        })
        .returning(|_| Ok(None));
    let api = FulfillmentApi::new(shipments);
    cfg.service(ShippingWebhookRoute::<MockShipmentManager>::new()).app_data(web::Data::new(api));
}
