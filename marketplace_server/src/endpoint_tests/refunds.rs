use actix_web::web::{self, ServiceConfig};
use order_engine::{traits::MarketplaceError, RefundApi, REFUND_WINDOW_DAYS};
use provider_clients::{PaymentProcessorApi, PaymentsConfig};
use serde_json::json;

use super::helpers::{issue_token, post_request};
use crate::{auth::Role, endpoint_tests::mocks::MockRefundManager, routes::RequestRefundRoute};

#[actix_web::test]
async fn refund_requests_require_a_token() {
    let _ = env_logger::try_init().ok();
    let body = json!({ "order_item_id": 11, "reason": "arrived cracked" });
    let err = post_request("", "/refunds", body, configure).await.expect_err("Expected error");
    assert_eq!(err, "Authentication error. No access token provided");
}

#[actix_web::test]
async fn ineligible_refunds_are_rejected_before_the_processor_is_called() {
    let _ = env_logger::try_init().ok();
    let token = issue_token(1, vec![Role::Buyer]);
    let body = json!({ "order_item_id": 11, "reason": "changed my mind" });
    let err = post_request(&token, "/refunds", body, configure).await.expect_err("Expected error");
    assert!(err.contains(&format!("refund window of {REFUND_WINDOW_DAYS} days has expired")), "Unexpected error: {err}");
}

fn configure(cfg: &mut ServiceConfig) {
    let mut refunds = MockRefundManager::new();
    refunds.expect_validate_refund().returning(|_| Err(MarketplaceError::RefundWindowExpired(REFUND_WINDOW_DAYS)));
    // record_refund must never run when validation failed; no expectation is set for it.
    let api = RefundApi::new(refunds);
    let payments = PaymentProcessorApi::new(PaymentsConfig::default()).unwrap();
    cfg.service(RequestRefundRoute::<MockRefundManager>::new())
        .app_data(web::Data::new(api))
        .app_data(web::Data::new(payments));
}
