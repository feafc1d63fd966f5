//! Webhook handlers for the two providers.
//!
//! Both providers deliver at-least-once and out of order, so these handlers verify, translate, and hand off to the
//! engine's idempotent reconciliation. Replayed deliveries are acknowledged with a 200 like any other; only a
//! genuine processing failure returns a 5xx so the provider retries.
//!
//! The payment webhook is verified in the handler itself (the signature scheme covers a timestamp as well as the
//! body). The carrier webhook is a plain body HMAC and is verified by
//! [`crate::middleware::HmacMiddlewareFactory`] before the handler runs.

use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::*;
use order_engine::{
    db_types::{RefundStatus, ShipmentStatus},
    order_objects::TrackingUpdate,
    traits::{PaymentReconciliation, ShipmentManagement},
    FulfillmentApi,
    PaymentEventApi,
};
use provider_clients::{
    payments::webhook::{parse_event, verify_signature},
    shipping::TrackingCheckpoint,
    PaymentEvent,
    PaymentProcessorApi,
    TrackingStatus,
};
use serde_json::json;

use crate::{data_objects::CarrierWebhookPayload, errors::ServerError, route};

/// Header carrying the payment processor's event signature.
pub const PAYMENT_SIGNATURE_HEADER: &str = "payment-signature";
/// Header carrying the shipping aggregator's body HMAC.
pub const CARRIER_HMAC_HEADER: &str = "x-carrier-hmac-sha256";

//-------------------------------------   Payment processor events  -------------------------------------------------

route!(payment_webhook => Post "/payments" impl PaymentReconciliation);
/// Route handler for payment processor events.
///
/// The raw body is needed twice (signature verification covers the exact bytes) so the payload is taken as bytes
/// and parsed manually after the signature checks out. Verified events of types the marketplace does not act on
/// are acknowledged and dropped.
pub async fn payment_webhook<B: PaymentReconciliation>(
    req: HttpRequest,
    body: web::Bytes,
    api: web::Data<PaymentEventApi<B>>,
    payments: web::Data<PaymentProcessorApi>,
) -> Result<HttpResponse, ServerError> {
    trace!("💻️ Received payment processor event");
    let signature = req
        .headers()
        .get(PAYMENT_SIGNATURE_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ServerError::InvalidSignature("Missing signature header".to_string()))?;
    let body = std::str::from_utf8(&body)
        .map_err(|_| ServerError::CouldNotDeserializePayload("Payload is not valid UTF-8".to_string()))?;
    verify_signature(payments.webhook_secret().reveal(), signature, body, Utc::now().timestamp())
        .map_err(|e| ServerError::InvalidSignature(e.to_string()))?;
    let event = parse_event(body).map_err(|e| ServerError::CouldNotDeserializePayload(e.to_string()))?;
    match event {
        PaymentEvent::IntentSucceeded { intent_id, charge_id } => {
            api.payment_succeeded(&intent_id, charge_id.as_deref()).await?;
        },
        PaymentEvent::IntentFailed { intent_id, failure_code, failure_message } => {
            api.payment_failed(&intent_id, failure_code.as_deref(), failure_message.as_deref()).await?;
        },
        PaymentEvent::IntentCancelled { intent_id } => {
            api.payment_cancelled(&intent_id).await?;
        },
        PaymentEvent::RefundUpdated { refund_id, status } => match refund_status_from_processor(&status) {
            Some(status) => api.refund_updated(&refund_id, status).await?,
            None => debug!("💻️ Ignoring refund {refund_id} update with transient status '{status}'"),
        },
        PaymentEvent::ChargeRefunded { charge_id, fully_refunded } => {
            api.charge_refunded(&charge_id, fully_refunded).await?;
        },
        PaymentEvent::Ignored { event_type } => {
            debug!("💻️ Acknowledging unhandled payment event type '{event_type}'");
        },
    }
    Ok(HttpResponse::Ok().json(json!({ "received": true })))
}

/// Maps the processor's refund status string into the engine's vocabulary. Transient statuses the engine does not
/// track come back as `None` and are acknowledged without action; the terminal status will arrive later.
fn refund_status_from_processor(status: &str) -> Option<RefundStatus> {
    match status {
        "pending" | "requires_action" => Some(RefundStatus::Pending),
        "succeeded" => Some(RefundStatus::Succeeded),
        "failed" | "canceled" => Some(RefundStatus::Failed),
        _ => None,
    }
}

//-------------------------------------   Carrier tracking events  --------------------------------------------------

route!(shipping_webhook => Post "/shipping" impl ShipmentManagement);
/// Route handler for carrier tracking events.
///
/// Events for tracking numbers the marketplace does not know (other tenants of the aggregator account, or test
/// deliveries) are acknowledged and dropped, as are vendor statuses outside the recognised set. The aggregator
/// only stops retrying on a 2xx.
pub async fn shipping_webhook<B: ShipmentManagement>(
    body: web::Json<CarrierWebhookPayload>,
    api: web::Data<FulfillmentApi<B>>,
) -> Result<HttpResponse, ServerError> {
    let payload = body.into_inner();
    trace!("💻️ Received carrier event '{}' for {}", payload.event, payload.data.tracking_number);
    if payload.event != "track_updated" {
        debug!("💻️ Acknowledging unhandled carrier event type '{}'", payload.event);
        return Ok(HttpResponse::Ok().json(json!({ "received": true })));
    }
    let Some(checkpoint) = payload.data.tracking_status else {
        debug!("💻️ Carrier event for {} carries no checkpoint", payload.data.tracking_number);
        return Ok(HttpResponse::Ok().json(json!({ "received": true })));
    };
    match tracking_update_from_checkpoint(&payload.data.tracking_number, &checkpoint) {
        Some(update) => {
            if api.apply_tracking_update(update).await?.is_none() {
                warn!("💻️ Carrier event for unknown tracking number {}", payload.data.tracking_number);
            }
        },
        None => {
            warn!(
                "💻️ Unrecognised carrier status '{}' for {}. Acknowledging without action.",
                checkpoint.status, payload.data.tracking_number
            );
        },
    }
    Ok(HttpResponse::Ok().json(json!({ "received": true })))
}

/// Translates a vendor tracking checkpoint into an engine update. `None` means the vendor status is outside the
/// recognised set and the event should be dropped.
pub fn tracking_update_from_checkpoint(tracking_number: &str, checkpoint: &TrackingCheckpoint) -> Option<TrackingUpdate> {
    let status = match TrackingStatus::from_vendor(&checkpoint.status) {
        TrackingStatus::PreTransit => ShipmentStatus::LabelCreated,
        TrackingStatus::InTransit => ShipmentStatus::InTransit,
        TrackingStatus::Delivered => ShipmentStatus::Delivered,
        TrackingStatus::Failure => ShipmentStatus::Failed,
        TrackingStatus::Returned => ShipmentStatus::Returned,
        TrackingStatus::Unknown => return None,
    };
    Some(TrackingUpdate {
        tracking_number: tracking_number.to_string(),
        status,
        detail: checkpoint.status_details.clone(),
        location: checkpoint.location.clone(),
        occurred_at: checkpoint.status_date,
    })
}
