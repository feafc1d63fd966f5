//! Verification and parsing of payment-processor webhook deliveries.
//!
//! The processor signs every delivery with `t=<unix ts>,v1=<hex hmac>` over `"{t}.{raw body}"`. Verification is
//! constant-time and bounded by a timestamp tolerance so captured deliveries cannot be replayed much later. Events
//! that verify but describe something the marketplace does not act on come back as [`PaymentEvent::Ignored`]; the
//! route acknowledges them so the processor stops retrying.

use hmac::{Hmac, Mac};
use log::*;
use serde::Deserialize;
use sha2::Sha256;

use crate::payments::error::PaymentsError;

/// Maximum accepted age of a webhook delivery, in seconds.
pub const TIMESTAMP_TOLERANCE_SECS: i64 = 300;

type HmacSha256 = Hmac<Sha256>;

/// A payment event translated into the closed set of actions the marketplace takes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEvent {
    IntentSucceeded { intent_id: String, charge_id: Option<String> },
    IntentFailed { intent_id: String, failure_code: Option<String>, failure_message: Option<String> },
    IntentCancelled { intent_id: String },
    RefundUpdated { refund_id: String, status: String },
    ChargeRefunded { charge_id: String, fully_refunded: bool },
    /// A verified event of a type the marketplace does not handle. Acknowledged and dropped.
    Ignored { event_type: String },
}

/// Verifies the signature header against the raw body. `now` is a parameter so tests can pin the clock.
pub fn verify_signature(secret: &str, header: &str, body: &str, now: i64) -> Result<(), PaymentsError> {
    let mut timestamp: Option<i64> = None;
    let mut signature: Option<Vec<u8>> = None;
    for part in header.split(',') {
        match part.trim().split_once('=') {
            Some(("t", t)) => {
                timestamp =
                    Some(t.parse().map_err(|_| PaymentsError::MalformedSignature(format!("bad timestamp: {t}")))?)
            },
            Some(("v1", sig)) => {
                signature =
                    Some(hex::decode(sig).map_err(|_| PaymentsError::MalformedSignature("bad hex".to_string()))?)
            },
            _ => {},
        }
    }
    let timestamp = timestamp.ok_or_else(|| PaymentsError::MalformedSignature("missing timestamp".to_string()))?;
    let signature = signature.ok_or_else(|| PaymentsError::MalformedSignature("missing v1".to_string()))?;
    if (now - timestamp).abs() > TIMESTAMP_TOLERANCE_SECS {
        warn!("Webhook timestamp {timestamp} is outside tolerance (now {now})");
        return Err(PaymentsError::StaleWebhook);
    }
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|e| PaymentsError::MalformedSignature(e.to_string()))?;
    mac.update(format!("{timestamp}.{body}").as_bytes());
    mac.verify_slice(&signature).map_err(|_| PaymentsError::InvalidSignature)
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(rename = "type")]
    event_type: String,
    data: RawData,
}

#[derive(Deserialize)]
struct RawData {
    object: serde_json::Value,
}

/// Parses a verified payload into a [`PaymentEvent`].
pub fn parse_event(body: &str) -> Result<PaymentEvent, PaymentsError> {
    let raw: RawEvent = serde_json::from_str(body).map_err(|e| PaymentsError::MalformedEvent(e.to_string()))?;
    let object = &raw.data.object;
    let str_field = |key: &str| object.get(key).and_then(|v| v.as_str()).map(str::to_string);
    let require = |key: &str| {
        str_field(key).ok_or_else(|| PaymentsError::MalformedEvent(format!("{} missing {key}", raw.event_type)))
    };
    let event = match raw.event_type.as_str() {
        "payment_intent.succeeded" => {
            PaymentEvent::IntentSucceeded { intent_id: require("id")?, charge_id: str_field("latest_charge") }
        },
        "payment_intent.payment_failed" => {
            let error = object.get("last_payment_error");
            let err_field = |key: &str| {
                error.and_then(|e| e.get(key)).and_then(|v| v.as_str()).map(str::to_string)
            };
            PaymentEvent::IntentFailed {
                intent_id: require("id")?,
                failure_code: err_field("code"),
                failure_message: err_field("message"),
            }
        },
        "payment_intent.canceled" => PaymentEvent::IntentCancelled { intent_id: require("id")? },
        "refund.created" | "refund.updated" => {
            PaymentEvent::RefundUpdated { refund_id: require("id")?, status: require("status")? }
        },
        "charge.refunded" => {
            let fully_refunded = object.get("refunded").and_then(|v| v.as_bool()).unwrap_or(false);
            PaymentEvent::ChargeRefunded { charge_id: require("id")?, fully_refunded }
        },
        other => {
            debug!("Ignoring payment event of type {other}");
            PaymentEvent::Ignored { event_type: other.to_string() }
        },
    };
    Ok(event)
}
