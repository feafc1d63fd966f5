use std::{sync::Arc, time::Duration};

use apm_common::{Cents, USD_CURRENCY_CODE};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

use crate::payments::{config::PaymentsConfig, data_objects::{PaymentIntent, RefundOutcome}, error::PaymentsError};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct PaymentProcessorApi {
    config: PaymentsConfig,
    client: Arc<Client>,
}

impl PaymentProcessorApi {
    pub fn new(config: PaymentsConfig) -> Result<Self, PaymentsError> {
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(&format!("Bearer {}", config.secret_key.reveal()))
            .map_err(|e| PaymentsError::Initialization(e.to_string()))?;
        headers.insert("Authorization", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| PaymentsError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, PaymentsError> {
        let url = format!("{}{path}", self.config.base_url);
        trace!("Sending payments query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| PaymentsError::ResponseError(e.to_string()))?;
        if response.status().is_success() {
            response.json::<T>().await.map_err(|e| PaymentsError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| PaymentsError::ResponseError(e.to_string()))?;
            Err(PaymentsError::QueryError { status, message })
        }
    }

    /// Creates a payment intent for the quoted total. The order number rides along as metadata so that support
    /// staff can find the order from the processor's dashboard.
    pub async fn create_payment_intent(
        &self,
        amount: Cents,
        order_number: &str,
    ) -> Result<PaymentIntent, PaymentsError> {
        let body = json!({
            "amount": amount.value(),
            "currency": USD_CURRENCY_CODE.to_lowercase(),
            "metadata": { "order_number": order_number },
        });
        debug!("Creating payment intent for {order_number} ({amount})");
        let intent = self.rest_query::<PaymentIntent, _>(Method::POST, "/payment_intents", Some(body)).await?;
        info!("Payment intent {} created for {order_number}", intent.id);
        Ok(intent)
    }

    /// Cancels a pending authorization. The engine-side cancellation happens when the processor's cancellation
    /// event comes back around through the webhook.
    pub async fn cancel_payment_intent(&self, intent_id: &str) -> Result<PaymentIntent, PaymentsError> {
        let path = format!("/payment_intents/{intent_id}/cancel");
        debug!("Cancelling payment intent {intent_id}");
        let intent = self.rest_query::<PaymentIntent, ()>(Method::POST, &path, None).await?;
        info!("Payment intent {intent_id} cancelled");
        Ok(intent)
    }

    /// Requests a refund against a settled charge.
    pub async fn create_refund(
        &self,
        charge_id: &str,
        amount: Cents,
        reason: &str,
    ) -> Result<RefundOutcome, PaymentsError> {
        let body = json!({
            "charge": charge_id,
            "amount": amount.value(),
            "metadata": { "reason": reason },
        });
        debug!("Requesting refund of {amount} against charge {charge_id}");
        let refund = self.rest_query::<RefundOutcome, _>(Method::POST, "/refunds", Some(body)).await?;
        info!("Refund {} accepted by the processor", refund.id);
        Ok(refund)
    }

    pub fn webhook_secret(&self) -> &apm_common::Secret<String> {
        &self.config.webhook_secret
    }
}
