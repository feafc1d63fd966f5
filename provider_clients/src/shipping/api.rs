use std::{sync::Arc, time::Duration};

use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;

use crate::shipping::{
    config::ShippingConfig,
    data_objects::{AddressPayload, LabelPurchase, ParcelPayload, ShippingRate, TrackingInfo},
    error::ShippingError,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Clone)]
pub struct CarrierApi {
    config: ShippingConfig,
    client: Arc<Client>,
}

impl CarrierApi {
    pub fn new(config: ShippingConfig) -> Result<Self, ShippingError> {
        let mut headers = HeaderMap::with_capacity(2);
        let val = HeaderValue::from_str(&format!("ShippoToken {}", config.api_token.reveal()))
            .map_err(|e| ShippingError::Initialization(e.to_string()))?;
        headers.insert("Authorization", val);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ShippingError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, ShippingError> {
        let url = format!("{}{path}", self.config.base_url);
        trace!("Sending shipping query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| ShippingError::ResponseError(e.to_string()))?;
        if response.status().is_success() {
            response.json::<T>().await.map_err(|e| ShippingError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ShippingError::ResponseError(e.to_string()))?;
            Err(ShippingError::QueryError { status, message })
        }
    }

    /// Asks the aggregator to validate and normalise an address. Returns the corrected form.
    pub async fn validate_address(&self, address: &AddressPayload) -> Result<AddressPayload, ShippingError> {
        #[derive(Deserialize)]
        struct Validation {
            is_valid: bool,
            #[serde(default)]
            messages: Vec<String>,
            address: AddressPayload,
        }
        let result = self.rest_query::<Validation, _>(Method::POST, "/addresses/validate", Some(address)).await?;
        if !result.is_valid {
            return Err(ShippingError::InvalidAddress(result.messages.join("; ")));
        }
        Ok(result.address)
    }

    /// Live rates for one parcel between two addresses. Each rate's `rate_id` is purchasable until it expires.
    pub async fn fetch_rates(
        &self,
        from: &AddressPayload,
        to: &AddressPayload,
        parcel: &ParcelPayload,
    ) -> Result<Vec<ShippingRate>, ShippingError> {
        #[derive(Deserialize)]
        struct RateResponse {
            rates: Vec<ShippingRate>,
        }
        let body = json!({ "address_from": from, "address_to": to, "parcel": parcel, "async": false });
        debug!("Requesting rates for a {}g parcel", parcel.weight_grams);
        let result = self.rest_query::<RateResponse, _>(Method::POST, "/shipments", Some(body)).await?;
        info!("Received {} rate(s)", result.rates.len());
        Ok(result.rates)
    }

    /// Purchases the label for a previously quoted rate.
    pub async fn purchase_label(&self, rate_id: &str) -> Result<LabelPurchase, ShippingError> {
        let body = json!({ "rate": rate_id, "label_file_type": "PDF", "async": false });
        debug!("Purchasing label for rate {rate_id}");
        let label = self.rest_query::<LabelPurchase, _>(Method::POST, "/transactions", Some(body)).await?;
        if label.status.eq_ignore_ascii_case("error") {
            return Err(ShippingError::RateExpired(rate_id.to_string()));
        }
        info!("Label purchased: {} ({})", label.transaction_id, label.tracking_number);
        Ok(label)
    }

    /// Polls the current tracking state. The webhook is the primary channel; this backs a manual refresh.
    pub async fn get_tracking(&self, carrier: &str, tracking_number: &str) -> Result<TrackingInfo, ShippingError> {
        let path = format!("/tracks/{carrier}/{tracking_number}");
        self.rest_query::<TrackingInfo, ()>(Method::GET, &path, None).await
    }

    /// Registers this deployment's tracking webhook with the aggregator.
    pub async fn register_tracking_webhook(&self, callback_url: &str) -> Result<(), ShippingError> {
        let body = json!({ "url": callback_url, "event": "track_updated", "active": true });
        self.rest_query::<serde_json::Value, _>(Method::POST, "/webhooks", Some(body)).await?;
        info!("Tracking webhook registered at {callback_url}");
        Ok(())
    }

    pub fn webhook_secret(&self) -> &apm_common::Secret<String> {
        &self.config.webhook_secret
    }
}
