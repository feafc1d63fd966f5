use apm_common::Secret;
use log::*;

#[derive(Debug, Clone)]
pub struct ShippingConfig {
    pub base_url: String,
    pub api_token: Secret<String>,
    /// Shared secret for authenticating carrier tracking webhooks.
    pub webhook_secret: Secret<String>,
}

impl Default for ShippingConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.shipping.example.com/v2".to_string(),
            api_token: Secret::new(String::default()),
            webhook_secret: Secret::new(String::default()),
        }
    }
}

impl ShippingConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("APM_SHIPPING_BASE_URL").unwrap_or_else(|_| {
            warn!("APM_SHIPPING_BASE_URL not set, using the public endpoint");
            "https://api.shipping.example.com/v2".to_string()
        });
        let api_token = Secret::new(std::env::var("APM_SHIPPING_API_TOKEN").unwrap_or_else(|_| {
            warn!("APM_SHIPPING_API_TOKEN not set, using (probably useless) default");
            "shippo_test_00000000".to_string()
        }));
        let webhook_secret = Secret::new(std::env::var("APM_SHIPPING_WEBHOOK_SECRET").unwrap_or_else(|_| {
            warn!("APM_SHIPPING_WEBHOOK_SECRET not set, using (probably useless) default");
            "track_whsec_00000000".to_string()
        }));
        Self { base_url, api_token, webhook_secret }
    }
}
