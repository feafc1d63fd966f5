use apm_common::Secret;
use log::*;

#[derive(Debug, Clone)]
pub struct PaymentsConfig {
    pub base_url: String,
    pub secret_key: Secret<String>,
    /// Shared secret for verifying webhook event signatures.
    pub webhook_secret: Secret<String>,
}

impl Default for PaymentsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.payments.example.com/v1".to_string(),
            secret_key: Secret::new(String::default()),
            webhook_secret: Secret::new(String::default()),
        }
    }
}

impl PaymentsConfig {
    pub fn new_from_env_or_default() -> Self {
        let base_url = std::env::var("APM_PAYMENTS_BASE_URL").unwrap_or_else(|_| {
            warn!("APM_PAYMENTS_BASE_URL not set, using the public endpoint");
            "https://api.payments.example.com/v1".to_string()
        });
        let secret_key = Secret::new(std::env::var("APM_PAYMENTS_SECRET_KEY").unwrap_or_else(|_| {
            warn!("APM_PAYMENTS_SECRET_KEY not set, using (probably useless) default");
            "sk_test_00000000000000".to_string()
        }));
        let webhook_secret = Secret::new(std::env::var("APM_PAYMENTS_WEBHOOK_SECRET").unwrap_or_else(|_| {
            warn!("APM_PAYMENTS_WEBHOOK_SECRET not set, using (probably useless) default");
            "whsec_00000000000000".to_string()
        }));
        Self { base_url, secret_key, webhook_secret }
    }
}
