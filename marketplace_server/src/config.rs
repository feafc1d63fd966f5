//! # Server configuration
//!
//! Everything is read from the environment once at startup. Missing values fall back to documented defaults with a
//! warning, so a bare `marketplace_server` always starts, just not usefully against real providers.
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `APM_HOST` | Interface to bind | `127.0.0.1` |
//! | `APM_PORT` | Port to bind | `4460` |
//! | `APM_DATABASE_URL` | SQLite database URL | `sqlite://data/apm_store.db` |
//! | `APM_PUBLIC_URL` | Public base URL of this deployment, used for webhook callbacks | `http://localhost:4460` |
//! | `APM_JWT_SECRET` | HS256 signing secret for access tokens | random per boot |
//! | `APM_SHIPPING_WEBHOOK_HMAC_CHECKS` | Verify carrier webhook signatures | `true` |
//!
//! The payment processor and shipping aggregator read their own `APM_PAYMENTS_*` and `APM_SHIPPING_*` variables;
//! see the `provider_clients` crate.

use apm_common::{parse_boolean_flag, Secret};
use log::*;
use provider_clients::{PaymentsConfig, ShippingConfig};
use rand::distributions::{Alphanumeric, DistString};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Public base URL of this deployment. The carrier aggregator posts tracking events to
    /// `{public_url}/webhook/shipping`, so this must be reachable from the outside in production.
    pub public_url: String,
    pub auth: AuthConfig,
    pub payments: PaymentsConfig,
    pub shipping: ShippingConfig,
    /// When false, carrier webhook signatures are not checked. Only ever disable this in local development.
    pub shipping_webhook_hmac_checks: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4460,
            database_url: String::default(),
            public_url: "http://localhost:4460".to_string(),
            auth: AuthConfig::default(),
            payments: PaymentsConfig::default(),
            shipping: ShippingConfig::default(),
            shipping_webhook_hmac_checks: true,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = std::env::var("APM_HOST").ok().unwrap_or_else(|| {
            error!("🪛️ APM_HOST is not set. Using the default, 127.0.0.1");
            "127.0.0.1".to_string()
        });
        let port = std::env::var("APM_PORT")
            .map(|s| {
                s.parse::<u16>().unwrap_or_else(|e| {
                    error!("🪛️ {s} is not a valid port for APM_PORT. {e} Using the default, 4460");
                    4460
                })
            })
            .unwrap_or_else(|_| {
                error!("🪛️ APM_PORT is not set. Using the default, 4460");
                4460
            });
        let database_url = std::env::var("APM_DATABASE_URL").unwrap_or_else(|_| {
            error!("🪛️ APM_DATABASE_URL is not set. Using the default, sqlite://data/apm_store.db");
            "sqlite://data/apm_store.db".to_string()
        });
        let public_url = std::env::var("APM_PUBLIC_URL").unwrap_or_else(|_| {
            error!(
                "🪛️ APM_PUBLIC_URL is not set. Using the default, http://localhost:4460. Carrier tracking \
                 webhooks cannot reach this server until it is set to a publicly routable URL."
            );
            "http://localhost:4460".to_string()
        });
        let shipping_webhook_hmac_checks =
            parse_boolean_flag(std::env::var("APM_SHIPPING_WEBHOOK_HMAC_CHECKS").ok(), true);
        if !shipping_webhook_hmac_checks {
            warn!(
                "🪛️ Carrier webhook HMAC checks are disabled. This is only meant for local development. If you see \
                 this message in production, shut the server down and investigate IMMEDIATELY."
            );
        }
        Self {
            host,
            port,
            database_url,
            public_url,
            auth: AuthConfig::from_env_or_default(),
            payments: PaymentsConfig::new_from_env_or_default(),
            shipping: ShippingConfig::new_from_env_or_default(),
            shipping_webhook_hmac_checks,
        }
    }
}

/// The callback URL handed to the carrier aggregator when registering for tracking events. Built once from
/// [`ServerConfig::public_url`] and injected as app data so the label route can register it after a purchase.
#[derive(Debug, Clone)]
pub struct TrackingWebhookUrl(pub String);

impl TrackingWebhookUrl {
    pub fn new(public_url: &str) -> Self {
        Self(format!("{}/webhook/shipping", public_url.trim_end_matches('/')))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// HS256 secret used to sign and verify access tokens.
    pub jwt_secret: Secret<String>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: Secret::new(String::default()) }
    }
}

impl AuthConfig {
    pub fn from_env_or_default() -> Self {
        match std::env::var("APM_JWT_SECRET") {
            Ok(secret) if !secret.trim().is_empty() => Self { jwt_secret: Secret::new(secret) },
            _ => {
                let secret = Alphanumeric.sample_string(&mut rand::thread_rng(), 48);
                error!(
                    "🪛️ APM_JWT_SECRET is not set. A random secret has been generated for this boot, so every \
                     token dies with the process. Set APM_JWT_SECRET to a long random string to issue stable tokens."
                );
                Self { jwt_secret: Secret::new(secret) }
            },
        }
    }
}
