//! Access-token handling.
//!
//! Tokens are HS256 JWTs signed with `APM_JWT_SECRET`. The claims carry the marketplace user id and the user's
//! roles; handlers extract [`JwtClaims`] as a request parameter and the extractor rejects the request with a 401
//! before the handler body runs when the token is missing, malformed, expired, or signed with the wrong key.

use std::{
    fmt::Display,
    future::{ready, Ready},
};

use actix_web::{dev::Payload, http::header::AUTHORIZATION, web, FromRequest, HttpRequest};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::*;
use serde::{Deserialize, Serialize};

use crate::{config::AuthConfig, errors::ServerError};

/// Tokens are valid for a day. There is no refresh flow; clients log in again.
pub const TOKEN_VALIDITY_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Buyer,
    Seller,
    Admin,
}

impl Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Buyer => "buyer",
            Role::Seller => "seller",
            Role::Admin => "admin",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtClaims {
    pub user_id: i64,
    pub roles: Vec<Role>,
    /// Expiry as a unix timestamp. Checked by the JWT library on decode.
    pub exp: i64,
}

impl JwtClaims {
    pub fn has_role(&self, role: Role) -> bool {
        self.roles.contains(&role) || self.roles.contains(&Role::Admin)
    }

    /// Admin satisfies every role requirement.
    pub fn require_role(&self, role: Role) -> Result<(), ServerError> {
        if self.has_role(role) {
            Ok(())
        } else {
            Err(ServerError::InsufficientPermissions(format!("The {role} role is required for this endpoint")))
        }
    }
}

/// Signs and verifies access tokens. One instance is shared as app data.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl TokenIssuer {
    pub fn new(config: &AuthConfig) -> Self {
        let secret = config.jwt_secret.reveal().as_bytes();
        Self { encoding_key: EncodingKey::from_secret(secret), decoding_key: DecodingKey::from_secret(secret) }
    }

    pub fn issue(&self, user_id: i64, roles: Vec<Role>) -> Result<String, ServerError> {
        let exp = (Utc::now() + Duration::hours(TOKEN_VALIDITY_HOURS)).timestamp();
        let claims = JwtClaims { user_id, roles, exp };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ServerError::InitializeError(format!("Could not sign access token. {e}")))
    }

    pub fn decode(&self, token: &str) -> Result<JwtClaims, ServerError> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<JwtClaims>(token, &self.decoding_key, &validation)
            .map(|data| data.claims)
            .map_err(|e| ServerError::AuthenticationError(format!("Invalid access token. {e}")))
    }
}

impl FromRequest for JwtClaims {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let result = claims_from_request(req);
        if let Err(e) = &result {
            debug!("🔐️ Rejecting request to {}: {e}", req.path());
        }
        ready(result)
    }
}

fn claims_from_request(req: &HttpRequest) -> Result<JwtClaims, ServerError> {
    let issuer = req
        .app_data::<web::Data<TokenIssuer>>()
        .ok_or_else(|| ServerError::InitializeError("TokenIssuer is not configured as app data".to_string()))?;
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| ServerError::AuthenticationError("No access token provided".to_string()))?
        .to_str()
        .map_err(|_| ServerError::AuthenticationError("Authorization header is not valid UTF-8".to_string()))?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ServerError::AuthenticationError("Expected a bearer token".to_string()))?;
    issuer.decode(token.trim())
}
