use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use log::*;
use order_engine::MarketplaceError;
use provider_clients::{PaymentsError, ShippingError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred in the order engine. {0}")]
    BackendError(#[from] MarketplaceError),
    #[error("The payment processor returned an error. {0}")]
    PaymentProviderError(#[from] PaymentsError),
    #[error("The shipping aggregator returned an error. {0}")]
    ShippingProviderError(#[from] ShippingError),
    #[error("Could not deserialize the request payload. {0}")]
    CouldNotDeserializePayload(String),
    #[error("The webhook signature did not verify. {0}")]
    InvalidSignature(String),
    #[error("Authentication error. {0}")]
    AuthenticationError(String),
    #[error("You do not have permission to carry out that request. {0}")]
    InsufficientPermissions(String),
    #[error("IO error: {0}")]
    IOError(#[from] std::io::Error),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::BackendError(e) => backend_status_code(e),
            ServerError::PaymentProviderError(_) => StatusCode::BAD_GATEWAY,
            ServerError::ShippingProviderError(_) => StatusCode::BAD_GATEWAY,
            ServerError::CouldNotDeserializePayload(_) => StatusCode::BAD_REQUEST,
            ServerError::InvalidSignature(_) => StatusCode::BAD_REQUEST,
            ServerError::AuthenticationError(_) => StatusCode::UNAUTHORIZED,
            ServerError::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            ServerError::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("💻️ {self}");
        } else {
            debug!("💻️ Request rejected: {self}");
        }
        HttpResponse::build(status).json(json!({ "error": self.to_string() }))
    }
}

/// Maps engine errors onto response codes. The engine reports "not yours" as "not found" for buyer-scoped lookups,
/// so existence is never leaked; only explicit ownership violations come back as 403.
fn backend_status_code(e: &MarketplaceError) -> StatusCode {
    use MarketplaceError::*;
    match e {
        DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        PartNotFound(_) | AddressNotFound(_) | OrderNotFound(_) | OrderItemNotFound(_) | ShipmentNotFound(_) => {
            StatusCode::NOT_FOUND
        },
        AddressNotOwned(_) | NotItemSeller(_) => StatusCode::FORBIDDEN,
        _ => StatusCode::BAD_REQUEST,
    }
}
