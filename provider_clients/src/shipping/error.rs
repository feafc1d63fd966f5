use thiserror::Error;

#[derive(Debug, Error)]
pub enum ShippingError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST response: {0}")]
    ResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("The aggregator rejected the address: {0}")]
    InvalidAddress(String),
    #[error("Rate {0} is no longer purchasable")]
    RateExpired(String),
}
