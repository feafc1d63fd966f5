use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentsError {
    #[error("Could not initialize client: {0}")]
    Initialization(String),
    #[error("Invalid REST response: {0}")]
    ResponseError(String),
    #[error("Could not deserialize JSON: {0}")]
    JsonError(String),
    #[error("Query failed. Error {status}. {message}")]
    QueryError { status: u16, message: String },
    #[error("Webhook signature header is malformed: {0}")]
    MalformedSignature(String),
    #[error("Webhook signature does not match the payload")]
    InvalidSignature,
    #[error("Webhook timestamp is outside the accepted tolerance")]
    StaleWebhook,
    #[error("Webhook payload is not a recognisable event: {0}")]
    MalformedEvent(String),
}
