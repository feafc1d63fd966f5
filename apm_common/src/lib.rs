mod cents;
mod helpers;
pub mod op;
mod secret;

pub use cents::{Cents, CentsConversionError, USD_CURRENCY_CODE};
pub use helpers::parse_boolean_flag;
pub use secret::Secret;
