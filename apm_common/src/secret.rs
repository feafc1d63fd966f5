//! A wrapper for configuration values that must never appear in logs.
//!
//! The marketplace config carries several sensitive strings: the payment processor's secret key, the shipping
//! aggregator's API token, the webhook signing secrets and the JWT signing key. The config structs holding them
//! get debug-printed at startup and in error paths, so every sensitive field is wrapped in a [`Secret`], which
//! renders as `****` for both `Debug` and `Display`. The inner value is only reachable through an explicit
//! [`Secret::reveal`] call at the point of use (signing a token, building an Authorization header).

use std::fmt;

#[derive(Clone, Default)]
pub struct Secret<T>
where T: Clone + Default
{
    value: T,
}

impl<T: Clone + Default> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { value }
    }

    /// Hands out the wrapped value. Call this where the secret is used, never where it might be logged.
    pub fn reveal(&self) -> &T {
        &self.value
    }
}

impl<T: Clone + Default> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}

impl<T: Clone + Default> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("****")
    }
}
