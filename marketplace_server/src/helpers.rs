use apm_common::Secret;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Base64-encoded HMAC-SHA256 over `data`, as sent by the shipping aggregator in its webhook signature header.
pub fn calculate_hmac(secret: &Secret<String>, data: &[u8]) -> String {
    let mut mac = HmacSha256::new_from_slice(secret.reveal().as_bytes()).expect("HMAC can take key of any size");
    mac.update(data);
    let result = mac.finalize().into_bytes();
    base64::encode(result)
}
