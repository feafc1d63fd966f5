use chrono::Utc;
use rand::Rng;

const SUFFIX_LEN: usize = 6;
const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Generates a unique, human-legible order number of the form `APM-20240715-K7Q2MC`.
///
/// Uniqueness comes from the date plus a random suffix, backed by a unique index on the orders table. Order numbers
/// are not sequential. The alphabet omits easily-confused characters (0/O, 1/I).
pub fn generate_order_number() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String =
        (0..SUFFIX_LEN).map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char).collect();
    format!("APM-{}-{suffix}", Utc::now().format("%Y%m%d"))
}
