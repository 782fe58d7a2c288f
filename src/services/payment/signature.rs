use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::services::hashing::constant_time_eq;

type HmacSha256 = Hmac<Sha256>;

/// Hex HMAC-SHA256 of `order_id|payment_id`, the processor's callback signature.
pub fn generate_payment_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    let message = format!("{}|{}", order_id, payment_id);

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .expect("HMAC can take key of any size");
    mac.update(message.as_bytes());

    hex::encode(mac.finalize().into_bytes())
}

/// Exact comparison against the expected signature; any mutated input fails.
pub fn verify_payment_signature(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> bool {
    let expected = generate_payment_signature(secret, order_id, payment_id);
    constant_time_eq(signature.as_bytes(), expected.as_bytes())
}
