//! Payment signature verification.
//!
//! The gateway signs `"<order_id>|<payment_id>"` with HMAC-SHA256 keyed by the
//! account secret and sends the lowercase hex digest back through the client.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

fn mac(secret: &str, order_id: &str, payment_id: &str) -> HmacSha256 {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    mac
}

/// Hex signature for an order/payment pair.
pub fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
    hex::encode(mac(secret, order_id, payment_id).finalize().into_bytes())
}

/// Constant-time check of a hex signature. Malformed hex never verifies.
pub fn verify_signature(secret: &str, order_id: &str, payment_id: &str, signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    mac(secret, order_id, payment_id)
        .verify_slice(&expected)
        .is_ok()
}
