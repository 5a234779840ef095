//! Request signing primitives.
//!
//! Each venue composes these into its own scheme in its `account` module:
//!
//! | Scheme | Primitive | Venues |
//! |---|---|---|
//! | Bearer token + device id | [`device_id`] | BigOne |
//! | HMAC-SHA256 over the query, hex | [`hmac_sha256_hex`] | Binance, OtcBTC |
//! | HMAC-SHA256 over `METHOD\nHOST\nPATH\nQUERY`, base64 | [`hmac_sha256_base64`] | Huobi |
//! | HMAC-SHA384 over a base64 JSON payload, hex | [`hmac_sha384_hex`] | Bitfinex |
//! | MD5 over `params&secret_key=...`, upper hex | [`md5_upper_hex`] | Okex |

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose, Engine as _};
use hmac::{Hmac, Mac};
use md5::{Digest, Md5};
use sha2::{Sha256, Sha384};

pub fn hmac_sha256_hex(secret: &str, message: &str) -> String {
    hex::encode(hmac_sha256(secret, message))
}

pub fn hmac_sha256_base64(secret: &str, message: &str) -> String {
    general_purpose::STANDARD.encode(hmac_sha256(secret, message))
}

pub fn hmac_sha384_hex(secret: &str, message: &str) -> String {
    let mut mac = match Hmac::<Sha384>::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("HMAC initialization failed: {}", e);
            return String::new();
        }
    };
    mac.update(message.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

fn hmac_sha256(secret: &str, message: &str) -> Vec<u8> {
    let mut mac = match Hmac::<Sha256>::new_from_slice(secret.as_bytes()) {
        Ok(m) => m,
        Err(e) => {
            tracing::error!("HMAC initialization failed: {}", e);
            return Vec::new();
        }
    };
    mac.update(message.as_bytes());
    mac.finalize().into_bytes().to_vec()
}

/// Upper-case hex MD5 digest.
pub fn md5_upper_hex(message: &str) -> String {
    hex::encode_upper(Md5::digest(message.as_bytes()))
}

/// A random v4 UUID, used as a per-instance device identifier.
pub fn device_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Current Unix time in milliseconds.
pub fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_else(|e| {
            tracing::error!("System time error: {}", e);
            0
        })
}

static LAST_NONCE: AtomicU64 = AtomicU64::new(0);

/// Process-wide nonce derived from the wall clock, strictly increasing even
/// when called twice within one millisecond.
pub fn next_nonce() -> u64 {
    let now = now_millis();
    let mut prev = LAST_NONCE.load(Ordering::Relaxed);
    loop {
        let next = now.max(prev + 1);
        match LAST_NONCE.compare_exchange_weak(prev, next, Ordering::AcqRel, Ordering::Relaxed) {
            Ok(_) => return next,
            Err(actual) => prev = actual,
        }
    }
}

/// Form-encodes parameters with keys in ascending order.
pub fn encode_params(params: &BTreeMap<String, String>) -> String {
    serde_urlencoded::to_string(params).unwrap_or_else(|e| {
        tracing::error!("Failed to encode query parameters: {}", e);
        String::new()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ------------------------------------------------------------------------
    // Digests
    // ------------------------------------------------------------------------

    #[test]
    fn test_hmac_sha256_hex_known_vector() {
        assert_eq!(
            hmac_sha256_hex("secret", "symbol=BTCUSDT&timestamp=1"),
            "ef9d3d77a34d9a13a21a4c2d7f3e8cb091888a74ca62b5b62f430e78eded95ba"
        );
    }

    #[test]
    fn test_hmac_sha256_base64_known_vector() {
        assert_eq!(
            hmac_sha256_base64("key", "The quick brown fox jumps over the lazy dog"),
            "97yD9DBThCSxMpjmqm+xQ+9NWaFJRhdZl0edvC0aPNg="
        );
    }

    #[test]
    fn test_hmac_sha384_hex_known_vector() {
        assert_eq!(
            hmac_sha384_hex("key", "The quick brown fox jumps over the lazy dog"),
            "d7f4727e2c0b39ae0f1e40cc96f60242d5b7801841cea6fc592c5d3e1ae50700582a96cf35e1e554995fe4e03381c237"
        );
    }

    #[test]
    fn test_md5_upper_hex_known_vector() {
        assert_eq!(
            md5_upper_hex("The quick brown fox jumps over the lazy dog"),
            "9E107D9D372BB6826BD81D3542A419D6"
        );
    }

    #[test]
    fn test_signatures_are_deterministic_and_sensitive() {
        let a = hmac_sha256_hex("secret", "a=1&b=2");
        assert_eq!(a, hmac_sha256_hex("secret", "a=1&b=2"));
        assert_ne!(a, hmac_sha256_hex("secret", "a=1&b=3"));
        assert_ne!(a, hmac_sha256_hex("secreT", "a=1&b=2"));
        assert_ne!(
            hmac_sha384_hex("secret", "payload"),
            hmac_sha384_hex("secret", "payloae")
        );
        assert_ne!(md5_upper_hex("a=1"), md5_upper_hex("a=2"));
    }

    // ------------------------------------------------------------------------
    // Nonces & identifiers
    // ------------------------------------------------------------------------

    #[test]
    fn test_nonce_strictly_increasing() {
        let mut last = next_nonce();
        for _ in 0..1000 {
            let n = next_nonce();
            assert!(n > last);
            last = n;
        }
    }

    #[test]
    fn test_device_id_is_fresh_uuid() {
        let a = device_id();
        let b = device_id();
        assert_eq!(a.len(), 36);
        assert_ne!(a, b);
    }

    #[test]
    fn test_encode_params_sorted() {
        let mut params = BTreeMap::new();
        params.insert("timestamp".to_string(), "1".to_string());
        params.insert("symbol".to_string(), "BTC USDT".to_string());
        params.insert("recvWindow".to_string(), "5000".to_string());
        assert_eq!(
            encode_params(&params),
            "recvWindow=5000&symbol=BTC+USDT&timestamp=1"
        );
    }
}
