//! Webhook signature scheme: HMAC-SHA256 over `"{ts};{body}"`, transported in
//! a `ts=<unix>;h1=<hex>` header.

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Computes the hex digest the provider attaches to a payload. The same
/// computation backs [`verify`] and the provider simulation in tests.
///
pub fn sign(secret: &str, timestamp: &str, body: &str) -> String {
    hex::encode(digest(secret, timestamp, body))
}

/// Verifies a provider signature header against the raw request body.
///
/// Fails closed: a header missing either field, a body that is not valid
/// UTF-8, or a digest that is not valid hex all return `false`. Nothing here
/// raises. The digest comparison is constant-time.
///
pub fn verify(secret: &str, header: &str, body: &[u8]) -> bool {
    let Some((timestamp, digest_hex)) = parse_header(header) else {
        return false;
    };
    // The body is hashed in its exact received byte form, before any JSON
    // parsing happens.
    let Ok(body) = std::str::from_utf8(body) else {
        return false;
    };
    let Ok(received) = hex::decode(digest_hex) else {
        return false;
    };

    let expected = digest(secret, timestamp, body);

    expected.as_slice().ct_eq(&received).into()
}

fn digest(secret: &str, timestamp: &str, body: &str) -> Vec<u8> {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(timestamp.as_bytes());
    mac.update(b";");
    mac.update(body.as_bytes());

    mac.finalize().into_bytes().to_vec()
}

fn parse_header(header: &str) -> Option<(&str, &str)> {
    let mut timestamp = None;
    let mut digest = None;

    for part in header.split(';') {
        match part.split_once('=') {
            Some(("ts", value)) => timestamp = Some(value),
            Some(("h1", value)) => digest = Some(value),
            _ => {}
        }
    }

    Some((timestamp?, digest?))
}

// -----------------------------------------------------------------------------
