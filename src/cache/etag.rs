//! Content fingerprints for `ETag` headers.

use serde::Serialize;
use sha2::{Digest, Sha256};

/// Mixed into every hash so the raw digest is not exposed. Not a secret.
pub const HASH_SALT: &str = "3141592654";

/// Quoted ETag for the JSON form of `value`.
pub fn compute_etag<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    let json = serde_json::to_vec(value)?;
    Ok(etag_for_json(&json))
}

/// Quoted ETag for already serialized JSON.
pub fn etag_for_json(json: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(json);
    hasher.update(HASH_SALT.as_bytes());
    format!("\"{}\"", hex::encode(hasher.finalize()))
}

/// Compare a raw `If-None-Match` value against a computed tag.
///
/// Bytes that are not ASCII never match, since tags are quoted hex.
pub fn etag_matches(if_none_match: &[u8], etag: &str) -> bool {
    if_none_match.trim_ascii().eq_ignore_ascii_case(etag.as_bytes())
}
