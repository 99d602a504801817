//! Domain Services
//!
//! Content fingerprinting for deduplication.

use crate::domain::value_objects::{Fingerprint, PairKey};
use platform::crypto::sha256_hex;

/// Stable identity of an image payload. Equality use only.
pub fn fingerprint(bytes: &[u8]) -> Fingerprint {
    Fingerprint::from_digest(sha256_hex(bytes))
}

/// Cache key for swapping `source` onto `destination`
pub fn pair_key(source: &[u8], destination: &[u8]) -> PairKey {
    PairKey::new(&fingerprint(source), &fingerprint(destination))
}
