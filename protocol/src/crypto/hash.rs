//! # Hashing Utilities
//!
//! The ledger uses exactly one hash function: **SHA-256**. Block digests are
//! computed over a fixed textual encoding of the block fields, so any two
//! implementations that agree on the encoding agree on every digest.
//!
//! ## Canonical preimage
//!
//! ```text
//! "{index}|{timestamp}|{payload}|{prev_digest}"
//! ```
//!
//! - `index` and `payload` are rendered as base-10 integers (payload may be
//!   negative, so it may carry a leading `-`).
//! - `timestamp` is copied verbatim.
//! - `prev_digest` is lowercase hex, or empty for genesis.
//!
//! The encoding is unambiguous only because `prev_digest` never contains
//! the separator. Callers hashing arbitrary strings get no such guarantee;
//! the validator relies on linkage to a hex parent digest instead.
//!
//! The digest is rendered as 64 lowercase hex characters.

use sha2::{Digest, Sha256};

use crate::config::{DIGEST_FIELD_SEPARATOR, DIGEST_LENGTH};

/// Compute the SHA-256 hash of the input data.
///
/// # Example
///
/// ```
/// use pulse_ledger::crypto::sha256;
///
/// let hash = sha256(b"pulse");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Build the exact byte string that gets hashed for a block.
///
/// Exposed so tests and external verifiers can reproduce digests without
/// reimplementing the encoding.
pub fn canonical_preimage(index: u64, timestamp: &str, payload: i64, prev_digest: &str) -> String {
    let sep = DIGEST_FIELD_SEPARATOR;
    format!("{index}{sep}{timestamp}{sep}{payload}{sep}{prev_digest}")
}

/// Compute the hex digest of a block from its four content fields.
///
/// Pure and deterministic. This is the only place a block digest is ever
/// produced.
///
/// # Example
///
/// ```
/// use pulse_ledger::crypto::block_digest;
///
/// let a = block_digest(1, "2026-01-01T00:00:00.000000000Z", 65, "");
/// let b = block_digest(1, "2026-01-01T00:00:00.000000000Z", 65, "");
/// assert_eq!(a, b);
/// assert_eq!(a.len(), 64);
/// ```
pub fn block_digest(index: u64, timestamp: &str, payload: i64, prev_digest: &str) -> String {
    let preimage = canonical_preimage(index, timestamp, payload, prev_digest);
    hex::encode(sha256(preimage.as_bytes()))
}
