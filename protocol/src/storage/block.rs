//! # Block Structure
//!
//! A block is one reading committed to the ledger, bound to its
//! predecessor by digest.
//!
//! ## Block Layout
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  Block                                       │
//! │  ├── index: u64          (parent.index + 1)  │
//! │  ├── timestamp: String   (RFC 3339, nanos)   │
//! │  ├── payload: i64        (sensor reading)    │
//! │  ├── digest: String      (SHA-256, hex)      │
//! │  └── prev_digest: String (parent.digest)     │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Digest Computation
//!
//! The digest covers `index || timestamp || payload || prev_digest` in the
//! canonical encoding of [`crate::crypto::hash`]. It is never assigned
//! independently: the constructors here are the only code that produces
//! one, and [`Block::is_well_formed`] recomputes it on demand.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{GENESIS_INDEX, GENESIS_PAYLOAD, GENESIS_PREV_DIGEST};
use crate::crypto::hash::block_digest;

/// Render the current wall-clock time in the canonical timestamp form.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Nanos, true)
}

/// A single ledger entry.
///
/// Immutable once created. Field order in the JSON form is
/// `index, timestamp, payload, digest, prevDigest`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    /// Position in the chain (genesis = 0).
    pub index: u64,
    /// Creation time, RFC 3339 UTC with nanosecond precision.
    pub timestamp: String,
    /// Reading supplied by the writer. No range constraint.
    pub payload: i64,
    /// Hex SHA-256 over this block's other four fields.
    pub digest: String,
    /// Digest of the parent block. Empty for genesis.
    pub prev_digest: String,
}

impl Block {
    /// Construct a genesis block stamped with the current time.
    ///
    /// Each process mints its own genesis at startup, so two stores never
    /// share a genesis digest unless built from the same timestamp.
    pub fn genesis() -> Self {
        Self::genesis_at(now_timestamp())
    }

    /// Construct a genesis block with an explicit timestamp.
    pub fn genesis_at(timestamp: impl Into<String>) -> Self {
        Self::sealed(
            GENESIS_INDEX,
            timestamp.into(),
            GENESIS_PAYLOAD,
            GENESIS_PREV_DIGEST.to_string(),
        )
    }

    /// Build the successor of `parent` carrying `payload`.
    ///
    /// Pure construction: nothing is committed. The caller hands the result
    /// to [`crate::storage::ChainStore::append`].
    pub fn next(parent: &Block, payload: i64) -> Self {
        Self::next_at(parent, payload, now_timestamp())
    }

    /// Build the successor of `parent` with an explicit timestamp.
    ///
    /// A parent at `u64::MAX` has no successor index. The index saturates
    /// instead of wrapping, so the result is a well-formed block that the
    /// validator refuses with [`RejectReason::IndexOverflow`].
    ///
    /// [`RejectReason::IndexOverflow`]: crate::storage::RejectReason::IndexOverflow
    pub fn next_at(parent: &Block, payload: i64, timestamp: impl Into<String>) -> Self {
        Self::sealed(
            parent.index.saturating_add(1),
            timestamp.into(),
            payload,
            parent.digest.clone(),
        )
    }

    fn sealed(index: u64, timestamp: String, payload: i64, prev_digest: String) -> Self {
        let digest = block_digest(index, &timestamp, payload, &prev_digest);
        Block {
            index,
            timestamp,
            payload,
            digest,
            prev_digest,
        }
    }

    /// Recompute the digest from this block's own fields.
    pub fn compute_digest(&self) -> String {
        block_digest(self.index, &self.timestamp, self.payload, &self.prev_digest)
    }

    /// True iff the stored digest matches the recomputed one.
    pub fn is_well_formed(&self) -> bool {
        self.digest == self.compute_digest()
    }

    /// True iff this block has the genesis index.
    pub fn is_genesis(&self) -> bool {
        self.index == GENESIS_INDEX
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TS: &str = "2026-10-18T12:00:00.000000000Z";

    #[test]
    fn genesis_block_properties() {
        let genesis = Block::genesis();
        assert_eq!(genesis.index, 0);
        assert_eq!(genesis.payload, 0);
        assert_eq!(genesis.prev_digest, "");
        assert!(genesis.is_genesis());
        assert!(genesis.is_well_formed());
    }

    #[test]
    fn genesis_at_is_deterministic() {
        assert_eq!(Block::genesis_at(TS), Block::genesis_at(TS));
    }

    #[test]
    fn next_links_to_parent() {
        let genesis = Block::genesis_at(TS);
        let block = Block::next(&genesis, 65);

        assert_eq!(block.index, 1);
        assert_eq!(block.payload, 65);
        assert_eq!(block.prev_digest, genesis.digest);
        assert!(block.is_well_formed());
    }

    #[test]
    fn next_accepts_any_payload() {
        let genesis = Block::genesis_at(TS);
        for payload in [i64::MIN, -1, 0, 1, i64::MAX] {
            let block = Block::next_at(&genesis, payload, TS);
            assert!(block.is_well_formed());
            assert_eq!(block.payload, payload);
        }
    }

    #[test]
    fn next_from_max_index_does_not_wrap() {
        let mut parent = Block::genesis_at(TS);
        parent.index = u64::MAX;
        parent.digest = parent.compute_digest();

        let block = Block::next(&parent, 1);
        assert_eq!(block.index, u64::MAX);
        assert_eq!(block.prev_digest, parent.digest);
        assert!(block.is_well_formed());
    }

    #[test]
    fn timestamp_is_rfc3339_nanos() {
        let ts = now_timestamp();
        assert!(ts.ends_with('Z'));
        let parsed = chrono::DateTime::parse_from_rfc3339(&ts).expect("parse");
        assert_eq!(
            parsed.with_timezone(&Utc).to_rfc3339_opts(SecondsFormat::Nanos, true),
            ts
        );
    }

    #[test]
    fn tampered_fields_break_well_formedness() {
        let block = Block::next_at(&Block::genesis_at(TS), 72, TS);

        let mut b = block.clone();
        b.payload += 1;
        assert!(!b.is_well_formed());

        let mut b = block.clone();
        b.timestamp = "2026-10-18T12:00:01.000000000Z".into();
        assert!(!b.is_well_formed());

        let mut b = block.clone();
        b.index += 1;
        assert!(!b.is_well_formed());

        let mut b = block.clone();
        b.prev_digest = "00".repeat(32);
        assert!(!b.is_well_formed());

        let mut b = block;
        b.digest = "ff".repeat(32);
        assert!(!b.is_well_formed());
    }

    #[test]
    fn json_uses_external_field_names() {
        let block = Block::next_at(&Block::genesis_at(TS), 65, TS);
        let value = serde_json::to_value(&block).expect("serialize");
        let obj = value.as_object().expect("object");

        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort_unstable();
        assert_eq!(keys, ["digest", "index", "payload", "prevDigest", "timestamp"]);
        assert_eq!(obj["prevDigest"], serde_json::json!(block.prev_digest));
    }

    #[test]
    fn json_preserves_extreme_payloads() {
        let genesis = Block::genesis_at(TS);
        for payload in [i64::MIN, i64::MAX] {
            let block = Block::next_at(&genesis, payload, TS);
            let json = serde_json::to_string(&block).expect("serialize");
            let recovered: Block = serde_json::from_str(&json).expect("deserialize");
            assert_eq!(recovered, block);
            assert!(recovered.is_well_formed());
        }
    }
}
