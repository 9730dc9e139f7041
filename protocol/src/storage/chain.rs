//! # Chain Store
//!
//! Owns the canonical block sequence. The store is an explicit value, built
//! once at startup and shared behind an `Arc`; there is no ambient global.
//!
//! ## Thread Safety
//!
//! The sequence sits behind a `parking_lot::RwLock`:
//!
//! - Reads ([`ChainStore::tip`], [`ChainStore::snapshot`], [`ChainStore::len`])
//!   take the read lock and may run concurrently. Each observes a complete
//!   chain, never one that is halfway through an append.
//! - [`ChainStore::append`] holds the write lock across read-tip, validate,
//!   and push. Two writers that built candidates from the same tip are
//!   serialized: the first commits, the second is checked against the new
//!   tip and rejected with
//!   [`RejectReason::IndexMismatch`](super::RejectReason::IndexMismatch).
//! - [`ChainStore::replace`] runs the fork rule without holding the lock
//!   (validity does not depend on current state), then repeats the length
//!   comparison under the write lock before swapping, since the chain may
//!   have grown in between.
//!
//! Only digest recomputation and a `Vec::push` happen while exclusive. No
//! I/O, no allocation proportional to chain length.

use parking_lot::RwLock;

use super::block::Block;
use super::error::{ChainError, ReplaceRejection};
use super::fork;
use super::validation::{validate_chain, validate_successor};

/// The process-wide ledger. Always holds at least the genesis block.
#[derive(Debug)]
pub struct ChainStore {
    blocks: RwLock<Vec<Block>>,
}

impl ChainStore {
    /// Create a store holding a freshly minted genesis block.
    pub fn new() -> Self {
        Self::with_genesis(Block::genesis())
    }

    /// Create a store rooted at the given genesis block.
    pub fn with_genesis(genesis: Block) -> Self {
        tracing::info!(digest = %genesis.digest, timestamp = %genesis.timestamp, "chain initialized");
        Self {
            blocks: RwLock::new(vec![genesis]),
        }
    }

    /// The last block in the chain.
    pub fn tip(&self) -> Result<Block, ChainError> {
        self.blocks.read().last().cloned().ok_or(ChainError::EmptyChain)
    }

    /// A consistent copy of the whole chain, genesis first.
    pub fn snapshot(&self) -> Vec<Block> {
        self.blocks.read().clone()
    }

    /// Number of blocks, genesis included.
    pub fn len(&self) -> usize {
        self.blocks.read().len()
    }

    /// Always false for a store built through the public constructors.
    pub fn is_empty(&self) -> bool {
        self.blocks.read().is_empty()
    }

    /// Commit `candidate` if it is a valid successor of the current tip.
    ///
    /// Atomic: the tip read, validation, and push happen under one write
    /// lock. On rejection the chain is untouched.
    pub fn append(&self, candidate: Block) -> Result<Block, ChainError> {
        let mut blocks = self.blocks.write();
        let tip = blocks.last().ok_or(ChainError::EmptyChain)?;

        if let Err(reason) = validate_successor(&candidate, tip) {
            tracing::warn!(
                index = candidate.index,
                tip_index = tip.index,
                reason = reason.label(),
                "candidate block rejected"
            );
            return Err(ChainError::Rejected(reason));
        }

        blocks.push(candidate.clone());
        tracing::info!(
            index = candidate.index,
            payload = candidate.payload,
            digest = %candidate.digest,
            "block committed"
        );
        Ok(candidate)
    }

    /// Replace the stored chain with `candidate` if it is valid and strictly
    /// longer. Returns whether the swap happened.
    pub fn replace(&self, candidate: Vec<Block>) -> bool {
        match self.try_replace(candidate) {
            Ok(()) => true,
            Err(rejection) => {
                tracing::warn!(%rejection, "replacement chain ignored");
                false
            }
        }
    }

    /// Like [`ChainStore::replace`], but reports why a candidate lost.
    pub fn try_replace(&self, candidate: Vec<Block>) -> Result<(), ReplaceRejection> {
        fork::resolve(self.len(), &candidate)?;
        self.adopt(candidate)
    }

    /// Swap in an already validated `candidate`, re-checking its length
    /// against the chain as it stands under the write lock.
    fn adopt(&self, candidate: Vec<Block>) -> Result<(), ReplaceRejection> {
        let mut blocks = self.blocks.write();
        fork::prefer_longer(blocks.len(), candidate.len())?;

        let previous = blocks.len();
        *blocks = candidate;
        tracing::info!(previous, adopted = blocks.len(), "chain replaced");
        Ok(())
    }

    /// Re-validate the stored chain from genesis.
    pub fn verify(&self) -> bool {
        validate_chain(&self.blocks.read()).is_ok()
    }
}

impl Default for ChainStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::error::{ChainValidationError, RejectReason};

    const TS: &str = "2026-10-18T12:00:00.000000000Z";

    fn fresh_store() -> ChainStore {
        ChainStore::with_genesis(Block::genesis_at(TS))
    }

    fn extended(store: &ChainStore, payloads: &[i64]) {
        for &p in payloads {
            let tip = store.tip().expect("tip");
            store.append(Block::next(&tip, p)).expect("append");
        }
    }

    #[test]
    fn new_store_holds_genesis() {
        let store = ChainStore::new();
        assert_eq!(store.len(), 1);
        assert!(!store.is_empty());
        let tip = store.tip().expect("tip");
        assert!(tip.is_genesis());
        assert!(store.verify());
    }

    #[test]
    fn append_extends_by_one() {
        let store = fresh_store();
        let genesis = store.tip().expect("tip");

        let committed = store.append(Block::next(&genesis, 65)).expect("append");
        assert_eq!(committed.index, 1);
        assert_eq!(committed.prev_digest, genesis.digest);
        assert_eq!(store.len(), 2);
        assert_eq!(store.tip().expect("tip"), committed);
    }

    #[test]
    fn stale_candidate_is_rejected_without_mutation() {
        let store = fresh_store();
        let genesis = store.tip().expect("tip");
        let first = Block::next(&genesis, 65);
        let second = Block::next(&genesis, 70);

        store.append(first).expect("first wins");
        let before = store.snapshot();

        assert_eq!(
            store.append(second),
            Err(ChainError::Rejected(RejectReason::IndexMismatch {
                expected: 2,
                got: 1
            }))
        );
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn tampered_candidate_is_digest_mismatch() {
        let store = fresh_store();
        let mut candidate = Block::next(&store.tip().expect("tip"), 65);
        candidate.payload = 99;

        assert_eq!(
            store.append(candidate),
            Err(ChainError::Rejected(RejectReason::DigestMismatch))
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn replace_adopts_longer_valid_chain() {
        let store = fresh_store();
        extended(&store, &[65]);

        let other = ChainStore::with_genesis(Block::genesis_at("2026-10-18T13:00:00.000000000Z"));
        extended(&other, &[60, 61, 62]);
        let candidate = other.snapshot();

        assert!(store.replace(candidate.clone()));
        assert_eq!(store.snapshot(), candidate);
        assert!(store.verify());
    }

    #[test]
    fn replace_keeps_incumbent_on_tie() {
        let store = fresh_store();
        extended(&store, &[65, 66]);
        let before = store.snapshot();

        let other = ChainStore::with_genesis(Block::genesis_at("2026-10-18T13:00:00.000000000Z"));
        extended(&other, &[1, 2]);

        assert_eq!(
            store.try_replace(other.snapshot()),
            Err(ReplaceRejection::NotLonger {
                current: 3,
                candidate: 3
            })
        );
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn replace_rejects_longer_invalid_chain() {
        let store = fresh_store();
        let before = store.snapshot();

        let other = fresh_store();
        extended(&other, &[1, 2, 3]);
        let mut candidate = other.snapshot();
        candidate[2].payload = 1000;

        assert!(!store.replace(candidate.clone()));
        assert!(matches!(
            store.try_replace(candidate),
            Err(ReplaceRejection::InvalidChain(ChainValidationError::BrokenLink { position: 2, .. }))
        ));
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn replace_rejects_empty_chain() {
        let store = fresh_store();
        assert_eq!(
            store.try_replace(Vec::new()),
            Err(ReplaceRejection::NotLonger {
                current: 1,
                candidate: 0
            })
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn growth_between_resolve_and_adopt_keeps_incumbent() {
        let store = fresh_store();
        let other = ChainStore::with_genesis(Block::genesis_at("2026-10-18T13:00:00.000000000Z"));
        extended(&other, &[1, 2]);
        let candidate = other.snapshot();

        assert_eq!(fork::resolve(store.len(), &candidate), Ok(()));
        extended(&store, &[65, 66, 67]);
        let before = store.snapshot();

        assert_eq!(
            store.adopt(candidate),
            Err(ReplaceRejection::NotLonger {
                current: 4,
                candidate: 3
            })
        );
        assert_eq!(store.snapshot(), before);
    }

    #[test]
    fn append_after_replace_builds_on_new_tip() {
        let store = fresh_store();
        let other = fresh_store();
        extended(&other, &[1, 2]);
        assert!(store.replace(other.snapshot()));

        let committed = store
            .append(Block::next(&store.tip().expect("tip"), 3))
            .expect("append");
        assert_eq!(committed.index, 3);
        assert!(store.verify());
    }
}
