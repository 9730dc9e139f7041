//! Error types for chain validation and mutation.
//!
//! Two families live here. [`RejectReason`] and [`ChainError`] describe why a
//! single block could not be appended. [`ChainValidationError`] and
//! [`ReplaceRejection`] describe why a whole candidate chain was not adopted.

use thiserror::Error;

/// The specific rule a candidate block violated against its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// `candidate.index != parent.index + 1`. Also what the loser of an
    /// append race sees: someone else already committed at that index.
    #[error("index mismatch: expected {expected}, got {got}")]
    IndexMismatch {
        /// Index the tip requires.
        expected: u64,
        /// Index the candidate carries.
        got: u64,
    },

    /// The parent sits at `u64::MAX`, so no index can follow it.
    #[error("parent index is at its maximum; no successor index exists")]
    IndexOverflow,

    /// `candidate.prev_digest != parent.digest`.
    #[error("previous digest does not match parent digest")]
    LinkMismatch,

    /// The stored digest does not recompute from the block's own fields.
    #[error("digest does not match block contents")]
    DigestMismatch,
}

impl RejectReason {
    /// Stable short label, used as a metric label and in API responses.
    pub fn label(&self) -> &'static str {
        match self {
            Self::IndexMismatch { .. } => "index_mismatch",
            Self::IndexOverflow => "index_overflow",
            Self::LinkMismatch => "link_mismatch",
            Self::DigestMismatch => "digest_mismatch",
        }
    }

    /// True when resubmitting against the current tip is the right response.
    pub fn is_stale_tip(&self) -> bool {
        matches!(self, Self::IndexMismatch { .. } | Self::LinkMismatch)
    }
}

/// Errors returned by [`crate::storage::ChainStore`] operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainError {
    /// The store holds no blocks. Cannot happen through the public API; it
    /// signals a broken internal invariant rather than bad input.
    #[error("chain store is empty")]
    EmptyChain,

    /// The candidate failed validation against the current tip. State is
    /// unchanged.
    #[error("block rejected: {0}")]
    Rejected(#[from] RejectReason),
}

/// Why a candidate chain is not valid as a whole.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChainValidationError {
    /// Zero blocks.
    #[error("chain is empty")]
    Empty,

    /// The first block is not a well-formed genesis block.
    #[error("malformed genesis: {0}")]
    MalformedGenesis(String),

    /// The block at `position` is not a valid successor of its predecessor.
    #[error("broken link at position {position}: {reason}")]
    BrokenLink {
        /// Position in the candidate sequence.
        position: usize,
        /// Rule the block violated.
        reason: RejectReason,
    },
}

/// Why a replacement chain was not adopted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplaceRejection {
    /// Candidate is not strictly longer than the current chain. Ties keep
    /// the incumbent.
    #[error("candidate length {candidate} does not exceed current length {current}")]
    NotLonger {
        /// Length of the stored chain.
        current: usize,
        /// Length of the candidate.
        candidate: usize,
    },

    /// Candidate failed whole-chain validation.
    #[error("invalid candidate chain: {0}")]
    InvalidChain(#[from] ChainValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reject_reason_labels_are_stable() {
        assert_eq!(
            RejectReason::IndexMismatch { expected: 2, got: 1 }.label(),
            "index_mismatch"
        );
        assert_eq!(RejectReason::IndexOverflow.label(), "index_overflow");
        assert_eq!(RejectReason::LinkMismatch.label(), "link_mismatch");
        assert_eq!(RejectReason::DigestMismatch.label(), "digest_mismatch");
    }

    #[test]
    fn only_linkage_failures_are_stale_tip() {
        assert!(RejectReason::IndexMismatch { expected: 2, got: 1 }.is_stale_tip());
        assert!(RejectReason::LinkMismatch.is_stale_tip());
        assert!(!RejectReason::DigestMismatch.is_stale_tip());
        assert!(!RejectReason::IndexOverflow.is_stale_tip());
    }

    #[test]
    fn chain_error_wraps_reason() {
        let err: ChainError = RejectReason::DigestMismatch.into();
        assert_eq!(err, ChainError::Rejected(RejectReason::DigestMismatch));
        assert_eq!(err.to_string(), "block rejected: digest does not match block contents");
    }
}
