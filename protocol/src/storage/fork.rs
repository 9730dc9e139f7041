//! # Fork Resolution
//!
//! Longest valid chain wins. There is no work, stake, or authorship signal
//! in this ledger, so length is the only thing to compare. Ties keep the
//! incumbent.
//!
//! Note that nothing binds a block to its author: anyone can recompute a
//! longer chain of well-formed digests and it will be adopted. Callers that
//! accept replacement chains from untrusted sources need their own
//! authentication in front of this.

use super::block::Block;
use super::error::ReplaceRejection;
use super::validation::validate_chain;

/// Decide whether `candidate` supersedes a chain of `current_len` blocks.
///
/// Length is checked first because it is O(1); the full validation pass
/// only runs for candidates that could win.
pub fn resolve(current_len: usize, candidate: &[Block]) -> Result<(), ReplaceRejection> {
    prefer_longer(current_len, candidate.len())?;
    validate_chain(candidate)?;
    Ok(())
}

/// The length half of [`resolve`], for callers that have already validated
/// the candidate and only need the comparison under their lock.
pub fn prefer_longer(current_len: usize, candidate_len: usize) -> Result<(), ReplaceRejection> {
    if candidate_len <= current_len {
        return Err(ReplaceRejection::NotLonger {
            current: current_len,
            candidate: candidate_len,
        });
    }
    Ok(())
}
