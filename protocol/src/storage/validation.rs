//! # Chain Validation
//!
//! Binary validity checks, no partial credit. A block is checked against a
//! reference parent in a fixed order:
//!
//! 1. index linkage (`candidate.index == parent.index + 1`; a parent at
//!    `u64::MAX` has no successor)
//! 2. hash linkage (`candidate.prev_digest == parent.digest`)
//! 3. digest recomputation over the candidate's own fields
//!
//! The first failing rule is reported. Step 3 is what catches a payload or
//! timestamp edited after construction.

use crate::config::{GENESIS_INDEX, GENESIS_PAYLOAD, GENESIS_PREV_DIGEST};

use super::block::Block;
use super::error::{ChainValidationError, RejectReason};

/// Check `candidate` against `parent`, reporting the first violated rule.
pub fn validate_successor(candidate: &Block, parent: &Block) -> Result<(), RejectReason> {
    let expected = parent
        .index
        .checked_add(1)
        .ok_or(RejectReason::IndexOverflow)?;
    if candidate.index != expected {
        return Err(RejectReason::IndexMismatch {
            expected,
            got: candidate.index,
        });
    }
    if candidate.prev_digest != parent.digest {
        return Err(RejectReason::LinkMismatch);
    }
    if !candidate.is_well_formed() {
        return Err(RejectReason::DigestMismatch);
    }
    Ok(())
}

/// Boolean form of [`validate_successor`].
pub fn is_valid_successor(candidate: &Block, parent: &Block) -> bool {
    validate_successor(candidate, parent).is_ok()
}

/// Check that `block` is a well-formed genesis block.
pub fn validate_genesis(block: &Block) -> Result<(), ChainValidationError> {
    if block.index != GENESIS_INDEX {
        return Err(ChainValidationError::MalformedGenesis(format!(
            "index is {}, expected {}",
            block.index, GENESIS_INDEX
        )));
    }
    if block.payload != GENESIS_PAYLOAD {
        return Err(ChainValidationError::MalformedGenesis(format!(
            "payload is {}, expected {}",
            block.payload, GENESIS_PAYLOAD
        )));
    }
    if block.prev_digest != GENESIS_PREV_DIGEST {
        return Err(ChainValidationError::MalformedGenesis(
            "previous digest must be empty".to_string(),
        ));
    }
    if !block.is_well_formed() {
        return Err(ChainValidationError::MalformedGenesis(
            "digest does not match block contents".to_string(),
        ));
    }
    Ok(())
}

/// Validate an entire chain: non-empty, well-formed genesis, and every
/// consecutive pair passing [`validate_successor`].
pub fn validate_chain(blocks: &[Block]) -> Result<(), ChainValidationError> {
    let genesis = blocks.first().ok_or(ChainValidationError::Empty)?;
    validate_genesis(genesis)?;

    for (offset, pair) in blocks.windows(2).enumerate() {
        validate_successor(&pair[1], &pair[0]).map_err(|reason| {
            ChainValidationError::BrokenLink {
                position: offset + 1,
                reason,
            }
        })?;
    }
    Ok(())
}

/// Boolean form of [`validate_chain`].
pub fn is_valid_chain(blocks: &[Block]) -> bool {
    validate_chain(blocks).is_ok()
}
