//! # Storage Module
//!
//! The in-memory ledger: block structure, validation rules, fork choice, and
//! the store that ties them together.
//!
//! ## Architecture
//!
//! ```text
//! block.rs       Block structure, genesis, factory, digest recomputation
//! validation.rs  Successor and whole-chain validity checks
//! fork.rs        Longest-valid-chain rule for replacement candidates
//! chain.rs       ChainStore: the locked, canonical block sequence
//! error.rs       Rejection and validation error types
//! ```
//!
//! ## Data Flow
//!
//! ```text
//! payload → Block::next(tip) → validate_successor → ChainStore (commit)
//! candidate chain → fork::resolve → ChainStore (swap)
//! ```
//!
//! Nothing here touches disk. The chain lives for the lifetime of the
//! process and no longer.

pub mod block;
pub mod chain;
pub mod error;
pub mod fork;
pub mod validation;

pub use block::Block;
pub use chain::ChainStore;
pub use error::{ChainError, ChainValidationError, RejectReason, ReplaceRejection};
pub use validation::{is_valid_chain, is_valid_successor, validate_chain, validate_successor};
