// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # Pulse Ledger Core Library
//!
//! A single-node, append-only chain of sensor readings. Each block is bound
//! to its predecessor by a SHA-256 digest over a frozen text encoding, so
//! editing any committed field is detectable by recomputation alone.
//!
//! ## Architecture
//!
//! - **config**: Genesis constants, digest encoding, service defaults.
//! - **crypto**: The hasher. One function, one encoding.
//! - **storage**: Blocks, validation, fork choice, and the chain store.
//!
//! ## Scope
//!
//! This is a ledger primitive, not a distributed blockchain: no peers, no
//! persistence, no consensus beyond "longest valid chain wins" when a caller
//! offers a replacement.

pub mod config;
pub mod crypto;
pub mod storage;

pub use storage::{Block, ChainError, ChainStore, RejectReason};
