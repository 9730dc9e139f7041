//! # Cryptographic Primitives
//!
//! Everything digest-related flows through here. We wrap the audited `sha2`
//! implementation and add nothing clever on top: the interesting part is the
//! frozen field encoding in [`hash`], not the hash function.

pub mod hash;

pub use hash::{block_digest, canonical_preimage, sha256};
