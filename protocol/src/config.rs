//! # Protocol Configuration & Constants
//!
//! Every magic number in the ledger lives here. The digest encoding
//! constants in particular are frozen: changing any of them invalidates
//! every digest ever computed, so treat this file as append-only.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Protocol Version
// ---------------------------------------------------------------------------

/// Ledger protocol version. Bump the major component on any change to the
/// canonical digest encoding.
pub const PROTOCOL_VERSION: &str = "0.1.0";

// ---------------------------------------------------------------------------
// Genesis
// ---------------------------------------------------------------------------

/// Index of the genesis block. Every chain starts here.
pub const GENESIS_INDEX: u64 = 0;

/// Payload carried by the genesis block. There is no reading at the origin.
pub const GENESIS_PAYLOAD: i64 = 0;

/// Parent digest of the genesis block. Genesis has no real predecessor.
pub const GENESIS_PREV_DIGEST: &str = "";

// ---------------------------------------------------------------------------
// Digest Encoding
// ---------------------------------------------------------------------------

/// SHA-256 output width in bytes.
pub const DIGEST_LENGTH: usize = 32;

/// Length of a hex-rendered digest.
pub const DIGEST_HEX_LENGTH: usize = DIGEST_LENGTH * 2;

/// Separator between fields in the canonical preimage:
/// `index|timestamp|payload|prevDigest`.
///
/// Injective only while `prevDigest` is hex or empty, as it is for every
/// block that links to a real parent. Then index sits before the first
/// separator, payload and prevDigest sit after the last two, and whatever
/// remains is the timestamp, even if the timestamp contains the separator.
/// A `prevDigest` carrying the separator can collide with a different
/// split, but such a block never matches a parent digest.
pub const DIGEST_FIELD_SEPARATOR: char = '|';

// ---------------------------------------------------------------------------
// Service Defaults
// ---------------------------------------------------------------------------

/// Upper bound on the time a single HTTP request may take end to end.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Largest request body the write endpoint accepts (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1 << 20;

/// Default port for the read/write API.
pub const DEFAULT_API_PORT: u16 = 8080;

/// Default port for the Prometheus exposition endpoint.
pub const DEFAULT_METRICS_PORT: u16 = 9090;
