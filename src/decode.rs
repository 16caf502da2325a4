// 🔢 Raw Record Decoder - stored integers/blobs → semantic fields
//
// Every function here is pure and total over values the ledger schema
// can produce. A value outside that contract is a data-integrity fault
// and panics instead of yielding a plausible-looking number.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::{Deserialize, Serialize};

/// Divisor turning integer stroops into decimal amounts (7 digits).
pub const PRECISION: i64 = 10_000_000;

/// Width of the packed thresholds blob.
pub const THRESHOLDS_LEN: usize = 4;

// ============================================================================
// FIXED POINT
// ============================================================================

/// Convert a stored integer amount into its decimal form.
///
/// Example: `1234500000` → `123.45`
pub fn amount(raw: i64) -> f64 {
    raw as f64 / PRECISION as f64
}

// ============================================================================
// BIT FLAGS
// ============================================================================

/// Test a single bit of a stored flag mask.
///
/// Bits above the ones a caller asks about are never inspected, so masks
/// written by newer ledger versions decode without complaint.
pub fn flag(raw: i64, bit: u32) -> bool {
    (raw >> bit) & 1 == 1
}

pub const AUTH_REQUIRED_BIT: u32 = 0;
pub const AUTH_REVOCABLE_BIT: u32 = 1;
pub const AUTH_IMMUTABLE_BIT: u32 = 2;
pub const AUTHORIZED_BIT: u32 = 0;

/// Account-level authorization flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFlagSet {
    pub auth_required: bool,
    pub auth_revocable: bool,
    pub auth_immutable: bool,
}

impl AccountFlagSet {
    pub fn from_raw(raw: i64) -> Self {
        AccountFlagSet {
            auth_required: flag(raw, AUTH_REQUIRED_BIT),
            auth_revocable: flag(raw, AUTH_REVOCABLE_BIT),
            auth_immutable: flag(raw, AUTH_IMMUTABLE_BIT),
        }
    }
}

// ============================================================================
// THRESHOLDS
// ============================================================================

/// Signing weights unpacked from the 4-byte thresholds blob.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdLevels {
    pub master_weight: u8,
    pub low: u8,
    pub medium: u8,
    pub high: u8,
}

impl ThresholdLevels {
    /// Byte-indexed read of `[master, low, medium, high]`.
    ///
    /// Panics if `bytes` is not exactly four bytes long.
    pub fn unpack(bytes: &[u8]) -> Self {
        assert!(
            bytes.len() == THRESHOLDS_LEN,
            "thresholds blob must be {} bytes, got {}",
            THRESHOLDS_LEN,
            bytes.len()
        );

        ThresholdLevels {
            master_weight: bytes[0],
            low: bytes[1],
            medium: bytes[2],
            high: bytes[3],
        }
    }
}

// ============================================================================
// BASE64 COLUMNS
// ============================================================================

/// Decode a base64 text column.
///
/// `what` names the column for the panic message (e.g. `"accounts.thresholds of GABC"`).
pub fn base64_column(encoded: &str, what: &str) -> Vec<u8> {
    match BASE64.decode(encoded) {
        Ok(bytes) => bytes,
        Err(e) => panic!("corrupt base64 in {}: {}", what, e),
    }
}

/// Decode the stored thresholds column (base64 of the packed blob).
pub fn thresholds_column(encoded: &str, what: &str) -> ThresholdLevels {
    let bytes = base64_column(encoded, what);
    if bytes.len() != THRESHOLDS_LEN {
        panic!(
            "thresholds in {} must decode to {} bytes, got {}",
            what,
            THRESHOLDS_LEN,
            bytes.len()
        );
    }
    ThresholdLevels::unpack(&bytes)
}

/// Inverse of [`thresholds_column`], used when writing fixtures.
pub fn encode_thresholds(levels: [u8; THRESHOLDS_LEN]) -> String {
    BASE64.encode(levels)
}
