//! Typed failures for leaf encoding

use thiserror::Error;

/// Errors from record validation and leaf encoding.
///
/// All of these are returned to the caller; nothing is retried or recovered
/// internally, and the library never terminates the process.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    /// Unknown leaf-encoding version.
    #[error("unsupported leaf encoding version: {0}")]
    UnsupportedVersion(u32),

    /// A numeric field is neither a decimal nor a `0x`-hex string.
    #[error("invalid {field}: expected a decimal or 0x-hex number, got {value:?}")]
    InvalidNumber { field: &'static str, value: String },

    /// A numeric field parses but does not fit its encoded width.
    #[error("{field} out of range: {value} does not fit in {bits} bits")]
    OutOfRange {
        field: &'static str,
        value: String,
        bits: u32,
    },

    /// A byte-string field is not valid hex.
    #[error("malformed hex in {field}: {value:?}")]
    MalformedHex { field: &'static str, value: String },

    /// An address field does not decode to exactly 20 bytes.
    #[error("invalid {field}: {value:?} is not a 20-byte address")]
    InvalidAddress { field: &'static str, value: String },
}
