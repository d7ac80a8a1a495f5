//! # Error Types
//!
//! Errors raised while decoding chain byte streams and scripts.

use thiserror::Error;

/// Errors from the consensus stream decoder.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EncodingError {
    /// The buffer ended before a field was complete.
    #[error("Unexpected end of data: needed {needed} bytes, {remaining} remaining")]
    UnexpectedEnd { needed: usize, remaining: usize },

    /// A CompactSize used a wider form than its value requires.
    #[error("Non-canonical compact size")]
    NonCanonicalCompactSize,

    /// A length prefix exceeded the stream limit.
    #[error("Size too large: {0}")]
    SizeTooLarge(u64),

    /// A VARINT did not fit in 64 bits.
    #[error("VarInt overflow")]
    VarIntOverflow,

    /// A decoded integer does not fit the field it belongs to.
    #[error("Value out of range for {field}: {value}")]
    ValueOutOfRange { field: &'static str, value: u64 },

    /// Bytes were left over after the last field.
    #[error("Trailing bytes after record: {0}")]
    TrailingBytes(usize),
}

/// Errors from script instruction iteration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScriptError {
    /// A push opcode announced more data than the script holds.
    #[error("Truncated push at offset {offset}: wanted {wanted} bytes, {remaining} remaining")]
    TruncatedPush {
        offset: usize,
        wanted: usize,
        remaining: usize,
    },
}
