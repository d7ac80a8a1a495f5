//! # Registry Errors
//!
//! One enum per failure class. Structural and commitment failures both mean
//! "no usable record"; validation failures keep the record and carry the
//! message shown to the user.

use shared_types::EncodingError;
use thiserror::Error;

use crate::ports::outbound::ChainStateError;

/// A payload could not be read as a record.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DecodeError {
    /// Buffer is truncated or malformed.
    #[error("Malformed record: {0}")]
    Malformed(#[from] EncodingError),

    /// Transaction carries no data output.
    #[error("Transaction has no BDAP data output")]
    MissingDataOutput,

    /// Data output does not hold exactly one payload push after OP_RETURN.
    #[error("BDAP data output carries no payload")]
    MissingPayload,
}

/// Decode-with-commitment failure.
///
/// Callers that only need the legacy pass/fail signal can treat every
/// variant alike.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The payload did not decode.
    #[error(transparent)]
    Structural(#[from] DecodeError),

    /// The payload decoded, but its re-encoding hashes to a different commitment.
    #[error("Commitment mismatch: computed {computed}, claimed {claimed}")]
    CommitmentMismatch {
        /// Commitment of the re-encoded record, as text.
        computed: String,
        /// Commitment supplied by the caller, rendered lossily.
        claimed: String,
    },
}

/// A field rule violation. `message` is user facing.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct ValidationError {
    /// The offending field.
    pub field: &'static str,
    /// Description of the violated rule.
    pub message: String,
}

impl ValidationError {
    pub(crate) fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Registration collides with existing or pending state.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConflictError {
    /// A pending transaction already registers the same path.
    #[error("A BDAP domain entry transaction for {full_path} is already in the memory pool")]
    InPendingPool {
        /// The contested full path.
        full_path: String,
    },

    /// The path is already registered on chain.
    #[error("{full_path} entry already exists. Can not add duplicate.")]
    AlreadyRegistered {
        /// The contested full path.
        full_path: String,
    },
}

/// Invalid configuration.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A length limit is zero or otherwise unusable.
    #[error("Invalid limit {name}: {reason}")]
    InvalidLimit {
        /// Config key.
        name: &'static str,
        /// Why it was rejected.
        reason: String,
    },

    /// An environment override could not be parsed.
    #[error("Invalid value for {var}: {value}")]
    InvalidEnvValue {
        /// Environment variable name.
        var: &'static str,
        /// The raw value.
        value: String,
    },

    /// A default name does not satisfy the name grammar.
    #[error("Invalid default {name}: {value}")]
    InvalidDefault {
        /// Config key.
        name: &'static str,
        /// The rejected value.
        value: String,
    },
}

/// Top-level registry error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BdapError {
    /// Codec failure.
    #[error(transparent)]
    Codec(#[from] CodecError),

    /// Field rule violation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Registration conflict.
    #[error(transparent)]
    Conflict(#[from] ConflictError),

    /// Chain view failure.
    #[error(transparent)]
    ChainState(#[from] ChainStateError),

    /// Transaction carries no recognized BDAP operation.
    #[error("Transaction has no BDAP operation output")]
    NotBdapTransaction,

    /// Expiry arithmetic overflowed.
    #[error("Registration period of {days} days overflows the expiry time")]
    ExpiryOverflow {
        /// Requested registration days.
        days: u64,
    },
}

impl From<DecodeError> for BdapError {
    fn from(err: DecodeError) -> Self {
        BdapError::Codec(CodecError::Structural(err))
    }
}
