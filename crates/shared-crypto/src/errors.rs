//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CryptoError {
    /// Signature verification failed
    #[error("Signature verification failed")]
    SignatureVerificationFailed,

    /// Invalid signature format
    #[error("Invalid signature format")]
    InvalidSignatureFormat,

    /// Invalid public key
    #[error("Invalid public key")]
    InvalidPublicKey,

    /// Invalid private key
    #[error("Invalid private key")]
    InvalidPrivateKey,

    /// Signing primitive failed
    #[error("Signing failed: {0}")]
    SigningFailed(String),

    /// Base58 text could not be decoded
    #[error("Invalid base58 encoding")]
    InvalidBase58,

    /// Base58Check checksum did not match
    #[error("Address checksum mismatch")]
    ChecksumMismatch,

    /// Address payload has the wrong length
    #[error("Invalid address length: expected {expected}, got {actual}")]
    InvalidAddressLength {
        /// Expected payload length in bytes
        expected: usize,
        /// Actual payload length in bytes
        actual: usize,
    },

    /// Address version byte is not one the chain accepts
    #[error("Unknown address version byte: {0}")]
    UnknownAddressVersion(u8),
}
