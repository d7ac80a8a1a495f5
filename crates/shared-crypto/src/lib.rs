//! # Shared Crypto - Chain Cryptographic Primitives
//!
//! ## Components
//!
//! | Module | Algorithm | Use Case |
//! |--------|-----------|----------|
//! | `hashing` | SHA-256d | Record commitments, signing digests |
//! | `ecdsa` | secp256k1 (DER) | Audit signatures, encryption key checks |
//! | `address` | Base58Check | Wallet / link address validation |
//!
//! ## Security Properties
//!
//! - **secp256k1**: RFC 6979 deterministic nonces, low-S on signing,
//!   high-S normalized before verification
//! - **Base58Check**: 4-byte SHA-256d checksum, version byte whitelist

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod address;
pub mod ecdsa;
pub mod errors;
pub mod hashing;

// Re-exports
pub use address::{AddressKind, AddressParams, ChainAddress};
pub use ecdsa::{Secp256k1KeyPair, Secp256k1PublicKey};
pub use errors::CryptoError;
pub use hashing::{hash256, hash256_hex, reversed_hex};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
