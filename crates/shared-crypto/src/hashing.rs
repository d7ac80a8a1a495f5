//! # Chain Hashing
//!
//! The chain's standard hash is SHA-256 applied twice (SHA-256d).
//!
//! ## Display Order
//!
//! Hashes are stored in internal byte order but displayed big-endian, i.e.
//! with the 32 bytes reversed before hex encoding. Record commitments are
//! built from the *display* form, so [`hash256_hex`] must keep that reversal.

use sha2::{Digest, Sha256};
use shared_types::Hash;

/// SHA-256d of `data`, in internal byte order.
pub fn hash256(data: &[u8]) -> Hash {
    let first = Sha256::digest(data);
    Sha256::digest(first).into()
}

/// Lowercase hex of `hash` in display (byte-reversed) order.
pub fn reversed_hex(hash: &Hash) -> String {
    let mut display = *hash;
    display.reverse();
    hex::encode(display)
}

/// Display-order hex of the SHA-256d of `data`.
pub fn hash256_hex(data: &[u8]) -> String {
    reversed_hex(&hash256(data))
}
