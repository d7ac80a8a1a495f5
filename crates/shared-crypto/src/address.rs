//! # Chain Addresses (Base58Check)
//!
//! A chain address is `base58(version || hash160 || checksum)` where the
//! checksum is the first four bytes of the SHA-256d of `version || hash160`.
//! The version byte says whether the hash is of a public key or a script.

use crate::{hash256, CryptoError};
use serde::{Deserialize, Serialize};
use shared_types::Script;

const PAYLOAD_LEN: usize = 21;
const CHECKSUM_LEN: usize = 4;

/// Version bytes the chain uses for its address kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParams {
    /// Version byte of pay-to-public-key-hash addresses.
    pub pubkey_prefix: u8,
    /// Version byte of pay-to-script-hash addresses.
    pub script_prefix: u8,
}

impl Default for AddressParams {
    fn default() -> Self {
        Self {
            pubkey_prefix: 30,
            script_prefix: 10,
        }
    }
}

/// What an address hash commits to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// Hash of a public key.
    PubkeyHash,
    /// Hash of a redeem script.
    ScriptHash,
}

/// A decoded chain address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainAddress {
    /// Address kind, taken from the version byte.
    pub kind: AddressKind,
    /// The 20-byte hash.
    pub hash: [u8; 20],
}

impl ChainAddress {
    /// Parse a base58check address string.
    pub fn parse(text: &str, params: &AddressParams) -> Result<Self, CryptoError> {
        let raw = bs58::decode(text)
            .into_vec()
            .map_err(|_| CryptoError::InvalidBase58)?;
        if raw.len() != PAYLOAD_LEN + CHECKSUM_LEN {
            return Err(CryptoError::InvalidAddressLength {
                expected: PAYLOAD_LEN + CHECKSUM_LEN,
                actual: raw.len(),
            });
        }

        let (payload, checksum) = raw.split_at(PAYLOAD_LEN);
        if hash256(payload)[..CHECKSUM_LEN] != *checksum {
            return Err(CryptoError::ChecksumMismatch);
        }

        let kind = match payload[0] {
            v if v == params.pubkey_prefix => AddressKind::PubkeyHash,
            v if v == params.script_prefix => AddressKind::ScriptHash,
            other => return Err(CryptoError::UnknownAddressVersion(other)),
        };
        let mut hash = [0u8; 20];
        hash.copy_from_slice(&payload[1..]);
        Ok(Self { kind, hash })
    }

    /// True if `text` parses as an address under `params`.
    pub fn is_valid(text: &str, params: &AddressParams) -> bool {
        Self::parse(text, params).is_ok()
    }

    /// Base58check string form.
    pub fn encode(&self, params: &AddressParams) -> String {
        let version = match self.kind {
            AddressKind::PubkeyHash => params.pubkey_prefix,
            AddressKind::ScriptHash => params.script_prefix,
        };
        let mut raw = Vec::with_capacity(PAYLOAD_LEN + CHECKSUM_LEN);
        raw.push(version);
        raw.extend_from_slice(&self.hash);
        let checksum = hash256(&raw);
        raw.extend_from_slice(&checksum[..CHECKSUM_LEN]);
        bs58::encode(raw).into_string()
    }

    /// Locking script paying to this address.
    pub fn script_pubkey(&self) -> Script {
        match self.kind {
            AddressKind::PubkeyHash => Script::p2pkh(&self.hash),
            AddressKind::ScriptHash => Script::p2sh(&self.hash),
        }
    }
}
