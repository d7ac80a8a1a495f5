//! # Audit Trail
//!
//! Audits are append-only lists of opaque hashes owned by a domain entry.
//! The signed payload is the canonical [`AuditData`] encoding; the signing
//! digest is its SHA-256d in internal byte order.
//!
//! Crypto failures never propagate past this module as errors on the
//! verification side: verification answers `bool` and logs the reason.

use std::fmt;

use rayon::prelude::*;
use shared_crypto::{hash256, CryptoError, Secp256k1KeyPair, Secp256k1PublicKey};
use shared_types::Hash;
use tracing::{info, warn};

use super::codec::CanonicalRecord;
use super::entities::{Audit, AuditData, DomainEntry};
use super::errors::{DecodeError, ValidationError};
use super::validation::Validator;

/// Signs the hash of `payload`. Returns a DER signature.
pub fn sign_payload(key: &Secp256k1KeyPair, payload: &[u8]) -> Result<Vec<u8>, CryptoError> {
    key.sign_digest(&hash256(payload))
}

/// Checks `signature` over the hash of `payload`.
///
/// Malformed key bytes, malformed signatures and mismatches are all `false`.
pub fn verify_payload(public_key: &[u8], payload: &[u8], signature: &[u8]) -> bool {
    let result = Secp256k1PublicKey::from_sec1_bytes(public_key)
        .and_then(|key| key.verify_digest(&hash256(payload), signature));
    match result {
        Ok(()) => true,
        Err(err) => {
            warn!(error = %err, "Audit signature verification failed");
            false
        }
    }
}

impl Audit {
    /// Envelope carrying `data` for `owner_full_path`, unsigned.
    pub fn from_data(data: &AuditData, owner_full_path: impl Into<Vec<u8>>) -> Self {
        Self {
            audit_data: data.encode(),
            owner_full_path: owner_full_path.into(),
            ..Default::default()
        }
    }

    /// Decodes the carried audit data.
    pub fn data(&self) -> Result<AuditData, DecodeError> {
        AuditData::decode(&self.audit_data)
    }

    /// Version of the carried audit data; `None` when there is no data or
    /// it does not decode.
    pub fn version(&self) -> Option<i32> {
        if self.audit_data.is_empty() {
            return None;
        }
        self.data().ok().map(|data| data.version)
    }

    /// Digest the signature covers.
    pub fn signing_digest(&self) -> Hash {
        hash256(&self.audit_data)
    }

    /// Signs the audit data, replacing any previous signature.
    pub fn sign(&mut self, key: &Secp256k1KeyPair) -> Result<(), CryptoError> {
        match sign_payload(key, &self.audit_data) {
            Ok(signature) => {
                self.signature = signature;
                Ok(())
            }
            Err(err) => {
                warn!(owner = %self.owner(), error = %err, "Failed to sign audit data");
                Err(err)
            }
        }
    }

    /// True if the signature verifies against `public_key`.
    pub fn check_signature(&self, public_key: &[u8]) -> bool {
        verify_payload(public_key, &self.audit_data, &self.signature)
    }
}

impl fmt::Display for Audit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let data = self.data().unwrap_or_default();
        writeln!(f, "Audit(")?;
        writeln!(f, "    version       = {}", data.version)?;
        writeln!(f, "    audit count   = {}", data.audit_hashes.len())?;
        write!(f, "    audit data    =")?;
        for hash in &data.audit_hashes {
            write!(f, "\n                    {}", String::from_utf8_lossy(hash))?;
        }
        writeln!(f)?;
        writeln!(f, "    timestamp     = {}", data.timestamp)?;
        writeln!(f, "    owner         = {}", self.owner())?;
        writeln!(f, "    signed        = {}", if self.is_signed() { "True" } else { "False" })?;
        write!(f, ")")
    }
}

/// Verifies many `(audit, public key)` pairs in parallel. Results keep the
/// input order.
pub fn verify_batch(requests: &[(&Audit, &[u8])]) -> Vec<bool> {
    requests
        .par_iter()
        .map(|(audit, key)| audit.check_signature(key))
        .collect()
}

/// Why an audit was not accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditRejection {
    Invalid(ValidationError),
    BadSignature,
}

/// Outcome of admitting an audit into the derived audit database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditAcceptance {
    Accepted,
    /// No entry has the owner path. The audit is discarded.
    Orphaned,
    Rejected(AuditRejection),
}

/// Decides whether `audit` is kept. `owner` is the entry found under the
/// audit's owner path, if any. Signed audits must verify against the
/// owner's encryption public key.
pub fn accept_audit(
    audit: &Audit,
    owner: Option<&DomainEntry>,
    validator: &Validator<'_>,
) -> AuditAcceptance {
    let Some(owner) = owner else {
        info!(owner = %audit.owner(), "Discarding orphaned audit");
        return AuditAcceptance::Orphaned;
    };

    if let Err(err) = validator.validate_audit(audit) {
        return AuditAcceptance::Rejected(AuditRejection::Invalid(err));
    }

    if audit.is_signed() && !audit.check_signature(&owner.encrypt_public_key) {
        return AuditAcceptance::Rejected(AuditRejection::BadSignature);
    }

    AuditAcceptance::Accepted
}
