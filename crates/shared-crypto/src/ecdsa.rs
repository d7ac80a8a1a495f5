//! # ECDSA Signatures (secp256k1)
//!
//! Chain-compatible ECDSA over 32-byte digests with DER-encoded signatures.
//!
//! ## Security Properties
//!
//! - RFC 6979 deterministic nonces (no RNG dependency for signing)
//! - Low-S signatures on signing
//! - Verification normalizes high-S before checking
//!
//! ## Use Cases
//!
//! - Audit record signatures
//! - Encryption public key validity checks

use crate::CryptoError;
use k256::ecdsa::{
    signature::hazmat::{PrehashSigner, PrehashVerifier},
    Signature, SigningKey, VerifyingKey,
};
use shared_types::Hash;
use zeroize::Zeroize;

/// Compressed SEC1 public key length.
pub const COMPRESSED_PUBLIC_KEY_LEN: usize = 33;
/// Uncompressed SEC1 public key length.
pub const UNCOMPRESSED_PUBLIC_KEY_LEN: usize = 65;

/// secp256k1 public key parsed from SEC1 bytes (compressed or uncompressed).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Secp256k1PublicKey {
    key: VerifyingKey,
}

impl Secp256k1PublicKey {
    /// Parse SEC1 bytes. Fails unless they describe a point on the curve.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != COMPRESSED_PUBLIC_KEY_LEN && bytes.len() != UNCOMPRESSED_PUBLIC_KEY_LEN {
            return Err(CryptoError::InvalidPublicKey);
        }
        let key = VerifyingKey::from_sec1_bytes(bytes).map_err(|_| CryptoError::InvalidPublicKey)?;
        Ok(Self { key })
    }

    /// True if `bytes` is a fully valid SEC1 point.
    pub fn is_valid(bytes: &[u8]) -> bool {
        Self::from_sec1_bytes(bytes).is_ok()
    }

    /// Compressed SEC1 encoding (33 bytes).
    pub fn to_compressed_bytes(&self) -> Vec<u8> {
        self.key.to_sec1_bytes().to_vec()
    }

    /// Verify a DER signature over a 32-byte digest.
    pub fn verify_digest(&self, digest: &Hash, der_signature: &[u8]) -> Result<(), CryptoError> {
        let sig =
            Signature::from_der(der_signature).map_err(|_| CryptoError::InvalidSignatureFormat)?;
        let sig = sig.normalize_s().unwrap_or(sig);

        self.key
            .verify_prehash(digest, &sig)
            .map_err(|_| CryptoError::SignatureVerificationFailed)
    }
}

/// secp256k1 ECDSA keypair.
pub struct Secp256k1KeyPair {
    signing_key: SigningKey,
}

impl Secp256k1KeyPair {
    /// Generate random keypair.
    pub fn generate() -> Self {
        let signing_key = SigningKey::random(&mut rand::thread_rng());
        Self { signing_key }
    }

    /// Create from secret key bytes (32 bytes).
    pub fn from_bytes(mut bytes: [u8; 32]) -> Result<Self, CryptoError> {
        let result = SigningKey::from_bytes((&bytes).into());
        bytes.zeroize();
        let signing_key = result.map_err(|_| CryptoError::InvalidPrivateKey)?;
        Ok(Self { signing_key })
    }

    /// Public half of the keypair.
    pub fn public_key(&self) -> Secp256k1PublicKey {
        Secp256k1PublicKey {
            key: *self.signing_key.verifying_key(),
        }
    }

    /// Sign a 32-byte digest, returning a low-S DER signature.
    pub fn sign_digest(&self, digest: &Hash) -> Result<Vec<u8>, CryptoError> {
        let sig: Signature = self
            .signing_key
            .sign_prehash(digest)
            .map_err(|e| CryptoError::SigningFailed(e.to_string()))?;
        let sig = sig.normalize_s().unwrap_or(sig);
        Ok(sig.to_der().as_bytes().to_vec())
    }
}
