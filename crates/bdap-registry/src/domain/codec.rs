//! # Record Codec
//!
//! Canonical encoding of registry records in the chain's stream format, and
//! the hash commitment that binds a payload to its on-chain form.
//!
//! ## Commitment
//!
//! A commitment is the SHA-256d of the canonical encoding, rendered as its
//! 64-character display hex, and then used *as bytes*: the ASCII text itself
//! is what gets compared. Existing chain data commits to that text form, so
//! comparing raw hash bytes instead would reject every stored record.
//!
//! Decoding re-encodes the parsed record and commits to the re-encoding.
//! A payload that parses but is not in canonical form therefore fails the
//! commitment check.

use shared_crypto::hash256_hex;
use shared_types::{Decoder, Encoder, EncodingError};
use tracing::debug;

use super::entities::{Audit, AuditData, DomainEntry};
use super::errors::{CodecError, DecodeError};

/// Length of a commitment in bytes.
pub const COMMITMENT_LEN: usize = 64;

/// Hex-text commitment to a canonical encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Commitment([u8; COMMITMENT_LEN]);

impl Commitment {
    /// Commitment to `encoding`.
    pub fn of(encoding: &[u8]) -> Self {
        let mut out = [0u8; COMMITMENT_LEN];
        out.copy_from_slice(hash256_hex(encoding).as_bytes());
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Bit-for-bit comparison with a caller-supplied commitment.
    pub fn matches(&self, claimed: &[u8]) -> bool {
        self.0[..] == *claimed
    }

    pub fn as_str(&self) -> &str {
        // Only ever built from ASCII hex.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

/// A record with a canonical, versioned byte encoding.
pub trait CanonicalRecord: Sized + Default {
    /// Record name used in log output.
    const KIND: &'static str;

    /// Writes every field in wire order.
    fn encode_into(&self, enc: &mut Encoder);

    /// Reads every field in wire order.
    fn decode_from(dec: &mut Decoder<'_>) -> Result<Self, EncodingError>;

    /// Canonical encoding.
    fn encode(&self) -> Vec<u8> {
        let mut enc = Encoder::new();
        self.encode_into(&mut enc);
        enc.into_bytes()
    }

    /// Parses a whole buffer. Trailing bytes are an error.
    fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        let mut dec = Decoder::new(bytes);
        let record = Self::decode_from(&mut dec).and_then(|record| {
            dec.finish()?;
            Ok(record)
        });
        record.map_err(|err| {
            debug!(kind = Self::KIND, len = bytes.len(), error = %err, "Record decode failed");
            DecodeError::Malformed(err)
        })
    }

    /// Commitment to the canonical encoding.
    fn commitment(&self) -> Commitment {
        Commitment::of(&self.encode())
    }

    /// Parses `bytes`, then checks that the re-encoded record commits to
    /// `claimed`. No record is returned on any failure.
    fn decode_with_commitment(bytes: &[u8], claimed: &[u8]) -> Result<Self, CodecError> {
        let record = Self::decode(bytes)?;
        let computed = record.commitment();
        if !computed.matches(claimed) {
            debug!(
                kind = Self::KIND,
                computed = computed.as_str(),
                "Record commitment mismatch"
            );
            return Err(CodecError::CommitmentMismatch {
                computed: computed.as_str().to_owned(),
                claimed: String::from_utf8_lossy(claimed).into_owned(),
            });
        }
        Ok(record)
    }
}

impl CanonicalRecord for DomainEntry {
    const KIND: &'static str = "domain_entry";

    fn encode_into(&self, enc: &mut Encoder) {
        enc.write_i32(self.version)
            .write_bytes(&self.oid)
            .write_bytes(&self.domain_component)
            .write_bytes(&self.common_name)
            .write_bytes(&self.organizational_unit)
            .write_bytes(&self.organization_name)
            .write_bytes(&self.object_id)
            .write_varint(u64::from(self.object_type))
            .write_bytes(&self.wallet_address)
            .write_varint(u64::from(self.public))
            .write_bytes(&self.encrypt_public_key)
            .write_bytes(&self.link_address)
            .write_hash(&self.txid)
            .write_varint(u64::from(self.height))
            .write_varint(self.expire_time);
    }

    fn decode_from(dec: &mut Decoder<'_>) -> Result<Self, EncodingError> {
        let version = dec.read_i32()?;
        let oid = dec.read_bytes()?;
        let domain_component = dec.read_bytes()?;
        let common_name = dec.read_bytes()?;
        let organizational_unit = dec.read_bytes()?;
        let organization_name = dec.read_bytes()?;
        let object_id = dec.read_bytes()?;
        let object_type = dec.read_varint_u32("object_type")?;
        let wallet_address = dec.read_bytes()?;
        let public = dec.read_varint_u32("public")?;
        let encrypt_public_key = dec.read_bytes()?;
        let link_address = dec.read_bytes()?;
        let txid = dec.read_hash()?;
        let height = dec.read_varint_u32("height")?;
        let expire_time = dec.read_varint()?;

        Ok(Self {
            version,
            oid,
            domain_component,
            common_name,
            organizational_unit,
            organization_name,
            object_id,
            object_type,
            wallet_address,
            public,
            encrypt_public_key,
            link_address,
            txid,
            height,
            expire_time,
        })
    }
}

impl CanonicalRecord for AuditData {
    const KIND: &'static str = "audit_data";

    fn encode_into(&self, enc: &mut Encoder) {
        enc.write_i32(self.version)
            .write_bytes_vec(&self.audit_hashes)
            .write_varint(self.timestamp);
    }

    fn decode_from(dec: &mut Decoder<'_>) -> Result<Self, EncodingError> {
        Ok(Self {
            version: dec.read_i32()?,
            audit_hashes: dec.read_bytes_vec()?,
            timestamp: dec.read_varint()?,
        })
    }
}

impl CanonicalRecord for Audit {
    const KIND: &'static str = "audit";

    fn encode_into(&self, enc: &mut Encoder) {
        enc.write_bytes(&self.audit_data)
            .write_bytes(&self.owner_full_path)
            .write_bytes(&self.signature)
            .write_varint(u64::from(self.height))
            .write_varint(self.expire_time)
            .write_hash(&self.txid);
    }

    fn decode_from(dec: &mut Decoder<'_>) -> Result<Self, EncodingError> {
        Ok(Self {
            audit_data: dec.read_bytes()?,
            owner_full_path: dec.read_bytes()?,
            signature: dec.read_bytes()?,
            height: dec.read_varint_u32("height")?,
            expire_time: dec.read_varint()?,
            txid: dec.read_hash()?,
        })
    }
}
