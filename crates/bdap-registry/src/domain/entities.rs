//! # Registry Entities
//!
//! Domain entries and audit records as they are stored on chain. Text fields
//! are kept as raw bytes because the wire format carries bytes, and every
//! length rule counts bytes.

use serde::{Deserialize, Serialize};
use shared_types::{Hash, Timestamp};

/// Current domain entry encoding version.
pub const DOMAIN_ENTRY_VERSION: i32 = 1;

/// Current audit data encoding version.
pub const AUDIT_DATA_VERSION: i32 = 1;

/// Kind of registered object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u32)]
pub enum ObjectType {
    Default = 0,
    User = 1,
    Group = 2,
    Device = 3,
    Domain = 4,
    OrganizationalUnit = 5,
    Certificate = 6,
    Audit = 7,
    Channel = 8,
    Checkpoint = 9,
    BindingLink = 10,
    Identity = 11,
    IdentityVerification = 12,
    SmartContract = 13,
}

impl ObjectType {
    /// Maps a stored integer back to a known type.
    pub fn from_u32(value: u32) -> Option<Self> {
        use ObjectType::*;
        let ty = match value {
            0 => Default,
            1 => User,
            2 => Group,
            3 => Device,
            4 => Domain,
            5 => OrganizationalUnit,
            6 => Certificate,
            7 => Audit,
            8 => Channel,
            9 => Checkpoint,
            10 => BindingLink,
            11 => Identity,
            12 => IdentityVerification,
            13 => SmartContract,
            _ => return None,
        };
        Some(ty)
    }

    pub fn as_u32(self) -> u32 {
        self as u32
    }
}

/// A registered identity or namespace record.
///
/// The full path `object_id@organizational_unit.domain_component` is the
/// record's identity. An entry is never edited in place: modifications are
/// new records that supersede it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DomainEntry {
    /// Encoding version.
    pub version: i32,
    /// Root object identifier prefix.
    pub oid: Vec<u8>,
    /// Domain component, e.g. `bdap.io`.
    pub domain_component: Vec<u8>,
    /// Display name.
    pub common_name: Vec<u8>,
    /// Organizational unit, e.g. `public`.
    pub organizational_unit: Vec<u8>,
    /// Organization display name.
    pub organization_name: Vec<u8>,
    /// Object id, the leftmost part of the full path.
    pub object_id: Vec<u8>,
    /// Raw object type; see [`ObjectType`]. Unknown values are preserved.
    pub object_type: u32,
    /// Chain address owning the entry.
    pub wallet_address: Vec<u8>,
    /// Raw public-listing flag; nonzero means listed. Any value is kept.
    pub public: u32,
    /// SEC1 encoded secp256k1 public key.
    pub encrypt_public_key: Vec<u8>,
    /// Chain address used for link requests.
    pub link_address: Vec<u8>,
    /// Originating transaction id.
    pub txid: Hash,
    /// Confirmation height.
    pub height: u32,
    /// Expiry, in chain median time.
    pub expire_time: Timestamp,
}

impl DomainEntry {
    /// `object_id@organizational_unit.domain_component`
    pub fn full_path(&self) -> String {
        format!(
            "{}@{}",
            String::from_utf8_lossy(&self.object_id),
            self.object_location()
        )
    }

    /// `organizational_unit.domain_component`
    pub fn object_location(&self) -> String {
        format!(
            "{}.{}",
            String::from_utf8_lossy(&self.organizational_unit),
            String::from_utf8_lossy(&self.domain_component)
        )
    }

    pub fn is_public(&self) -> bool {
        self.public != 0
    }

    pub fn kind(&self) -> Option<ObjectType> {
        ObjectType::from_u32(self.object_type)
    }

    pub fn is_null(&self) -> bool {
        *self == Self::default()
    }
}

/// The signed part of an audit: an ordered list of opaque hashes.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AuditData {
    /// Encoding version, independent of the envelope.
    pub version: i32,
    /// Opaque audit hash values, order preserved.
    pub audit_hashes: Vec<Vec<u8>>,
    /// Creation time.
    pub timestamp: Timestamp,
}

impl AuditData {
    pub fn new(audit_hashes: Vec<Vec<u8>>, timestamp: Timestamp) -> Self {
        Self {
            version: AUDIT_DATA_VERSION,
            audit_hashes,
            timestamp,
        }
    }
}

/// Audit envelope bound to a domain entry by its full path.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Audit {
    /// Canonical encoding of the [`AuditData`].
    pub audit_data: Vec<u8>,
    /// Full path of the owning domain entry.
    pub owner_full_path: Vec<u8>,
    /// DER signature over the hash of `audit_data`; empty when unsigned.
    pub signature: Vec<u8>,
    /// Confirmation height.
    pub height: u32,
    /// Expiry, in chain median time.
    pub expire_time: Timestamp,
    /// Originating transaction id.
    pub txid: Hash,
}

impl Audit {
    pub fn is_signed(&self) -> bool {
        !self.signature.is_empty()
    }

    pub fn owner(&self) -> String {
        String::from_utf8_lossy(&self.owner_full_path).into_owned()
    }

    pub fn is_null(&self) -> bool {
        *self == Self::default()
    }
}
