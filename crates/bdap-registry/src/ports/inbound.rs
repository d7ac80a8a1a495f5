//! # Inbound Ports (Driving Ports / API)
//!
//! The registry API offered to transaction builders, block processors and
//! presentation layers. Implementations must be thread-safe.

use serde_json::{Map, Value};
use shared_types::{Script, Transaction};

use crate::domain::audit::AuditAcceptance;
use crate::domain::entities::{Audit, DomainEntry, ObjectType};
use crate::domain::errors::BdapError;
use crate::domain::operation::{Classification, DataOutput, OperationTag};

/// Caller input for a new registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationRequest {
    /// Object id; case-folded before use.
    pub object_id: String,
    /// Display name.
    pub common_name: String,
    /// Object type, usually user or group.
    pub object_type: ObjectType,
    /// Registration length; the configured default when `None`.
    pub registration_days: Option<u64>,
    /// Owning chain address.
    pub wallet_address: String,
    /// Link request address.
    pub link_address: String,
    /// SEC1 public key.
    pub encrypt_public_key: Vec<u8>,
}

/// Outputs a registration adds to a transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutputs {
    /// The record as it will be committed.
    pub entry: DomainEntry,
    /// Canonical encoding carried by the data output.
    pub payload: Vec<u8>,
    /// `OP_RETURN <payload>`
    pub data_script: Script,
    /// Operation tag followed by the wallet destination.
    pub operation_script: Script,
}

/// A BDAP transaction read back from the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedTransaction {
    /// Operation output index.
    pub operation_index: usize,
    /// The operation and its parameters.
    pub operation: OperationTag,
    /// Where the payload was found.
    pub data_output: DataOutput,
    /// The committed entry.
    pub entry: DomainEntry,
}

/// Primary registry API.
pub trait BdapApi: Send + Sync {
    /// Builds the data and operation outputs of a new registration after
    /// validation, directory and pending-pool checks.
    fn build_registration(&self, request: &RegistrationRequest) -> Result<RegistrationOutputs, BdapError>;

    /// Classifies one output script.
    fn classify(&self, script: &Script) -> Classification;

    /// Finds, decodes, commitment-checks and validates the entry in `tx`.
    fn decode_transaction(&self, tx: &Transaction) -> Result<DecodedTransaction, BdapError>;

    /// Rejects `full_path` if the pending pool already registers it.
    fn check_conflict(&self, full_path: &str) -> Result<(), BdapError>;

    /// True if the entry has expired at the confirmed tip.
    fn is_expired(&self, entry: &DomainEntry) -> Result<bool, BdapError>;

    /// Presentation map of an entry.
    fn entry_projection(&self, entry: &DomainEntry, abridged: bool) -> Result<Map<String, Value>, BdapError>;

    /// Presentation map of an audit.
    fn audit_projection(&self, audit: &Audit) -> Result<Map<String, Value>, BdapError>;

    /// Decides whether an audit is kept, looking up its owner entry.
    fn accept_audit(&self, audit: &Audit) -> Result<AuditAcceptance, BdapError>;
}
