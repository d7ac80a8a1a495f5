//! # Domain Layer
//!
//! Pure registry logic. Nothing here reads chain state; callers pass in the
//! tip, pending transactions or owner entries they have already fetched.

pub mod audit;
pub mod codec;
pub mod config;
pub mod conflict;
pub mod entities;
pub mod errors;
pub mod lifecycle;
pub mod operation;
pub mod projection;
pub mod validation;

pub use audit::{accept_audit, sign_payload, verify_batch, verify_payload, AuditAcceptance, AuditRejection};
pub use codec::{CanonicalRecord, Commitment, COMMITMENT_LEN};
pub use config::BdapConfig;
pub use conflict::{check_pending_conflict, pending_full_path};
pub use entities::{Audit, AuditData, DomainEntry, ObjectType, AUDIT_DATA_VERSION, DOMAIN_ENTRY_VERSION};
pub use errors::{BdapError, CodecError, ConfigError, ConflictError, DecodeError, ValidationError};
pub use lifecycle::{is_expired, registration_expiry};
pub use operation::{
    classify_script, decode_record, find_operation, locate_data_output, op_name, BdapOp,
    Classification, DataOutput, OperationTag,
};
pub use projection::{audit_projection, entry_projection, ProjectionContext};
pub use validation::{is_valid_name, normalize_name, Validator};
