//! # BDAP Registry
//!
//! Naming and identity records (domain entries and audits) carried inside
//! ordinary chain transactions.
//!
//! ## Architecture
//!
//! This crate follows hexagonal architecture:
//! - **Domain Layer** (`domain/`): codec, operation tags, validation, audits,
//!   expiration, conflict detection and projections. No I/O.
//! - **Ports Layer** (`ports/`): the [`BdapApi`] offered to callers and the
//!   chain views the registry reads
//! - **Adapters Layer** (`adapters/`): in-memory chain state
//! - **Service Layer** (`service.rs`): wires domain logic to ports
//!
//! ## Transaction Layout
//!
//! ```text
//! ┌───────────────────────────────┐
//! │ operation output              │  OP_1 <op> <params>.. drops <destination>
//! ├───────────────────────────────┤
//! │ data output                   │  OP_RETURN <canonical record>
//! └───────────────────────────────┘
//! ```
//!
//! The data output's commitment is the hex of the reversed SHA256d of the
//! payload. A record is accepted only if its canonical re-encoding
//! reproduces that commitment.
//!
//! ## Outbound Dependencies
//!
//! | Port | Provides |
//! |------|----------|
//! | [`ChainStateReader`] | Confirmed tip and pending pool, in one snapshot |
//! | [`BlockSource`] | Confirmed transactions and per-height median time |
//! | [`CoinSource`] | Outputs spent by a transaction's inputs |
//! | [`EntryDirectory`] | Registered entries by full path |

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod service;

// Re-export public API
pub use adapters::InMemoryChainState;
pub use domain::audit::{accept_audit, verify_batch, AuditAcceptance, AuditRejection};
pub use domain::codec::{CanonicalRecord, Commitment};
pub use domain::config::BdapConfig;
pub use domain::entities::{Audit, AuditData, DomainEntry, ObjectType};
pub use domain::errors::{
    BdapError, CodecError, ConfigError, ConflictError, DecodeError, ValidationError,
};
pub use domain::operation::{
    build_data_script, build_entry_operation_script, build_operation_script, classify_script,
    op_name, BdapOp, Classification, DataOutput, OperationTag,
};
pub use ports::inbound::{BdapApi, DecodedTransaction, RegistrationOutputs, RegistrationRequest};
pub use ports::outbound::{
    BlockSource, ChainSnapshot, ChainStateError, ChainStateReader, CoinSource, EntryDirectory,
};
pub use service::BdapService;
