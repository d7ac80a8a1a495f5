//! # Ports Layer
//!
//! - `inbound`: the API this crate offers ([`inbound::BdapApi`])
//! - `outbound`: the chain views it depends on

pub mod inbound;
pub mod outbound;

pub use inbound::{BdapApi, DecodedTransaction, RegistrationOutputs, RegistrationRequest};
pub use outbound::{
    BlockSource, ChainSnapshot, ChainStateError, ChainStateReader, CoinSource, EntryDirectory,
};
