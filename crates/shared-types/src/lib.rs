//! # Shared Types Crate
//!
//! Chain primitives shared by every BDAP component.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: transaction, output and coin shapes are
//!   defined once here and consumed read-only by the registry.
//! - **Byte Exactness**: [`encoding`] reproduces the chain's consensus stream
//!   format so that records committed on-chain re-serialize identically.
//! - **No Panics on Input**: every decoder returns a typed error for
//!   truncated or malformed buffers.

pub mod encoding;
pub mod entities;
pub mod errors;
pub mod script;

pub use encoding::{Decoder, Encoder, MAX_SIZE};
pub use entities::*;
pub use errors::*;
pub use script::{opcodes, Instruction, Instructions, Script, ScriptBuilder};
