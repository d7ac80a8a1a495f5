//! # Integration Tests
//!
//! Cross-crate flows: transactions built on the outbound path are mined
//! into the in-memory chain and read back on the inbound path.

pub mod audit_trail;
pub mod flows;
