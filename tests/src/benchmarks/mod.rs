//! # BDAP Benchmarks
//!
//! Criterion groups registered by `benches/registry_benchmarks.rs`.

pub mod audit;
pub mod codec;
