//! # BDAP Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── fixtures.rs       # Chains, keys, registration requests
//! ├── benchmarks/       # Codec and audit verification benchmarks
//! │   ├── codec.rs
//! │   └── audit.rs
//! │
//! └── integration/      # Cross-crate flows
//!     ├── flows.rs      # Register → pending → confirm → decode
//!     └── audit_trail.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p bdap-tests
//!
//! # By category
//! cargo test -p bdap-tests integration::
//!
//! # Benchmarks
//! cargo bench -p bdap-tests
//! ```

pub mod benchmarks;
pub mod fixtures;
pub mod integration;
