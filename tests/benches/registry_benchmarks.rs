//! # BDAP Registry Benchmarks
//!
//! | Group | Measures |
//! |-------|----------|
//! | `codec/*` | entry encode, decode-with-commitment, script classification |
//! | `audit/*` | single signature check vs. parallel batch |

use bdap_tests::benchmarks::{audit, codec};
use criterion::{criterion_group, criterion_main, Criterion};

fn registry_benchmarks(c: &mut Criterion) {
    codec::register_benchmarks(c);
    audit::register_benchmarks(c);
}

criterion_group!(benches, registry_benchmarks);
criterion_main!(benches);
