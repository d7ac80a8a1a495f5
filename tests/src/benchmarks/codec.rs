//! # Codec Benchmarks
//!
//! Decode-with-commitment runs for every BDAP output a node sees, so it is
//! measured next to plain encoding and script classification.
//!
//! Conditions:
//! - Realistic entries built through the registration path
//! - Truncated payloads, which must fail fast
//! - Batches of distinct entries

use std::time::Duration;

use bdap_registry::{classify_script, BdapApi, CanonicalRecord, Commitment, DomainEntry};
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use shared_crypto::Secp256k1KeyPair;

use crate::fixtures::{new_service, register};

fn sample_entries(count: usize) -> Vec<(DomainEntry, Vec<u8>)> {
    let service = new_service();
    (0..count)
        .map(|i| {
            let key = Secp256k1KeyPair::generate();
            let (_, built) =
                register(&service, &format!("user{i:04}"), &key).expect("fixture registration");
            (built.entry, built.payload)
        })
        .collect()
}

pub fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/encode");
    group.measurement_time(Duration::from_secs(5));

    let (entry, _) = sample_entries(1).remove(0);
    group.bench_function("domain_entry", |b| b.iter(|| black_box(entry.encode())));
    group.bench_function("commitment", |b| b.iter(|| black_box(entry.commitment())));
    group.finish();
}

pub fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/decode");
    group.measurement_time(Duration::from_secs(5));

    let (_, payload) = sample_entries(1).remove(0);
    let commitment = Commitment::of(&payload);
    group.bench_function("with_commitment", |b| {
        b.iter(|| {
            black_box(DomainEntry::decode_with_commitment(
                black_box(&payload),
                commitment.as_bytes(),
            ))
        })
    });

    let truncated = &payload[..payload.len() / 2];
    group.bench_function("truncated", |b| {
        b.iter(|| black_box(DomainEntry::decode(black_box(truncated)).is_err()))
    });

    for size in [10usize, 100, 500] {
        let entries = sample_entries(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("batch", size), &entries, |b, entries| {
            b.iter(|| {
                entries
                    .iter()
                    .filter(|(_, payload)| {
                        DomainEntry::decode_with_commitment(payload, Commitment::of(payload).as_bytes())
                            .is_ok()
                    })
                    .count()
            })
        });
    }
    group.finish();
}

pub fn bench_classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec/classify");

    let service = new_service();
    let key = Secp256k1KeyPair::generate();
    let (tx, built) = register(&service, "bench", &key).expect("fixture registration");

    group.bench_function("operation_script", |b| {
        b.iter(|| black_box(classify_script(black_box(&built.operation_script))))
    });
    group.bench_function("data_script", |b| {
        b.iter(|| black_box(classify_script(black_box(&built.data_script))))
    });
    group.bench_function("decode_transaction", |b| {
        b.iter(|| black_box(service.decode_transaction(black_box(&tx))))
    });
    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_encode(c);
    bench_decode(c);
    bench_classify(c);
}
