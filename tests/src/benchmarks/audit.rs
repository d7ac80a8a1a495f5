//! # Audit Verification Benchmarks
//!
//! Single signature checks against the parallel batch path.

use std::time::Duration;

use bdap_registry::{verify_batch, Audit, AuditData};
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use shared_crypto::{hash256_hex, Secp256k1KeyPair};

fn signed_audits(key: &Secp256k1KeyPair, count: usize) -> Vec<Audit> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let document: [u8; 32] = rng.gen();
            let data = AuditData::new(vec![hash256_hex(&document).into_bytes()], rng.gen());
            let mut audit = Audit::from_data(&data, "bench@public.bdap.io");
            audit.sign(key).expect("signing with a valid key");
            audit
        })
        .collect()
}

pub fn bench_single_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("audit/single");
    group.measurement_time(Duration::from_secs(10));

    let key = Secp256k1KeyPair::generate();
    let public = key.public_key().to_compressed_bytes();
    let audit = signed_audits(&key, 1).remove(0);

    group.bench_function("check_signature", |b| {
        b.iter(|| black_box(audit.check_signature(black_box(&public))))
    });
    group.bench_function("sign", |b| {
        b.iter(|| {
            let mut audit = audit.clone();
            black_box(audit.sign(&key).is_ok())
        })
    });
    group.finish();
}

pub fn bench_batch_verify(c: &mut Criterion) {
    let mut group = c.benchmark_group("audit/batch");
    group.measurement_time(Duration::from_secs(15));

    let key = Secp256k1KeyPair::generate();
    let public = key.public_key().to_compressed_bytes();

    for size in [10usize, 100, 1_000] {
        let audits = signed_audits(&key, size);
        let requests: Vec<(&Audit, &[u8])> =
            audits.iter().map(|audit| (audit, public.as_slice())).collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("sequential", size), &requests, |b, requests| {
            b.iter(|| {
                requests
                    .iter()
                    .filter(|(audit, key)| audit.check_signature(key))
                    .count()
            })
        });
        group.bench_with_input(BenchmarkId::new("parallel", size), &requests, |b, requests| {
            b.iter(|| black_box(verify_batch(requests)))
        });
    }
    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_single_verify(c);
    bench_batch_verify(c);
}
