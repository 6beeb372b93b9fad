//! # Path Attestation Benchmarks
//!
//! Falcon-512 cost per route:
//! - Signing one hop onto chains of increasing length
//! - Full-chain verification at 1, 15 and 80 hops
//! - Parallel batch verification against one key snapshot
//!
//! Canonical encoding grows with the path, so both signing and
//! verification are expected to be slightly super-linear in hop count.

use crate::fixtures::{builder, falcon_chain, numbered_speakers, prefix, snapshot, FalconSpeaker, NOW};
use bgpsec_path_attestation::test_utils::FixedTimeSource;
use bgpsec_path_attestation::{
    AttestationChain, AttestationService, CanonicalEncoder, Falcon512Scheme,
    PathAttestationApi, PathAttestationVerifier, SnapshotKeyStore, VerifierConfig,
};
use criterion::{black_box, BenchmarkId, Criterion, Throughput};
use shared_types::AlgorithmSuite;
use std::sync::Arc;
use std::time::Duration;

const HOP_COUNTS: [usize; 3] = [1, 15, 80];

/// Chains of every length in `HOP_COUNTS`, all signed by the same speakers.
fn chains_by_length(speakers: &[FalconSpeaker]) -> Vec<(usize, AttestationChain)> {
    HOP_COUNTS
        .iter()
        .map(|&hops| (hops, falcon_chain(prefix("203.0.113.0/24"), &speakers[..hops])))
        .collect()
}

pub fn bench_canonical_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("bgpsec/encode_hop");
    let speakers = numbered_speakers(80);

    for (hops, chain) in chains_by_length(&speakers) {
        let last = hops - 1;
        group.bench_with_input(BenchmarkId::from_parameter(hops), &chain, |b, chain| {
            b.iter(|| {
                black_box(CanonicalEncoder::encode_hop(chain, last, AlgorithmSuite::Falcon512))
            })
        });
    }

    group.finish();
}

pub fn bench_sign_hop(c: &mut Criterion) {
    let mut group = c.benchmark_group("bgpsec/sign_hop");
    group.measurement_time(Duration::from_secs(10));

    let speakers = numbered_speakers(81);
    let next = &speakers[80];
    let builder = builder();

    for (hops, chain) in chains_by_length(&speakers[..80]) {
        group.bench_with_input(BenchmarkId::new("forward_onto", hops), &chain, |b, chain| {
            b.iter(|| black_box(builder.forward(chain, &next.signer)))
        });
    }

    group.finish();
}

pub fn bench_verify_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("bgpsec/verify_chain");
    group.measurement_time(Duration::from_secs(10));

    let speakers = numbered_speakers(80);
    let keys = snapshot(&speakers);
    let verifier =
        PathAttestationVerifier::new(Arc::new(Falcon512Scheme::new()), VerifierConfig::default());

    for (hops, chain) in chains_by_length(&speakers) {
        group.throughput(Throughput::Elements(hops as u64));
        group.bench_with_input(BenchmarkId::from_parameter(hops), &chain, |b, chain| {
            b.iter(|| black_box(verifier.verify_with_snapshot(chain, &keys, NOW)))
        });
    }

    group.finish();
}

pub fn bench_verify_batch(c: &mut Criterion) {
    let mut group = c.benchmark_group("bgpsec/verify_batch");
    group.measurement_time(Duration::from_secs(15));

    let speakers = numbered_speakers(15);
    let store = SnapshotKeyStore::new(snapshot(&speakers));
    let service = AttestationService::with_time_source(
        Arc::new(store),
        Arc::new(Falcon512Scheme::new()),
        VerifierConfig::default(),
        FixedTimeSource::new(NOW),
    )
    .expect("default config is valid");
    let keys = service.key_store().snapshot();
    let route = falcon_chain(prefix("203.0.113.0/24"), &speakers);

    for size in [10, 100, 500] {
        let chains = vec![route.clone(); size];
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("parallel", size), &chains, |b, chains| {
            b.iter(|| black_box(service.verify_batch_with_snapshot(&keys, chains)))
        });
    }

    group.finish();
}

pub fn register_benchmarks(c: &mut Criterion) {
    bench_canonical_encoding(c);
    bench_sign_hop(c);
    bench_verify_chain(c);
    bench_verify_batch(c);
}
