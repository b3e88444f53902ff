//! Performance Benchmarks for CLOAK Ledger Primitives
//!
//! Run with: cargo bench

use std::sync::Arc;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use cloak::pool::{shield_inputs, TOKEN_UNIT};
use cloak::prelude::*;

// =============================================================================
// HASH ORACLE BENCHMARKS
// =============================================================================

fn bench_hash_pair(c: &mut Criterion) {
    let mut group = c.benchmark_group("hash_pair");
    let left = FieldElement::from_u64(1);
    let right = FieldElement::from_u64(2);

    let poseidon = PoseidonOracle::new();
    group.bench_function("poseidon", |b| b.iter(|| poseidon.hash_pair(&left, &right)));
    group.bench_function("blake3", |b| b.iter(|| Blake3Oracle.hash_pair(&left, &right)));

    group.finish();
}

// =============================================================================
// ACCUMULATOR BENCHMARKS
// =============================================================================

fn bench_accumulator_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulator_insert");

    for depth in [16usize, 20, 32] {
        let oracle: Arc<dyn HashOracle> = Arc::new(PoseidonOracle::new());
        group.throughput(Throughput::Elements(1));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            let mut accumulator = Accumulator::new(depth, oracle.clone()).unwrap();
            let mut i = 0u64;
            b.iter(|| {
                if accumulator.is_full() {
                    accumulator = Accumulator::new(depth, oracle.clone()).unwrap();
                }
                i += 1;
                accumulator.insert(FieldElement::from_u64(i)).unwrap()
            })
        });
    }

    group.finish();
}

fn bench_is_known_root(c: &mut Criterion) {
    let mut accumulator = Accumulator::new(20, Arc::new(Blake3Oracle)).unwrap();
    for i in 0..150u64 {
        accumulator.insert(FieldElement::from_u64(i)).unwrap();
    }
    let newest = accumulator.last_root();
    let missing = FieldElement::from_u64(u64::MAX);

    let mut group = c.benchmark_group("is_known_root");
    group.bench_function("newest", |b| b.iter(|| accumulator.is_known_root(&newest)));
    group.bench_function("missing", |b| b.iter(|| accumulator.is_known_root(&missing)));
    group.finish();
}

// =============================================================================
// POOL BENCHMARKS
// =============================================================================

fn bench_shield(c: &mut Criterion) {
    let alice = Address::from_bytes([0xa1; 20]);
    let custody = Arc::new(InMemoryCustody::new());
    custody.fund(AssetHandle::Native, alice, u128::MAX / 2);

    let config = PoolConfig {
        inflow_ceiling: u128::MAX,
        ..PoolConfig::local()
    };
    let pool = ShieldedPool::from_config(
        &config,
        Arc::new(PoseidonOracle::new()),
        Collaborators::new(
            VerifierSet::digest(),
            custody,
            Arc::new(AdminList::default()),
        ),
    )
    .unwrap();

    let mut i = 0u64;
    c.bench_function("shield", |b| {
        b.iter(|| {
            i += 1;
            let commitment = FieldElement::from_u64(i);
            let proof = Proof::digest(
                Circuit::Shield,
                &shield_inputs(TOKEN_UNIT, NATIVE_ASSET_ID, commitment),
            );
            pool.shield(
                &CallContext::new(alice, 1, 0),
                &proof,
                commitment,
                TOKEN_UNIT,
                NATIVE_ASSET_ID,
                None,
            )
            .unwrap()
        })
    });
}

fn bench_nullifier_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("nullifier_set");

    for size in [1_000u64, 100_000] {
        let set: NullifierSet = (0..size).map(FieldElement::from_u64).collect();
        let probe = FieldElement::from_u64(size / 2);
        group.bench_with_input(BenchmarkId::new("is_spent", size), &set, |b, set| {
            b.iter(|| set.is_spent(&probe))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_hash_pair,
    bench_accumulator_insert,
    bench_is_known_root,
    bench_shield,
    bench_nullifier_set,
);
criterion_main!(benches);
