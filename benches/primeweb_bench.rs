//! Criterion benchmarks for the prime-web pipeline.
//!
//! Each phase is measured separately over a few prime limits so the
//! cost of factorization and search can be told apart.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use u_primeweb::arith::{factorize_u64, primes_up_to, FactorLimits};
use u_primeweb::cp::{CpSolver, PropagatingSolver, SolverConfig};
use u_primeweb::web::{encode, CandidateBuilder, WebConfig};

// ===========================================================================
// Arithmetic
// ===========================================================================

fn bench_sieve(c: &mut Criterion) {
    let mut group = c.benchmark_group("sieve");
    for &limit in &[1_000u64, 100_000, 1_000_000] {
        group.bench_with_input(BenchmarkId::from_parameter(limit), &limit, |b, &n| {
            b.iter(|| black_box(primes_up_to(black_box(n))))
        });
    }
    group.finish();
}

fn bench_factorize(c: &mut Criterion) {
    let limits = FactorLimits::default();
    // σ(p^k) values of increasing size: 2801 = σ(7^4), 10303 = 101·103,
    // and a product of two six-digit primes.
    let inputs = [2_801u64, 10_303, 100_003 * 100_019];
    let mut group = c.benchmark_group("factorize");
    for &n in &inputs {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(factorize_u64(black_box(n), &limits)))
        });
    }
    group.finish();
}

// ===========================================================================
// Pipeline phases
// ===========================================================================

fn bench_candidate_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("candidate_build");
    group.sample_size(10);
    for &limit in &[150u64, 1_000, 3_000] {
        for parallel in [false, true] {
            let config = WebConfig::default()
                .with_prime_limit(limit)
                .with_parallel(parallel);
            let id = format!("{}{}", limit, if parallel { "_par" } else { "" });
            group.bench_with_input(BenchmarkId::from_parameter(id), &config, |b, cfg| {
                b.iter(|| black_box(CandidateBuilder::new(black_box(cfg)).build()))
            });
        }
    }
    group.finish();
}

fn bench_encode_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode_solve");
    group.sample_size(10);
    let solver = PropagatingSolver::new();
    for &limit in &[150u64, 300, 1_000] {
        let config = WebConfig::default().with_prime_limit(limit);
        let table = CandidateBuilder::new(&config).build();
        let solver_config = SolverConfig::default().with_time_limit_ms(config.time_limit_ms());
        group.bench_with_input(
            BenchmarkId::from_parameter(limit),
            &(config, table),
            |b, (cfg, table)| {
                b.iter(|| {
                    let encoded = encode(black_box(table), cfg);
                    black_box(solver.solve(&encoded.model, &solver_config))
                })
            },
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_sieve,
    bench_factorize,
    bench_candidate_build,
    bench_encode_solve
);
criterion_main!(benches);
