//! Criterion benchmarks for Niggli reduction and canonical forms.
//! Inputs are reference lattices skewed by `k` random elementary shears,
//! k in {2, 8, 32}. Results land under target/criterion.

use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use latsym::api::{
    canonical_equivalent_lattice, cubic_point_group, niggli, Lattice, PointGroup,
};
use latsym::cfg::DEFAULT_TOL;
use nalgebra::Matrix3;
use rand::{rngs::StdRng, Rng, SeedableRng};

fn random_unimodular(rng: &mut StdRng, shears: usize) -> Matrix3<i64> {
    let mut u = Matrix3::<i64>::identity();
    for _ in 0..shears {
        let i = rng.gen_range(0..3);
        let j = (i + rng.gen_range(1..3)) % 3;
        let mut e = Matrix3::<i64>::identity();
        e[(i, j)] = if rng.gen::<bool>() { 1 } else { -1 };
        u *= e;
    }
    u
}

fn skewed(lattice: &Lattice, shears: usize, seed: u64) -> Lattice {
    let mut rng = StdRng::seed_from_u64(seed);
    let u = random_unimodular(&mut rng, shears);
    lattice
        .make_supercell(&u)
        .expect("unimodular transform keeps the lattice regular")
}

fn bench_niggli(c: &mut Criterion) {
    let mut group = c.benchmark_group("niggli");
    let references = [
        ("fcc", Lattice::fcc()),
        ("hexagonal", Lattice::hexagonal()),
    ];
    for (name, lattice) in &references {
        for &k in &[2usize, 8, 32] {
            group.bench_with_input(BenchmarkId::new(*name, k), &k, |b, &k| {
                let mut seed = 0u64;
                b.iter_batched(
                    || {
                        seed = seed.wrapping_add(1);
                        skewed(lattice, k, seed)
                    },
                    |lat| {
                        let _ = niggli(&lat, DEFAULT_TOL).unwrap();
                    },
                    BatchSize::SmallInput,
                )
            });
        }
    }
    group.finish();
}

fn bench_canonical(c: &mut Criterion) {
    let mut group = c.benchmark_group("canonical_oh");
    let oh = cubic_point_group(1e-8).unwrap();
    let pg = PointGroup::from_master(&oh);
    for &k in &[2usize, 8] {
        group.bench_with_input(BenchmarkId::new("fcc", k), &k, |b, &k| {
            b.iter_batched(
                || skewed(&Lattice::fcc(), k, 17),
                |lat| {
                    let _ = canonical_equivalent_lattice(&lat, &pg, DEFAULT_TOL).unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }
    group.finish();
}

criterion_group!(benches, bench_niggli, bench_canonical);
criterion_main!(benches);
