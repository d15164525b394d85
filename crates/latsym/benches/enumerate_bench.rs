//! Criterion benchmarks for supercell enumeration.
//! - HNF generation for volumes {4, 12, 24}.
//! - Full enumeration of the hexagonal (ZrO-type) cell under D6h and simple
//!   cubic under Oh, up to max volume {2, 4, 6}.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use latsym::api::{
    cubic_point_group, hermite_normal_forms, hexagonal_point_group, hexagonal_prim, EnumParams,
    Lattice, PointGroup, SupercellEnumerator,
};

fn bench_hnf(c: &mut Criterion) {
    let mut group = c.benchmark_group("hnf");
    for &n in &[4u64, 12, 24] {
        group.bench_with_input(BenchmarkId::new("3d", n), &n, |b, &n| {
            b.iter(|| hermite_normal_forms(n, 3).len())
        });
    }
    group.finish();
}

fn bench_enumerate(c: &mut Criterion) {
    let mut group = c.benchmark_group("enumerate");
    group.sample_size(10);
    let d6h = hexagonal_point_group(1e-8).unwrap();
    let d6h = PointGroup::from_master(&d6h);
    let oh = cubic_point_group(1e-8).unwrap();
    let oh = PointGroup::from_master(&oh);
    let zro = hexagonal_prim(3.23398686, 5.16867834).unwrap();
    let cases = [("zro_d6h", zro, &d6h), ("sc_oh", Lattice::cubic(), &oh)];
    for (name, reference, pg) in &cases {
        for &max in &[2u64, 4, 6] {
            group.bench_with_input(BenchmarkId::new(*name, max), &max, |b, &max| {
                b.iter(|| {
                    SupercellEnumerator::new(reference.clone(), pg, EnumParams::new(1, max, 3))
                        .unwrap()
                        .count()
                })
            });
        }
    }
    group.finish();
}

criterion_group!(benches, bench_hnf, bench_enumerate);
criterion_main!(benches);
