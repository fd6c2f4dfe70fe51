//! Criterion micro-benchmarks for guard fill and spatial slicing.

use std::hint::black_box;

use amrio_bench::{build, refined_grid};
use amrio_core::{SortedSeries, Time};
use amrio_field::{apply_guard_plan, AxisSlice, FieldArray, SliceFields, SpatialSlice};
use amrio_sim::{SimulationConfig, SimulationData};
use amrio_test_utils::fixtures::uniform_snapshot;
use criterion::{criterion_group, criterion_main, Criterion};
use ndarray::Array4;

/// Benchmark: apply a coarse/fine guard plan to one field of 360 blocks.
fn bench_guard_fill_refined(c: &mut Criterion) {
    let geo = build(refined_grid(12));
    let interior = Array4::from_shape_fn((geo.len(), 1, 4, 4), |(b, _, y, x)| (b * 16 + y * 4 + x) as f64);
    let mut field = FieldArray::from_payload("dens", interior, geo.shape(), geo.len())
        .expect("interior payload fits");

    c.bench_function("guard_fill_refined_360", |b| {
        b.iter(|| {
            apply_guard_plan(&mut field, geo.guard_plan()).expect("plan matches field");
            black_box(&field);
        });
    });
}

/// Benchmark: assemble and merge 10 timesteps of an 8x8 uniform grid.
fn bench_merge_10_timesteps(c: &mut Criterion) {
    c.bench_function("merge_10_timesteps_64_blocks", |b| {
        b.iter(|| {
            let data = SimulationData::from_snapshots(
                (0..10).map(|t| uniform_snapshot(8, 8, t as f64)),
                SimulationConfig::default(),
            );
            black_box(data)
        });
    });
}

/// Benchmark: slice one row out of 64 timesteps and stack them.
fn bench_slice_and_stack(c: &mut Criterion) {
    let geo = build(refined_grid(8));
    let field = FieldArray::zeros(geo.shape(), geo.len());
    let projection: SortedSeries<Time, &FieldArray> =
        SortedSeries::from_sorted((0..64).map(|t| (Time(t as f64), &field)));
    let row = SpatialSlice::from([AxisSlice::Ellipsis, AxisSlice::Index(2), AxisSlice::Full]);

    c.bench_function("slice_stack_64_timesteps", |b| {
        b.iter(|| black_box(projection.stack(&row)));
    });
}

criterion_group!(
    benches,
    bench_guard_fill_refined,
    bench_merge_10_timesteps,
    bench_slice_and_stack
);
criterion_main!(benches);
