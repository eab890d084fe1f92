//! Lookup benchmarks
//!
//! Benchmarks for the linear-scan queries over model collections:
//! - Result lookup by (scene, spp)
//! - Results per scene
//! - Metric ranking
//!
//! Toyota Way: Measure before optimizing (Genchi Genbutsu)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use renderbench_model::identity::{IdAllocator, SceneId, TechniqueKind};
use renderbench_model::metric::MetricRegistry;
use renderbench_model::scene::Scene;
use renderbench_model::technique::TechniqueVersion;

const SPPS: [u32; 8] = [1, 2, 4, 8, 16, 32, 64, 128];

/// Create a filter version with one result per (scene, spp) pair
fn create_version(ids: &IdAllocator, num_scenes: u32) -> (Vec<SceneId>, TechniqueVersion) {
    let scenes: Vec<SceneId> = (0..num_scenes)
        .map(|i| Scene::new(ids, format!("scene-{i}")).id())
        .collect();
    let mut version = TechniqueVersion::new(ids, TechniqueKind::Filter, "v1");
    for (&scene, offset) in scenes.iter().zip(0u32..) {
        for spp in SPPS {
            let result = version.new_result(ids, scene, spp).unwrap();
            result.set_metric("PSNR", 20.0 + f64::from(offset) + f64::from(spp).log2());
        }
    }
    (scenes, version)
}

/// Benchmark get_result over growing result lists
fn bench_get_result(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_result");
    let ids = IdAllocator::new();

    for scenes in [4u32, 32, 256].iter() {
        let (corpus, version) = create_version(&ids, *scenes);
        let last = corpus[corpus.len() - 1];

        group.bench_with_input(BenchmarkId::from_parameter(scenes), scenes, |b, _| {
            b.iter(|| {
                let found = version.get_result(black_box(last), black_box(128));
                black_box(found);
            });
        });
    }

    group.finish();
}

/// Benchmark get_results (all sample counts of one scene)
fn bench_get_results(c: &mut Criterion) {
    let mut group = c.benchmark_group("get_results");
    let ids = IdAllocator::new();

    for scenes in [4u32, 32, 256].iter() {
        let (corpus, version) = create_version(&ids, *scenes);
        let first = corpus[0];

        group.bench_with_input(BenchmarkId::from_parameter(scenes), scenes, |b, _| {
            b.iter(|| {
                let results = version.get_results(black_box(first));
                black_box(results);
            });
        });
    }

    group.finish();
}

/// Benchmark ranking every result of a version by PSNR
fn bench_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank");
    let ids = IdAllocator::new();
    let registry = MetricRegistry::with_builtins();

    for scenes in [4u32, 32, 256].iter() {
        let (_, version) = create_version(&ids, *scenes);

        group.bench_with_input(BenchmarkId::from_parameter(scenes), scenes, |b, _| {
            b.iter(|| {
                let ranked = registry.rank("PSNR", version.results()).unwrap();
                black_box(ranked);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_get_result, bench_get_results, bench_rank);
criterion_main!(benches);
