//! Benchmark Model Schema Tests
//!
//! End-to-end scenarios over the technique, scene and result hierarchy.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use renderbench_model::identity::{IdAllocator, TechniqueKind};
use renderbench_model::metric::{IqaMetric, MetricRegistry};
use renderbench_model::results::TechniqueResult;
use renderbench_model::scene::{
    ConfigScene, NoiseSource, NoiseWeights, RegionBounds, Renderer, Scene,
};
use renderbench_model::technique::Technique;
use renderbench_model::{Catalog, Error};

// =============================================================================
// Core Scenario
// =============================================================================

#[test]
fn test_nlm_bathroom_scenario() {
    let ids = IdAllocator::new();

    let mut nlm = Technique::filter(&ids, "NLM");
    nlm.new_version(&ids, "v1").unwrap();

    let mut pbrt = Renderer::new(&ids, "pbrt");
    let bathroom = pbrt.new_scene(&ids, "bathroom").unwrap();
    bathroom.ground_truth = "bathroom_ref.exr".into();
    let bathroom = bathroom.id();

    nlm.get_version_mut("v1")
        .unwrap()
        .new_result(&ids, bathroom, 4)
        .unwrap();

    let version = nlm.get_version("v1").unwrap();
    assert!(version.has_result(bathroom, 4));
    assert!(!version.has_result(bathroom, 8));
    assert_eq!(version.get_name(&nlm).unwrap(), "NLM-v1");

    let scene = pbrt.get_scene_by_id(bathroom).unwrap();
    assert_eq!(
        scene.get_reference(&pbrt).unwrap(),
        Path::new("pbrt/bathroom_ref.exr")
    );
}

#[test]
fn test_filter_ids_independent_of_sampler_ids() {
    let ids = IdAllocator::new();

    let f1 = Technique::filter(&ids, "NLM");
    let s1 = Technique::sampler(&ids, "Sobol");
    let s2 = Technique::sampler(&ids, "Halton");
    let f2 = Technique::filter(&ids, "RHF");

    assert_eq!(f1.id().seq(), 1);
    assert_eq!(f2.id().seq(), 2);
    assert_eq!(s1.id().seq(), 1);
    assert_eq!(s2.id().seq(), 2);
    assert_ne!(f1.uuid(), s1.uuid());
}

#[test]
fn test_versions_and_results_have_own_sequences() {
    let ids = IdAllocator::new();
    let mut nlm = Technique::filter(&ids, "NLM");
    let mut sobol = Technique::sampler(&ids, "Sobol");

    let fv = nlm.new_version(&ids, "v1").unwrap().id();
    let sv = sobol.new_version(&ids, "v1").unwrap().id();
    assert_eq!(fv.seq(), 1);
    assert_eq!(sv.seq(), 1);
    assert_ne!(fv, sv);

    let sponza = Scene::new(&ids, "sponza").id();
    let fr = nlm
        .get_version_mut("v1")
        .unwrap()
        .new_result(&ids, sponza, 4)
        .unwrap()
        .id();
    assert_eq!(fr.kind(), TechniqueKind::Filter);
    assert_eq!(fr.seq(), 1);
}

// =============================================================================
// Result Queries
// =============================================================================

#[test]
fn test_get_results_preserves_insertion_order() {
    let ids = IdAllocator::new();
    let mut pbrt = Renderer::new(&ids, "pbrt");
    let a = pbrt.new_scene(&ids, "sponza").unwrap().id();
    let b = pbrt.new_scene(&ids, "villa").unwrap().id();

    let mut lbf = Technique::filter(&ids, "LBF");
    let v = lbf.new_version(&ids, "v1").unwrap();
    for (scene, spp) in [(a, 16), (b, 4), (a, 2), (b, 16), (a, 8)] {
        v.new_result(&ids, scene, spp).unwrap();
    }

    let spps: Vec<u32> = v.get_results(a).iter().map(|r| r.spp()).collect();
    assert_eq!(spps, vec![16, 2, 8]);
    assert!(v.get_results(a).iter().all(|r| r.scene() == a));
    assert_eq!(v.get_results(b).len(), 2);
}

#[test]
fn test_scene_identity_not_name() {
    // Two renderers each with a scene called "bathroom": results for one
    // must not be found through the other.
    let ids = IdAllocator::new();
    let mut pbrt = Renderer::new(&ids, "pbrt");
    let mut mitsuba = Renderer::new(&ids, "mitsuba");
    let pbrt_bath = pbrt.new_scene(&ids, "bathroom").unwrap().id();
    let mitsuba_bath = mitsuba.new_scene(&ids, "bathroom").unwrap().id();

    let mut nlm = Technique::filter(&ids, "NLM");
    let v = nlm.new_version(&ids, "v1").unwrap();
    v.new_result(&ids, pbrt_bath, 4).unwrap();

    assert!(v.has_result(pbrt_bath, 4));
    assert!(!v.has_result(mitsuba_bath, 4));
}

#[test]
fn test_identity_survives_separate_allocators() {
    // Scenes, techniques and results built with two allocators share
    // sequence ids but remain distinct entities.
    let first = IdAllocator::new();
    let second = IdAllocator::new();

    let mut pbrt = Renderer::new(&first, "pbrt");
    let bathroom = pbrt.new_scene(&first, "bathroom").unwrap();
    bathroom.ground_truth = "bathroom.exr".into();
    let bathroom = bathroom.id();
    let mut mitsuba = Renderer::new(&second, "mitsuba");
    let villa = mitsuba.new_scene(&second, "villa").unwrap().id();
    assert_eq!(bathroom.seq(), villa.seq());
    assert_ne!(bathroom, villa);

    let mut nlm = Technique::filter(&first, "NLM");
    let rhf = Technique::filter(&second, "RHF");
    nlm.new_version(&first, "v1")
        .unwrap()
        .new_result(&first, bathroom, 4)
        .unwrap();
    let v1 = nlm.get_version("v1").unwrap();
    assert!(v1.has_result(bathroom, 4));
    assert!(!v1.has_result(villa, 4));
    assert!(matches!(
        v1.get_name(&rhf),
        Err(Error::TechniqueMismatch { .. })
    ));

    let mut catalog = Catalog::new();
    catalog.add_renderer(pbrt).unwrap();
    assert!(catalog.scene(villa).is_none());
    assert_eq!(catalog.scene_reference(villa), Err(Error::UnknownScene(villa)));
    assert_eq!(
        catalog.scene_reference(bathroom).unwrap(),
        Path::new("pbrt").join("bathroom.exr")
    );

    catalog.add_renderer(mitsuba).unwrap();
    assert_eq!(catalog.scene(villa).map(Scene::get_name), Some("villa"));
}

#[test]
fn test_execution_driver_updates() {
    let ids = IdAllocator::new();
    let registry = MetricRegistry::with_builtins();
    let mut nlm = Technique::filter(&ids, "NLM");
    let v = nlm.new_version(&ids, "v1").unwrap();
    v.executable = "filters/nlm/v1/nlm".into();
    v.status = "ready".into();
    v.message = "built from tag v1".into();

    let scene = Scene::new(&ids, "sponza").id();
    let result = v.new_result(&ids, scene, 8).unwrap();
    result.exec_time = Duration::from_millis(1250);
    for metric in registry.iter() {
        result.set_metric(metric.acronym(), 0.5);
    }
    assert!(result.missing_metrics(&registry).is_empty());

    let aborted = v.new_result(&ids, scene, 16).unwrap();
    aborted.aborted = true;
    aborted.set_metric("MSE", 0.9);
    assert_eq!(aborted.missing_metrics(&registry), vec!["PSNR", "SSIM", "rMSE"]);

    assert_eq!(v.status, "ready");
    assert_eq!(v.results().len(), 2);
}

// =============================================================================
// Scene Corpus
// =============================================================================

#[test]
fn test_scene_and_region_weights() {
    let ids = IdAllocator::new();
    let mut pbrt = Renderer::new(&ids, "pbrt");
    let scene = pbrt.new_scene(&ids, "car").unwrap();
    scene.weights = NoiseWeights::new(0.0, 0.8, 0.2, 0.0, 0.0).unwrap();

    let region = scene.new_region(&ids, RegionBounds::new(100, 100, 200, 150).unwrap());
    region.weights.set(NoiseSource::Glossy, 1.0).unwrap();

    let scene = pbrt.get_scene("car").unwrap();
    assert_eq!(scene.weights.dominant(), Some(NoiseSource::MotionBlur));
    assert_eq!(
        scene.regions()[0].weights.dominant(),
        Some(NoiseSource::Glossy)
    );
    assert_eq!(scene.regions()[0].bounds().area(), 5000);
}

#[test]
fn test_config_scene_pending_runs() {
    let ids = IdAllocator::new();
    let mut pbrt = Renderer::new(&ids, "pbrt");
    pbrt.new_scene(&ids, "sponza").unwrap();
    pbrt.new_scene(&ids, "villa").unwrap();

    let mut nlm = Technique::filter(&ids, "NLM");
    let v = nlm.new_version(&ids, "v1").unwrap();
    let sponza = pbrt.get_scene("sponza").unwrap();
    v.new_result(&ids, sponza.id(), 4).unwrap();
    v.new_result(&ids, sponza.id(), 8).unwrap();
    let v = &*v;

    let configs: Vec<ConfigScene<'_>> = pbrt
        .scenes()
        .iter()
        .map(|s| ConfigScene::new(s, vec![4, 8, 16]))
        .collect();

    let pending: Vec<(&str, Vec<u32>)> = configs
        .iter()
        .map(|c| (c.get_name(), c.pending_spps(v)))
        .collect();
    assert_eq!(
        pending,
        vec![("sponza", vec![16]), ("villa", vec![4, 8, 16])]
    );
}

// =============================================================================
// Region Errors
// =============================================================================

#[test]
fn test_every_region_scored_once() {
    let mut catalog = Catalog::builder().builtin_metrics().build().unwrap();
    let ids = Arc::clone(catalog.allocator());

    let mut pbrt = Renderer::new(&ids, "pbrt");
    let scene = pbrt.new_scene(&ids, "kitchen").unwrap();
    for i in 0..4 {
        scene.new_region(&ids, RegionBounds::new(i * 64, 0, (i + 1) * 64, 64).unwrap());
    }
    let scene_id = scene.id();
    let regions: Vec<_> = scene.regions().iter().map(|r| r.id()).collect();
    catalog.add_renderer(pbrt).unwrap();

    // Simulated execution driver: one region error per region per result.
    let mut nlm = Technique::filter(&ids, "NLM");
    let v = nlm.new_version(&ids, "v1").unwrap();
    for spp in [2, 4, 8] {
        let result = v.new_result(&ids, scene_id, spp).unwrap();
        for &region in &regions {
            let error = result.new_region_error(&ids, region).unwrap();
            error.set_metric("MSE", 1.0 / f64::from(spp));
        }
    }
    catalog.add_technique(nlm).unwrap();

    assert_eq!(catalog.check_region_coverage(), Ok(()));

    let v = catalog.get_filter("NLM").unwrap().get_version("v1").unwrap();
    for result in v.results() {
        assert_eq!(result.region_errors().len(), regions.len());
        for region_error in result.region_errors() {
            assert_eq!(region_error.result(), result.id());
        }
    }
}

// =============================================================================
// Ranking
// =============================================================================

#[test]
fn test_rank_versions_by_metric() {
    let ids = IdAllocator::new();
    let registry = MetricRegistry::with_builtins();
    let scene = Scene::new(&ids, "bathroom").id();

    let mut results = Vec::new();
    for (psnr, ssim) in [(30.0, 0.80), (34.0, 0.75), (32.0, 0.90)] {
        let mut r = TechniqueResult::new(&ids, TechniqueKind::Filter, scene, 4);
        r.set_metric("PSNR", psnr);
        r.set_metric("SSIM", ssim);
        r.set_metric("MSE", 1.0 / psnr);
        results.push(r);
    }

    let by_psnr: Vec<_> = registry
        .rank("PSNR", &results)
        .unwrap()
        .iter()
        .map(|r| r.id().seq())
        .collect();
    assert_eq!(by_psnr, vec![2, 3, 1]);

    let by_mse: Vec<_> = registry
        .rank("MSE", &results)
        .unwrap()
        .iter()
        .map(|r| r.id().seq())
        .collect();
    assert_eq!(by_mse, vec![2, 3, 1]);

    let by_ssim: Vec<_> = registry
        .rank("SSIM", &results)
        .unwrap()
        .iter()
        .map(|r| r.id().seq())
        .collect();
    assert_eq!(by_ssim, vec![3, 1, 2]);
}

// =============================================================================
// Catalog
// =============================================================================

#[test]
fn test_catalog_full_lifecycle() {
    let mut catalog = Catalog::builder()
        .builtin_metrics()
        .metric(
            IqaMetric::builder("FLIP", "NVIDIA FLIP")
                .has_error_map(true)
                .command("iqa/flip")
                .build(),
        )
        .build()
        .unwrap();
    let ids = Arc::clone(catalog.allocator());

    // 1. Corpus
    let mut pbrt = Renderer::new(&ids, "pbrt");
    pbrt.is_ready = true;
    for name in ["bathroom", "sponza"] {
        let scene = pbrt.new_scene(&ids, name).unwrap();
        scene.ground_truth = format!("{name}.exr").into();
    }
    catalog.add_renderer(pbrt).unwrap();

    // 2. Techniques
    let nlm = Technique::builder(TechniqueKind::Filter, "NLM")
        .full_name("Non-Local Means")
        .build(&ids);
    catalog.add_technique(nlm).unwrap();
    catalog
        .add_technique(Technique::sampler(&ids, "Sobol"))
        .unwrap();

    // 3. Results
    let scenes: Vec<_> = catalog.scenes().map(|s| s.id()).collect();
    let nlm_id = catalog.get_filter("NLM").unwrap().id();
    let nlm = catalog.technique_mut(nlm_id).unwrap();
    let v = nlm.new_version(&ids, "v1").unwrap();
    for &scene in &scenes {
        v.new_result(&ids, scene, 4).unwrap();
    }

    // 4. Queries
    let v = catalog.get_filter("NLM").unwrap().get_version("v1").unwrap();
    assert_eq!(catalog.version_name(v).unwrap(), "NLM-v1");
    assert_eq!(v.scenes(), scenes);
    assert_eq!(
        catalog.scene_reference(scenes[1]).unwrap(),
        Path::new("pbrt").join("sponza.exr")
    );
    assert_eq!(catalog.metrics().len(), 5);
    assert!(catalog.get_sampler("Sobol").is_some());
    assert!(catalog.get_renderer("pbrt").is_some_and(|r| r.is_ready));
}

#[test]
fn test_technique_serde_round_trip() {
    let ids = IdAllocator::new();
    let bathroom = Scene::new(&ids, "bathroom").id();
    let mut nlm = Technique::filter(&ids, "NLM");
    nlm.new_version(&ids, "v1")
        .unwrap()
        .new_result(&ids, bathroom, 4)
        .unwrap()
        .set_metric("MSE", 0.25);

    let json = serde_json::to_string(&nlm).expect("serialization failed");
    let back: Technique = serde_json::from_str(&json).expect("deserialization failed");

    assert_eq!(back, nlm);
    assert_eq!(back.uuid(), nlm.uuid());
    let v1 = back.get_version("v1").unwrap();
    assert_eq!(v1.technique(), Some(nlm.id()));
    assert_eq!(v1.results()[0].metric("MSE"), Some(0.25));
}

#[test]
fn test_unlinked_scene_reference_is_an_error() {
    let ids = IdAllocator::new();
    let pbrt = Renderer::new(&ids, "pbrt");
    let scene = Scene::new(&ids, "loose");

    assert!(matches!(
        scene.get_reference(&pbrt),
        Err(Error::MissingRenderer { .. })
    ));
}
