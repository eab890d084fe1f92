//! Property-based tests for the benchmark model
//!
//! Following ruchy/trueno/aprender pattern:
//! - Test structural invariants
//! - Run with ProptestConfig::with_cases(100)
//! - Must complete in <30 seconds for pre-commit hook

use std::path::Path;

use proptest::prelude::*;
use renderbench_model::identity::{EntityKind, IdAllocator, SceneId, TechniqueKind};
use renderbench_model::scene::{NoiseWeights, RegionBounds, Renderer, Scene};
use renderbench_model::technique::{Technique, TechniqueVersion};

// ============================================================================
// Property Test Generators (Strategies)
// ============================================================================

/// Generate an entity kind
fn arb_kind() -> impl Strategy<Value = EntityKind> {
    proptest::sample::select(EntityKind::ALL.to_vec())
}

/// Number of scenes in the test corpus; keys only use the first four
const SCENES: usize = 6;

/// Generate (scene index, spp) result keys drawn from a small space so collisions occur
fn arb_result_keys() -> impl Strategy<Value = Vec<(usize, u32)>> {
    proptest::collection::vec((0usize..4, proptest::sample::select(vec![1u32, 2, 4, 8, 16])), 0..40)
}

/// Allocate the scene corpus
fn scene_corpus(ids: &IdAllocator) -> Vec<SceneId> {
    (0..SCENES)
        .map(|i| Scene::new(ids, format!("scene-{i}")).id())
        .collect()
}

/// Build a filter version holding one result per distinct key, in key order
fn version_with_results(
    ids: &IdAllocator,
    scenes: &[SceneId],
    keys: &[(usize, u32)],
) -> TechniqueVersion {
    let mut version = TechniqueVersion::new(ids, TechniqueKind::Filter, "v1");
    for &(scene, spp) in keys {
        // Repeated keys are rejected; that is fine here.
        let _ = version.new_result(ids, scenes[scene], spp);
    }
    version
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // ========================================================================
    // Identity Allocation
    // ========================================================================

    /// Property: per-kind ids are 1, 2, 3, ... in creation order
    #[test]
    fn prop_ids_dense_per_kind(kinds in proptest::collection::vec(arb_kind(), 0..200)) {
        let ids = IdAllocator::new();
        let mut expected = [0u64; EntityKind::COUNT];

        for kind in kinds {
            let slot = EntityKind::ALL.iter().position(|k| *k == kind).unwrap();
            expected[slot] += 1;
            prop_assert_eq!(ids.allocate(kind), expected[slot]);
        }
        for (slot, kind) in EntityKind::ALL.iter().enumerate() {
            prop_assert_eq!(ids.peek(*kind), expected[slot] + 1);
        }
    }

    // ========================================================================
    // Result Lookups
    // ========================================================================

    /// Property: has_result agrees with get_result for every key
    #[test]
    fn prop_has_result_iff_get_result(keys in arb_result_keys()) {
        let ids = IdAllocator::new();
        let scenes = scene_corpus(&ids);
        let version = version_with_results(&ids, &scenes, &keys);

        for &scene in &scenes {
            for spp in [1u32, 2, 3, 4, 8, 16, 32] {
                prop_assert_eq!(
                    version.has_result(scene, spp),
                    version.get_result(scene, spp).is_some()
                );
            }
        }
    }

    /// Property: at most one result per (scene, spp)
    #[test]
    fn prop_results_unique_per_key(keys in arb_result_keys()) {
        let ids = IdAllocator::new();
        let scenes = scene_corpus(&ids);
        let version = version_with_results(&ids, &scenes, &keys);

        let mut seen = std::collections::HashSet::new();
        for r in version.results() {
            prop_assert!(seen.insert((r.scene(), r.spp())));
        }
    }

    /// Property: get_results is the in-order subset for the scene
    #[test]
    fn prop_get_results_in_order_subset(keys in arb_result_keys(), scene in 0usize..SCENES) {
        let ids = IdAllocator::new();
        let scenes = scene_corpus(&ids);
        let version = version_with_results(&ids, &scenes, &keys);
        let scene = scenes[scene];

        let expected: Vec<_> = version
            .results()
            .iter()
            .filter(|r| r.scene() == scene)
            .map(|r| r.id())
            .collect();
        let actual: Vec<_> = version.get_results(scene).iter().map(|r| r.id()).collect();
        prop_assert_eq!(actual, expected);
    }

    // ========================================================================
    // Derived Names
    // ========================================================================

    /// Property: version name is "<technique>-<tag>", empty parts included
    #[test]
    fn prop_version_name_format(name in ".{0,12}", tag in ".{0,12}") {
        let ids = IdAllocator::new();
        let mut technique = Technique::sampler(&ids, name.clone());
        technique.new_version(&ids, tag.clone()).unwrap();

        let version = technique.get_version(&tag).unwrap();
        prop_assert_eq!(version.get_name(&technique).unwrap(), format!("{name}-{tag}"));
    }

    /// Property: reference path is renderer name joined with ground truth
    #[test]
    fn prop_reference_path_join(renderer in "[a-z][a-z0-9_]{0,10}", file in "[a-z][a-z0-9_]{0,10}\\.exr") {
        let ids = IdAllocator::new();
        let mut r = Renderer::new(&ids, renderer.clone());
        let scene = r.new_scene(&ids, "scene").unwrap();
        scene.ground_truth = file.clone().into();
        let id = scene.id();

        let scene = r.get_scene_by_id(id).unwrap();
        prop_assert_eq!(scene.get_reference(&r).unwrap(), Path::new(&renderer).join(&file));
    }

    // ========================================================================
    // Value Invariants
    // ========================================================================

    /// Property: weights inside [0, 1] are accepted, outside rejected
    #[test]
    fn prop_weights_range(w in -1.0f64..2.0) {
        let result = NoiseWeights::new(w, 0.0, 0.0, 0.0, 0.0);
        prop_assert_eq!(result.is_ok(), (0.0..=1.0).contains(&w));
    }

    /// Property: bounds valid iff strictly increasing on both axes
    #[test]
    fn prop_bounds_validity(xmin in 0u32..64, ymin in 0u32..64, xmax in 0u32..64, ymax in 0u32..64) {
        let bounds = RegionBounds::new(xmin, ymin, xmax, ymax);
        prop_assert_eq!(bounds.is_ok(), xmin < xmax && ymin < ymax);
        if let Ok(b) = bounds {
            prop_assert_eq!(b.area(), u64::from(xmax - xmin) * u64::from(ymax - ymin));
        }
    }
}
