//! Benchmark Catalog Example
//!
//! Builds a small benchmark catalog the way the execution driver would,
//! then runs the queries the report generator relies on.
//!
//! Run with: RUST_LOG=debug cargo run --example benchmark_catalog

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use renderbench_model::identity::{RegionId, SceneId};
use renderbench_model::scene::{ConfigScene, NoiseWeights, RegionBounds, Renderer};
use renderbench_model::technique::{Technique, TechniqueKind};
use renderbench_model::Catalog;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Rendering Benchmark Catalog ===\n");

    let mut catalog = Catalog::builder().builtin_metrics().build()?;
    let ids = Arc::clone(catalog.allocator());

    // -------------------------------------------------------------------------
    // 1. Register the scene corpus
    // -------------------------------------------------------------------------
    println!("1. Registering scenes...");

    let mut pbrt = Renderer::new(&ids, "pbrt");
    pbrt.path = "renderers/pbrt/pbrt".into();
    pbrt.is_ready = true;

    let bathroom = pbrt.new_scene(&ids, "bathroom")?;
    bathroom.ground_truth = "bathroom_ref.exr".into();
    bathroom.weights = NoiseWeights::new(0.0, 0.0, 0.6, 0.8, 1.0)?;
    bathroom
        .new_region(&ids, RegionBounds::new(0, 0, 256, 256)?)
        .weights = NoiseWeights::new(0.0, 0.0, 0.0, 1.0, 0.2)?;
    bathroom.new_region(&ids, RegionBounds::new(256, 0, 512, 256)?);

    let car = pbrt.new_scene(&ids, "car")?;
    car.ground_truth = "car_ref.exr".into();
    car.weights = NoiseWeights::new(0.3, 1.0, 0.0, 0.4, 0.2)?;

    for scene in pbrt.scenes() {
        println!(
            "   {} ({} regions, dominant noise: {:?})",
            scene.get_name(),
            scene.regions().len(),
            scene.weights.dominant()
        );
    }
    catalog.add_renderer(pbrt)?;

    // -------------------------------------------------------------------------
    // 2. Register techniques
    // -------------------------------------------------------------------------
    println!("\n2. Registering techniques...");

    let mut nlm = Technique::builder(TechniqueKind::Filter, "NLM")
        .full_name("Non-Local Means")
        .citation("Rousselle, Knaus, Zwicker 2012")
        .build(&ids);
    for tag in ["v1", "v2"] {
        let version = nlm.new_version(&ids, tag)?;
        version.executable = format!("filters/NLM/{tag}/nlm").into();
        version.status = "ready".into();
    }
    let nlm_id = catalog.add_technique(nlm)?.id();
    println!("   Filter {nlm_id}: NLM (2 versions)");

    // -------------------------------------------------------------------------
    // 3. Simulate the execution driver
    // -------------------------------------------------------------------------
    println!("\n3. Running configured scenes...");

    let renderer = catalog.get_renderer("pbrt").context("renderer registered")?;
    let plan: Vec<(SceneId, Vec<u32>, Vec<RegionId>)> = renderer
        .scenes()
        .iter()
        .map(|scene| {
            let config = ConfigScene::new(scene, vec![4, 16, 64]);
            let regions = scene.regions().iter().map(|r| r.id()).collect();
            (config.scene_id(), config.spps.clone(), regions)
        })
        .collect();

    let nlm = catalog.technique_mut(nlm_id).context("filter registered")?;
    for (quality, tag) in [(0.0, "v1"), (1.5, "v2")] {
        let version = nlm.get_version_mut(tag).context("version registered")?;
        for (scene, spps, regions) in &plan {
            for &spp in spps {
                let result = version.new_result(&ids, *scene, spp)?;
                let psnr = 24.0 + quality + f64::from(spp).log2();
                result.exec_time = Duration::from_millis(u64::from(spp) * 40);
                result.set_metric("PSNR", psnr);
                result.set_metric("MSE", 10f64.powf(-psnr / 10.0));
                for &region in regions {
                    result
                        .new_region_error(&ids, region)?
                        .set_metric("MSE", 10f64.powf(-(psnr - 1.0) / 10.0));
                }
            }
        }
        version.message = format!("{} results", version.results().len());
    }

    catalog.check_region_coverage()?;
    println!("   Region-error coverage OK");

    // -------------------------------------------------------------------------
    // 4. Report queries
    // -------------------------------------------------------------------------
    println!("\n4. Report...");

    let nlm = catalog.technique(nlm_id).context("filter registered")?;
    for scene in catalog.scenes() {
        println!(
            "   Scene {} (reference: {})",
            scene.get_name(),
            catalog.scene_reference(scene.id())?.display()
        );
        for version in nlm.versions() {
            let name = catalog.version_name(version)?;
            for result in version.get_results(scene.id()) {
                println!(
                    "     {name} @ {:>3} spp: PSNR={:.2} time={:?}",
                    result.spp(),
                    result.metric("PSNR").unwrap_or(f64::NAN),
                    result.exec_time
                );
            }
        }
    }

    let all_results = nlm.versions().iter().flat_map(|v| v.results());
    let ranked = catalog.metrics().rank("PSNR", all_results)?;
    if let Some(best) = ranked.first() {
        println!(
            "\n   Best PSNR: {:.2} ({} spp)",
            best.metric("PSNR").unwrap_or(f64::NAN),
            best.spp()
        );
    }

    println!("\n=== Benchmark Catalog Complete ===");
    Ok(())
}
