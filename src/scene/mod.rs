//! Scene corpus: renderers, scenes and image regions
//!
//! ## Schema Overview
//!
//! ```text
//! Renderer (1) ──< Scene (N) ──< ImageRegion (N)
//!                    ▲
//!                    └── ConfigScene (borrow, run configuration only)
//! ```
//!
//! Scenes point back at their renderer through a [`RendererId`](crate::identity::RendererId);
//! the reference image path is resolved against that renderer's name.

mod config_scene;
mod region;
mod renderer;
mod scene_record;
mod weights;

pub use config_scene::ConfigScene;
pub use region::{ImageRegion, RegionBounds};
pub use renderer::Renderer;
pub use scene_record::Scene;
pub use weights::{NoiseSource, NoiseWeights};
