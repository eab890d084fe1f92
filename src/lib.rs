//! # renderbench-model: Domain Model for Rendering-Technique Benchmarks
//!
//! In-memory object graph shared by the benchmark toolchain (execution
//! driver, CLI, report generator). It records:
//!
//! - **Techniques** under test (image filters and samplers) and their **versions**
//! - the **scenes** they are evaluated against, grouped by **renderer**
//! - the **results** per (scene, samples-per-pixel) pair and per-region scores
//! - the **IQA metric** definitions used to interpret those scores
//!
//! ## Design Principles
//!
//! - **Tree ownership**: every entity has exactly one owner; back-references
//!   are typed handles from [`identity`], compared by identity
//! - **Per-kind sequences**: ids come from an [`IdAllocator`](identity::IdAllocator)
//!   service, plus a UUID session identifier per entity
//! - **Poka-Yoke**: invariants (one result per (scene, spp), unique metric
//!   acronyms, valid bounds and weights) are checked at insertion
//! - **No I/O**: execution, persistence and metric computation live elsewhere
//!
//! ## Example Usage
//!
//! ```rust
//! use std::path::Path;
//! use renderbench_model::identity::IdAllocator;
//! use renderbench_model::scene::Renderer;
//! use renderbench_model::technique::Technique;
//!
//! let ids = IdAllocator::new();
//!
//! let mut pbrt = Renderer::new(&ids, "pbrt");
//! let bathroom = pbrt.new_scene(&ids, "bathroom")?;
//! bathroom.ground_truth = "bathroom.exr".into();
//! let bathroom = bathroom.id();
//!
//! let mut nlm = Technique::filter(&ids, "NLM");
//! nlm.new_version(&ids, "v1")?.new_result(&ids, bathroom, 4)?;
//!
//! let v1 = nlm.get_version("v1").expect("just added");
//! assert!(v1.has_result(bathroom, 4));
//! assert!(!v1.has_result(bathroom, 8));
//! assert_eq!(v1.get_name(&nlm)?, "NLM-v1");
//! assert_eq!(
//!     pbrt.get_scene("bathroom").expect("just added").get_reference(&pbrt)?,
//!     Path::new("pbrt").join("bathroom.exr"),
//! );
//! # Ok::<(), renderbench_model::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod catalog;
pub mod error;
pub mod identity;
pub mod metric;
pub mod results;
pub mod scene;
pub mod technique;

pub use catalog::{Catalog, CatalogBuilder};
pub use error::{Error, Result};
