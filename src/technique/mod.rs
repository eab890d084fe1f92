//! Techniques under test and their versions
//!
//! ## Schema Overview
//!
//! ```text
//! Technique (1) ──< TechniqueVersion (N) ──< TechniqueResult (N)
//! ```
//!
//! Filters and samplers share one record type per level, told apart by
//! [`TechniqueKind`]; each kind draws ids from its own sequence.
//!
//! ## Usage
//!
//! ```rust
//! use renderbench_model::identity::IdAllocator;
//! use renderbench_model::scene::Scene;
//! use renderbench_model::technique::Technique;
//!
//! let ids = IdAllocator::new();
//! let bathroom = Scene::new(&ids, "bathroom").id();
//! let mut nlm = Technique::filter(&ids, "NLM");
//! let v1 = nlm.new_version(&ids, "v1")?;
//! v1.new_result(&ids, bathroom, 4)?;
//!
//! let v1 = nlm.get_version("v1").expect("just added");
//! assert!(v1.has_result(bathroom, 4));
//! assert_eq!(v1.get_name(&nlm)?, "NLM-v1");
//! # Ok::<(), renderbench_model::Error>(())
//! ```

mod technique_record;
mod version;

pub use crate::identity::TechniqueKind;
pub use technique_record::{Technique, TechniqueBuilder};
pub use version::TechniqueVersion;
