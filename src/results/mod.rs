//! Evaluation results and per-region scores
//!
//! ```text
//! TechniqueVersion (1) ──< TechniqueResult (N) ──< RegionError (N)
//!                               │                       │
//!                               └─> SceneId             └─> RegionId
//! ```

mod region_error;
mod result_record;

pub use region_error::RegionError;
pub use result_record::TechniqueResult;
