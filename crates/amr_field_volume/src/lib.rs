//! Storage, spatial indexing, and point sampling for adaptive-mesh-refinement (AMR) scalar
//! volumes.
//!
//! The types here form a pipeline:
//!   - `AmrField` materializes immutable `Brick`s from loader-provided descriptor/payload arrays
//!   - `AmrAccel` builds a kd-tree over the bricks for point-containment queries
//!   - `VolumeSampler` wraps one of the sampling strategies (`SamplingMethod`) behind a single
//!     call surface for the renderer
//!   - `compute_leaf_ranges` precomputes per-leaf value ranges for render-time rejection
//!
//! Everything downstream of construction is read-only, so queries and the leaf-range pass are
//! freely shareable across threads.

pub mod accel;
pub mod error;
pub mod field;
pub mod range;
pub mod sampler;

pub use accel::{AccelLeaf, AmrAccel, BrickId, LevelInfo};
pub use error::{ConfigurationError, EmptyFieldError, MalformedInputError};
pub use field::{AmrField, Brick, BrickInfo};
pub use range::{compute_leaf_ranges, ValueRange};
pub use sampler::{CurrentLevelSampler, FinestLevelSampler, SamplingMethod, VolumeSampler};

/// Hash map type to use for small keys like refinement levels.
pub type SmallKeyHashMap<K, V> = ahash::AHashMap<K, V>;

pub mod prelude {
    pub use super::{
        compute_leaf_ranges, AccelLeaf, AmrAccel, AmrField, Brick, BrickId, BrickInfo,
        ConfigurationError, CurrentLevelSampler, EmptyFieldError, FinestLevelSampler, LevelInfo,
        MalformedInputError, SamplingMethod, ValueRange, VolumeSampler,
    };
}
