//! Storage, spatial indexing, and point sampling for adaptive-mesh-refinement (AMR) scalar
//! volumes.
//!
//! This library is organized into two crates:
//! - **core**: concrete lattice point and extent data types
//! - **volume**: bricks, the field that owns them, the spatial index, sampling strategies, and
//!   the per-leaf value-range precomputation
//!
//! The expected flow: a loader hands `AmrField::new` a descriptor array and a flat scalar
//! payload, `AmrAccel::new` indexes the field, `VolumeSampler::from_config` resolves the
//! configured strategy, and `compute_leaf_ranges` prepares the per-leaf ranges the renderer uses
//! for empty-space rejection.

pub use amr_field_core as core;
pub use amr_field_volume as volume;

pub mod prelude {
    pub use super::core::prelude::*;
    pub use super::volume::prelude::*;
}
