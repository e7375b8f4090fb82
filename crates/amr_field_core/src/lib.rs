//! Concrete 3D lattice types shared by the AMR volume crates:
//! - `Point3i` and `Point3f`: points on the voxel lattice and in physical space
//! - `Extent3i`: an integer extent, i.e. an axis-aligned box of lattice points
//! - `Extent3f`: a half-closed axis-aligned box in physical space

pub mod axis;
pub mod extent;
pub mod point;

pub use axis::Axis3;
pub use extent::{Extent3f, Extent3i};
pub use point::{voxel_containing_point3f, Point3f, Point3i};

pub mod prelude {
    pub use super::{voxel_containing_point3f, Axis3, Extent3f, Extent3i, Point3f, Point3i};
}
