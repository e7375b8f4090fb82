//! Per-leaf value range precomputation.
//!
//! Once the index is built, the renderer wants to know the range of scalar values inside each
//! leaf so it can reject empty space against the transfer function without sampling. Leaves are
//! data-disjoint, so the pass is a fork-join over independent leaf tasks; collecting the parallel
//! iterator is the barrier after which every slot is populated.

use crate::accel::{AccelLeaf, AmrAccel};

use amr_field_core::prelude::*;

use rayon::prelude::*;
use tracing::debug;

/// A closed range of scalar values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    pub min: f32,
    pub max: f32,
}

impl ValueRange {
    /// The range containing no values; extending it with any value yields that value.
    pub const EMPTY: Self = Self {
        min: f32::INFINITY,
        max: f32::NEG_INFINITY,
    };

    #[inline]
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    #[inline]
    pub fn extend(&mut self, value: f32) {
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }
}

/// Computes the `[min, max]` scalar range of every leaf in the index, in leaf order.
///
/// Each leaf scans the cells of its bricks whose physical footprint intersects the leaf bounds.
/// The pass is deterministic: rerunning it on an unmodified index yields bit-identical ranges.
pub fn compute_leaf_ranges(accel: &AmrAccel<'_>) -> Vec<ValueRange> {
    let ranges: Vec<_> = accel
        .leaves()
        .par_iter()
        .map(|leaf| leaf_value_range(accel, leaf))
        .collect();
    debug!("computed value ranges for {} leaves", ranges.len());

    ranges
}

fn leaf_value_range(accel: &AmrAccel<'_>, leaf: &AccelLeaf) -> ValueRange {
    let mut range = ValueRange::EMPTY;

    for &id in leaf.bricks() {
        let brick = &accel.field().bricks()[id];
        let cw = brick.cell_width();

        // The cells of this brick whose footprint intersects the leaf bounds, in the index
        // space of the brick's level.
        let bounds = leaf.bounds();
        let cell_min = voxel_containing_point3f(bounds.minimum / cw);
        let lub = bounds.least_upper_bound() / cw;
        let cell_max = Point3i::new(
            lub.x().ceil() as i32 - 1,
            lub.y().ceil() as i32 - 1,
            lub.z().ceil() as i32 - 1,
        );
        let cells = Extent3i::from_min_and_max(cell_min, cell_max).intersection(brick.extent());

        for p in cells.iter_points() {
            range.extend(brick.get(p));
        }
    }

    range
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{AmrField, BrickInfo};
    use crate::test_fields::{nested_field_data, two_root_bricks_data};

    use rand::Rng;

    #[test]
    fn leaf_ranges_cover_observed_values() {
        let (infos, data) = two_root_bricks_data();
        let field = AmrField::new(&infos, &data).unwrap();
        let accel = AmrAccel::new(&field).unwrap();

        let ranges = compute_leaf_ranges(&accel);

        assert_eq!(ranges.len(), accel.leaves().len());
        for (leaf, range) in accel.leaves().iter().zip(ranges.iter()) {
            if leaf.bricks().is_empty() {
                assert!(range.is_empty());
            } else {
                // Both bricks hold a single constant cell.
                assert_eq!(range.min, range.max);
                assert!(range.min == 5.0 || range.min == 7.0);
            }
        }
    }

    #[test]
    fn nested_leaves_see_both_levels() {
        let (infos, data) = nested_field_data();
        let field = AmrField::new(&infos, &data).unwrap();
        let accel = AmrAccel::new(&field).unwrap();

        let ranges = compute_leaf_ranges(&accel);

        // Every leaf is covered by the coarse 0..=7 brick and the constant-10 fine brick.
        for range in ranges.iter() {
            assert!(!range.is_empty());
            assert!(range.min <= 7.0);
            assert_eq!(range.max, 10.0);
        }
    }

    #[test]
    fn recomputation_is_idempotent() {
        let mut rng = rand::thread_rng();

        let extent = Extent3i::from_min_and_max(Point3i::ZERO, Point3i::fill(3));
        let coarse: Vec<f32> = (0..extent.num_points())
            .map(|_| rng.gen_range(-100.0..100.0))
            .collect();
        let fine: Vec<f32> = (0..extent.num_points())
            .map(|_| rng.gen_range(-100.0..100.0))
            .collect();
        let data: Vec<f32> = coarse.iter().chain(fine.iter()).copied().collect();

        let infos = [
            BrickInfo {
                box_min: Point3i::ZERO,
                box_max: Point3i::fill(3),
                level: 0,
                cell_width: 1.0,
                data_offset: 0,
                data_size: 64,
            },
            BrickInfo {
                box_min: Point3i::ZERO,
                box_max: Point3i::fill(3),
                level: 1,
                cell_width: 0.5,
                data_offset: 64,
                data_size: 64,
            },
        ];
        let field = AmrField::new(&infos, &data).unwrap();
        let accel = AmrAccel::new(&field).unwrap();

        let first = compute_leaf_ranges(&accel);
        let second = compute_leaf_ranges(&accel);

        assert_eq!(first, second);
    }
}
