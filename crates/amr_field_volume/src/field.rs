//! Bricks and the field that owns them.
//!
//! An AMR field is a flat sequence of bricks, each one a dense block of cell-centered scalars at
//! some refinement level. The field does no spatial indexing itself; see the `accel` module for
//! point queries.

use crate::error::MalformedInputError;
use crate::range::ValueRange;

use amr_field_core::prelude::*;

use bytemuck::{Pod, Zeroable};
use tracing::debug;

/// The raw, loader-facing descriptor of one brick. Descriptors arrive in an array parallel to one
/// flat scalar payload array; each descriptor claims a slice of the payload.
///
/// This is plain old data (`#[repr(C)]` + `Pod`) so loaders holding a raw byte blob of descriptors
/// can reinterpret it with `bytemuck::cast_slice` instead of copying.
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
#[repr(C)]
pub struct BrickInfo {
    /// The least cell of the brick, in the index space of its level.
    pub box_min: Point3i,
    /// The greatest cell of the brick, inclusive.
    pub box_max: Point3i,
    /// Refinement level; 0 is coarsest.
    pub level: i32,
    /// Physical size of one cell at this brick's level.
    pub cell_width: f32,
    /// Start of this brick's cells in the flat payload array.
    pub data_offset: u64,
    /// Number of cells claimed; must equal the cell count implied by the box.
    pub data_size: u64,
}

/// One block of scalar data at a fixed refinement level. The payload is a non-owning view into
/// caller-owned storage that must outlive the field.
#[derive(Clone, Copy, Debug)]
pub struct Brick<'a> {
    extent: Extent3i,
    level: i32,
    cell_width: f32,
    data: &'a [f32],
}

impl<'a> Brick<'a> {
    /// The cells of this brick, in the index space of its level.
    #[inline]
    pub fn extent(&self) -> &Extent3i {
        &self.extent
    }

    #[inline]
    pub fn level(&self) -> i32 {
        self.level
    }

    #[inline]
    pub fn cell_width(&self) -> f32 {
        self.cell_width
    }

    #[inline]
    pub fn data(&self) -> &'a [f32] {
        self.data
    }

    /// The half-closed physical-space box covered by this brick.
    #[inline]
    pub fn physical_bounds(&self) -> Extent3f {
        let cw = self.cell_width;

        Extent3f::from_min_and_lub(
            Point3f::from(self.extent.minimum) * cw,
            Point3f::from(self.extent.least_upper_bound()) * cw,
        )
    }

    /// The value of the cell at `p`, in the index space of this brick's level.
    #[inline]
    pub fn get(&self, p: Point3i) -> f32 {
        debug_assert!(self.extent.contains(p));

        let local = p - self.extent.minimum;
        let shape = self.extent.shape;
        let stride =
            (local.z() * shape.y() + local.y()) as usize * shape.x() as usize + local.x() as usize;

        self.data[stride]
    }

    /// Trilinearly interpolates this brick's cells at the physical position `p`.
    ///
    /// Data is cell-centered: the value of cell `(i, j, k)` lives at `(i + 0.5) * cell_width`.
    /// Outside the lattice of cell centers the 2x2x2 neighborhood is clamped to the brick's own
    /// cells, so the reconstruction extends constantly to the brick face rather than blending
    /// with neighboring bricks.
    pub fn sample_trilinear(&self, p: Point3f) -> f32 {
        let local = p / self.cell_width - Point3f::fill(0.5);
        let base = local.floor();
        let frac = local - base;

        let min = self.extent.minimum;
        let max = self.extent.max();
        let c0 = base.as_3i().join(min).meet(max);
        let c1 = (base.as_3i() + Point3i::ONES).join(min).meet(max);

        let v000 = self.get(Point3i::new(c0.x(), c0.y(), c0.z()));
        let v100 = self.get(Point3i::new(c1.x(), c0.y(), c0.z()));
        let v010 = self.get(Point3i::new(c0.x(), c1.y(), c0.z()));
        let v110 = self.get(Point3i::new(c1.x(), c1.y(), c0.z()));
        let v001 = self.get(Point3i::new(c0.x(), c0.y(), c1.z()));
        let v101 = self.get(Point3i::new(c1.x(), c0.y(), c1.z()));
        let v011 = self.get(Point3i::new(c0.x(), c1.y(), c1.z()));
        let v111 = self.get(Point3i::new(c1.x(), c1.y(), c1.z()));

        let v00 = lerp(v000, v100, frac.x());
        let v10 = lerp(v010, v110, frac.x());
        let v01 = lerp(v001, v101, frac.x());
        let v11 = lerp(v011, v111, frac.x());

        let v0 = lerp(v00, v10, frac.y());
        let v1 = lerp(v01, v11, frac.y());

        lerp(v0, v1, frac.z())
    }
}

#[inline]
fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// An immutable sequence of bricks materialized from loader-provided descriptor and payload
/// arrays. Brick order is irrelevant for indexing but stable for diagnostics.
#[derive(Clone, Debug)]
pub struct AmrField<'a> {
    bricks: Vec<Brick<'a>>,
}

impl<'a> AmrField<'a> {
    /// Materializes the brick sequence from parallel descriptor/payload inputs. Each descriptor's
    /// claimed payload slice must lie inside `data` and match the cell count implied by its index
    /// box exactly.
    pub fn new(infos: &[BrickInfo], data: &'a [f32]) -> Result<Self, MalformedInputError> {
        let mut bricks = Vec::with_capacity(infos.len());

        for (i, info) in infos.iter().enumerate() {
            if info.level < 0 {
                return Err(MalformedInputError::NegativeLevel {
                    brick: i,
                    level: info.level,
                });
            }
            if !(info.cell_width > 0.0) {
                return Err(MalformedInputError::NonPositiveCellWidth {
                    brick: i,
                    width: info.cell_width,
                });
            }

            let extent = Extent3i::from_min_and_max(info.box_min, info.box_max);
            if extent.is_empty() {
                return Err(MalformedInputError::EmptyBrick { brick: i });
            }

            let offset = info.data_offset as usize;
            let len = info.data_size as usize;
            let end = offset
                .checked_add(len)
                .filter(|&end| end <= data.len())
                .ok_or(MalformedInputError::PayloadOutOfRange {
                    brick: i,
                    offset,
                    len,
                    data_len: data.len(),
                })?;
            if len != extent.num_points() {
                return Err(MalformedInputError::CellCountMismatch {
                    brick: i,
                    expected: extent.num_points(),
                    actual: len,
                });
            }

            bricks.push(Brick {
                extent,
                level: info.level,
                cell_width: info.cell_width,
                data: &data[offset..end],
            });
        }

        debug!("materialized {} AMR bricks", bricks.len());

        Ok(Self { bricks })
    }

    #[inline]
    pub fn bricks(&self) -> &[Brick<'a>] {
        &self.bricks
    }

    #[inline]
    pub fn num_bricks(&self) -> usize {
        self.bricks.len()
    }

    /// The range of scalar values over every brick payload. Published so applications can
    /// normalize transfer functions without rescanning the raw data.
    pub fn value_range(&self) -> ValueRange {
        let mut range = ValueRange::EMPTY;
        for brick in self.bricks.iter() {
            for &v in brick.data {
                range.extend(v);
            }
        }

        range
    }
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

    fn unit_brick_info() -> BrickInfo {
        BrickInfo {
            box_min: Point3i::ZERO,
            box_max: Point3i::fill(1),
            level: 0,
            cell_width: 1.0,
            data_offset: 0,
            data_size: 8,
        }
    }

    #[test]
    fn materializes_bricks_and_slices_payload() {
        let data: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let infos = [
            unit_brick_info(),
            BrickInfo {
                data_offset: 8,
                ..unit_brick_info()
            },
        ];

        let field = AmrField::new(&infos, &data).unwrap();

        assert_eq!(field.num_bricks(), 2);
        assert_eq!(field.bricks()[0].data(), &data[..8]);
        assert_eq!(field.bricks()[1].data(), &data[8..]);
        assert_eq!(field.value_range(), ValueRange::new(0.0, 15.0));
    }

    #[test]
    fn rejects_out_of_range_payload_slice() {
        let data = [0.0; 8];
        let infos = [BrickInfo {
            data_offset: 4,
            ..unit_brick_info()
        }];

        assert_eq!(
            AmrField::new(&infos, &data).err(),
            Some(MalformedInputError::PayloadOutOfRange {
                brick: 0,
                offset: 4,
                len: 8,
                data_len: 8,
            })
        );
    }

    #[test]
    fn rejects_cell_count_mismatch() {
        let data = [0.0; 27];
        let infos = [BrickInfo {
            data_size: 27,
            ..unit_brick_info()
        }];

        assert_eq!(
            AmrField::new(&infos, &data).err(),
            Some(MalformedInputError::CellCountMismatch {
                brick: 0,
                expected: 8,
                actual: 27,
            })
        );
    }

    #[test]
    fn rejects_cell_count_mismatch_for_huge_boxes() {
        let data = [0.0; 8];
        let infos = [BrickInfo {
            box_max: Point3i::fill(1 << 20),
            ..unit_brick_info()
        }];

        // The implied cell count exceeds i32 by far; the mismatch must still be reported cleanly.
        assert!(matches!(
            AmrField::new(&infos, &data).err(),
            Some(MalformedInputError::CellCountMismatch { brick: 0, .. })
        ));
    }

    #[test]
    fn rejects_bad_scalars_in_descriptor() {
        let data = [0.0; 8];

        let zero_width = [BrickInfo {
            cell_width: 0.0,
            ..unit_brick_info()
        }];
        assert_eq!(
            AmrField::new(&zero_width, &data).err(),
            Some(MalformedInputError::NonPositiveCellWidth {
                brick: 0,
                width: 0.0
            })
        );

        let negative_level = [BrickInfo {
            level: -1,
            ..unit_brick_info()
        }];
        assert_eq!(
            AmrField::new(&negative_level, &data).err(),
            Some(MalformedInputError::NegativeLevel {
                brick: 0,
                level: -1
            })
        );
    }

    #[test]
    fn row_major_cell_access() {
        let data: Vec<f32> = (0..8).map(|i| i as f32).collect();
        let field = AmrField::new(&[unit_brick_info()], &data).unwrap();
        let brick = &field.bricks()[0];

        assert_eq!(brick.get(Point3i::new(1, 0, 0)), 1.0);
        assert_eq!(brick.get(Point3i::new(0, 1, 0)), 2.0);
        assert_eq!(brick.get(Point3i::new(0, 0, 1)), 4.0);
        assert_eq!(brick.get(Point3i::new(1, 1, 1)), 7.0);
    }

    #[test]
    fn trilinear_sample_is_exact_at_cell_centers_and_clamps_at_faces() {
        let data: Vec<f32> = (0..8).map(|i| i as f32).collect();
        let field = AmrField::new(&[unit_brick_info()], &data).unwrap();
        let brick = &field.bricks()[0];

        // Cell centers reproduce the stored values exactly.
        assert_eq!(brick.sample_trilinear(Point3f::fill(0.5)), 0.0);
        assert_eq!(brick.sample_trilinear(Point3f::new(1.5, 0.5, 0.5)), 1.0);

        // The brick's physical center averages all 8 cells.
        assert_eq!(brick.sample_trilinear(Point3f::fill(1.0)), 3.5);

        // Past the last cell center, the reconstruction clamps to the brick's own cells.
        assert_eq!(brick.sample_trilinear(Point3f::new(1.9, 0.5, 0.5)), 1.0);
        assert_eq!(brick.sample_trilinear(Point3f::new(0.1, 0.5, 0.5)), 0.0);
    }
}
