//! The spatial index built over a field's bricks.
//!
//! `AmrAccel` is a kd-tree whose split planes are brick faces. Splitting continues until a region
//! has no brick face strictly inside it, at which point every brick overlapping the region must
//! cover it entirely. A leaf therefore stores the complete candidate list for all points inside
//! its bounds, pre-sorted from coarsest to finest, and a point query is a single descent plus a
//! slice borrow.
//!
//! The index is built once over an immutable field and is read-only afterwards; concurrent
//! queries need no locking. There are no incremental updates; a changed field means a new index.

use crate::error::EmptyFieldError;
use crate::field::{AmrField, Brick};
use crate::SmallKeyHashMap;

use amr_field_core::prelude::*;

use float_ord::FloatOrd;
use std::cmp::Reverse;
use tracing::debug;

/// Index of a brick within its field's brick sequence.
pub type BrickId = usize;

/// Metadata for one refinement level present in the field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelInfo {
    pub level: i32,
    pub cell_width: f32,
    pub num_bricks: usize,
}

#[derive(Clone, Copy, Debug)]
enum NodeChild {
    Interior(u32),
    Leaf(u32),
}

#[derive(Clone, Copy, Debug)]
struct AccelNode {
    axis: Axis3,
    split: f32,
    children: [NodeChild; 2],
}

/// One partition cell of the index. Every brick in `bricks` covers all of `bounds`.
#[derive(Clone, Debug)]
pub struct AccelLeaf {
    bounds: Extent3f,
    bricks: Vec<BrickId>,
}

impl AccelLeaf {
    #[inline]
    pub fn bounds(&self) -> &Extent3f {
        &self.bounds
    }

    /// The bricks covering this leaf, sorted by ascending level, then descending cell width,
    /// then insertion order.
    #[inline]
    pub fn bricks(&self) -> &[BrickId] {
        &self.bricks
    }
}

/// The spatial index over one `AmrField`.
pub struct AmrAccel<'a> {
    field: &'a AmrField<'a>,
    world_bounds: Extent3f,
    root_grid_extent: Extent3i,
    finest_cell_width: f32,
    coarsest_cell_width: f32,
    levels: Vec<LevelInfo>,
    nodes: Vec<AccelNode>,
    leaves: Vec<AccelLeaf>,
    root: NodeChild,
}

impl<'a> AmrAccel<'a> {
    /// Builds the index. Fails if the field has no bricks at all or no level-0 bricks to anchor
    /// the root grid.
    pub fn new(field: &'a AmrField<'a>) -> Result<Self, EmptyFieldError> {
        let bricks = field.bricks();
        if bricks.is_empty() {
            return Err(EmptyFieldError::NoBricks);
        }

        let root_grid_extent = bricks
            .iter()
            .filter(|b| b.level() == 0)
            .map(|b| *b.extent())
            .fold(None, |acc: Option<Extent3i>, e| {
                Some(acc.map_or(e, |acc| acc.bound_union(&e)))
            })
            .ok_or(EmptyFieldError::NoRootBricks)?;
        debug!(
            "found root level dimensions of {:?}",
            root_grid_extent.shape
        );

        let finest_cell_width = bricks
            .iter()
            .map(|b| FloatOrd(b.cell_width()))
            .min()
            .unwrap()
            .0;
        let coarsest_cell_width = bricks
            .iter()
            .map(|b| FloatOrd(b.cell_width()))
            .max()
            .unwrap()
            .0;
        debug!(
            "cell widths span [{}, {}]",
            finest_cell_width, coarsest_cell_width
        );

        let mut levels_by_id = SmallKeyHashMap::<i32, LevelInfo>::new();
        for brick in bricks.iter() {
            let info = levels_by_id.entry(brick.level()).or_insert(LevelInfo {
                level: brick.level(),
                cell_width: brick.cell_width(),
                num_bricks: 0,
            });
            info.num_bricks += 1;
        }
        let mut levels: Vec<_> = levels_by_id.values().copied().collect();
        levels.sort_by_key(|info| info.level);

        let world_bounds = bricks
            .iter()
            .map(|b| b.physical_bounds())
            .fold(None, |acc: Option<Extent3f>, e| {
                Some(acc.map_or(e, |acc| acc.bound_union(&e)))
            })
            .unwrap();

        let mut builder = TreeBuilder {
            bricks,
            nodes: Vec::new(),
            leaves: Vec::new(),
        };
        let all_bricks: Vec<BrickId> = (0..bricks.len()).collect();
        let root = builder.build_region(world_bounds, all_bricks);
        debug!(
            "built AMR index with {} nodes and {} leaves",
            builder.nodes.len(),
            builder.leaves.len()
        );

        Ok(Self {
            field,
            world_bounds,
            root_grid_extent,
            finest_cell_width,
            coarsest_cell_width,
            levels,
            nodes: builder.nodes,
            leaves: builder.leaves,
            root,
        })
    }

    #[inline]
    pub fn field(&self) -> &'a AmrField<'a> {
        self.field
    }

    /// The physical-space bounding box of the union of all brick extents.
    #[inline]
    pub fn world_bounds(&self) -> &Extent3f {
        &self.world_bounds
    }

    /// The index-space bounding box of the level-0 bricks.
    #[inline]
    pub fn root_grid_extent(&self) -> &Extent3i {
        &self.root_grid_extent
    }

    #[inline]
    pub fn finest_cell_width(&self) -> f32 {
        self.finest_cell_width
    }

    #[inline]
    pub fn coarsest_cell_width(&self) -> f32 {
        self.coarsest_cell_width
    }

    /// Per-level metadata, sorted from coarsest (level 0) to finest.
    #[inline]
    pub fn levels(&self) -> &[LevelInfo] {
        &self.levels
    }

    /// The leaf partitioning of the index. Leaves are pairwise disjoint, so per-leaf work can be
    /// dispatched in parallel with no shared state.
    #[inline]
    pub fn leaves(&self) -> &[AccelLeaf] {
        &self.leaves
    }

    /// The step size a ray marcher should default to: a fixed fraction of the coarsest cell.
    #[inline]
    pub fn default_sampling_step(&self) -> f32 {
        0.1 * self.coarsest_cell_width
    }

    /// The sampling step after applying an externally resolved override.
    #[inline]
    pub fn sampling_step(&self, step_override: Option<f32>) -> f32 {
        step_override.unwrap_or_else(|| self.default_sampling_step())
    }

    /// Every brick whose extent contains `p`, sorted from coarsest to finest. The empty slice
    /// means "no data here" (outside the world bounds or in a root-tiling gap), which callers
    /// must not treat as an error.
    pub fn find_candidates(&self, p: Point3f) -> &[BrickId] {
        if !self.world_bounds.contains(p) {
            return &[];
        }

        let mut child = self.root;
        loop {
            match child {
                NodeChild::Interior(i) => {
                    let node = &self.nodes[i as usize];
                    let side = (p.at(node.axis.index()) >= node.split) as usize;
                    child = node.children[side];
                }
                NodeChild::Leaf(i) => return &self.leaves[i as usize].bricks,
            }
        }
    }

    /// The brick containing `p` at the finest level present there, if any.
    pub fn finest_brick_at(&self, p: Point3f) -> Option<(BrickId, &Brick<'a>)> {
        let bricks = self.field.bricks();

        self.find_candidates(p)
            .iter()
            .map(|&id| (id, &bricks[id]))
            .min_by_key(|(id, b)| (FloatOrd(b.cell_width()), Reverse(b.level()), *id))
    }
}

struct TreeBuilder<'b, 'a> {
    bricks: &'b [Brick<'a>],
    nodes: Vec<AccelNode>,
    leaves: Vec<AccelLeaf>,
}

impl<'b, 'a> TreeBuilder<'b, 'a> {
    fn build_region(&mut self, bounds: Extent3f, mut brick_ids: Vec<BrickId>) -> NodeChild {
        match self.choose_split(&bounds, &brick_ids) {
            None => {
                // No brick face lies strictly inside this region, so every overlapping brick
                // covers it entirely; the candidate list is final.
                brick_ids.sort_by_key(|&id| {
                    let b = &self.bricks[id];
                    (b.level(), Reverse(FloatOrd(b.cell_width())), id)
                });

                let leaf_id = self.leaves.len() as u32;
                self.leaves.push(AccelLeaf {
                    bounds,
                    bricks: brick_ids,
                });

                NodeChild::Leaf(leaf_id)
            }
            Some((axis, split)) => {
                let mut lo_lub = bounds.least_upper_bound();
                *lo_lub.at_mut(axis.index()) = split;
                let lo_bounds = Extent3f::from_min_and_lub(bounds.minimum, lo_lub);

                let mut hi_min = bounds.minimum;
                *hi_min.at_mut(axis.index()) = split;
                let hi_bounds = Extent3f::from_min_and_lub(hi_min, bounds.least_upper_bound());

                let lo_bricks = self.bricks_overlapping(&lo_bounds, &brick_ids);
                let hi_bricks = self.bricks_overlapping(&hi_bounds, &brick_ids);

                // Reserve our slot before recursing so node ids stay depth-first.
                let node_id = self.nodes.len() as u32;
                self.nodes.push(AccelNode {
                    axis,
                    split,
                    children: [NodeChild::Leaf(0); 2],
                });

                let lo_child = self.build_region(lo_bounds, lo_bricks);
                let hi_child = self.build_region(hi_bounds, hi_bricks);
                self.nodes[node_id as usize].children = [lo_child, hi_child];

                NodeChild::Interior(node_id)
            }
        }
    }

    /// Picks the brick face strictly inside `bounds` that is closest to the region center, ties
    /// broken by axis order and then coordinate. Returns `None` iff no face is strictly inside.
    fn choose_split(&self, bounds: &Extent3f, brick_ids: &[BrickId]) -> Option<(Axis3, f32)> {
        let center = bounds.center();
        let mut best: Option<(FloatOrd<f32>, usize, FloatOrd<f32>)> = None;

        for &id in brick_ids.iter() {
            let brick_bounds = self.bricks[id].physical_bounds();
            for &axis in Axis3::ALL.iter() {
                let i = axis.index();
                for &plane in [
                    brick_bounds.minimum.at(i),
                    brick_bounds.least_upper_bound().at(i),
                ]
                .iter()
                {
                    if bounds.minimum.at(i) < plane && plane < bounds.least_upper_bound().at(i) {
                        let key = (FloatOrd((plane - center.at(i)).abs()), i, FloatOrd(plane));
                        if best.map_or(true, |b| key < b) {
                            best = Some(key);
                        }
                    }
                }
            }
        }

        best.map(|(_, i, FloatOrd(plane))| (Axis3::from_index(i), plane))
    }

    fn bricks_overlapping(&self, bounds: &Extent3f, brick_ids: &[BrickId]) -> Vec<BrickId> {
        brick_ids
            .iter()
            .copied()
            .filter(|&id| self.bricks[id].physical_bounds().intersects(bounds))
            .collect()
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
    use crate::test_fields::{nested_field_data, two_root_bricks_data};

    #[test]
    fn empty_field_cannot_be_indexed() {
        let field = AmrField::new(&[], &[]).unwrap();

        assert_eq!(AmrAccel::new(&field).err(), Some(EmptyFieldError::NoBricks));
    }

    #[test]
    fn field_without_root_bricks_cannot_be_indexed() {
        let (infos, data) = nested_field_data();
        // Keep only the level-1 brick.
        let field = AmrField::new(&infos[1..], &data).unwrap();

        assert_eq!(AmrAccel::new(&field).err(), Some(EmptyFieldError::NoRootBricks));
    }

    #[test]
    fn world_bounds_and_widths() {
        let (infos, data) = nested_field_data();
        let field = AmrField::new(&infos, &data).unwrap();
        let accel = AmrAccel::new(&field).unwrap();

        assert_eq!(
            *accel.world_bounds(),
            Extent3f::from_min_and_lub(Point3f::ZERO, Point3f::fill(2.0))
        );
        assert_eq!(accel.finest_cell_width(), 0.5);
        assert_eq!(accel.coarsest_cell_width(), 1.0);
        assert_eq!(accel.root_grid_extent().shape, Point3i::fill(2));
        assert_eq!(accel.default_sampling_step(), 0.1);
        assert_eq!(accel.sampling_step(Some(0.025)), 0.025);
        assert_eq!(
            accel.levels(),
            &[
                LevelInfo {
                    level: 0,
                    cell_width: 1.0,
                    num_bricks: 1
                },
                LevelInfo {
                    level: 1,
                    cell_width: 0.5,
                    num_bricks: 1
                },
            ]
        );
    }

    #[test]
    fn candidates_are_ordered_coarsest_to_finest() {
        let (infos, data) = nested_field_data();
        let field = AmrField::new(&infos, &data).unwrap();
        let accel = AmrAccel::new(&field).unwrap();

        // Both bricks cover the whole domain, so every interior point sees both.
        assert_eq!(accel.find_candidates(Point3f::fill(1.0)), &[0, 1]);
        assert_eq!(accel.find_candidates(Point3f::fill(0.25)), &[0, 1]);
    }

    #[test]
    fn no_candidates_outside_world_bounds() {
        let (infos, data) = nested_field_data();
        let field = AmrField::new(&infos, &data).unwrap();
        let accel = AmrAccel::new(&field).unwrap();

        assert!(accel.find_candidates(Point3f::fill(-0.5)).is_empty());
        assert!(accel.find_candidates(Point3f::fill(2.5)).is_empty());
        // The upper boundary itself is outside the half-closed world bounds.
        assert!(accel.find_candidates(Point3f::fill(2.0)).is_empty());
    }

    #[test]
    fn gaps_in_the_root_tiling_yield_no_candidates() {
        let (infos, data) = two_root_bricks_data();
        let field = AmrField::new(&infos, &data).unwrap();
        let accel = AmrAccel::new(&field).unwrap();

        // The two bricks sit at opposite corners of the world bounds.
        assert_eq!(accel.find_candidates(Point3f::fill(0.5)), &[0]);
        assert_eq!(accel.find_candidates(Point3f::fill(1.5)), &[1]);
        assert!(accel.find_candidates(Point3f::new(1.5, 0.5, 0.5)).is_empty());
    }

    #[test]
    fn every_point_in_a_leaf_is_covered_by_all_its_bricks() {
        let (infos, data) = nested_field_data();
        let field = AmrField::new(&infos, &data).unwrap();
        let accel = AmrAccel::new(&field).unwrap();

        for leaf in accel.leaves() {
            let center = leaf.bounds().center();
            for &id in leaf.bricks() {
                assert!(field.bricks()[id]
                    .physical_bounds()
                    .contains(center));
            }
        }
    }
}
