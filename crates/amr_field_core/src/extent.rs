use crate::point::{Point3f, Point3i};

use itertools::iproduct;

/// A 3-dimensional integer extent: the set of lattice points in the Cartesian product of a
/// half-closed interval `[a, b)` in each dimension. You can also just think of it as an
/// axis-aligned box with some shape and a minimum point.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Extent3i {
    /// The least point contained in the extent.
    pub minimum: Point3i,
    /// The length of each dimension.
    pub shape: Point3i,
}

impl Extent3i {
    /// The default representation of an extent as the minimum point and shape.
    #[inline]
    pub fn from_min_and_shape(minimum: Point3i, shape: Point3i) -> Self {
        Self { minimum, shape }
    }

    /// An alternative representation of an extent as the minimum point and least upper bound.
    #[inline]
    pub fn from_min_and_lub(minimum: Point3i, least_upper_bound: Point3i) -> Self {
        // We want to avoid negative shape components.
        let shape = (least_upper_bound - minimum).join(Point3i::ZERO);

        Self { minimum, shape }
    }

    /// An alternative representation of an extent as the minimum point and maximum point. There is
    /// a unique greatest point for any non-empty integer extent.
    #[inline]
    pub fn from_min_and_max(minimum: Point3i, max: Point3i) -> Self {
        Self::from_min_and_lub(minimum, max + Point3i::ONES)
    }

    /// The least point `p` for which all points `q` in the extent satisfy `q < p`.
    #[inline]
    pub fn least_upper_bound(&self) -> Point3i {
        self.minimum + self.shape
    }

    /// The unique greatest point in the extent.
    #[inline]
    pub fn max(&self) -> Point3i {
        self.least_upper_bound() - Point3i::ONES
    }

    /// The number of points contained in the extent. Widened to `usize` before multiplying, so
    /// huge shapes don't overflow the `i32` components; saturates at `usize::MAX`.
    #[inline]
    pub fn num_points(&self) -> usize {
        let shape = self.shape.join(Point3i::ZERO);

        (shape.x() as usize)
            .saturating_mul(shape.y() as usize)
            .saturating_mul(shape.z() as usize)
    }

    /// Returns `true` iff the number of points in the extent is 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.num_points() == 0
    }

    /// Returns `true` iff the point `p` is contained in this extent.
    #[inline]
    pub fn contains(&self, p: Point3i) -> bool {
        let min = self.minimum;
        let lub = self.least_upper_bound();

        min.x() <= p.x()
            && min.y() <= p.y()
            && min.z() <= p.z()
            && p.x() < lub.x()
            && p.y() < lub.y()
            && p.z() < lub.z()
    }

    /// Returns the extent containing only the points in both `self` and `other`.
    #[inline]
    pub fn intersection(&self, other: &Self) -> Self {
        let minimum = self.minimum.join(other.minimum);
        let lub = self
            .least_upper_bound()
            .meet(other.least_upper_bound());

        Self::from_min_and_lub(minimum, lub)
    }

    /// Returns the smallest extent containing both `self` and `other`.
    #[inline]
    pub fn bound_union(&self, other: &Self) -> Self {
        let minimum = self.minimum.meet(other.minimum);
        let lub = self
            .least_upper_bound()
            .join(other.least_upper_bound());

        Self::from_min_and_lub(minimum, lub)
    }

    /// Iterate over all points in the extent, X fastest (row-major).
    pub fn iter_points(&self) -> impl Iterator<Item = Point3i> {
        let min = self.minimum;
        let lub = self.least_upper_bound();

        iproduct!(min.z()..lub.z(), min.y()..lub.y(), min.x()..lub.x())
            .map(|(z, y, x)| Point3i::new(x, y, z))
    }
}

/// A 3-dimensional extent in physical space: the Cartesian product of a half-closed interval
/// `[a, b)` in each dimension, with `f32` bounds.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Extent3f {
    /// The least point contained in the extent.
    pub minimum: Point3f,
    /// The length of each dimension.
    pub shape: Point3f,
}

impl Extent3f {
    #[inline]
    pub fn from_min_and_shape(minimum: Point3f, shape: Point3f) -> Self {
        Self { minimum, shape }
    }

    #[inline]
    pub fn from_min_and_lub(minimum: Point3f, least_upper_bound: Point3f) -> Self {
        let shape = (least_upper_bound - minimum).join(Point3f::ZERO);

        Self { minimum, shape }
    }

    #[inline]
    pub fn least_upper_bound(&self) -> Point3f {
        self.minimum + self.shape
    }

    /// The center of the extent.
    #[inline]
    pub fn center(&self) -> Point3f {
        self.minimum + self.shape * 0.5
    }

    /// Returns `true` iff the point `p` is contained in this extent. Containment is half-closed:
    /// points on the upper boundary are outside.
    #[inline]
    pub fn contains(&self, p: Point3f) -> bool {
        let min = self.minimum;
        let lub = self.least_upper_bound();

        min.x() <= p.x()
            && min.y() <= p.y()
            && min.z() <= p.z()
            && p.x() < lub.x()
            && p.y() < lub.y()
            && p.z() < lub.z()
    }

    /// Returns `true` iff `self` and `other` overlap in a region of positive volume.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        let min1 = self.minimum;
        let lub1 = self.least_upper_bound();
        let min2 = other.minimum;
        let lub2 = other.least_upper_bound();

        min1.x() < lub2.x()
            && min1.y() < lub2.y()
            && min1.z() < lub2.z()
            && min2.x() < lub1.x()
            && min2.y() < lub1.y()
            && min2.z() < lub1.z()
    }

    /// Returns the smallest extent containing both `self` and `other`.
    #[inline]
    pub fn bound_union(&self, other: &Self) -> Self {
        let minimum = self.minimum.meet(other.minimum);
        let lub = self
            .least_upper_bound()
            .join(other.least_upper_bound());

        Self::from_min_and_lub(minimum, lub)
    }
}

// ████████╗███████╗███████╗████████╗
// ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝
//    ██║   █████╗  ███████╗   ██║
//    ██║   ██╔══╝  ╚════██║   ██║
//    ██║   ███████╗███████║   ██║
//    ╚═╝   ╚══════╝╚══════╝   ╚═╝
