use bytemuck::{Pod, Zeroable};
use core::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A 3-dimensional point with `i32` coordinates, i.e. a point on the voxel lattice.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq, Pod, Zeroable)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Point3i(pub [i32; 3]);

/// A 3-dimensional point with `f32` coordinates, i.e. a point in physical space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
#[repr(transparent)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct Point3f(pub [f32; 3]);

macro_rules! impl_point3_common {
    ($point:ty, $scalar:ty) => {
        impl $point {
            #[inline]
            pub fn new(x: $scalar, y: $scalar, z: $scalar) -> Self {
                Self([x, y, z])
            }

            /// The point with all coordinates equal to `value`.
            #[inline]
            pub fn fill(value: $scalar) -> Self {
                Self([value; 3])
            }

            #[inline]
            pub fn x(self) -> $scalar {
                self.0[0]
            }

            #[inline]
            pub fn y(self) -> $scalar {
                self.0[1]
            }

            #[inline]
            pub fn z(self) -> $scalar {
                self.0[2]
            }

            #[inline]
            pub fn at(self, component_index: usize) -> $scalar {
                self.0[component_index]
            }

            #[inline]
            pub fn at_mut(&mut self, component_index: usize) -> &mut $scalar {
                &mut self.0[component_index]
            }

            /// The component-wise minimum of `self` and `other`.
            #[inline]
            pub fn meet(self, other: Self) -> Self {
                Self([
                    min(self.x(), other.x()),
                    min(self.y(), other.y()),
                    min(self.z(), other.z()),
                ])
            }

            /// The component-wise maximum of `self` and `other`.
            #[inline]
            pub fn join(self, other: Self) -> Self {
                Self([
                    max(self.x(), other.x()),
                    max(self.y(), other.y()),
                    max(self.z(), other.z()),
                ])
            }
        }

        impl Add for $point {
            type Output = Self;

            #[inline]
            fn add(self, rhs: Self) -> Self {
                Self([self.x() + rhs.x(), self.y() + rhs.y(), self.z() + rhs.z()])
            }
        }

        impl Sub for $point {
            type Output = Self;

            #[inline]
            fn sub(self, rhs: Self) -> Self {
                Self([self.x() - rhs.x(), self.y() - rhs.y(), self.z() - rhs.z()])
            }
        }

        impl AddAssign for $point {
            #[inline]
            fn add_assign(&mut self, rhs: Self) {
                *self = *self + rhs;
            }
        }

        impl SubAssign for $point {
            #[inline]
            fn sub_assign(&mut self, rhs: Self) {
                *self = *self - rhs;
            }
        }

        impl Mul<$scalar> for $point {
            type Output = Self;

            #[inline]
            fn mul(self, rhs: $scalar) -> Self {
                Self([self.x() * rhs, self.y() * rhs, self.z() * rhs])
            }
        }
    };
}

impl_point3_common!(Point3i, i32);
impl_point3_common!(Point3f, f32);

// The `min`/`max` free functions referenced by the macro; `f32` is not `Ord`, so we go through
// the primitive methods instead of `std::cmp`.
#[inline]
fn min<T: PartialOrd>(a: T, b: T) -> T {
    if a < b {
        a
    } else {
        b
    }
}

#[inline]
fn max<T: PartialOrd>(a: T, b: T) -> T {
    if a > b {
        a
    } else {
        b
    }
}

impl Point3i {
    pub const ZERO: Self = Self([0; 3]);
    pub const ONES: Self = Self([1; 3]);
}

impl Point3f {
    pub const ZERO: Self = Self([0.0; 3]);

    /// The component-wise floor.
    #[inline]
    pub fn floor(self) -> Self {
        Self([self.x().floor(), self.y().floor(), self.z().floor()])
    }

    /// Lossy cast of each coordinate to `i32`, truncating toward zero.
    #[inline]
    pub fn as_3i(self) -> Point3i {
        Point3i([self.x() as i32, self.y() as i32, self.z() as i32])
    }
}

impl From<Point3i> for Point3f {
    #[inline]
    fn from(p: Point3i) -> Self {
        Self([p.x() as f32, p.y() as f32, p.z() as f32])
    }
}

impl Div<f32> for Point3f {
    type Output = Self;

    #[inline]
    fn div(self, rhs: f32) -> Self {
        Self([self.x() / rhs, self.y() / rhs, self.z() / rhs])
    }
}

impl Neg for Point3f {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self([-self.x(), -self.y(), -self.z()])
    }
}

/// Returns the lattice point of the voxel that contains the physical point `p`, i.e. the
/// component-wise floor of `p`.
#[inline]
pub fn voxel_containing_point3f(p: Point3f) -> Point3i {
    p.floor().as_3i()
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

    #[test]
    fn meet_and_join_are_component_wise() {
        let p1 = Point3i::new(1, 5, -2);
        let p2 = Point3i::new(3, 4, -7);

        assert_eq!(p1.meet(p2), Point3i::new(1, 4, -7));
        assert_eq!(p1.join(p2), Point3i::new(3, 5, -2));
    }

    #[test]
    fn voxel_containing_rounds_toward_negative_infinity() {
        assert_eq!(
            voxel_containing_point3f(Point3f::new(0.5, 1.9, -0.1)),
            Point3i::new(0, 1, -1)
        );
    }
}
