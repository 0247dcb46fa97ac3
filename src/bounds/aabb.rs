use nalgebra::{point, Point3, Vector3};

use super::Float;

/// Axis-Aligned Bounding Box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb<Real: Float> {
    pub mins: Point3<Real>,
    pub maxs: Point3<Real>,
}

impl<Real: Float> Default for Aabb<Real> {
    fn default() -> Self {
        Self::degenerate()
    }
}

impl<Real: Float> Aabb<Real> {
    /// A zero-volume box at the origin.
    #[inline]
    pub fn degenerate() -> Self {
        Self::from_point(Point3::origin())
    }

    /// A zero-volume box at `p`.
    #[inline]
    pub fn from_point(p: Point3<Real>) -> Self {
        Self { mins: p, maxs: p }
    }

    /// An inverted box, which contains nothing & becomes valid after the first [expand_to](Self::expand_to).
    pub fn new_invalid() -> Self {
        Self {
            mins: point![Real::MAX, Real::MAX, Real::MAX],
            maxs: point![Real::MIN, Real::MIN, Real::MIN],
        }
    }

    /// Whether `mins` <= `maxs` on every axis.
    #[inline]
    pub fn is_valid(&self) -> bool {
        let Self { mins: i, maxs: a } = self;
        i.x <= a.x && i.y <= a.y && i.z <= a.z
    }

    /// Determine whether a point `p` lies within `self` (boundary inclusive).
    #[inline]
    pub fn contains(&self, p: &Point3<Real>) -> bool {
        let Self { mins: i, maxs: a } = self;
        (p.x >= i.x && p.y >= i.y && p.z >= i.z) && (p.x <= a.x && p.y <= a.y && p.z <= a.z)
    }

    /// Determine whether `other` lies entirely within `self`.
    #[inline]
    pub fn contains_aabb(&self, other: &Self) -> bool {
        self.contains(&other.mins) && self.contains(&other.maxs)
    }

    /// Determine the center of `self`.
    #[inline]
    pub fn center(&self) -> Point3<Real> {
        let Self { mins: i, maxs: a } = self;
        point![
            (i.x + a.x) / Real::TWO,
            (i.y + a.y) / Real::TWO,
            (i.z + a.z) / Real::TWO
        ]
    }

    /// Half the size of `self` along each axis.
    #[inline]
    pub fn half_extents(&self) -> Vector3<Real> {
        let Self { mins: i, maxs: a } = self;
        Vector3::new(
            (a.x - i.x) / Real::TWO,
            (a.y - i.y) / Real::TWO,
            (a.z - i.z) / Real::TWO,
        )
    }

    /// Grow `self` such that it contains `p`.
    #[inline]
    pub fn expand_to(&mut self, p: &Point3<Real>) {
        self.mins = self.mins.inf(p);
        self.maxs = self.maxs.sup(p);
    }
}
