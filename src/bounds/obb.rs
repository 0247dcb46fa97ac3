use nalgebra::{Point3, Vector3};

use super::{Aabb, Float};

/// Oriented Bounding Box
///
/// `axes` are the (orthonormal) local axes of the box, and `half_extents` its half-size along
/// each of them.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obb<Real: Float> {
    pub center: Point3<Real>,
    pub half_extents: Vector3<Real>,
    pub axes: [Vector3<Real>; 3],
}

impl<Real: Float> Default for Obb<Real> {
    fn default() -> Self {
        Self::degenerate()
    }
}

#[inline]
fn dot<Real: Float>(a: &Vector3<Real>, b: &Vector3<Real>) -> Real {
    a.x * b.x + a.y * b.y + a.z * b.z
}

fn identity_axes<Real: Float>() -> [Vector3<Real>; 3] {
    [
        Vector3::new(Real::ONE, Real::ZERO, Real::ZERO),
        Vector3::new(Real::ZERO, Real::ONE, Real::ZERO),
        Vector3::new(Real::ZERO, Real::ZERO, Real::ONE),
    ]
}

impl<Real: Float> Obb<Real> {
    /// A zero-volume box at the origin.
    pub fn degenerate() -> Self {
        Self {
            center: Point3::origin(),
            half_extents: Vector3::new(Real::ZERO, Real::ZERO, Real::ZERO),
            axes: identity_axes(),
        }
    }

    /// Express `p` in the local frame of `self`, relative to its center.
    pub fn to_local(&self, p: &Point3<Real>) -> Vector3<Real> {
        let c = &self.center;
        let d = Vector3::new(p.x - c.x, p.y - c.y, p.z - c.z);
        Vector3::new(
            dot(&d, &self.axes[0]),
            dot(&d, &self.axes[1]),
            dot(&d, &self.axes[2]),
        )
    }

    /// Determine whether `p` lies within `self`, allowing `eps` of rounding slack.
    pub fn contains(&self, p: &Point3<Real>, eps: Real) -> bool {
        let l = self.to_local(p);
        let h = &self.half_extents;
        l.x.abs() <= h.x + eps && l.y.abs() <= h.y + eps && l.z.abs() <= h.z + eps
    }

    /// The eight corners of `self`.
    pub fn corners(&self) -> [Point3<Real>; 8] {
        let [ax, ay, az] = &self.axes;
        let h = &self.half_extents;
        let mut res = [self.center; 8];
        for (i, corner) in res.iter_mut().enumerate() {
            let sx = if i & 0b100 != 0 { h.x } else { -h.x };
            let sy = if i & 0b010 != 0 { h.y } else { -h.y };
            let sz = if i & 0b001 != 0 { h.z } else { -h.z };
            corner.x += ax.x * sx + ay.x * sy + az.x * sz;
            corner.y += ax.y * sx + ay.y * sy + az.y * sz;
            corner.z += ax.z * sx + ay.z * sy + az.z * sz;
        }
        res
    }

    /// Determine whether `other` lies within `self`, allowing `eps` of rounding slack.
    pub fn contains_obb(&self, other: &Self, eps: Real) -> bool {
        other.corners().iter().all(|c| self.contains(c, eps))
    }
}

impl<Real: Float> From<Aabb<Real>> for Obb<Real> {
    fn from(aabb: Aabb<Real>) -> Self {
        Self {
            center: aabb.center(),
            half_extents: aabb.half_extents(),
            axes: identity_axes(),
        }
    }
}
