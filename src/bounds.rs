//! Bounding volumes computed from vertex positions.
//!
//! All three volumes follow one convention, so that they nest predictably:
//!
//! * [Aabb]: componentwise minimum & maximum of the positions.
//! * [Sphere]: centered on the [Aabb]'s center, with radius equal to the greatest distance from
//!   that center to any position. Each half-extent of the box is at most the radius, so the box
//!   always lies within the sphere's bounding cube.
//! * [Obb]: the [Aabb] expressed as center, half-extents & (identity) axes.
//!
//! An empty position set yields degenerate bounds at the origin.

mod aabb;
pub use aabb::*;
mod calc;
pub use calc::*;
mod obb;
pub use obb::*;
mod sphere;
pub use sphere::*;
mod traits;
pub use traits::*;

use nalgebra::Point3;

/// The three bounding volumes of a set of positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds<Real: Float> {
    pub sphere: Sphere<Real>,
    pub aabb: Aabb<Real>,
    pub obb: Obb<Real>,
}

impl<Real: Float> Default for Bounds<Real> {
    fn default() -> Self {
        Self::degenerate()
    }
}

impl<Real: Float> Bounds<Real> {
    /// Zero-volume bounds at the origin.
    pub fn degenerate() -> Self {
        Self {
            sphere: Sphere::degenerate(),
            aabb: Aabb::degenerate(),
            obb: Obb::degenerate(),
        }
    }

    /// Compute bounds enclosing every point yielded by `points`.
    ///
    /// The iterator is walked twice: once for the box, once for the sphere radius.
    pub fn from_points<I>(points: I) -> Self
    where
        I: IntoIterator<Item = Point3<Real>>,
        I::IntoIter: Clone,
    {
        let points = points.into_iter();
        let mut aabb = Aabb::new_invalid();
        for p in points.clone() {
            aabb.expand_to(&p);
        }
        if !aabb.is_valid() {
            return Self::degenerate();
        }
        let sphere = Sphere::enclosing(aabb.center(), points);
        Self {
            sphere,
            aabb,
            obb: Obb::from(aabb),
        }
    }

    /// Determine whether `other` lies entirely within `self`, allowing `eps` of rounding slack.
    pub fn encloses(&self, other: &Self, eps: Real) -> bool {
        self.aabb.contains_aabb(&other.aabb)
            && self.sphere.contains_sphere(&other.sphere, eps)
            && self.obb.contains_obb(&other.obb, eps)
    }
}
