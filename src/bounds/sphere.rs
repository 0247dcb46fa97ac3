use nalgebra::Point3;

use super::{distance_squared, Float};

/// Bounding sphere
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere<Real: Float> {
    pub center: Point3<Real>,
    pub radius: Real,
}

impl<Real: Float> Default for Sphere<Real> {
    fn default() -> Self {
        Self::degenerate()
    }
}

impl<Real: Float> Sphere<Real> {
    #[inline]
    pub fn new(center: Point3<Real>, radius: Real) -> Self {
        Self { center, radius }
    }

    /// A zero-radius sphere at the origin.
    #[inline]
    pub fn degenerate() -> Self {
        Self::new(Point3::origin(), Real::ZERO)
    }

    /// The sphere around `center` whose radius reaches the farthest of `points`.
    pub fn enclosing(center: Point3<Real>, points: impl IntoIterator<Item = Point3<Real>>) -> Self {
        let radius_sq = points
            .into_iter()
            .map(|p| distance_squared(&center, &p))
            .fold(Real::ZERO, |acc, d| acc.max(d));
        Self::new(center, radius_sq.sqrt())
    }

    /// Determine whether `other` lies within `self`, allowing `eps` of rounding slack.
    pub fn contains_sphere(&self, other: &Self, eps: Real) -> bool {
        distance_squared(&self.center, &other.center).sqrt() + other.radius <= self.radius + eps
    }

    /// The smallest sphere containing both `self` and `other`.
    pub fn merged(&self, other: &Self) -> Self {
        let dist = distance_squared(&self.center, &other.center).sqrt();
        if dist + other.radius <= self.radius {
            return *self;
        }
        if dist + self.radius <= other.radius {
            return *other;
        }
        let radius = (dist + self.radius + other.radius) / Real::TWO;
        // dist > 0 here; coincident centers are caught by the checks above
        let t = (radius - self.radius) / dist;
        let (c, o) = (&self.center, &other.center);
        Self::new(
            nalgebra::point![
                c.x + (o.x - c.x) * t,
                c.y + (o.y - c.y) * t,
                c.z + (o.z - c.z) * t
            ],
            radius,
        )
    }
}
