use geode_common::item_with;

/// Trait for floating-point types, so that bounding volumes can be generic over {f32, f64}.
///
/// This is only intended to be implemented on floating-point types.
pub trait Float:
    num_traits::Float
    + nalgebra::Scalar
    + nalgebra::SimdPartialOrd
    + std::ops::AddAssign
    + std::ops::SubAssign
    + std::ops::MulAssign
    + std::ops::DivAssign
    + Copy
    + Send
    + Sync
{
    const ZERO: Self;
    const ONE: Self;
    const TWO: Self;

    const MIN: Self;
    const MAX: Self;
}

item_with! {Real: f32, f64 => impl Float for Real {
    const ZERO: Self = 0.0;
    const ONE: Self = 1.0;
    const TWO: Self = 2.0;

    const MIN: Self = Self::MIN;
    const MAX: Self = Self::MAX;
}}

/// Squared euclidean distance between two points.
#[inline]
pub(crate) fn distance_squared<Real: Float>(
    a: &nalgebra::Point3<Real>,
    b: &nalgebra::Point3<Real>,
) -> Real {
    let (dx, dy, dz) = (a.x - b.x, a.y - b.y, a.z - b.z);
    dx * dx + dy * dy + dz * dz
}
