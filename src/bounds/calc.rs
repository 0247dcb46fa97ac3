use nalgebra::Point3;

use super::Bounds;

/// Size of an `f32` XYZ position, in bytes.
const POSITION_SIZE: usize = 3 * std::mem::size_of::<f32>();

/// Iterate over the `f32` XYZ positions of `count` interleaved vertices.
///
/// Vertex `i`'s position is read from `vertices[i * stride + position_offset..]`. Iteration stops
/// early at the first vertex whose position would extend past the end of `vertices`.
pub fn positions(
    vertices: &[u8],
    stride: usize,
    count: usize,
    position_offset: usize,
) -> impl Iterator<Item = Point3<f32>> + Clone + '_ {
    (0..count).map_while(move |i| {
        let start = i.checked_mul(stride)?.checked_add(position_offset)?;
        let bytes = vertices.get(start..start.checked_add(POSITION_SIZE)?)?;
        let [x, y, z]: [f32; 3] = bytemuck::pod_read_unaligned(bytes);
        Some(Point3::new(x, y, z))
    })
}

/// Compute the [Bounds] of `count` interleaved vertices.
///
/// See [positions] for the addressing of each vertex. Zero vertices produce
/// [degenerate](Bounds::degenerate) bounds.
pub fn calc_bounds(
    vertices: &[u8],
    stride: usize,
    count: usize,
    position_offset: usize,
) -> Bounds<f32> {
    Bounds::from_points(positions(vertices, stride, count, position_offset))
}
