//! Stateless helpers for preparing vertex data.

use nalgebra::Vector3;

use crate::{
    layout::{Handedness, LayoutError},
    AttributeUsage, RenderBackend, VertexLayout,
};

/// Pack a vector with components in [-1, 1] into four unsigned normalized bytes, `x` in the
/// lowest byte.
///
/// ```
/// # use geode::util::encode_normal_rgba8;
/// assert_eq!(encode_normal_rgba8(1.0, -1.0, 0.0, 0.0), 0x80_80_00_FF);
/// ```
pub fn encode_normal_rgba8(x: f32, y: f32, z: f32, w: f32) -> u32 {
    let unorm = |v: f32| ((v * 0.5 + 0.5).clamp(0.0, 1.0) * 255.0).round() as u8;
    u32::from_le_bytes([unorm(x), unorm(y), unorm(z), unorm(w)])
}

/// Whether the backend's transient buffers have room for `num_vertices` vertices of `layout`
/// and, unless it is zero, `num_indices` indices.
pub fn check_avail_transient_buffers<B: RenderBackend + ?Sized>(
    backend: &B,
    num_vertices: u32,
    layout: &VertexLayout,
    num_indices: u32,
) -> bool {
    backend.avail_transient_vertex_buffer(num_vertices, layout) == num_vertices
        && (num_indices == 0 || backend.avail_transient_index_buffer(num_indices) == num_indices)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TangentError {
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("{num_vertices} vertices need {needed} bytes, but only {len} were given")]
    ShortBuffer {
        num_vertices: usize,
        needed: usize,
        len: usize,
    },
    #[error("index {index} is out of range of {num_vertices} vertices")]
    IndexOutOfRange { index: u16, num_vertices: usize },
}

fn read_f32s<const N: usize>(vertices: &[u8], offset: usize) -> [f32; N] {
    bytemuck::pod_read_unaligned(&vertices[offset..offset + N * std::mem::size_of::<f32>()])
}

/// Compute per-vertex tangents for an indexed triangle list, writing them into the layout's
/// tangent attribute.
///
/// Tangents are accumulated over every triangle touching a vertex, then orthogonalized against
/// the vertex normal; `w` holds the [Handedness] of the resulting tangent frame. Triangles with
/// degenerate texture coordinates contribute nothing.
///
/// The layout must store, as `f32`s, a 3-element position and normal, a 2-element
/// `Texcoord(0)`, and a 4-element tangent.
pub fn calc_tangents(
    vertices: &mut [u8],
    num_vertices: usize,
    layout: &VertexLayout,
    indices: &[u16],
) -> Result<(), TangentError> {
    let position = layout.f32_attribute(AttributeUsage::Position, 3)?.offset as usize;
    let normal = layout.f32_attribute(AttributeUsage::Normal, 3)?.offset as usize;
    let texcoord = layout.f32_attribute(AttributeUsage::Texcoord(0), 2)?.offset as usize;
    let tangent = layout.f32_attribute(AttributeUsage::Tangent, 4)?.offset as usize;

    let stride = layout.stride() as usize;
    let needed = layout.size(num_vertices);
    if vertices.len() < needed {
        return Err(TangentError::ShortBuffer {
            num_vertices,
            needed,
            len: vertices.len(),
        });
    }
    if let Some(&index) = indices.iter().find(|&&i| i as usize >= num_vertices) {
        return Err(TangentError::IndexOutOfRange {
            index,
            num_vertices,
        });
    }

    let src: &[u8] = vertices;
    let pos = |v: usize| Vector3::from(read_f32s::<3>(src, v * stride + position));
    let uv = |v: usize| read_f32s::<2>(src, v * stride + texcoord);

    let mut tangents = vec![Vector3::<f32>::zeros(); num_vertices];
    let mut bitangents = vec![Vector3::<f32>::zeros(); num_vertices];
    for tri in indices.chunks_exact(3) {
        let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        let (p0, p1, p2) = (pos(i0), pos(i1), pos(i2));
        let ([u0, v0], [u1, v1], [u2, v2]) = (uv(i0), uv(i1), uv(i2));

        let (ba, ca) = (p1 - p0, p2 - p0);
        let (bau, bav) = (u1 - u0, v1 - v0);
        let (cau, cav) = (u2 - u0, v2 - v0);
        let det = bau * cav - bav * cau;
        if det.abs() <= f32::EPSILON {
            continue;
        }
        let inv_det = 1.0 / det;
        let t = (ba * cav - ca * bav) * inv_det;
        let b = (ca * bau - ba * cau) * inv_det;
        for i in [i0, i1, i2] {
            tangents[i] += t;
            bitangents[i] += b;
        }
    }

    for (v, (t, b)) in tangents.iter().zip(&bitangents).enumerate() {
        let base = v * stride;
        let n = Vector3::from(read_f32s::<3>(vertices, base + normal));
        let t = (t - n * n.dot(t))
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);
        let handedness = if n.cross(&t).dot(b) < 0.0 {
            Handedness::Negative
        } else {
            Handedness::Positive
        };
        let out = [t.x, t.y, t.z, handedness.to_f32()];
        vertices[base + tangent..base + tangent + 16].copy_from_slice(bytemuck::bytes_of(&out));
    }
    Ok(())
}
