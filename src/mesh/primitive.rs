use std::ops::Range;

use crate::bounds::Bounds;

/// A primitive as declared in a mesh stream, before its bounds are known.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash)]
pub struct PrimitiveDesc {
    pub name: String,
    pub start_index: u32,
    pub num_indices: u32,
    pub start_vertex: u32,
    pub num_vertices: u32,
}

impl PrimitiveDesc {
    /// Whether this primitive's ranges lie within `num_indices` indices & `num_vertices` vertices.
    pub fn fits_within(&self, num_indices: u32, num_vertices: u32) -> bool {
        let end = |start: u32, len: u32| start as u64 + len as u64;
        end(self.start_index, self.num_indices) <= num_indices as u64
            && end(self.start_vertex, self.num_vertices) <= num_vertices as u64
    }
}

/// A contiguous, separately drawable sub-range of a [Group](crate::Group)'s buffers.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    name: String,
    start_index: u32,
    num_indices: u32,
    start_vertex: u32,
    num_vertices: u32,
    bounds: Bounds<f32>,
}

impl Primitive {
    pub(crate) fn new(desc: PrimitiveDesc, bounds: Bounds<f32>) -> Self {
        Self {
            name: desc.name,
            start_index: desc.start_index,
            num_indices: desc.num_indices,
            start_vertex: desc.start_vertex,
            num_vertices: desc.num_vertices,
            bounds,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn start_index(&self) -> u32 {
        self.start_index
    }

    #[inline]
    pub fn num_indices(&self) -> u32 {
        self.num_indices
    }

    #[inline]
    pub fn start_vertex(&self) -> u32 {
        self.start_vertex
    }

    #[inline]
    pub fn num_vertices(&self) -> u32 {
        self.num_vertices
    }

    /// The indices of this primitive within its group's index buffer.
    #[inline]
    pub fn index_range(&self) -> Range<u32> {
        self.start_index..self.start_index + self.num_indices
    }

    /// The vertices of this primitive within its group's vertex buffer.
    #[inline]
    pub fn vertex_range(&self) -> Range<u32> {
        self.start_vertex..self.start_vertex + self.num_vertices
    }

    /// Bounds of this primitive's vertex range.
    #[inline]
    pub fn bounds(&self) -> &Bounds<f32> {
        &self.bounds
    }
}
