use crate::{
    backend::ResourceKind,
    bounds::{calc_bounds, Bounds},
    de::ParseError,
    IndexBufferHandle, Primitive, PrimitiveDesc, RenderBackend, ResourceError, VertexBufferHandle,
    VertexLayout,
};

/// A pair of GPU vertex & index buffers, along with the [Primitives](Primitive) drawn from them.
///
/// Groups are built incrementally by [Mesh::load](crate::Mesh::load): vertices, then indices,
/// then primitives, then [finalize](Self::finalize). A finalized group owns its buffer handles
/// until [released](Self::release).
#[derive(Debug, Default)]
pub struct Group {
    vertex_buffer: VertexBufferHandle,
    index_buffer: IndexBufferHandle,
    num_vertices: u32,
    num_indices: u32,
    vertices: Vec<u8>,
    indices: Vec<u16>,
    ram_copy: bool,
    material: String,
    bounds: Bounds<f32>,
    primitives: Vec<Primitive>,
    pending: Vec<PrimitiveDesc>,
}

impl Group {
    pub(crate) fn set_vertices(&mut self, num_vertices: u32, data: Vec<u8>) {
        self.num_vertices = num_vertices;
        self.vertices = data;
    }

    pub(crate) fn set_indices(&mut self, indices: Vec<u16>) {
        self.num_indices = indices.len() as u32;
        self.indices = indices;
    }

    pub(crate) fn set_primitives(&mut self, material: String, primitives: Vec<PrimitiveDesc>) {
        self.material = material;
        self.pending = primitives;
    }

    /// Check that every index & primitive refers to data within this group.
    pub(crate) fn validate(&self, group: usize) -> Result<(), ParseError> {
        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&i| i as u32 >= self.num_vertices)
        {
            return Err(ParseError::IndexOutOfRange {
                group,
                index,
                num_vertices: self.num_vertices,
            });
        }
        match self
            .pending
            .iter()
            .position(|p| !p.fits_within(self.num_indices, self.num_vertices))
        {
            Some(primitive) => Err(ParseError::PrimitiveOutOfRange { group, primitive }),
            None => Ok(()),
        }
    }

    /// Compute bounds, then upload vertex & index data.
    ///
    /// Primitives without vertices get zero-volume bounds at the center of the group. Without
    /// `ram_copy`, the CPU-side data is dropped once uploaded. Empty vertex or index data creates
    /// no buffer, leaving the corresponding handle invalid.
    ///
    /// # Errors
    ///
    /// If the backend refuses a buffer, any buffer already created for this group is destroyed
    /// before returning.
    pub(crate) fn finalize<B: RenderBackend + ?Sized>(
        &mut self,
        group: usize,
        layout: &VertexLayout,
        backend: &mut B,
        ram_copy: bool,
    ) -> Result<(), ResourceError> {
        let stride = layout.stride() as usize;
        let position = layout.position_offset().unwrap_or_default();

        let mut bounds = calc_bounds(&self.vertices, stride, self.num_vertices as usize, position);
        let center = bounds.aabb.center();
        self.primitives = std::mem::take(&mut self.pending)
            .into_iter()
            .map(|desc| {
                let b = if desc.num_vertices == 0 {
                    // keep empty primitives inside the group
                    Bounds::from_points(std::iter::once(center))
                } else {
                    let start = desc.start_vertex as usize * stride;
                    let vertices = self.vertices.get(start..).unwrap_or_default();
                    calc_bounds(vertices, stride, desc.num_vertices as usize, position)
                };
                bounds.sphere = bounds.sphere.merged(&b.sphere);
                Primitive::new(desc, b)
            })
            .collect();
        self.bounds = bounds;

        if !self.vertices.is_empty() {
            self.vertex_buffer = backend
                .create_vertex_buffer(&self.vertices, layout)
                .map_err(|source| ResourceError {
                    kind: ResourceKind::VertexBuffer,
                    group,
                    source,
                })?;
        }
        if !self.indices.is_empty() {
            match backend.create_index_buffer(bytemuck::cast_slice(&self.indices)) {
                Ok(handle) => self.index_buffer = handle,
                Err(source) => {
                    if self.vertex_buffer.is_valid() {
                        backend.destroy_vertex_buffer(self.vertex_buffer);
                        self.vertex_buffer = VertexBufferHandle::INVALID;
                    }
                    return Err(ResourceError {
                        kind: ResourceKind::IndexBuffer,
                        group,
                        source,
                    });
                }
            }
        }

        self.ram_copy = ram_copy;
        if !ram_copy {
            self.vertices = Vec::new();
            self.indices = Vec::new();
        }
        Ok(())
    }

    /// Destroy this group's buffers and reset it to empty.
    pub fn release<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) {
        if self.vertex_buffer.is_valid() {
            backend.destroy_vertex_buffer(self.vertex_buffer);
        }
        if self.index_buffer.is_valid() {
            backend.destroy_index_buffer(self.index_buffer);
        }
        *self = Self::default();
    }

    #[inline]
    pub fn vertex_buffer(&self) -> VertexBufferHandle {
        self.vertex_buffer
    }

    #[inline]
    pub fn index_buffer(&self) -> IndexBufferHandle {
        self.index_buffer
    }

    /// Whether this group owns any GPU buffer.
    #[inline]
    pub fn is_resident(&self) -> bool {
        self.vertex_buffer.is_valid() || self.index_buffer.is_valid()
    }

    /// Whether submitting this group would draw anything.
    #[inline]
    pub fn is_drawable(&self) -> bool {
        self.num_indices > 0 && self.vertex_buffer.is_valid() && self.index_buffer.is_valid()
    }

    #[inline]
    pub fn num_vertices(&self) -> u32 {
        self.num_vertices
    }

    #[inline]
    pub fn num_indices(&self) -> u32 {
        self.num_indices
    }

    /// Name of the material this group is drawn with. May be empty.
    #[inline]
    pub fn material(&self) -> &str {
        &self.material
    }

    /// Bounds of every vertex of this group; these enclose the bounds of each of its primitives.
    #[inline]
    pub fn bounds(&self) -> &Bounds<f32> {
        &self.bounds
    }

    #[inline]
    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    /// The vertex data of this group, if it was loaded with a ram copy.
    pub fn vertices(&self) -> Option<&[u8]> {
        self.ram_copy.then_some(self.vertices.as_slice())
    }

    /// The index data of this group, if it was loaded with a ram copy.
    pub fn indices(&self) -> Option<&[u16]> {
        self.ram_copy.then_some(self.indices.as_slice())
    }
}
