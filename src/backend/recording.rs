use std::{collections::BTreeMap, ops::Range};

use nalgebra::Matrix4;

use super::{
    BackendError, IndexBufferHandle, ProgramHandle, RenderBackend, RenderState, ResourceKind,
    TextureBinding, TextureHandle, VertexBufferHandle, ViewId,
};
use crate::{SlotArena, VertexLayout};

/// Resource limits of a [RecordingBackend].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendLimits {
    pub max_vertex_buffers: usize,
    pub max_index_buffers: usize,
    pub max_textures: usize,
    /// Transient vertex buffer size, in bytes.
    pub transient_vertex_bytes: usize,
    /// Transient index buffer size, in bytes.
    pub transient_index_bytes: usize,
}

impl Default for BackendLimits {
    fn default() -> Self {
        Self {
            max_vertex_buffers: 4 << 10,
            max_index_buffers: 4 << 10,
            max_textures: 4 << 10,
            transient_vertex_bytes: 6 << 20,
            transient_index_bytes: 2 << 20,
        }
    }
}

/// Running totals of resource creation & destruction.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BackendStats {
    pub vertex_buffers_created: usize,
    pub vertex_buffers_destroyed: usize,
    pub index_buffers_created: usize,
    pub index_buffers_destroyed: usize,
    pub textures_created: usize,
    pub textures_destroyed: usize,
}

/// A draw recorded by [RenderBackend::submit].
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub program: ProgramHandle,
    pub vertex_buffer: VertexBufferHandle,
    pub index_buffer: IndexBufferHandle,
    /// Indices of `index_buffer` drawn.
    pub indices: Range<u32>,
    pub transform: Matrix4<f32>,
    pub state: RenderState,
    pub textures: Vec<TextureBinding>,
}

#[derive(Debug, Clone)]
struct Encoder {
    vertex_buffer: VertexBufferHandle,
    index_buffer: IndexBufferHandle,
    indices: Range<u32>,
    transform: Matrix4<f32>,
    state: RenderState,
    textures: Vec<TextureBinding>,
}

impl Default for Encoder {
    fn default() -> Self {
        Self {
            vertex_buffer: VertexBufferHandle::INVALID,
            index_buffer: IndexBufferHandle::INVALID,
            indices: 0..0,
            transform: Matrix4::identity(),
            state: RenderState::DEFAULT,
            textures: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct VertexBufferInfo {
    size: usize,
    stride: u16,
}

#[derive(Debug, Clone, Copy)]
struct TextureInfo {
    width: u32,
    height: u32,
}

/// A [RenderBackend] which records draws into per-view command lists instead of talking to a GPU.
///
/// Buffer handles come from fixed-size pools (see [BackendLimits]) and are recycled once
/// destroyed, so it doubles as a leak checker: [live_buffers](Self::live_buffers) counts every
/// buffer that was created and not yet destroyed.
#[derive(Debug)]
pub struct RecordingBackend {
    limits: BackendLimits,
    vertex_buffers: SlotArena<VertexBufferInfo>,
    index_buffers: SlotArena<usize>,
    textures: SlotArena<TextureInfo>,
    encoder: Encoder,
    views: BTreeMap<ViewId, Vec<DrawCall>>,
    stats: BackendStats,
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new(BackendLimits::default())
    }
}

impl RecordingBackend {
    pub fn new(limits: BackendLimits) -> Self {
        Self {
            vertex_buffers: SlotArena::with_max_len(limits.max_vertex_buffers),
            index_buffers: SlotArena::with_max_len(limits.max_index_buffers),
            textures: SlotArena::with_max_len(limits.max_textures),
            limits,
            encoder: Encoder::default(),
            views: BTreeMap::new(),
            stats: BackendStats::default(),
        }
    }

    #[inline]
    pub fn limits(&self) -> &BackendLimits {
        &self.limits
    }

    #[inline]
    pub fn stats(&self) -> &BackendStats {
        &self.stats
    }

    /// Number of vertex & index buffers created and not yet destroyed.
    pub fn live_buffers(&self) -> usize {
        self.vertex_buffers.len() + self.index_buffers.len()
    }

    #[inline]
    pub fn live_textures(&self) -> usize {
        self.textures.len()
    }

    /// Size in bytes of a live vertex buffer.
    pub fn vertex_buffer_size(&self, handle: VertexBufferHandle) -> Option<usize> {
        self.vertex_buffers.get(handle.index()).map(|vb| vb.size)
    }

    /// Vertex stride a live vertex buffer was created with.
    pub fn vertex_buffer_stride(&self, handle: VertexBufferHandle) -> Option<u16> {
        self.vertex_buffers.get(handle.index()).map(|vb| vb.stride)
    }

    /// Size in bytes of a live index buffer.
    pub fn index_buffer_size(&self, handle: IndexBufferHandle) -> Option<usize> {
        self.index_buffers.get(handle.index()).copied()
    }

    /// Create a texture of the given size. Image decoding & upload happen elsewhere; this only
    /// reserves a handle.
    pub fn create_texture(&mut self, width: u32, height: u32) -> Result<TextureHandle, BackendError> {
        let index = self
            .textures
            .insert(TextureInfo { width, height })
            .map_err(|_| BackendError::OutOfHandles {
                kind: ResourceKind::Texture,
                capacity: self.textures.max_len(),
            })?;
        self.stats.textures_created += 1;
        tracing::trace!(index, width, height, "created texture");
        Ok(TextureHandle::new(index))
    }

    /// Dimensions of a live texture.
    pub fn texture_size(&self, handle: TextureHandle) -> Option<(u32, u32)> {
        self.textures
            .get(handle.index())
            .map(|t| (t.width, t.height))
    }

    /// Draws recorded into `view` since the last [frame](Self::frame).
    pub fn draws(&self, view: ViewId) -> &[DrawCall] {
        self.views.get(&view).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Total draws recorded into every view since the last [frame](Self::frame).
    pub fn draw_count(&self) -> usize {
        self.views.values().map(Vec::len).sum()
    }

    /// Views which have had draws recorded since the last [frame](Self::frame), in order.
    pub fn views(&self) -> impl Iterator<Item = ViewId> + '_ {
        self.views.keys().copied()
    }

    /// End the frame: discard pending state and every recorded command list, returning the
    /// number of draws that were recorded.
    pub fn frame(&mut self) -> usize {
        let count = self.draw_count();
        self.views.clear();
        self.encoder = Encoder::default();
        count
    }
}

impl RenderBackend for RecordingBackend {
    fn create_vertex_buffer(
        &mut self,
        data: &[u8],
        layout: &VertexLayout,
    ) -> Result<VertexBufferHandle, BackendError> {
        if data.is_empty() {
            return Err(BackendError::EmptyData(ResourceKind::VertexBuffer));
        }
        let index = self
            .vertex_buffers
            .insert(VertexBufferInfo {
                size: data.len(),
                stride: layout.stride(),
            })
            .map_err(|_| BackendError::OutOfHandles {
                kind: ResourceKind::VertexBuffer,
                capacity: self.vertex_buffers.max_len(),
            })?;
        self.stats.vertex_buffers_created += 1;
        tracing::trace!(index, size = data.len(), "created vertex buffer");
        Ok(VertexBufferHandle::new(index))
    }

    fn create_index_buffer(&mut self, data: &[u8]) -> Result<IndexBufferHandle, BackendError> {
        if data.is_empty() {
            return Err(BackendError::EmptyData(ResourceKind::IndexBuffer));
        }
        let index = self
            .index_buffers
            .insert(data.len())
            .map_err(|_| BackendError::OutOfHandles {
                kind: ResourceKind::IndexBuffer,
                capacity: self.index_buffers.max_len(),
            })?;
        self.stats.index_buffers_created += 1;
        tracing::trace!(index, size = data.len(), "created index buffer");
        Ok(IndexBufferHandle::new(index))
    }

    fn destroy_vertex_buffer(&mut self, handle: VertexBufferHandle) {
        if self.vertex_buffers.remove(handle.index()).is_some() {
            self.stats.vertex_buffers_destroyed += 1;
        } else if handle.is_valid() {
            tracing::warn!(%handle, "destroying vertex buffer which is not live");
        }
    }

    fn destroy_index_buffer(&mut self, handle: IndexBufferHandle) {
        if self.index_buffers.remove(handle.index()).is_some() {
            self.stats.index_buffers_destroyed += 1;
        } else if handle.is_valid() {
            tracing::warn!(%handle, "destroying index buffer which is not live");
        }
    }

    fn destroy_texture(&mut self, handle: TextureHandle) {
        if self.textures.remove(handle.index()).is_some() {
            self.stats.textures_destroyed += 1;
        } else if handle.is_valid() {
            tracing::warn!(%handle, "destroying texture which is not live");
        }
    }

    fn set_vertex_buffer(&mut self, _stream: u8, handle: VertexBufferHandle) {
        self.encoder.vertex_buffer = handle;
    }

    fn set_index_buffer(&mut self, handle: IndexBufferHandle, first_index: u32, num_indices: u32) {
        self.encoder.index_buffer = handle;
        self.encoder.indices = first_index..first_index.saturating_add(num_indices);
    }

    fn set_transform(&mut self, transform: &Matrix4<f32>) {
        self.encoder.transform = *transform;
    }

    fn set_state(&mut self, state: RenderState) {
        self.encoder.state = state;
    }

    fn set_texture(&mut self, binding: &TextureBinding) {
        self.encoder.textures.push(*binding);
    }

    fn submit(&mut self, view: ViewId, program: ProgramHandle) {
        let Encoder {
            vertex_buffer,
            index_buffer,
            indices,
            transform,
            state,
            textures,
        } = std::mem::take(&mut self.encoder);
        self.views.entry(view).or_default().push(DrawCall {
            program,
            vertex_buffer,
            index_buffer,
            indices,
            transform,
            state,
            textures,
        });
    }

    fn avail_transient_vertex_buffer(&self, num_vertices: u32, layout: &VertexLayout) -> u32 {
        match layout.stride() {
            0 => num_vertices,
            stride => {
                let fits = self.limits.transient_vertex_bytes / stride as usize;
                num_vertices.min(fits.min(u32::MAX as usize) as u32)
            }
        }
    }

    fn avail_transient_index_buffer(&self, num_indices: u32) -> u32 {
        let fits = self.limits.transient_index_bytes / std::mem::size_of::<u16>();
        num_indices.min(fits.min(u32::MAX as usize) as u32)
    }
}
