//! The rendering collaborator that meshes upload to and draw through.
//!
//! [RenderBackend] mirrors an immediate-mode, bgfx-style encoder: per draw, the caller sets
//! buffers, transform, state & textures, then [submits](RenderBackend::submit) to a view, which
//! consumes the pending state. Implementations are injected wherever a mesh needs GPU access;
//! nothing here is global.

mod handle;
pub use handle::*;
mod recording;
pub use recording::*;
mod state;
pub use state::*;

use nalgebra::Matrix4;

use crate::VertexLayout;

/// Identifies a render target/pass which draw calls are recorded against.
pub type ViewId = u16;

/// The kind of GPU resource a backend call concerns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    VertexBuffer,
    IndexBuffer,
    Texture,
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::VertexBuffer => f.write_str("vertex buffer"),
            ResourceKind::IndexBuffer => f.write_str("index buffer"),
            ResourceKind::Texture => f.write_str("texture"),
        }
    }
}

/// Errors reported by a [RenderBackend] when it refuses to create a resource.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    #[error("refusing to create a {0} from zero bytes")]
    EmptyData(ResourceKind),
    #[error("{kind} pool exhausted ({capacity} live handles)")]
    OutOfHandles { kind: ResourceKind, capacity: usize },
    #[error("{0}")]
    Other(String),
}

/// A texture bound to a sampler stage for one draw.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureBinding {
    /// Texture unit.
    pub stage: u8,
    /// Shader sampler uniform.
    pub sampler: UniformHandle,
    pub texture: TextureHandle,
    /// Sampler flags, passed through to the backend unchanged.
    pub flags: u32,
}

/// Capability interface over a GPU command stream.
///
/// Resource creation is expected to be a cheap enqueue; submission only records commands.
pub trait RenderBackend {
    /// Create a static vertex buffer from `data`, whose vertices are described by `layout`.
    fn create_vertex_buffer(
        &mut self,
        data: &[u8],
        layout: &VertexLayout,
    ) -> Result<VertexBufferHandle, BackendError>;

    /// Create a static index buffer from `data` (`u16` indices).
    fn create_index_buffer(&mut self, data: &[u8]) -> Result<IndexBufferHandle, BackendError>;

    fn destroy_vertex_buffer(&mut self, handle: VertexBufferHandle);

    fn destroy_index_buffer(&mut self, handle: IndexBufferHandle);

    fn destroy_texture(&mut self, handle: TextureHandle);

    fn set_vertex_buffer(&mut self, stream: u8, handle: VertexBufferHandle);

    /// Draw `num_indices` indices of `handle`, starting at `first_index`.
    fn set_index_buffer(&mut self, handle: IndexBufferHandle, first_index: u32, num_indices: u32);

    /// Set the model transform (column-major) of the next draw.
    fn set_transform(&mut self, transform: &Matrix4<f32>);

    fn set_state(&mut self, state: RenderState);

    fn set_texture(&mut self, binding: &TextureBinding);

    /// Record a draw of the pending state into `view`'s command list, then clear the pending
    /// state.
    fn submit(&mut self, view: ViewId, program: ProgramHandle);

    /// How many of `num_vertices` vertices of `layout` fit in the transient vertex buffer.
    fn avail_transient_vertex_buffer(&self, num_vertices: u32, layout: &VertexLayout) -> u32;

    /// How many of `num_indices` indices fit in the transient index buffer.
    fn avail_transient_index_buffer(&self, num_indices: u32) -> u32;
}
