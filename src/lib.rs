//! Mesh asset runtime.
//!
//! A [Mesh] is decoded from a chunked binary stream into [Groups](Group) of GPU-resident
//! vertex/index buffers, each carrying precomputed [bounding volumes](bounds) for itself and its
//! [Primitives](Primitive). Meshes are drawn through a [RenderBackend], either whole groups under
//! one program ([Mesh::submit]) or once per [MeshState] pass ([Mesh::submit_passes]).
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

mod arena;
pub mod backend;
pub mod bounds;
pub mod de;
pub mod error;
pub mod layout;
mod mesh;
#[cfg(feature = "serialize")]
pub mod ser;
pub mod texture;
pub mod util;

pub use arena::SlotArena;
pub use backend::{
    BackendError, IndexBufferHandle, ProgramHandle, RecordingBackend, RenderBackend, RenderState,
    TextureBinding, TextureHandle, UniformHandle, VertexBufferHandle, ViewId,
};
pub use bounds::Bounds;
pub use de::ParseError;
pub use error::{Error, ResourceError};
pub use layout::{Attribute, AttributeComponent, AttributeType, AttributeUsage, VertexLayout};
pub use mesh::*;
pub use texture::{TextureCache, TextureId};
