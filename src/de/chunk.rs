use crate::{PrimitiveDesc, VertexLayout};

/// The four-byte identifier at the start of every chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChunkTag(pub [u8; 4]);

impl ChunkTag {
    pub const VERTEX_LAYOUT: Self = Self(*b"VL  ");
    pub const VERTICES: Self = Self(*b"VB  ");
    pub const INDICES: Self = Self(*b"IB  ");
    pub const PRIMITIVES: Self = Self(*b"PRI ");
}

impl std::fmt::Display for ChunkTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "\"{}\"", self.0.escape_ascii())
    }
}

/// One decoded chunk.
#[derive(Debug, Clone, PartialEq)]
pub enum Chunk {
    /// The layout shared by every vertex of the stream.
    VertexLayout(VertexLayout),
    /// Opens a group.
    Vertices { num_vertices: u32, data: Vec<u8> },
    Indices(Vec<u16>),
    /// Closes a group.
    Primitives {
        material: String,
        primitives: Vec<PrimitiveDesc>,
    },
    /// A chunk with a tag this reader does not understand; its payload was skipped.
    Unknown { tag: ChunkTag, offset: u64, len: u32 },
}

impl Chunk {
    pub fn tag(&self) -> ChunkTag {
        match self {
            Chunk::VertexLayout(_) => ChunkTag::VERTEX_LAYOUT,
            Chunk::Vertices { .. } => ChunkTag::VERTICES,
            Chunk::Indices(_) => ChunkTag::INDICES,
            Chunk::Primitives { .. } => ChunkTag::PRIMITIVES,
            Chunk::Unknown { tag, .. } => *tag,
        }
    }
}
