use super::ChunkTag;
use crate::layout::LayoutError;

/// Errors encountered while decoding a mesh stream.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("stream ends at {available} bytes, but the chunk at offset {offset} needs {needed}")]
    Truncated {
        offset: u64,
        needed: u64,
        available: u64,
    },
    #[error("contents of chunk {tag} run past its declared length")]
    ChunkOverrun { tag: ChunkTag },
    #[error("unknown chunk {tag} at offset {offset}")]
    UnknownChunk { tag: ChunkTag, offset: u64 },
    #[error("stream has more than one vertex layout")]
    DuplicateLayout,
    #[error("stream has no vertex layout before its vertex data")]
    MissingLayout,
    #[error("invalid vertex layout: {0}")]
    InvalidLayout(#[from] LayoutError),
    #[error("unknown attribute usage code {0}")]
    UnknownUsage(u8),
    #[error("unknown attribute component code {0}")]
    UnknownComponent(u8),
    #[error("attributes have 1 to 4 elements, found {0}")]
    InvalidElementCount(u8),
    #[error("chunk {tag} declares {count} items, which do not fit in its remaining {available} bytes")]
    InconsistentCounts {
        tag: ChunkTag,
        count: u64,
        available: u64,
    },
    #[error("group has {0} vertices; at most 65536 are addressable by 16-bit indices")]
    TooManyVertices(u32),
    #[error("group {group}: index {index} is out of range of its {num_vertices} vertices")]
    IndexOutOfRange {
        group: usize,
        index: u16,
        num_vertices: u32,
    },
    #[error("group {group}: primitive {primitive} lies outside of the group's vertices/indices")]
    PrimitiveOutOfRange { group: usize, primitive: usize },
    #[error("chunk {0} does not belong to an open group")]
    OrphanChunk(ChunkTag),
    #[error("chunk {0} appears twice within one group")]
    RepeatedChunk(ChunkTag),
    #[error("stream ends within a group")]
    UnterminatedGroup,
    #[error("name is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
