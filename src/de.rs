//! Decoding of chunked mesh streams.
//!
//! A stream is a flat sequence of chunks, each `tag: [u8; 4]`, `len: u32` (little-endian), then
//! `len` bytes of payload. [ChunkReader] decodes one chunk at a time; grouping chunks into
//! [Groups](crate::Group) is up to [Mesh::load](crate::Mesh::load).
//!
//! | tag | payload |
//! |-----|---------|
//! | `VL  ` | `u8` attribute count; per attribute `u8` usage, `u8` set, `u8` component, `u8` elements, `u8` normalized, `u16` offset; then `u16` stride |
//! | `VB  ` | `u32` vertex count, then the vertex bytes |
//! | `IB  ` | `u32` index count, then the `u16` indices |
//! | `PRI ` | material name; `u16` primitive count; per primitive its name, then `u32` start index, index count, start vertex, vertex count |
//!
//! Names are a `u16` byte length followed by UTF-8.

mod chunk;
pub use chunk::*;
mod error;
pub use error::*;
mod reader;
pub use reader::*;
