//! Encoding of chunked mesh streams, the inverse of [de](crate::de).

use std::io::Write;

use crate::{de::ChunkTag, PrimitiveDesc, VertexLayout};

/// Errors which may occur while writing a mesh stream.
#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("{what} is {len} long; the format allows at most {max}")]
    TooLong {
        what: &'static str,
        len: usize,
        max: usize,
    },
    #[error("{len} bytes of vertex data is not a whole number of {stride}-byte vertices")]
    PartialVertex { len: usize, stride: u16 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Writes mesh chunks to a byte sink.
///
/// The caller decides the chunk order; a readable stream is one [layout](Self::write_layout)
/// followed by any number of [groups](Self::write_group).
///
/// ```
/// # use geode::{ser::MeshWriter, AttributeComponent, AttributeType, AttributeUsage, VertexLayout};
/// let layout = VertexLayout::builder()
///     .add(AttributeUsage::Position, AttributeType::Vec3, AttributeComponent::F32, false)
///     .build()
///     .unwrap();
/// let mut writer = MeshWriter::new(Vec::new());
/// writer.write_layout(&layout).unwrap();
/// assert_eq!(&writer.into_inner()[..4], b"VL  ");
/// ```
#[derive(Debug)]
pub struct MeshWriter<W> {
    writer: W,
}

impl<W: Write> MeshWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }

    /// Write a chunk header for `payload`, then `payload` itself.
    pub fn write_chunk(&mut self, tag: ChunkTag, payload: &[u8]) -> Result<(), WriteError> {
        let len = u32::try_from(payload.len()).map_err(|_| WriteError::TooLong {
            what: "chunk payload",
            len: payload.len(),
            max: u32::MAX as usize,
        })?;
        self.writer.write_all(&tag.0)?;
        self.writer.write_all(&len.to_le_bytes())?;
        self.writer.write_all(payload)?;
        Ok(())
    }

    pub fn write_layout(&mut self, layout: &VertexLayout) -> Result<(), WriteError> {
        let attributes = layout.attributes();
        let count = u8::try_from(attributes.len()).map_err(|_| WriteError::TooLong {
            what: "attribute list",
            len: attributes.len(),
            max: u8::MAX as usize,
        })?;
        let mut payload = Vec::with_capacity(1 + attributes.len() * 7 + 2);
        payload.push(count);
        for attr in attributes {
            let (usage, set) = attr.usage.to_code();
            payload.extend_from_slice(&[
                usage,
                set,
                attr.component.to_code(),
                attr.ty.size_elements() as u8,
                attr.normalized as u8,
            ]);
            payload.extend_from_slice(&attr.offset.to_le_bytes());
        }
        payload.extend_from_slice(&layout.stride().to_le_bytes());
        self.write_chunk(ChunkTag::VERTEX_LAYOUT, &payload)
    }

    /// Write interleaved vertex data, opening a group.
    pub fn write_vertices(&mut self, layout: &VertexLayout, data: &[u8]) -> Result<(), WriteError> {
        let stride = layout.stride();
        let num_vertices = match stride {
            0 => 0,
            s if data.len() % s as usize == 0 => data.len() / s as usize,
            _ => {
                return Err(WriteError::PartialVertex {
                    len: data.len(),
                    stride,
                })
            }
        };
        let mut payload = Vec::with_capacity(4 + data.len());
        payload.extend_from_slice(&len_u32("vertex list", num_vertices)?.to_le_bytes());
        payload.extend_from_slice(data);
        self.write_chunk(ChunkTag::VERTICES, &payload)
    }

    pub fn write_indices(&mut self, indices: &[u16]) -> Result<(), WriteError> {
        let mut payload = Vec::with_capacity(4 + indices.len() * 2);
        payload.extend_from_slice(&len_u32("index list", indices.len())?.to_le_bytes());
        for i in indices {
            payload.extend_from_slice(&i.to_le_bytes());
        }
        self.write_chunk(ChunkTag::INDICES, &payload)
    }

    /// Write the primitives of a group, closing it.
    pub fn write_primitives(
        &mut self,
        material: &str,
        primitives: &[PrimitiveDesc],
    ) -> Result<(), WriteError> {
        let mut payload = Vec::new();
        push_name(&mut payload, "material name", material)?;
        let count = u16::try_from(primitives.len()).map_err(|_| WriteError::TooLong {
            what: "primitive list",
            len: primitives.len(),
            max: u16::MAX as usize,
        })?;
        payload.extend_from_slice(&count.to_le_bytes());
        for p in primitives {
            push_name(&mut payload, "primitive name", &p.name)?;
            for field in [p.start_index, p.num_indices, p.start_vertex, p.num_vertices] {
                payload.extend_from_slice(&field.to_le_bytes());
            }
        }
        self.write_chunk(ChunkTag::PRIMITIVES, &payload)
    }

    /// Write a whole group. Empty `indices` are omitted.
    pub fn write_group(
        &mut self,
        layout: &VertexLayout,
        vertices: &[u8],
        indices: &[u16],
        material: &str,
        primitives: &[PrimitiveDesc],
    ) -> Result<(), WriteError> {
        self.write_vertices(layout, vertices)?;
        if !indices.is_empty() {
            self.write_indices(indices)?;
        }
        self.write_primitives(material, primitives)
    }
}

fn len_u32(what: &'static str, len: usize) -> Result<u32, WriteError> {
    u32::try_from(len).map_err(|_| WriteError::TooLong {
        what,
        len,
        max: u32::MAX as usize,
    })
}

fn push_name(payload: &mut Vec<u8>, what: &'static str, name: &str) -> Result<(), WriteError> {
    let len = u16::try_from(name.len()).map_err(|_| WriteError::TooLong {
        what,
        len: name.len(),
        max: u16::MAX as usize,
    })?;
    payload.extend_from_slice(&len.to_le_bytes());
    payload.extend_from_slice(name.as_bytes());
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::{
        de::{Chunk, ChunkReader},
        AttributeComponent, AttributeType, AttributeUsage,
    };

    fn layout() -> VertexLayout {
        VertexLayout::builder()
            .add(AttributeUsage::Position, AttributeType::Vec3, AttributeComponent::F32, false)
            .add(AttributeUsage::Color(0), AttributeType::Vec4, AttributeComponent::U8, true)
            .build()
            .unwrap()
    }

    #[test]
    fn group_reads_back() {
        let layout = layout();
        let vertices = vec![0u8; layout.size(3)];
        let prim = PrimitiveDesc {
            name: "tri".into(),
            start_index: 0,
            num_indices: 3,
            start_vertex: 0,
            num_vertices: 3,
        };
        let mut writer = MeshWriter::new(Vec::new());
        writer.write_layout(&layout).unwrap();
        writer
            .write_group(&layout, &vertices, &[0, 1, 2], "stone", &[prim.clone()])
            .unwrap();

        let chunks: Vec<_> = ChunkReader::new(Cursor::new(writer.into_inner()))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(
            chunks,
            vec![
                Chunk::VertexLayout(layout),
                Chunk::Vertices {
                    num_vertices: 3,
                    data: vertices
                },
                Chunk::Indices(vec![0, 1, 2]),
                Chunk::Primitives {
                    material: "stone".into(),
                    primitives: vec![prim]
                },
            ]
        );
        let tags: Vec<_> = chunks.iter().map(Chunk::tag).collect();
        assert_eq!(
            tags,
            [
                ChunkTag::VERTEX_LAYOUT,
                ChunkTag::VERTICES,
                ChunkTag::INDICES,
                ChunkTag::PRIMITIVES
            ]
        );
    }

    #[test]
    fn refuses_partial_vertices() {
        let mut writer = MeshWriter::new(Vec::new());
        assert!(matches!(
            writer.write_vertices(&layout(), &[0; 17]),
            Err(WriteError::PartialVertex { len: 17, stride: 16 })
        ));
    }

    #[test]
    fn refuses_long_names() {
        let mut writer = MeshWriter::new(Vec::new());
        let name = "x".repeat(u16::MAX as usize + 1);
        assert!(matches!(
            writer.write_primitives(&name, &[]),
            Err(WriteError::TooLong { what: "material name", .. })
        ));
    }
}
