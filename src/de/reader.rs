use std::io::{ErrorKind, Read, Seek, SeekFrom, Take};

use super::{Chunk, ChunkTag, ParseError};
use crate::{
    layout::LayoutError, Attribute, AttributeComponent, AttributeType, AttributeUsage,
    PrimitiveDesc, VertexLayout,
};

/// Size of a chunk header, in bytes.
const HEADER_SIZE: u64 = 8;
/// Size of one serialized [Attribute], in bytes.
const ATTRIBUTE_SIZE: u64 = 7;
/// Smallest possible size of one serialized [PrimitiveDesc], in bytes.
const MIN_PRIMITIVE_SIZE: u64 = 2 + 4 * 4;
/// Vertices addressable by a `u16` index.
pub const MAX_GROUP_VERTICES: u32 = u16::MAX as u32 + 1;

/// Decodes [Chunks](Chunk) from a seekable stream, one at a time.
///
/// Chunk boundaries are always honored: a chunk is never decoded past its declared length, and
/// any payload left over once a chunk is decoded is skipped. The vertex layout, once read, is
/// remembered so later vertex chunks can be checked against its stride.
#[derive(Debug)]
pub struct ChunkReader<R> {
    reader: R,
    offset: u64,
    end: u64,
    layout: Option<VertexLayout>,
    done: bool,
}

impl<R: Read + Seek> ChunkReader<R> {
    /// Start reading chunks at the current position of `reader`.
    pub fn new(mut reader: R) -> Result<Self, ParseError> {
        let offset = reader.stream_position()?;
        let end = reader.seek(SeekFrom::End(0))?;
        reader.seek(SeekFrom::Start(offset))?;
        Ok(Self {
            reader,
            offset,
            end,
            layout: None,
            done: false,
        })
    }

    /// The vertex layout of this stream, if it has been read yet.
    #[inline]
    pub fn layout(&self) -> Option<&VertexLayout> {
        self.layout.as_ref()
    }

    /// Decode the next chunk, or return `None` at the end of the stream.
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>, ParseError> {
        if self.offset >= self.end {
            return Ok(None);
        }
        let chunk_offset = self.offset;
        let available = self.end - chunk_offset;
        if available < HEADER_SIZE {
            return Err(ParseError::Truncated {
                offset: chunk_offset,
                needed: HEADER_SIZE,
                available,
            });
        }
        let mut header = [0u8; HEADER_SIZE as usize];
        self.reader.read_exact(&mut header)?;
        let tag = ChunkTag([header[0], header[1], header[2], header[3]]);
        let len = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        let needed = HEADER_SIZE + len as u64;
        if available < needed {
            return Err(ParseError::Truncated {
                offset: chunk_offset,
                needed,
                available,
            });
        }
        let payload_end = chunk_offset + needed;

        let mut payload = Payload {
            inner: (&mut self.reader).take(len as u64),
            tag,
        };
        let chunk = match tag {
            ChunkTag::VERTEX_LAYOUT => {
                if self.layout.is_some() {
                    return Err(ParseError::DuplicateLayout);
                }
                let layout = payload.layout()?;
                self.layout = Some(layout.clone());
                Chunk::VertexLayout(layout)
            }
            ChunkTag::VERTICES => {
                let stride = self
                    .layout
                    .as_ref()
                    .ok_or(ParseError::MissingLayout)?
                    .stride();
                payload.vertices(stride)?
            }
            ChunkTag::INDICES => payload.indices()?,
            ChunkTag::PRIMITIVES => payload.primitives()?,
            tag => Chunk::Unknown {
                tag,
                offset: chunk_offset,
                len,
            },
        };

        if payload.inner.limit() > 0 {
            self.reader.seek(SeekFrom::Start(payload_end))?;
        }
        self.offset = payload_end;
        tracing::trace!(%tag, offset = chunk_offset, len, "read chunk");
        Ok(Some(chunk))
    }
}

impl<R: Read + Seek> Iterator for ChunkReader<R> {
    type Item = Result<Chunk, ParseError>;

    /// Yields chunks until the end of the stream or the first error.
    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let res = self.next_chunk().transpose();
        if !matches!(res, Some(Ok(_))) {
            self.done = true;
        }
        res
    }
}

/// The payload of a single chunk.
struct Payload<'r, R> {
    inner: Take<&'r mut R>,
    tag: ChunkTag,
}

impl<R: Read> Payload<'_, R> {
    fn remaining(&self) -> u64 {
        self.inner.limit()
    }

    fn array<const N: usize>(&mut self) -> Result<[u8; N], ParseError> {
        let mut buf = [0u8; N];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<(), ParseError> {
        self.inner.read_exact(buf).map_err(|e| match e.kind() {
            ErrorKind::UnexpectedEof => ParseError::ChunkOverrun { tag: self.tag },
            _ => e.into(),
        })
    }

    fn u8(&mut self) -> Result<u8, ParseError> {
        Ok(self.array::<1>()?[0])
    }

    fn u16(&mut self) -> Result<u16, ParseError> {
        Ok(u16::from_le_bytes(self.array()?))
    }

    fn u32(&mut self) -> Result<u32, ParseError> {
        Ok(u32::from_le_bytes(self.array()?))
    }

    /// Ensure `count` items of `item_size` bytes fit in what remains of this chunk.
    fn check_count(&self, count: u64, item_size: u64) -> Result<(), ParseError> {
        match count.checked_mul(item_size) {
            Some(size) if size <= self.remaining() => Ok(()),
            _ => Err(ParseError::InconsistentCounts {
                tag: self.tag,
                count,
                available: self.remaining(),
            }),
        }
    }

    fn bytes(&mut self, len: usize) -> Result<Vec<u8>, ParseError> {
        self.check_count(len as u64, 1)?;
        let mut buf = vec![0u8; len];
        self.fill(&mut buf)?;
        Ok(buf)
    }

    fn string(&mut self) -> Result<String, ParseError> {
        let len = self.u16()?;
        let bytes = self.bytes(len as usize)?;
        Ok(String::from_utf8(bytes)?)
    }

    fn layout(&mut self) -> Result<VertexLayout, ParseError> {
        let count = self.u8()?;
        self.check_count(count as u64, ATTRIBUTE_SIZE)?;
        let mut attributes = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let [usage, set, component, elements, normalized] = self.array()?;
            let offset = self.u16()?;
            attributes.push(Attribute {
                usage: AttributeUsage::from_code(usage, set)
                    .ok_or(ParseError::UnknownUsage(usage))?,
                ty: AttributeType::from_elements(elements)
                    .ok_or(ParseError::InvalidElementCount(elements))?,
                component: AttributeComponent::from_code(component)
                    .ok_or(ParseError::UnknownComponent(component))?,
                normalized: normalized != 0,
                offset,
            });
        }
        let stride = self.u16()?;
        let layout = VertexLayout::from_parts(attributes, stride)?;
        if layout.position_offset().is_none() {
            let err = layout
                .f32_attribute(AttributeUsage::Position, 3)
                .err()
                .unwrap_or(LayoutError::Missing(AttributeUsage::Position));
            return Err(err.into());
        }
        Ok(layout)
    }

    fn vertices(&mut self, stride: u16) -> Result<Chunk, ParseError> {
        let num_vertices = self.u32()?;
        if num_vertices > MAX_GROUP_VERTICES {
            return Err(ParseError::TooManyVertices(num_vertices));
        }
        self.check_count(num_vertices as u64, stride as u64)?;
        let data = self.bytes(num_vertices as usize * stride as usize)?;
        Ok(Chunk::Vertices { num_vertices, data })
    }

    fn indices(&mut self) -> Result<Chunk, ParseError> {
        let num_indices = self.u32()?;
        self.check_count(num_indices as u64, 2)?;
        let bytes = self.bytes(num_indices as usize * 2)?;
        let indices = bytes
            .chunks_exact(2)
            .map(|b| u16::from_le_bytes([b[0], b[1]]))
            .collect();
        Ok(Chunk::Indices(indices))
    }

    fn primitives(&mut self) -> Result<Chunk, ParseError> {
        let material = self.string()?;
        let count = self.u16()?;
        self.check_count(count as u64, MIN_PRIMITIVE_SIZE)?;
        let mut primitives = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let name = self.string()?;
            primitives.push(PrimitiveDesc {
                name,
                start_index: self.u32()?,
                num_indices: self.u32()?,
                start_vertex: self.u32()?,
                num_vertices: self.u32()?,
            });
        }
        Ok(Chunk::Primitives {
            material,
            primitives,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn chunk(tag: &[u8; 4], payload: &[u8]) -> Vec<u8> {
        let mut res = tag.to_vec();
        res.extend_from_slice(&(payload.len() as u32).to_le_bytes());
        res.extend_from_slice(payload);
        res
    }

    /// A layout holding only an f32x3 position.
    fn position_layout() -> Vec<u8> {
        let mut payload = vec![1, 0, 0, 5, 3, 0, 0, 0];
        payload.extend_from_slice(&12u16.to_le_bytes());
        chunk(b"VL  ", &payload)
    }

    #[test]
    fn empty_stream() {
        let mut reader = ChunkReader::new(Cursor::new(Vec::new())).unwrap();
        assert!(reader.next_chunk().unwrap().is_none());
    }

    #[test]
    fn reads_layout() {
        let mut reader = ChunkReader::new(Cursor::new(position_layout())).unwrap();
        match reader.next_chunk().unwrap() {
            Some(Chunk::VertexLayout(layout)) => {
                assert_eq!(layout.stride(), 12);
                assert_eq!(layout.position_offset(), Some(0));
            }
            other => panic!("expected a layout, got {other:?}"),
        }
        assert!(reader.layout().is_some());
        assert!(reader.next_chunk().unwrap().is_none());
    }

    #[test]
    fn skips_trailing_payload() {
        let mut data = position_layout();
        let mut ib = 1u32.to_le_bytes().to_vec();
        ib.extend_from_slice(&7u16.to_le_bytes());
        ib.extend_from_slice(&[0xAA; 5]);
        data.extend(chunk(b"IB  ", &ib));
        data.extend(chunk(b"IB  ", &[0, 0, 0, 0]));

        let chunks: Vec<_> = ChunkReader::new(Cursor::new(data))
            .unwrap()
            .collect::<Result<_, _>>()
            .unwrap();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[1], Chunk::Indices(vec![7]));
        assert_eq!(chunks[2], Chunk::Indices(vec![]));
    }

    #[test]
    fn unknown_tags_are_reported() {
        let mut data = position_layout();
        data.extend(chunk(b"ZZZZ", &[1, 2, 3]));
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        reader.next_chunk().unwrap();
        assert_eq!(
            reader.next_chunk().unwrap(),
            Some(Chunk::Unknown {
                tag: ChunkTag(*b"ZZZZ"),
                offset: 18,
                len: 3
            })
        );
    }

    #[test]
    fn vertices_need_layout() {
        let data = chunk(b"VB  ", &0u32.to_le_bytes());
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        assert!(matches!(reader.next_chunk(), Err(ParseError::MissingLayout)));
    }

    #[test]
    fn duplicate_layout() {
        let mut data = position_layout();
        data.extend(position_layout());
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        reader.next_chunk().unwrap();
        assert!(matches!(reader.next_chunk(), Err(ParseError::DuplicateLayout)));
    }

    #[test]
    fn declared_length_past_end() {
        let mut data = position_layout();
        data.extend_from_slice(b"IB  ");
        data.extend_from_slice(&100u32.to_le_bytes());
        data.extend_from_slice(&[0; 4]);
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        reader.next_chunk().unwrap();
        assert!(matches!(
            reader.next_chunk(),
            Err(ParseError::Truncated {
                offset: 18,
                needed: 108,
                available: 12
            })
        ));
    }

    #[test]
    fn partial_header() {
        let mut data = position_layout();
        data.extend_from_slice(b"VB");
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        reader.next_chunk().unwrap();
        assert!(matches!(reader.next_chunk(), Err(ParseError::Truncated { .. })));
    }

    #[test]
    fn counts_checked_against_length() {
        let mut data = position_layout();
        // claims 3 vertices, holds 1
        let mut vb = 3u32.to_le_bytes().to_vec();
        vb.extend_from_slice(&[0; 12]);
        data.extend(chunk(b"VB  ", &vb));
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        reader.next_chunk().unwrap();
        assert!(matches!(
            reader.next_chunk(),
            Err(ParseError::InconsistentCounts {
                count: 3,
                available: 12,
                ..
            })
        ));
    }

    #[test]
    fn overrun_within_chunk() {
        let mut data = position_layout();
        // index count cut short by the chunk length
        data.extend(chunk(b"IB  ", &[1, 0]));
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        reader.next_chunk().unwrap();
        assert!(matches!(
            reader.next_chunk(),
            Err(ParseError::ChunkOverrun { tag: ChunkTag::INDICES })
        ));
    }

    #[test]
    fn name_longer_than_chunk() {
        let mut data = position_layout();
        // a primitive list whose material name runs past the chunk
        let mut pri = 10u16.to_le_bytes().to_vec();
        pri.extend_from_slice(b"abc");
        data.extend(chunk(b"PRI ", &pri));
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        reader.next_chunk().unwrap();
        assert!(matches!(
            reader.next_chunk(),
            Err(ParseError::InconsistentCounts { .. })
        ));
    }

    #[test]
    fn layout_without_position() {
        // a lone u8x4 color
        let mut payload = vec![1, 4, 0, 0, 4, 1, 0, 0];
        payload.extend_from_slice(&4u16.to_le_bytes());
        let mut reader = ChunkReader::new(Cursor::new(chunk(b"VL  ", &payload))).unwrap();
        assert!(matches!(
            reader.next_chunk(),
            Err(ParseError::InvalidLayout(LayoutError::Missing(
                AttributeUsage::Position
            )))
        ));
    }

    #[test]
    fn iteration_stops_at_first_error() {
        let mut data = chunk(b"VB  ", &0u32.to_le_bytes());
        data.extend(position_layout());
        let mut reader = ChunkReader::new(Cursor::new(data)).unwrap();
        assert!(matches!(reader.next(), Some(Err(ParseError::MissingLayout))));
        assert!(reader.next().is_none());
    }
}
