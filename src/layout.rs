//! Per-vertex attribute layouts.

mod attribute;
pub use attribute::*;

/// Errors related to [VertexLayouts](VertexLayout).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("attribute {usage} (offset {offset}, {size} bytes) does not fit within stride {stride}")]
    OutOfStride {
        usage: AttributeUsage,
        offset: u16,
        size: usize,
        stride: u16,
    },
    #[error("attribute {0} appears more than once")]
    Duplicate(AttributeUsage),
    #[error("layout has no {0} attribute")]
    Missing(AttributeUsage),
    #[error("attribute {usage} must be stored as at least {elements} f32s")]
    Unsupported { usage: AttributeUsage, elements: usize },
}

/// Describes how the attributes of each vertex are laid out within a vertex buffer.
///
/// Immutable once built; every vertex buffer of a [Mesh](crate::Mesh) shares one layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct VertexLayout {
    attributes: Vec<Attribute>,
    stride: u16,
}

impl VertexLayout {
    /// Start a tightly-packed layout.
    pub fn builder() -> VertexLayoutBuilder {
        VertexLayoutBuilder::default()
    }

    /// Construct a layout from explicit offsets and stride.
    ///
    /// # Errors
    ///
    /// * [`OutOfStride`](LayoutError::OutOfStride) if an attribute ends past `stride`
    /// * [`Duplicate`](LayoutError::Duplicate) if two attributes share a usage
    pub fn from_parts(attributes: Vec<Attribute>, stride: u16) -> Result<Self, LayoutError> {
        for (i, attr) in attributes.iter().enumerate() {
            if attr.offset as usize + attr.size_bytes() > stride as usize {
                return Err(LayoutError::OutOfStride {
                    usage: attr.usage,
                    offset: attr.offset,
                    size: attr.size_bytes(),
                    stride,
                });
            }
            if attributes[..i].iter().any(|a| a.usage == attr.usage) {
                return Err(LayoutError::Duplicate(attr.usage));
            }
        }
        Ok(Self { attributes, stride })
    }

    /// Size of one vertex, in bytes.
    #[inline]
    pub fn stride(&self) -> u16 {
        self.stride
    }

    #[inline]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    pub fn attribute(&self, usage: AttributeUsage) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.usage == usage)
    }

    /// Find `usage`, requiring it to be stored as at least `elements` `f32`s.
    pub fn f32_attribute(
        &self,
        usage: AttributeUsage,
        elements: usize,
    ) -> Result<&Attribute, LayoutError> {
        let attr = self.attribute(usage).ok_or(LayoutError::Missing(usage))?;
        if !attr.is_f32_with(elements) {
            return Err(LayoutError::Unsupported { usage, elements });
        }
        Ok(attr)
    }

    /// Byte offset of the `f32` XYZ position, if this layout has one.
    pub fn position_offset(&self) -> Option<usize> {
        self.f32_attribute(AttributeUsage::Position, 3)
            .ok()
            .map(|a| a.offset as usize)
    }

    /// Size of `num_vertices` vertices, in bytes.
    #[inline]
    pub fn size(&self, num_vertices: usize) -> usize {
        self.stride as usize * num_vertices
    }
}

/// Builds a [VertexLayout], placing each added attribute directly after the previous one.
#[derive(Debug, Clone, Default)]
pub struct VertexLayoutBuilder {
    attributes: Vec<Attribute>,
    offset: u16,
}

impl VertexLayoutBuilder {
    pub fn add(
        mut self,
        usage: AttributeUsage,
        ty: AttributeType,
        component: AttributeComponent,
        normalized: bool,
    ) -> Self {
        let attr = Attribute {
            usage,
            ty,
            component,
            normalized,
            offset: self.offset,
        };
        self.offset = self.offset.saturating_add(attr.size_bytes() as u16);
        self.attributes.push(attr);
        self
    }

    /// Leave `bytes` of padding before the next attribute.
    pub fn skip(mut self, bytes: u16) -> Self {
        self.offset = self.offset.saturating_add(bytes);
        self
    }

    /// # Errors
    ///
    /// * [`Duplicate`](LayoutError::Duplicate) if two attributes share a usage
    pub fn build(self) -> Result<VertexLayout, LayoutError> {
        VertexLayout::from_parts(self.attributes, self.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos_uv() -> VertexLayout {
        VertexLayout::builder()
            .add(AttributeUsage::Position, AttributeType::Vec3, AttributeComponent::F32, false)
            .add(AttributeUsage::Texcoord(0), AttributeType::Vec2, AttributeComponent::I16, true)
            .build()
            .unwrap()
    }

    #[test]
    fn packed_offsets() {
        let layout = pos_uv();
        assert_eq!(layout.stride(), 16);
        assert_eq!(layout.position_offset(), Some(0));
        assert_eq!(layout.attribute(AttributeUsage::Texcoord(0)).unwrap().offset, 12);
        assert_eq!(layout.size(3), 48);
    }

    #[test]
    fn rejects_overflowing_attribute() {
        let attr = Attribute {
            usage: AttributeUsage::Normal,
            ty: AttributeType::Vec3,
            component: AttributeComponent::F32,
            normalized: false,
            offset: 8,
        };
        assert!(matches!(
            VertexLayout::from_parts(vec![attr], 16),
            Err(LayoutError::OutOfStride { .. })
        ));
    }

    #[test]
    fn rejects_duplicates() {
        let res = VertexLayout::builder()
            .add(AttributeUsage::Color(0), AttributeType::Vec4, AttributeComponent::U8, true)
            .add(AttributeUsage::Color(0), AttributeType::Vec4, AttributeComponent::U8, true)
            .build();
        assert_eq!(res, Err(LayoutError::Duplicate(AttributeUsage::Color(0))));
    }

    #[test]
    fn position_must_be_f32() {
        let layout = VertexLayout::builder()
            .add(AttributeUsage::Position, AttributeType::Vec3, AttributeComponent::I16, false)
            .build()
            .unwrap();
        assert_eq!(layout.position_offset(), None);
        assert_eq!(
            layout.f32_attribute(AttributeUsage::Position, 3),
            Err(LayoutError::Unsupported {
                usage: AttributeUsage::Position,
                elements: 3
            })
        );
    }
}
