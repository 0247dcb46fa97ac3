/// The meaning of a vertex attribute.
///
/// Sets (e.g. the `n` in `Texcoord(n)`) distinguish multiple attributes of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeUsage {
    Position,
    Normal,
    Tangent,
    Bitangent,
    Color(u8),
    Joints(u8),
    Weights(u8),
    Texcoord(u8),
}

impl AttributeUsage {
    /// The `(usage, set)` pair identifying this usage in a serialized layout.
    pub const fn to_code(self) -> (u8, u8) {
        match self {
            Self::Position => (0, 0),
            Self::Normal => (1, 0),
            Self::Tangent => (2, 0),
            Self::Bitangent => (3, 0),
            Self::Color(n) => (4, n),
            Self::Joints(n) => (5, n),
            Self::Weights(n) => (6, n),
            Self::Texcoord(n) => (7, n),
        }
    }

    pub const fn from_code(usage: u8, set: u8) -> Option<Self> {
        Some(match usage {
            0 => Self::Position,
            1 => Self::Normal,
            2 => Self::Tangent,
            3 => Self::Bitangent,
            4 => Self::Color(set),
            5 => Self::Joints(set),
            6 => Self::Weights(set),
            7 => Self::Texcoord(set),
            _ => return None,
        })
    }
}

impl std::fmt::Display for AttributeUsage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Position => f.write_str("position"),
            Self::Normal => f.write_str("normal"),
            Self::Tangent => f.write_str("tangent"),
            Self::Bitangent => f.write_str("bitangent"),
            Self::Color(n) => write!(f, "color{n}"),
            Self::Joints(n) => write!(f, "joints{n}"),
            Self::Weights(n) => write!(f, "weights{n}"),
            Self::Texcoord(n) => write!(f, "texcoord{n}"),
        }
    }
}

/// The inner components of an [AttributeType]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeComponent {
    U8,
    U16,
    U32,
    I8,
    I16,
    F32,
}

impl AttributeComponent {
    pub const fn size(self) -> usize {
        use std::mem::size_of;
        match self {
            AttributeComponent::U8 => size_of::<u8>(),
            AttributeComponent::U16 => size_of::<u16>(),
            AttributeComponent::U32 => size_of::<u32>(),
            AttributeComponent::I8 => size_of::<i8>(),
            AttributeComponent::I16 => size_of::<i16>(),
            AttributeComponent::F32 => size_of::<f32>(),
        }
    }

    pub const fn to_code(self) -> u8 {
        match self {
            AttributeComponent::U8 => 0,
            AttributeComponent::U16 => 1,
            AttributeComponent::U32 => 2,
            AttributeComponent::I8 => 3,
            AttributeComponent::I16 => 4,
            AttributeComponent::F32 => 5,
        }
    }

    pub const fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => AttributeComponent::U8,
            1 => AttributeComponent::U16,
            2 => AttributeComponent::U32,
            3 => AttributeComponent::I8,
            4 => AttributeComponent::I16,
            5 => AttributeComponent::F32,
            _ => return None,
        })
    }
}

/// The shape of a vertex attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
}

impl AttributeType {
    pub const fn size_elements(self) -> usize {
        match self {
            AttributeType::Scalar => 1,
            AttributeType::Vec2 => 2,
            AttributeType::Vec3 => 3,
            AttributeType::Vec4 => 4,
        }
    }

    pub const fn from_elements(elements: u8) -> Option<Self> {
        Some(match elements {
            1 => AttributeType::Scalar,
            2 => AttributeType::Vec2,
            3 => AttributeType::Vec3,
            4 => AttributeType::Vec4,
            _ => return None,
        })
    }

    pub const fn size_bytes(self, comp: AttributeComponent) -> usize {
        comp.size() * self.size_elements()
    }
}

/// One attribute within a [VertexLayout](super::VertexLayout).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub usage: AttributeUsage,
    pub ty: AttributeType,
    pub component: AttributeComponent,
    /// Whether integer components are mapped to [0, 1] / [-1, 1] when read by a shader.
    pub normalized: bool,
    /// Byte offset of this attribute from the start of its vertex.
    pub offset: u16,
}

impl Attribute {
    #[inline]
    pub const fn size_bytes(&self) -> usize {
        self.ty.size_bytes(self.component)
    }

    /// Whether this attribute is stored as at least `elements` `f32`s.
    #[inline]
    pub fn is_f32_with(&self, elements: usize) -> bool {
        self.component == AttributeComponent::F32 && self.ty.size_elements() >= elements
    }
}

/// The handedness of a tangent attribute
#[repr(i8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handedness {
    Negative = -1,
    Positive = 1,
}

impl Handedness {
    /// The sign stored in the `w` component of a tangent.
    #[inline]
    pub fn to_f32(self) -> f32 {
        (self as i8) as f32
    }
}
