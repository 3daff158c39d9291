//! Flat, index-based scene document.
//!
//! Every table is addressed by integer index, exactly as in the glTF JSON.
//! Nothing here is trusted: indices may be out of range and accessors may
//! describe impossible layouts. The resolver and decoder stages validate what
//! they touch and report [`ImportError::MalformedDocument`](crate::ImportError).

/// glTF accessor component type codes (OpenGL enum values).
pub mod component {
    pub const BYTE: u32 = 5120;
    pub const UNSIGNED_BYTE: u32 = 5121;
    pub const SHORT: u32 = 5122;
    pub const UNSIGNED_SHORT: u32 = 5123;
    pub const INT: u32 = 5124;
    pub const UNSIGNED_INT: u32 = 5125;
    pub const FLOAT: u32 = 5126;
    pub const DOUBLE: u32 = 5130;
}

/// Numeric type of one component of an accessor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl ComponentType {
    /// Look up a component type by its glTF code.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            component::BYTE => Some(Self::I8),
            component::UNSIGNED_BYTE => Some(Self::U8),
            component::SHORT => Some(Self::I16),
            component::UNSIGNED_SHORT => Some(Self::U16),
            component::INT => Some(Self::I32),
            component::UNSIGNED_INT => Some(Self::U32),
            component::FLOAT => Some(Self::F32),
            component::DOUBLE => Some(Self::F64),
            _ => None,
        }
    }

    /// The glTF code of this component type.
    pub fn code(self) -> u32 {
        match self {
            Self::I8 => component::BYTE,
            Self::U8 => component::UNSIGNED_BYTE,
            Self::I16 => component::SHORT,
            Self::U16 => component::UNSIGNED_SHORT,
            Self::I32 => component::INT,
            Self::U32 => component::UNSIGNED_INT,
            Self::F32 => component::FLOAT,
            Self::F64 => component::DOUBLE,
        }
    }

    /// Size of one component in bytes.
    pub fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::F64 => 8,
        }
    }
}

/// Shape of one accessor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementType {
    /// Number of components in one element.
    pub fn components(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }
}

/// Tightly packed element size in bytes for an element/component pair, or 0
/// when the component code is not a known glTF component type.
pub fn packed_stride(element_type: ElementType, component_code: u32) -> usize {
    ComponentType::from_code(component_code)
        .map(|component| element_type.components() * component.size())
        .unwrap_or(0)
}

/// Primitive topology.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    Points,
    Lines,
    LineLoop,
    LineStrip,
    #[default]
    Triangles,
    TriangleStrip,
    TriangleFan,
    /// A mode code outside the glTF set.
    Unknown,
}

/// A byte range of one buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferView {
    pub buffer: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
    /// Explicit stride; `0` means tightly packed.
    pub byte_stride: usize,
}

/// A typed array view into a buffer view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Accessor {
    /// `None` for sparse-only accessors.
    pub buffer_view: Option<usize>,
    pub byte_offset: usize,
    pub count: usize,
    /// Raw glTF component code, see [`component`].
    pub component_type: u32,
    pub element_type: ElementType,
    pub normalized: bool,
}

/// One drawable piece of a mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Primitive {
    pub position: Option<usize>,
    pub normal: Option<usize>,
    pub tex_coord: Option<usize>,
    pub indices: Option<usize>,
    pub material: Option<usize>,
    pub mode: Mode,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mesh {
    pub name: Option<String>,
    pub primitives: Vec<Primitive>,
}

/// Scene graph node. Transform fields are `None` when the node omits them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Node {
    pub mesh: Option<usize>,
    pub children: Vec<usize>,
    pub translation: Option<[f32; 3]>,
    /// Quaternion, xyzw order.
    pub rotation: Option<[f32; 4]>,
    pub scale: Option<[f32; 3]>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scene {
    pub nodes: Vec<usize>,
}

/// Only the base-color slot of a material is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Material {
    pub name: Option<String>,
    /// Index into [`Document::textures`].
    pub base_color_texture: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Texture {
    /// Index into [`Document::images`].
    pub source: Option<usize>,
}

/// A decoded image, 8 bits per channel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Image {
    pub width: u32,
    pub height: u32,
    /// Channels per pixel.
    pub components: u32,
    pub pixels: Vec<u8>,
}

/// An in-memory scene document. Immutable once loaded.
#[derive(Debug, Clone, Default)]
pub struct Document {
    pub buffers: Vec<Vec<u8>>,
    pub buffer_views: Vec<BufferView>,
    pub accessors: Vec<Accessor>,
    pub nodes: Vec<Node>,
    pub meshes: Vec<Mesh>,
    pub materials: Vec<Material>,
    pub textures: Vec<Texture>,
    pub images: Vec<Image>,
    pub scenes: Vec<Scene>,
    pub default_scene: Option<usize>,
}
