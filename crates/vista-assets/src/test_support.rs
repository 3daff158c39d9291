//! In-memory document construction for unit tests.

use crate::document::{
    component, Accessor, BufferView, Document, ElementType, Image, Material, Mesh, Node,
    Primitive, Scene, Texture,
};

/// Appends typed arrays to a single buffer and records views/accessors for them.
pub(crate) struct DocumentBuilder {
    document: Document,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self {
            document: Document {
                buffers: vec![Vec::new()],
                ..Default::default()
            },
        }
    }

    fn push_view(&mut self, bytes: &[u8]) -> usize {
        let buffer = &mut self.document.buffers[0];
        while buffer.len() % 4 != 0 {
            buffer.push(0);
        }
        let byte_offset = buffer.len();
        buffer.extend_from_slice(bytes);
        self.document.buffer_views.push(BufferView {
            buffer: 0,
            byte_offset,
            byte_length: bytes.len(),
            byte_stride: 0,
        });
        self.document.buffer_views.len() - 1
    }

    fn push_accessor(
        &mut self,
        bytes: &[u8],
        count: usize,
        component_type: u32,
        element_type: ElementType,
        normalized: bool,
    ) -> usize {
        let view = self.push_view(bytes);
        self.document.accessors.push(Accessor {
            buffer_view: Some(view),
            byte_offset: 0,
            count,
            component_type,
            element_type,
            normalized,
        });
        self.document.accessors.len() - 1
    }

    fn floats<const N: usize>(&mut self, values: &[[f32; N]], element: ElementType) -> usize {
        let bytes: Vec<u8> = values
            .iter()
            .flatten()
            .flat_map(|f| f.to_le_bytes())
            .collect();
        self.push_accessor(&bytes, values.len(), component::FLOAT, element, false)
    }

    pub fn positions(&mut self, values: &[[f32; 3]]) -> usize {
        self.floats(values, ElementType::Vec3)
    }

    pub fn normals(&mut self, values: &[[f32; 3]]) -> usize {
        self.floats(values, ElementType::Vec3)
    }

    pub fn uvs(&mut self, values: &[[f32; 2]]) -> usize {
        self.floats(values, ElementType::Vec2)
    }

    pub fn indices_u8(&mut self, values: &[u8]) -> usize {
        self.push_accessor(
            values,
            values.len(),
            component::UNSIGNED_BYTE,
            ElementType::Scalar,
            false,
        )
    }

    pub fn indices_u16(&mut self, values: &[u16]) -> usize {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push_accessor(
            &bytes,
            values.len(),
            component::UNSIGNED_SHORT,
            ElementType::Scalar,
            false,
        )
    }

    pub fn indices_u32(&mut self, values: &[u32]) -> usize {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push_accessor(
            &bytes,
            values.len(),
            component::UNSIGNED_INT,
            ElementType::Scalar,
            false,
        )
    }

    /// Signed short scalars, not a valid index type.
    pub fn indices_i16(&mut self, values: &[i16]) -> usize {
        let bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        self.push_accessor(&bytes, values.len(), component::SHORT, ElementType::Scalar, false)
    }

    /// A unit right triangle in the XY plane.
    pub fn triangle(&mut self) -> Primitive {
        let position = self.positions(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
        Primitive {
            position: Some(position),
            ..Default::default()
        }
    }

    pub fn mesh(&mut self, name: &str, primitives: Vec<Primitive>) -> usize {
        self.document.meshes.push(Mesh {
            name: Some(name.to_string()),
            primitives,
        });
        self.document.meshes.len() - 1
    }

    pub fn node(&mut self, node: Node) -> usize {
        self.document.nodes.push(node);
        self.document.nodes.len() - 1
    }

    pub fn scene(&mut self, nodes: Vec<usize>) -> usize {
        self.document.scenes.push(Scene { nodes });
        self.document.scenes.len() - 1
    }

    pub fn default_scene(&mut self, scene: usize) {
        self.document.default_scene = Some(scene);
    }

    /// A 2x2 RGBA image wrapped in a texture and a material; returns the material index.
    pub fn textured_material(&mut self) -> usize {
        self.document.images.push(Image {
            width: 2,
            height: 2,
            components: 4,
            pixels: vec![255; 16],
        });
        let image = self.document.images.len() - 1;
        self.document.textures.push(Texture {
            source: Some(image),
        });
        let texture = self.document.textures.len() - 1;
        self.document.materials.push(Material {
            name: Some("textured".to_string()),
            base_color_texture: Some(texture),
        });
        self.document.materials.len() - 1
    }

    pub fn finish(self) -> Document {
        self.document
    }
}
