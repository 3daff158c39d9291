//! Vertex layout shared by the mesh pipeline

use bytemuck::{Pod, Zeroable};
use std::collections::HashMap;
use vista_assets::DecodedVertex;

/// Interleaved vertex: position, normal and texture coordinate.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl Vertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }

    /// Vulkano vertex buffer description
    pub fn per_vertex() -> vulkano::pipeline::graphics::vertex_input::VertexBufferDescription {
        let stride = std::mem::size_of::<Self>() as u32;
        let member = |offset, format| vulkano::pipeline::graphics::vertex_input::VertexMemberInfo {
            offset,
            format,
            num_elements: 1,
            stride,
        };
        vulkano::pipeline::graphics::vertex_input::VertexBufferDescription {
            stride,
            input_rate: vulkano::pipeline::graphics::vertex_input::VertexInputRate::Vertex,
            members: HashMap::from([
                (
                    "position".to_string(),
                    member(0, vulkano::format::Format::R32G32B32_SFLOAT),
                ),
                (
                    "normal".to_string(),
                    member(12, vulkano::format::Format::R32G32B32_SFLOAT),
                ),
                (
                    "uv".to_string(),
                    member(24, vulkano::format::Format::R32G32_SFLOAT),
                ),
            ]),
        }
    }
}

impl From<&DecodedVertex> for Vertex {
    fn from(vertex: &DecodedVertex) -> Self {
        Self {
            position: vertex.position.to_array(),
            normal: vertex.normal.to_array(),
            uv: vertex.uv.to_array(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    #[test]
    fn layout_is_tightly_packed() {
        assert_eq!(std::mem::size_of::<Vertex>(), 32);
        let description = Vertex::per_vertex();
        assert_eq!(description.stride, 32);
        assert_eq!(description.members["position"].offset, 0);
        assert_eq!(description.members["normal"].offset, 12);
        assert_eq!(description.members["uv"].offset, 24);
    }

    #[test]
    fn converts_decoded_vertex() {
        let decoded = DecodedVertex {
            position: Vec3::new(1.0, 2.0, 3.0),
            normal: Vec3::Y,
            uv: Vec2::new(0.25, 0.75),
        };
        let vertex = Vertex::from(&decoded);
        assert_eq!(vertex, Vertex::new([1.0, 2.0, 3.0], [0.0, 1.0, 0.0], [0.25, 0.75]));
        let bytes: &[u8] = bytemuck::bytes_of(&vertex);
        assert_eq!(&bytes[24..28], &0.25f32.to_ne_bytes());
    }
}
