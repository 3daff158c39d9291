use std::sync::Arc;

use glam::{Mat4, Vec3};
use vista_core::{MeshTransform, ViewAngles};

use crate::decode::{DecodedPrimitive, DecodedVertex, Triangle};
use crate::texture::TextureAsset;

/// One renderable, collidable mesh produced from a triangle-list primitive.
///
/// Geometry is kept in local space; the node transform is carried alongside as
/// mesh-level state. Only the rotation may change after import.
#[derive(Debug, Clone)]
pub struct ImportedMesh {
    name: Option<String>,
    mesh_index: usize,
    primitive_index: usize,
    vertices: Vec<DecodedVertex>,
    triangles: Vec<Triangle>,
    base_color: Option<Arc<TextureAsset>>,
    transform: MeshTransform,
}

impl ImportedMesh {
    pub fn new(
        name: Option<String>,
        mesh_index: usize,
        primitive_index: usize,
        decoded: DecodedPrimitive,
        base_color: Option<Arc<TextureAsset>>,
        transform: MeshTransform,
    ) -> Self {
        Self {
            name,
            mesh_index,
            primitive_index,
            vertices: decoded.vertices,
            triangles: decoded.triangles,
            base_color,
            transform,
        }
    }

    /// Name of the source mesh, if it had one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Index of the source mesh in the document.
    pub fn mesh_index(&self) -> usize {
        self.mesh_index
    }

    /// Index of the source primitive within its mesh.
    pub fn primitive_index(&self) -> usize {
        self.primitive_index
    }

    pub fn vertices(&self) -> &[DecodedVertex] {
        &self.vertices
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    /// Flat index list, three per triangle.
    pub fn indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.triangles.iter().flatten().copied()
    }

    /// Local-space vertex positions.
    pub fn positions(&self) -> impl Iterator<Item = Vec3> + '_ {
        self.vertices.iter().map(|v| v.position)
    }

    pub fn base_color(&self) -> Option<&Arc<TextureAsset>> {
        self.base_color.as_ref()
    }

    pub fn transform(&self) -> &MeshTransform {
        &self.transform
    }

    pub fn scale(&self) -> Vec3 {
        self.transform.scale
    }

    pub fn origin(&self) -> Vec3 {
        self.transform.origin
    }

    pub fn rotation(&self) -> ViewAngles {
        self.transform.rotation
    }

    /// Replace the rotation, e.g. to reorient a collider after import.
    pub fn set_rotation(&mut self, rotation: ViewAngles) {
        self.transform.rotation = rotation;
    }

    /// Local-to-world matrix.
    pub fn model_matrix(&self) -> Mat4 {
        self.transform.matrix()
    }

    /// Display label: mesh name or `mesh#N`, with the primitive index.
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => format!("{name}/{}", self.primitive_index),
            None => format!("mesh#{}/{}", self.mesh_index, self.primitive_index),
        }
    }
}
