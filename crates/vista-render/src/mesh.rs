//! Draw items built from imported meshes

use std::collections::HashSet;
use std::sync::Arc;

use glam::Mat4;
use vista_assets::{ImportedMesh, TextureAsset, TextureId};

use crate::vertex::Vertex;

/// GPU-ready data of one imported mesh.
#[derive(Clone, Debug)]
pub struct DrawItem {
    pub label: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Base-color texture, if the mesh has one.
    pub texture: Option<TextureId>,
    pub model: Mat4,
}

impl DrawItem {
    pub fn from_imported(mesh: &ImportedMesh) -> Self {
        Self {
            label: mesh.label(),
            vertices: mesh.vertices().iter().map(Vertex::from).collect(),
            indices: mesh.indices().collect(),
            texture: mesh.base_color().map(|texture| texture.id),
            model: mesh.model_matrix(),
        }
    }

    /// Vertex data as raw bytes for a buffer upload.
    pub fn vertex_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }
}

/// Everything to draw for one scene, with each shared texture listed once.
#[derive(Debug, Default)]
pub struct DrawList {
    items: Vec<DrawItem>,
    uploads: Vec<Arc<TextureAsset>>,
    seen: HashSet<TextureId>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_meshes<'a>(meshes: impl IntoIterator<Item = &'a ImportedMesh>) -> Self {
        let mut list = Self::new();
        for mesh in meshes {
            list.push(mesh);
        }
        list
    }

    /// Add a mesh, queueing its texture unless it is already queued.
    pub fn push(&mut self, mesh: &ImportedMesh) {
        if let Some(texture) = mesh.base_color() {
            if self.seen.insert(texture.id) {
                self.uploads.push(Arc::clone(texture));
            }
        }
        self.items.push(DrawItem::from_imported(mesh));
    }

    pub fn items(&self) -> &[DrawItem] {
        &self.items
    }

    /// Textures to upload, one per distinct texture.
    pub fn uploads(&self) -> &[Arc<TextureAsset>] {
        &self.uploads
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.items.iter().map(|item| item.indices.len() / 3).sum()
    }
}
