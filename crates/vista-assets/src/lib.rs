//! Vista Assets - glTF 2.0 scene import
//!
//! Loads `.glb`/`.gltf` files into a flat [`Document`], decodes triangle-list
//! primitives, shares textures between the meshes that use them, and carries
//! each node's transform as mesh-level state.

mod accessor;
mod decode;
pub mod document;
mod error;
mod importer;
mod loader;
mod mesh;
mod scene_graph;
mod texture;

#[cfg(test)]
mod test_support;

pub use accessor::{resolve, AccessorView};
pub use decode::{
    decode_indices, decode_primitive, group_triangles, sequential_indices, DecodedPrimitive,
    DecodedVertex, Triangle,
};
pub use document::Document;
pub use error::ImportError;
pub use importer::{assemble_scene, import_scene, ImportStats, ImportedScene};
pub use loader::{from_gltf, load_document, ContainerKind};
pub use mesh::ImportedMesh;
pub use scene_graph::{active_scene, collect_transforms, NodeTransform};
pub use texture::{materialize, TextureAsset, TextureFormat, TextureId, TextureTable};
