//! Scene import: load, materialize textures, collect transforms, assemble meshes.

use std::path::Path;

use tracing::{debug, info, warn};

use crate::decode::decode_primitive;
use crate::document::{Document, Mode};
use crate::error::ImportError;
use crate::loader::load_document;
use crate::mesh::ImportedMesh;
use crate::scene_graph::collect_transforms;
use crate::texture::TextureTable;

/// Counters describing what an import kept and what it skipped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportStats {
    /// Meshes in the document
    pub meshes: usize,
    /// Primitives across all meshes
    pub primitives: usize,
    /// Primitives turned into an [`ImportedMesh`]
    pub assembled: usize,
    /// Primitives skipped for a non-triangle-list mode
    pub skipped_mode: usize,
    /// Primitives skipped because they failed to decode or were empty
    pub skipped_invalid: usize,
    /// Images that produced a texture
    pub textures: usize,
}

/// Result of a successful import.
#[derive(Debug)]
pub struct ImportedScene {
    pub meshes: Vec<ImportedMesh>,
    /// Textures of this import, shared with the meshes that use them.
    pub textures: TextureTable,
    pub stats: ImportStats,
}

/// Import a glTF 2.0 scene file (`.glb` or `.gltf`).
///
/// Fails only for whole-document problems: unreadable or corrupt file, no
/// scene, a cyclic scene graph, or no primitive surviving decode.
pub fn import_scene(path: &Path) -> Result<ImportedScene, ImportError> {
    let document = load_document(path)?;
    let scene = assemble_scene(&document, path)?;
    info!(
        path = %path.display(),
        meshes = scene.meshes.len(),
        textures = scene.stats.textures,
        skipped = scene.stats.skipped_mode + scene.stats.skipped_invalid,
        "imported scene"
    );
    Ok(scene)
}

/// Assemble meshes from an already loaded document. `source` names the
/// document in errors and logs.
pub fn assemble_scene(document: &Document, source: &Path) -> Result<ImportedScene, ImportError> {
    let textures = TextureTable::build(document);
    let transforms = collect_transforms(document).map_err(|e| ImportError::failed(source, e))?;

    let mut stats = ImportStats {
        meshes: document.meshes.len(),
        textures: textures.loaded(),
        ..Default::default()
    };
    let mut meshes = Vec::new();

    for (mesh_index, mesh) in document.meshes.iter().enumerate() {
        let transform = transforms
            .get(&mesh_index)
            .map(|t| t.to_mesh_transform())
            .unwrap_or_default();

        for (primitive_index, primitive) in mesh.primitives.iter().enumerate() {
            stats.primitives += 1;

            if primitive.mode != Mode::Triangles {
                debug!(mesh = mesh_index, primitive = primitive_index, mode = ?primitive.mode, "skipping non-triangle primitive");
                stats.skipped_mode += 1;
                continue;
            }

            let decoded = match decode_primitive(document, primitive) {
                Ok(decoded) => decoded,
                Err(error) => {
                    warn!(mesh = mesh_index, primitive = primitive_index, %error, "skipping primitive");
                    stats.skipped_invalid += 1;
                    continue;
                }
            };
            if decoded.vertices.is_empty() {
                warn!(mesh = mesh_index, primitive = primitive_index, "skipping primitive with no vertices");
                stats.skipped_invalid += 1;
                continue;
            }

            let base_color = textures.base_color_or_warn(document, primitive.material);
            let imported = ImportedMesh::new(
                mesh.name.clone(),
                mesh_index,
                primitive_index,
                decoded,
                base_color,
                transform,
            );
            debug!(
                mesh = %imported.label(),
                vertices = imported.vertices().len(),
                triangles = imported.triangles().len(),
                textured = imported.base_color().is_some(),
                "assembled mesh"
            );
            meshes.push(imported);
        }
    }

    stats.assembled = meshes.len();
    if meshes.is_empty() {
        return Err(ImportError::failed(
            source,
            format!(
                "no meshes survived decoding ({} primitives examined)",
                stats.primitives
            ),
        ));
    }

    Ok(ImportedScene {
        meshes,
        textures,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::document::{Node, Primitive};
    use crate::test_support::DocumentBuilder;
    use glam::{Quat, Vec3};
    use vista_core::MeshTransform;

    fn source() -> &'static Path {
        Path::new("memory.gltf")
    }

    #[test]
    fn partial_failure_keeps_good_primitives() {
        let mut builder = DocumentBuilder::new();
        let good = builder.triangle();
        let mesh = builder.mesh("floor", vec![good, Primitive::default()]);
        let root = builder.node(Node {
            mesh: Some(mesh),
            ..Default::default()
        });
        builder.scene(vec![root]);
        let scene = assemble_scene(&builder.finish(), source()).unwrap();

        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.stats.primitives, 2);
        assert_eq!(scene.stats.skipped_invalid, 1);
        assert_eq!(scene.meshes[0].name(), Some("floor"));
    }

    #[test]
    fn non_triangle_primitives_are_skipped() {
        let mut builder = DocumentBuilder::new();
        let triangles = builder.triangle();
        let mut lines = builder.triangle();
        lines.mode = Mode::Lines;
        builder.mesh("mixed", vec![lines, triangles]);
        builder.scene(Vec::new());
        let scene = assemble_scene(&builder.finish(), source()).unwrap();

        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.meshes[0].primitive_index(), 1);
        assert_eq!(scene.stats.skipped_mode, 1);
    }

    #[test]
    fn node_transform_is_applied_not_baked() {
        let mut builder = DocumentBuilder::new();
        let primitive = builder.triangle();
        let mesh = builder.mesh("moved", vec![primitive]);
        let q = Quat::from_rotation_y(0.25);
        let root = builder.node(Node {
            mesh: Some(mesh),
            translation: Some([0.0, 3.0, 0.0]),
            scale: Some([2.0, 1.0, 1.0]),
            rotation: Some([q.x, q.y, q.z, q.w]),
            ..Default::default()
        });
        builder.scene(vec![root]);
        let scene = assemble_scene(&builder.finish(), source()).unwrap();

        let mesh = &scene.meshes[0];
        assert_eq!(mesh.origin(), Vec3::new(0.0, 3.0, 0.0));
        assert_eq!(mesh.scale(), Vec3::new(2.0, 1.0, 1.0));
        assert!((mesh.rotation().yaw - 0.25).abs() < 1e-5);
        assert_eq!(mesh.vertices()[1].position, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn unreferenced_mesh_gets_identity_transform() {
        let mut builder = DocumentBuilder::new();
        let primitive = builder.triangle();
        builder.mesh("loose", vec![primitive]);
        builder.scene(Vec::new());
        let scene = assemble_scene(&builder.finish(), source()).unwrap();
        assert_eq!(*scene.meshes[0].transform(), MeshTransform::default());
    }

    #[test]
    fn primitives_share_one_texture() {
        let mut builder = DocumentBuilder::new();
        let material = builder.textured_material();
        let mut a = builder.triangle();
        a.material = Some(material);
        let mut b = builder.triangle();
        b.material = Some(material);
        builder.mesh("a", vec![a]);
        builder.mesh("b", vec![b]);
        builder.scene(Vec::new());
        let scene = assemble_scene(&builder.finish(), source()).unwrap();

        let first = scene.meshes[0].base_color().unwrap();
        let second = scene.meshes[1].base_color().unwrap();
        assert!(Arc::ptr_eq(first, second));
        assert_eq!(scene.stats.textures, 1);
        // Table plus two meshes.
        assert_eq!(Arc::strong_count(first), 3);
    }

    #[test]
    fn dangling_material_drops_texture_only() {
        let mut builder = DocumentBuilder::new();
        let mut primitive = builder.triangle();
        primitive.material = Some(12);
        builder.mesh("odd", vec![primitive]);
        builder.scene(Vec::new());
        let scene = assemble_scene(&builder.finish(), source()).unwrap();
        assert_eq!(scene.meshes.len(), 1);
        assert!(scene.meshes[0].base_color().is_none());
    }

    #[test]
    fn dangling_child_node_keeps_other_transforms() {
        let mut builder = DocumentBuilder::new();
        let primitive = builder.triangle();
        let placed = builder.mesh("placed", vec![primitive.clone()]);
        builder.mesh("loose", vec![primitive]);
        let root = builder.node(Node {
            mesh: Some(placed),
            translation: Some([1.0, 0.0, 0.0]),
            children: vec![99],
            ..Default::default()
        });
        builder.scene(vec![root]);
        let scene = assemble_scene(&builder.finish(), source()).unwrap();

        assert_eq!(scene.meshes.len(), 2);
        assert_eq!(scene.meshes[0].origin(), Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(*scene.meshes[1].transform(), MeshTransform::default());
    }

    #[test]
    fn zero_meshes_fails() {
        let mut builder = DocumentBuilder::new();
        builder.mesh("empty", vec![Primitive::default()]);
        builder.scene(Vec::new());
        assert!(matches!(
            assemble_scene(&builder.finish(), source()),
            Err(ImportError::ImportFailed { .. })
        ));
    }

    #[test]
    fn zero_scenes_fails() {
        let mut builder = DocumentBuilder::new();
        let primitive = builder.triangle();
        builder.mesh("orphan", vec![primitive]);
        assert!(matches!(
            assemble_scene(&builder.finish(), source()),
            Err(ImportError::ImportFailed { .. })
        ));
    }
}
