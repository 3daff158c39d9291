//! Scene graph traversal: per-mesh local transforms.

use std::collections::HashMap;

use glam::{Quat, Vec3};
use tracing::{debug, warn};
use vista_core::{quat_to_view_angles, MeshTransform, ViewAngles};

use crate::document::{Document, Node};
use crate::error::ImportError;

/// Local transform found on the node that references a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NodeTransform {
    pub scale: Vec3,
    pub translation: Vec3,
    /// Rotation as stored in the document (xyzw), not renormalized.
    pub rotation: Quat,
}

impl Default for NodeTransform {
    fn default() -> Self {
        Self {
            scale: Vec3::ONE,
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl NodeTransform {
    /// Read a node's transform fields, defaulting each one independently.
    pub fn from_node(node: &Node) -> Self {
        let mut transform = Self::default();
        if let Some(scale) = node.scale {
            transform.scale = Vec3::from_array(scale);
        }
        if let Some(translation) = node.translation {
            transform.translation = Vec3::from_array(translation);
        }
        if let Some([x, y, z, w]) = node.rotation {
            transform.rotation = Quat::from_xyzw(x, y, z, w);
        }
        transform
    }

    /// The rotation expressed as engine view angles.
    pub fn view_angles(&self) -> ViewAngles {
        let q = self.rotation;
        quat_to_view_angles(q.x, q.y, q.z, q.w)
    }

    /// Mesh-level transform state: scale, origin and rotation.
    pub fn to_mesh_transform(&self) -> MeshTransform {
        MeshTransform::new(self.scale, self.translation, self.view_angles())
    }
}

/// Pick the scene to import: the designated default, else scene 0.
pub fn active_scene(document: &Document) -> Result<usize, ImportError> {
    if document.scenes.is_empty() {
        return Err(ImportError::NoSceneAvailable);
    }
    let index = document.default_scene.unwrap_or(0);
    if index >= document.scenes.len() {
        return Err(ImportError::malformed(format!(
            "default scene {index} does not exist ({} scenes)",
            document.scenes.len()
        )));
    }
    Ok(index)
}

enum Visit {
    Enter(usize),
    Leave(usize),
}

/// Walk the active scene depth-first and record, per mesh index, the
/// transform of the node referencing it.
///
/// Nodes are visited in the same order as a recursive pre-order walk, so when
/// several nodes reference one mesh the last one visited wins. A reference to
/// a node that does not exist is logged and skipped, leaving the meshes below
/// it at the default transform. A node that is its own ancestor is reported as
/// a malformed document instead of recursing forever.
///
/// A node reachable along several paths is visited once per path. A chain of
/// `k` shared diamonds therefore costs `2^k` visits.
pub fn collect_transforms(
    document: &Document,
) -> Result<HashMap<usize, NodeTransform>, ImportError> {
    let scene = active_scene(document)?;
    let roots = &document.scenes[scene].nodes;

    let mut transforms = HashMap::new();
    let mut on_path = vec![false; document.nodes.len()];
    let mut stack: Vec<Visit> = roots.iter().rev().map(|&n| Visit::Enter(n)).collect();

    while let Some(visit) = stack.pop() {
        let index = match visit {
            Visit::Enter(index) => index,
            Visit::Leave(index) => {
                on_path[index] = false;
                continue;
            }
        };

        let Some(node) = document.nodes.get(index) else {
            warn!(node = index, "scene references a node that does not exist, skipping it");
            continue;
        };
        if on_path[index] {
            return Err(ImportError::malformed(format!(
                "scene graph cycle through node {index}"
            )));
        }
        on_path[index] = true;

        if let Some(mesh) = node.mesh {
            transforms.insert(mesh, NodeTransform::from_node(node));
        }

        stack.push(Visit::Leave(index));
        stack.extend(node.children.iter().rev().map(|&child| Visit::Enter(child)));
    }

    debug!(scene, meshes = transforms.len(), "collected node transforms");
    Ok(transforms)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::DocumentBuilder;

    fn mesh_node(mesh: usize) -> Node {
        Node {
            mesh: Some(mesh),
            ..Default::default()
        }
    }

    #[test]
    fn missing_fields_default_to_identity() {
        let mut builder = DocumentBuilder::new();
        let root = builder.node(mesh_node(0));
        builder.scene(vec![root]);
        let transforms = collect_transforms(&builder.finish()).unwrap();

        let t = transforms[&0];
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.translation, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.to_mesh_transform(), MeshTransform::default());
    }

    #[test]
    fn fields_default_independently() {
        let node = Node {
            mesh: Some(0),
            translation: Some([1.0, 2.0, 3.0]),
            ..Default::default()
        };
        let t = NodeTransform::from_node(&node);
        assert_eq!(t.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.scale, Vec3::ONE);
        assert_eq!(t.rotation, Quat::IDENTITY);
    }

    #[test]
    fn children_are_visited_without_parent_mesh() {
        let mut builder = DocumentBuilder::new();
        let leaf = builder.node(Node {
            mesh: Some(2),
            scale: Some([2.0, 2.0, 2.0]),
            ..Default::default()
        });
        let group = builder.node(Node {
            children: vec![leaf],
            ..Default::default()
        });
        builder.scene(vec![group]);
        let transforms = collect_transforms(&builder.finish()).unwrap();
        assert_eq!(transforms.len(), 1);
        assert_eq!(transforms[&2].scale, Vec3::splat(2.0));
    }

    #[test]
    fn last_visited_node_wins() {
        let mut builder = DocumentBuilder::new();
        let first = builder.node(Node {
            mesh: Some(0),
            translation: Some([1.0, 0.0, 0.0]),
            ..Default::default()
        });
        let nested = builder.node(Node {
            mesh: Some(0),
            translation: Some([2.0, 0.0, 0.0]),
            ..Default::default()
        });
        let second = builder.node(Node {
            children: vec![nested],
            ..Default::default()
        });
        let third = builder.node(Node {
            mesh: Some(0),
            translation: Some([3.0, 0.0, 0.0]),
            ..Default::default()
        });
        // Pre-order: first, second, nested, third.
        builder.scene(vec![first, second, third]);
        let transforms = collect_transforms(&builder.finish()).unwrap();
        assert_eq!(transforms[&0].translation.x, 3.0);
    }

    #[test]
    fn scene_zero_is_used_without_default() {
        let mut builder = DocumentBuilder::new();
        let a = builder.node(Node {
            mesh: Some(0),
            translation: Some([5.0, 0.0, 0.0]),
            ..Default::default()
        });
        let b = builder.node(Node {
            mesh: Some(0),
            translation: Some([9.0, 0.0, 0.0]),
            ..Default::default()
        });
        builder.scene(vec![a]);
        builder.scene(vec![b]);
        let document = builder.finish();

        assert_eq!(active_scene(&document).unwrap(), 0);
        assert_eq!(collect_transforms(&document).unwrap()[&0].translation.x, 5.0);
    }

    #[test]
    fn designated_default_scene_is_used() {
        let mut builder = DocumentBuilder::new();
        let a = builder.node(mesh_node(0));
        let b = builder.node(mesh_node(1));
        builder.scene(vec![a]);
        let second = builder.scene(vec![b]);
        builder.default_scene(second);
        let transforms = collect_transforms(&builder.finish()).unwrap();
        assert!(transforms.contains_key(&1));
        assert!(!transforms.contains_key(&0));
    }

    #[test]
    fn no_scene_is_an_error() {
        let document = DocumentBuilder::new().finish();
        assert!(matches!(
            collect_transforms(&document),
            Err(ImportError::NoSceneAvailable)
        ));
    }

    #[test]
    fn cycle_fails_fast() {
        let mut builder = DocumentBuilder::new();
        let a = builder.node(Node {
            children: vec![1],
            ..Default::default()
        });
        builder.node(Node {
            children: vec![a],
            ..Default::default()
        });
        builder.scene(vec![a]);
        assert!(matches!(
            collect_transforms(&builder.finish()),
            Err(ImportError::MalformedDocument(_))
        ));
    }

    #[test]
    fn shared_child_is_not_a_cycle() {
        let mut builder = DocumentBuilder::new();
        let shared = builder.node(mesh_node(0));
        let a = builder.node(Node {
            children: vec![shared],
            ..Default::default()
        });
        let b = builder.node(Node {
            children: vec![shared],
            ..Default::default()
        });
        builder.scene(vec![a, b]);
        assert!(collect_transforms(&builder.finish()).is_ok());
    }

    #[test]
    fn dangling_nodes_are_skipped() {
        let mut builder = DocumentBuilder::new();
        let leaf = builder.node(Node {
            translation: Some([0.0, 3.0, 0.0]),
            ..mesh_node(1)
        });
        let root = builder.node(Node {
            children: vec![42, leaf],
            ..mesh_node(0)
        });
        builder.scene(vec![17, root]);

        let transforms = collect_transforms(&builder.finish()).unwrap();
        assert_eq!(transforms.len(), 2);
        assert_eq!(transforms[&1].translation, Vec3::new(0.0, 3.0, 0.0));
    }

    #[test]
    fn rotation_converts_to_view_angles() {
        let q = Quat::from_rotation_y(0.5);
        let node = Node {
            mesh: Some(0),
            rotation: Some([q.x, q.y, q.z, q.w]),
            ..Default::default()
        };
        let angles = NodeTransform::from_node(&node).view_angles();
        assert!((angles.yaw - 0.5).abs() < 1e-5);
        assert!(angles.pitch.abs() < 1e-5);
    }
}
