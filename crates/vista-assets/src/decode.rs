//! Attribute and index decoding for a single primitive.

use glam::{Vec2, Vec3};

use crate::accessor::{resolve, AccessorView};
use crate::document::{ComponentType, Document, ElementType, Primitive};
use crate::error::ImportError;

/// One vertex as uploaded to the renderer and handed to collision.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DecodedVertex {
    pub position: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// Three vertex indices of one triangle.
pub type Triangle = [u32; 3];

/// Vertex and triangle arrays of one triangle-list primitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedPrimitive {
    pub vertices: Vec<DecodedVertex>,
    pub triangles: Vec<Triangle>,
}

/// Decode the positions, normals, UVs and indices of `primitive`.
///
/// The caller is responsible for skipping primitives whose mode is not a
/// triangle list.
pub fn decode_primitive(
    document: &Document,
    primitive: &Primitive,
) -> Result<DecodedPrimitive, ImportError> {
    let position_index = primitive
        .position
        .ok_or(ImportError::MissingRequiredAttribute("POSITION"))?;
    let positions = resolve(document, position_index)?;
    if !positions.is(ElementType::Vec3, ComponentType::F32) {
        return Err(ImportError::MissingRequiredAttribute("POSITION"));
    }

    let vertex_count = positions.len();
    let mut vertices = vec![DecodedVertex::default(); vertex_count];

    for (i, vertex) in vertices.iter_mut().enumerate() {
        vertex.position = Vec3::from_array(read_element(&positions, i, "POSITION")?);
    }

    if let Some(index) = primitive.normal {
        let normals = resolve(document, index)?;
        if !normals.is(ElementType::Vec3, ComponentType::F32) {
            return Err(ImportError::malformed(format!(
                "NORMAL accessor {index} is {:?}/{:?}, expected float vec3",
                normals.element_type(),
                normals.component_type()
            )));
        }
        check_count(&normals, vertex_count, "NORMAL")?;
        for (i, vertex) in vertices.iter_mut().enumerate() {
            vertex.normal = Vec3::from_array(read_element(&normals, i, "NORMAL")?);
        }
    }

    if let Some(index) = primitive.tex_coord {
        let uvs = resolve(document, index)?;
        if !is_valid_tex_coord(&uvs) {
            return Err(ImportError::malformed(format!(
                "TEXCOORD_0 accessor {index} is {:?}/{:?}, expected float or normalized vec2",
                uvs.element_type(),
                uvs.component_type()
            )));
        }
        check_count(&uvs, vertex_count, "TEXCOORD_0")?;
        for (i, vertex) in vertices.iter_mut().enumerate() {
            vertex.uv = Vec2::from_array(read_element(&uvs, i, "TEXCOORD_0")?);
        }
    }

    let indices = match primitive.indices {
        Some(index) => decode_indices(document, index, vertex_count)?,
        None => sequential_indices(vertex_count)?,
    };

    Ok(DecodedPrimitive {
        vertices,
        triangles: group_triangles(&indices),
    })
}

/// Decode an index accessor into a 32-bit index stream.
///
/// Only whole triangles are kept; a trailing one or two indices are dropped
/// before range checking.
pub fn decode_indices(
    document: &Document,
    accessor: usize,
    vertex_count: usize,
) -> Result<Vec<u32>, ImportError> {
    let view = resolve(document, accessor)?;
    if view.element_type() != ElementType::Scalar {
        return Err(ImportError::malformed(format!(
            "index accessor {accessor} is {:?}, expected scalar",
            view.element_type()
        )));
    }
    if !matches!(
        view.component_type(),
        ComponentType::U8 | ComponentType::U16 | ComponentType::U32
    ) {
        return Err(ImportError::malformed(format!(
            "index accessor {accessor} has component type {:?}",
            view.component_type()
        )));
    }

    let kept = view.len() / 3 * 3;
    let mut indices = Vec::with_capacity(kept);
    for i in 0..kept {
        let value = view.read_index(i).ok_or_else(|| {
            ImportError::malformed(format!("index accessor {accessor} element {i} unreadable"))
        })?;
        if value as usize >= vertex_count {
            return Err(ImportError::malformed(format!(
                "index {value} at position {i} is out of range for {vertex_count} vertices"
            )));
        }
        indices.push(value);
    }
    Ok(indices)
}

/// The identity index stream `0..vertex_count`.
pub fn sequential_indices(vertex_count: usize) -> Result<Vec<u32>, ImportError> {
    let count = u32::try_from(vertex_count).map_err(|_| {
        ImportError::malformed(format!("{vertex_count} vertices exceed 32-bit indexing"))
    })?;
    Ok((0..count).collect())
}

/// Group a flat index stream into triangles, dropping a trailing partial triangle.
pub fn group_triangles(indices: &[u32]) -> Vec<Triangle> {
    indices
        .chunks_exact(3)
        .map(|chunk| [chunk[0], chunk[1], chunk[2]])
        .collect()
}

fn is_valid_tex_coord(view: &AccessorView<'_>) -> bool {
    view.element_type() == ElementType::Vec2
        && match view.component_type() {
            ComponentType::F32 => true,
            ComponentType::U8 | ComponentType::U16 => view.normalized(),
            _ => false,
        }
}

fn check_count(
    view: &AccessorView<'_>,
    vertex_count: usize,
    semantic: &str,
) -> Result<(), ImportError> {
    if view.len() < vertex_count {
        return Err(ImportError::malformed(format!(
            "{semantic} has {} elements but POSITION has {vertex_count}",
            view.len()
        )));
    }
    Ok(())
}

fn read_element<const N: usize>(
    view: &AccessorView<'_>,
    index: usize,
    semantic: &str,
) -> Result<[f32; N], ImportError> {
    view.read_f32_array::<N>(index).ok_or_else(|| {
        ImportError::malformed(format!("{semantic} element {index} unreadable"))
    })
}
