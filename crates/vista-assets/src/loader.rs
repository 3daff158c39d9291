//! Reading glTF 2.0 files into a [`Document`].

use std::fs;
use std::path::Path;

use gltf::image::Format;
use gltf::json::{self, accessor::GenericComponentType, validation::Checked};
use gltf::Semantic;
use image::{DynamicImage, ImageBuffer, Luma, LumaA, Rgb, Rgba};
use tracing::{debug, warn};

use crate::document::{
    component, Accessor, BufferView, Document, ElementType, Image, Material, Mesh, Mode, Node,
    Primitive, Scene, Texture,
};
use crate::error::ImportError;

/// Container variant of a glTF file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerKind {
    /// `.glb`: JSON chunk plus embedded binary chunk.
    Binary,
    /// `.gltf` and anything else: JSON with external or data-URI buffers.
    Text,
}

impl ContainerKind {
    /// Select the container kind from the file extension.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("glb") => Self::Binary,
            _ => Self::Text,
        }
    }
}

const GLB_MAGIC: &[u8; 4] = b"glTF";

/// Load and flatten a glTF document, resolving buffers and decoding images.
///
/// The JSON is parsed without glTF validation. Dangling indices and missing
/// attributes are carried into the [`Document`] as-is so the importer can
/// skip only the item that refers to them. Images
/// are decoded one at a time; one that fails to decode becomes an empty
/// [`Image`].
pub fn load_document(path: &Path) -> Result<Document, ImportError> {
    let bytes = fs::read(path).map_err(|e| ImportError::failed(path, e))?;
    let kind = ContainerKind::from_path(path);

    let gltf = match kind {
        ContainerKind::Binary => {
            gltf::Glb::from_slice(&bytes).map_err(|e| ImportError::failed(path, e))?;
            gltf::Gltf::from_slice_without_validation(&bytes)
                .map_err(|e| ImportError::failed(path, e))?
        }
        ContainerKind::Text => {
            if bytes.starts_with(GLB_MAGIC) {
                return Err(ImportError::failed(
                    path,
                    "binary container found in a file without a .glb extension",
                ));
            }
            gltf::Gltf::from_slice_without_validation(&bytes)
                .map_err(|e| ImportError::failed(path, e))?
        }
    };

    let base = path.parent();
    let gltf::Gltf { document, blob } = gltf;
    let buffers =
        gltf::import_buffers(&document, base, blob).map_err(|e| ImportError::failed(path, e))?;
    let images = decode_images(&document, base, &buffers);

    let document = from_gltf(
        &document,
        buffers.into_iter().map(|data| data.0).collect(),
        images,
    );
    debug!(
        path = %path.display(),
        ?kind,
        buffers = document.buffers.len(),
        accessors = document.accessors.len(),
        meshes = document.meshes.len(),
        images = document.images.len(),
        "loaded glTF document"
    );
    Ok(document)
}

/// Decode every image of the document, leaving an empty [`Image`] for each
/// one that cannot be read.
fn decode_images(
    gltf: &gltf::Document,
    base: Option<&Path>,
    buffers: &[gltf::buffer::Data],
) -> Vec<Image> {
    gltf.images()
        .map(|image| {
            let index = image.index();
            let decoded = check_image_source(gltf, index, buffers)
                .and_then(|()| {
                    gltf::image::Data::from_source(image.source(), base, buffers)
                        .map_err(|e| e.to_string())
                })
                .and_then(|data| {
                    normalize_image(data).ok_or_else(|| "unsupported pixel layout".to_string())
                });
            decoded.unwrap_or_else(|reason| {
                warn!(image = index, %reason, "image not decoded, no texture will be created");
                Image::default()
            })
        })
        .collect()
}

/// Reject image sources whose buffer view or buffer is missing or too short.
fn check_image_source(
    gltf: &gltf::Document,
    index: usize,
    buffers: &[gltf::buffer::Data],
) -> Result<(), String> {
    let root = gltf.as_json();
    let image = root
        .images
        .get(index)
        .ok_or_else(|| format!("image {index} does not exist"))?;
    let Some(view_index) = image.buffer_view.as_ref().map(|view| view.value()) else {
        return match image.uri {
            Some(_) => Ok(()),
            None => Err("image has neither a uri nor a buffer view".to_string()),
        };
    };
    if image.mime_type.is_none() {
        return Err("image in a buffer view has no mime type".to_string());
    }
    let view = gltf
        .views()
        .nth(view_index)
        .ok_or_else(|| format!("buffer view {view_index} does not exist"))?;
    let buffer_index = root.buffer_views[view_index].buffer.value();
    let buffer = buffers
        .get(buffer_index)
        .ok_or_else(|| format!("buffer {buffer_index} does not exist"))?;
    let end = view.offset().saturating_add(view.length());
    if end > buffer.0.len() {
        return Err(format!(
            "buffer view {view_index} ends at {end} past buffer {buffer_index} ({} bytes)",
            buffer.0.len()
        ));
    }
    Ok(())
}

/// Flatten a parsed glTF document and its resolved data into a [`Document`].
///
/// Cross-references are copied from the raw JSON indices without looking
/// them up, so a dangling index survives flattening and is rejected later by
/// whichever stage follows it.
pub fn from_gltf(gltf: &gltf::Document, buffers: Vec<Vec<u8>>, images: Vec<Image>) -> Document {
    let root = gltf.as_json();

    let buffer_views = gltf
        .views()
        .zip(&root.buffer_views)
        .map(|(view, raw)| BufferView {
            buffer: raw.buffer.value(),
            byte_offset: view.offset(),
            byte_length: view.length(),
            byte_stride: view.stride().unwrap_or(0),
        })
        .collect();

    let accessors = gltf
        .accessors()
        .zip(&root.accessors)
        .map(|(accessor, raw)| {
            let (component_type, element_type) = match (&raw.component_type, &raw.type_) {
                (Checked::Valid(GenericComponentType(data_type)), Checked::Valid(dimensions)) => {
                    (component_code(*data_type), element_type(*dimensions))
                }
                // Code 0 is no component type; resolving the accessor fails.
                _ => (0, ElementType::Scalar),
            };
            Accessor {
                buffer_view: raw.buffer_view.as_ref().map(|view| view.value()),
                byte_offset: accessor.offset(),
                count: accessor.count(),
                component_type,
                element_type,
                normalized: raw.normalized,
            }
        })
        .collect();

    let meshes = root
        .meshes
        .iter()
        .map(|mesh| Mesh {
            name: mesh.name.clone(),
            primitives: mesh
                .primitives
                .iter()
                .map(|primitive| Primitive {
                    position: attribute(primitive, Semantic::Positions),
                    normal: attribute(primitive, Semantic::Normals),
                    tex_coord: attribute(primitive, Semantic::TexCoords(0)),
                    indices: primitive.indices.as_ref().map(|index| index.value()),
                    material: primitive.material.as_ref().map(|index| index.value()),
                    mode: match &primitive.mode {
                        Checked::Valid(m) => mode(*m),
                        Checked::Invalid => Mode::Unknown,
                    },
                })
                .collect(),
        })
        .collect();

    let nodes = gltf
        .nodes()
        .zip(&root.nodes)
        .map(|(node, raw)| {
            let (translation, rotation, scale) = node.transform().decomposed();
            Node {
                mesh: raw.mesh.as_ref().map(|mesh| mesh.value()),
                children: raw
                    .children
                    .iter()
                    .flatten()
                    .map(|child| child.value())
                    .collect(),
                translation: Some(translation),
                rotation: Some(rotation),
                scale: Some(scale),
            }
        })
        .collect();

    let scenes = root
        .scenes
        .iter()
        .map(|scene| Scene {
            nodes: scene.nodes.iter().map(|node| node.value()).collect(),
        })
        .collect();

    let materials = root
        .materials
        .iter()
        .map(|material| Material {
            name: material.name.clone(),
            base_color_texture: material
                .pbr_metallic_roughness
                .base_color_texture
                .as_ref()
                .map(|info| info.index.value()),
        })
        .collect();

    let textures = root
        .textures
        .iter()
        .map(|texture| Texture {
            source: Some(texture.source.value()),
        })
        .collect();

    Document {
        buffers,
        buffer_views,
        accessors,
        nodes,
        meshes,
        materials,
        textures,
        images,
        scenes,
        default_scene: root.scene.as_ref().map(|scene| scene.value()),
    }
}

fn attribute(primitive: &json::mesh::Primitive, semantic: Semantic) -> Option<usize> {
    primitive
        .attributes
        .get(&Checked::Valid(semantic))
        .map(|index| index.value())
}

fn component_code(data_type: gltf::accessor::DataType) -> u32 {
    use gltf::accessor::DataType;
    match data_type {
        DataType::I8 => component::BYTE,
        DataType::U8 => component::UNSIGNED_BYTE,
        DataType::I16 => component::SHORT,
        DataType::U16 => component::UNSIGNED_SHORT,
        DataType::U32 => component::UNSIGNED_INT,
        DataType::F32 => component::FLOAT,
    }
}

fn element_type(dimensions: gltf::accessor::Dimensions) -> ElementType {
    use gltf::accessor::Dimensions;
    match dimensions {
        Dimensions::Scalar => ElementType::Scalar,
        Dimensions::Vec2 => ElementType::Vec2,
        Dimensions::Vec3 => ElementType::Vec3,
        Dimensions::Vec4 => ElementType::Vec4,
        Dimensions::Mat2 => ElementType::Mat2,
        Dimensions::Mat3 => ElementType::Mat3,
        Dimensions::Mat4 => ElementType::Mat4,
    }
}

fn mode(mode: gltf::mesh::Mode) -> Mode {
    use gltf::mesh::Mode as GltfMode;
    match mode {
        GltfMode::Points => Mode::Points,
        GltfMode::Lines => Mode::Lines,
        GltfMode::LineLoop => Mode::LineLoop,
        GltfMode::LineStrip => Mode::LineStrip,
        GltfMode::Triangles => Mode::Triangles,
        GltfMode::TriangleStrip => Mode::TriangleStrip,
        GltfMode::TriangleFan => Mode::TriangleFan,
    }
}

/// Bring a decoded image to 8 bits per channel, keeping its channel count.
fn normalize_image(data: gltf::image::Data) -> Option<Image> {
    let gltf::image::Data {
        pixels,
        format,
        width,
        height,
    } = data;

    let (components, pixels) = match format {
        Format::R8 => (1, pixels),
        Format::R8G8 => (2, pixels),
        Format::R8G8B8 => (3, pixels),
        Format::R8G8B8A8 => (4, pixels),
        Format::R16 => {
            let buffer = ImageBuffer::<Luma<u16>, _>::from_raw(width, height, u16_samples(&pixels))?;
            (1, DynamicImage::ImageLuma16(buffer).into_luma8().into_raw())
        }
        Format::R16G16 => {
            let buffer = ImageBuffer::<LumaA<u16>, _>::from_raw(width, height, u16_samples(&pixels))?;
            (2, DynamicImage::ImageLumaA16(buffer).into_luma_alpha8().into_raw())
        }
        Format::R16G16B16 => {
            let buffer = ImageBuffer::<Rgb<u16>, _>::from_raw(width, height, u16_samples(&pixels))?;
            (3, DynamicImage::ImageRgb16(buffer).into_rgb8().into_raw())
        }
        Format::R16G16B16A16 => {
            let buffer = ImageBuffer::<Rgba<u16>, _>::from_raw(width, height, u16_samples(&pixels))?;
            (4, DynamicImage::ImageRgba16(buffer).into_rgba8().into_raw())
        }
        Format::R32G32B32FLOAT => {
            let buffer = ImageBuffer::<Rgb<f32>, _>::from_raw(width, height, f32_samples(&pixels))?;
            (3, DynamicImage::ImageRgb32F(buffer).into_rgb8().into_raw())
        }
        Format::R32G32B32A32FLOAT => {
            let buffer = ImageBuffer::<Rgba<f32>, _>::from_raw(width, height, f32_samples(&pixels))?;
            (4, DynamicImage::ImageRgba32F(buffer).into_rgba8().into_raw())
        }
    };

    Some(Image {
        width,
        height,
        components,
        pixels,
    })
}

// Wide samples arrive in native byte order from the image decoder.
fn u16_samples(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|c| u16::from_ne_bytes([c[0], c[1]]))
        .collect()
}

fn f32_samples(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
        .collect()
}
