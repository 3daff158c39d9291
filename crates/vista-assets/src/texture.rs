use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::document::{Document, Image};
use crate::error::ImportError;

/// Pixel format of a materialized texture, 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureFormat {
    R8,
    Rg8,
    Rgb8,
    Rgba8,
}

impl TextureFormat {
    /// Map a channel count to a format. Unknown counts fall back to RGBA.
    pub fn from_components(components: u32) -> Self {
        match components {
            1 => Self::R8,
            2 => Self::Rg8,
            3 => Self::Rgb8,
            _ => Self::Rgba8,
        }
    }

    /// Channels per pixel.
    pub fn channels(self) -> usize {
        match self {
            Self::R8 => 1,
            Self::Rg8 => 2,
            Self::Rgb8 => 3,
            Self::Rgba8 => 4,
        }
    }
}

/// Identity of a materialized texture, used by the renderer to key uploads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u64);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl TextureId {
    fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The raw numeric ID.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A texture ready for upload: owned pixel data plus its identity.
#[derive(Debug)]
pub struct TextureAsset {
    pub id: TextureId,
    pub width: u32,
    pub height: u32,
    pub format: TextureFormat,
    pub data: Vec<u8>,
}

/// Turn a decoded image into a texture, or `None` if it has no pixels.
pub fn materialize(image: &Image) -> Option<TextureAsset> {
    if image.width == 0 || image.height == 0 || image.pixels.is_empty() {
        return None;
    }
    Some(TextureAsset {
        id: TextureId::next(),
        width: image.width,
        height: image.height,
        format: TextureFormat::from_components(image.components),
        data: image.pixels.clone(),
    })
}

/// Textures of one import, indexed by source image.
///
/// Built once before mesh assembly and read-only afterwards. Meshes hold
/// `Arc` clones, so a texture lives as long as the last mesh using it.
#[derive(Debug, Default)]
pub struct TextureTable {
    slots: Vec<Option<Arc<TextureAsset>>>,
}

impl TextureTable {
    /// Materialize every image of `document` exactly once.
    pub fn build(document: &Document) -> Self {
        Self::build_with(document, materialize)
    }

    /// Like [`TextureTable::build`] with a custom materializer, called once per image.
    pub fn build_with<F>(document: &Document, mut materializer: F) -> Self
    where
        F: FnMut(&Image) -> Option<TextureAsset>,
    {
        let slots: Vec<_> = document
            .images
            .iter()
            .enumerate()
            .map(|(index, image)| {
                let texture = materializer(image).map(Arc::new);
                if texture.is_none() {
                    debug!(image = index, "image has no pixel data, no texture created");
                }
                texture
            })
            .collect();
        Self { slots }
    }

    /// Texture for source image `image`, if one was created.
    pub fn get(&self, image: usize) -> Option<&Arc<TextureAsset>> {
        self.slots.get(image).and_then(Option::as_ref)
    }

    /// Number of images in the table, textured or not.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of images that produced a texture.
    pub fn loaded(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    /// Iterate over the created textures.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<TextureAsset>> {
        self.slots.iter().flatten()
    }

    /// Resolve the base-color texture of `material`.
    ///
    /// `Ok(None)` means the material legitimately has no usable base-color
    /// texture; dangling material/texture/image references are errors.
    pub fn base_color(
        &self,
        document: &Document,
        material: usize,
    ) -> Result<Option<Arc<TextureAsset>>, ImportError> {
        let entry = document.materials.get(material).ok_or_else(|| {
            ImportError::malformed(format!("material {material} does not exist"))
        })?;
        let Some(texture) = entry.base_color_texture else {
            return Ok(None);
        };
        let source = document
            .textures
            .get(texture)
            .ok_or_else(|| {
                ImportError::malformed(format!(
                    "material {material} references missing texture {texture}"
                ))
            })?
            .source;
        let Some(image) = source else {
            return Ok(None);
        };
        if image >= self.slots.len() {
            return Err(ImportError::malformed(format!(
                "texture {texture} references missing image {image}"
            )));
        }
        Ok(self.get(image).cloned())
    }

    /// Like [`TextureTable::base_color`], logging and dropping reference errors.
    pub(crate) fn base_color_or_warn(
        &self,
        document: &Document,
        material: Option<usize>,
    ) -> Option<Arc<TextureAsset>> {
        let material = material?;
        match self.base_color(document, material) {
            Ok(texture) => texture,
            Err(error) => {
                warn!(material, %error, "ignoring base-color texture");
                None
            }
        }
    }
}
