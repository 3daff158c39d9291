//! Texture formats as vulkano sees them

use vista_assets::TextureFormat;
use vulkano::format::Format;

/// Image format used to upload a texture of the given layout.
pub fn vulkan_format(format: TextureFormat) -> Format {
    match format {
        TextureFormat::R8 => Format::R8_UNORM,
        TextureFormat::Rg8 => Format::R8G8_UNORM,
        TextureFormat::Rgb8 => Format::R8G8B8_UNORM,
        TextureFormat::Rgba8 => Format::R8G8B8A8_UNORM,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_every_layout_to_unorm() {
        assert_eq!(vulkan_format(TextureFormat::R8), Format::R8_UNORM);
        assert_eq!(vulkan_format(TextureFormat::Rg8), Format::R8G8_UNORM);
        assert_eq!(vulkan_format(TextureFormat::Rgb8), Format::R8G8B8_UNORM);
        assert_eq!(vulkan_format(TextureFormat::Rgba8), Format::R8G8B8A8_UNORM);
    }
}
