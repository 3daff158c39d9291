//! Vista Render - draw data for imported scenes
//!
//! Converts imported meshes into interleaved vertex buffers, index lists and
//! texture uploads laid out for a vulkano pipeline.

pub mod mesh;
pub mod texture;
pub mod vertex;

pub use mesh::{DrawItem, DrawList};
pub use texture::vulkan_format;
pub use vertex::Vertex;
