//! Accessor resolution: turning an accessor index into a bounds-checked,
//! strided view over buffer bytes.

use crate::document::{ComponentType, Document, ElementType};
use crate::error::ImportError;

/// A validated view of one accessor's elements.
///
/// Construction checks that the last element ends inside both the buffer view
/// and the buffer, so every element read afterwards is in bounds.
#[derive(Debug, Clone, Copy)]
pub struct AccessorView<'a> {
    data: &'a [u8],
    stride: usize,
    count: usize,
    element_size: usize,
    component_type: ComponentType,
    element_type: ElementType,
    normalized: bool,
}

/// Resolve `index` in `document` into an [`AccessorView`].
pub fn resolve(document: &Document, index: usize) -> Result<AccessorView<'_>, ImportError> {
    let accessor = document
        .accessors
        .get(index)
        .ok_or_else(|| ImportError::malformed(format!("accessor {index} does not exist")))?;

    let component_type = ComponentType::from_code(accessor.component_type).ok_or_else(|| {
        ImportError::malformed(format!(
            "accessor {index} has unknown component type {}",
            accessor.component_type
        ))
    })?;
    let element_size = accessor.element_type.components() * component_type.size();

    let view_index = accessor.buffer_view.ok_or_else(|| {
        ImportError::malformed(format!(
            "accessor {index} has no buffer view (sparse accessors are unsupported)"
        ))
    })?;
    let view = document.buffer_views.get(view_index).ok_or_else(|| {
        ImportError::malformed(format!(
            "accessor {index} references missing buffer view {view_index}"
        ))
    })?;
    let buffer = document.buffers.get(view.buffer).ok_or_else(|| {
        ImportError::malformed(format!(
            "buffer view {view_index} references missing buffer {}",
            view.buffer
        ))
    })?;

    let stride = if view.byte_stride != 0 {
        view.byte_stride
    } else {
        element_size
    };
    if stride == 0 && accessor.count > 0 {
        return Err(ImportError::malformed(format!(
            "accessor {index} has zero stride"
        )));
    }

    let view_end = view
        .byte_offset
        .checked_add(view.byte_length)
        .filter(|&end| end <= buffer.len())
        .ok_or_else(|| {
            ImportError::malformed(format!(
                "buffer view {view_index} exceeds buffer {} ({} bytes)",
                view.buffer,
                buffer.len()
            ))
        })?;
    let view_bytes = &buffer[view.byte_offset..view_end];

    if accessor.count == 0 {
        return Ok(AccessorView {
            data: &[],
            stride,
            count: 0,
            element_size,
            component_type,
            element_type: accessor.element_type,
            normalized: accessor.normalized,
        });
    }

    let span = (accessor.count - 1)
        .checked_mul(stride)
        .and_then(|n| n.checked_add(element_size))
        .and_then(|n| n.checked_add(accessor.byte_offset))
        .filter(|&end| end <= view_bytes.len())
        .ok_or_else(|| {
            ImportError::malformed(format!(
                "accessor {index} ({} x {element_size} bytes, stride {stride}) overruns buffer view {view_index}",
                accessor.count
            ))
        })?;

    Ok(AccessorView {
        data: &view_bytes[accessor.byte_offset..span],
        stride,
        count: accessor.count,
        element_size,
        component_type,
        element_type: accessor.element_type,
        normalized: accessor.normalized,
    })
}

impl<'a> AccessorView<'a> {
    /// Number of elements.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Byte distance between consecutive elements.
    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn component_type(&self) -> ComponentType {
        self.component_type
    }

    pub fn element_type(&self) -> ElementType {
        self.element_type
    }

    pub fn normalized(&self) -> bool {
        self.normalized
    }

    /// Whether elements have the given shape and component type.
    pub fn is(&self, element_type: ElementType, component_type: ComponentType) -> bool {
        self.element_type == element_type && self.component_type == component_type
    }

    /// Raw bytes of element `index`.
    pub fn element(&self, index: usize) -> Option<&'a [u8]> {
        if index >= self.count {
            return None;
        }
        let start = index * self.stride;
        self.data.get(start..start + self.element_size)
    }

    /// Raw bytes of component `component` of element `index`.
    fn component(&self, index: usize, component: usize) -> Option<&'a [u8]> {
        if component >= self.element_type.components() {
            return None;
        }
        let size = self.component_type.size();
        self.element(index)?
            .get(component * size..(component + 1) * size)
    }

    /// Read a component as a float, converting integer components to float
    /// (normalized to `[0, 1]` / `[-1, 1]` when the accessor is normalized).
    pub fn read_f32(&self, index: usize, component: usize) -> Option<f32> {
        let bytes = self.component(index, component)?;
        let value = match self.component_type {
            ComponentType::F32 => decode_f32(bytes),
            ComponentType::F64 => decode_f64(bytes) as f32,
            ComponentType::U8 if self.normalized => decode_u8(bytes) as f32 / u8::MAX as f32,
            ComponentType::U16 if self.normalized => decode_u16(bytes) as f32 / u16::MAX as f32,
            ComponentType::I8 if self.normalized => {
                (decode_i8(bytes) as f32 / i8::MAX as f32).max(-1.0)
            }
            ComponentType::I16 if self.normalized => {
                (decode_i16(bytes) as f32 / i16::MAX as f32).max(-1.0)
            }
            ComponentType::U8 => decode_u8(bytes) as f32,
            ComponentType::U16 => decode_u16(bytes) as f32,
            ComponentType::I8 => decode_i8(bytes) as f32,
            ComponentType::I16 => decode_i16(bytes) as f32,
            ComponentType::U32 => decode_u32(bytes) as f32,
            ComponentType::I32 => decode_i32(bytes) as f32,
        };
        Some(value)
    }

    /// Read a scalar unsigned index, widening to 32 bits.
    ///
    /// Only unsigned byte, short and int components are valid index types.
    pub fn read_index(&self, index: usize) -> Option<u32> {
        let bytes = self.component(index, 0)?;
        match self.component_type {
            ComponentType::U8 => Some(decode_u8(bytes) as u32),
            ComponentType::U16 => Some(decode_u16(bytes) as u32),
            ComponentType::U32 => Some(decode_u32(bytes)),
            _ => None,
        }
    }

    /// Read element `index` as `N` floats.
    pub fn read_f32_array<const N: usize>(&self, index: usize) -> Option<[f32; N]> {
        let mut out = [0.0; N];
        for (component, slot) in out.iter_mut().enumerate() {
            *slot = self.read_f32(index, component)?;
        }
        Some(out)
    }
}

fn decode_u8(bytes: &[u8]) -> u8 {
    bytes[0]
}

fn decode_i8(bytes: &[u8]) -> i8 {
    i8::from_le_bytes([bytes[0]])
}

fn decode_u16(bytes: &[u8]) -> u16 {
    u16::from_le_bytes([bytes[0], bytes[1]])
}

fn decode_i16(bytes: &[u8]) -> i16 {
    i16::from_le_bytes([bytes[0], bytes[1]])
}

fn decode_u32(bytes: &[u8]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn decode_i32(bytes: &[u8]) -> i32 {
    i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn decode_f32(bytes: &[u8]) -> f32 {
    f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn decode_f64(bytes: &[u8]) -> f64 {
    f64::from_le_bytes([
        bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
    ])
}
