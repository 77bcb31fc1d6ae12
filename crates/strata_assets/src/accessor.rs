//! Accessor Decoding
//!
//! Accessors describe typed, possibly interleaved, views into raw buffers.
//! This module turns them into plain arrays:
//!
//! - [`read_vec3`]: `VEC3` (or `VEC4` truncated to xyz, as glTF stores tangents)
//! - [`read_vec2`]: `VEC2`
//! - [`read_indices`]: `SCALAR` u16 / u32 / i16 into an [`IndexBuffer`]
//!
//! Vector decoders accept float components and 8/16-bit integer components
//! (quantized attributes). Integer components are mapped to `[0, 1]` or
//! `[-1, 1]` when the accessor is normalized, and converted as-is otherwise.
//!
//! Sparse accessors are decoded in full: base data first (zeros without a
//! buffer view), then every substituted element.
//!
//! Index errors (accessor, buffer view, buffer) are [`Error::OutOfRange`].
//! Shapes the decoders do not handle, byte ranges that overrun their storage
//! and sparse indices past the accessor count are [`Error::InvalidReference`].

use strata_core::errors::{lookup, Error, Result, Table};

use crate::description::SceneDescription;
use crate::index::IndexBuffer;

/// Scalar type of each accessor component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    I8,
    U8,
    I16,
    U16,
    U32,
    F32,
}

impl ComponentType {
    #[must_use]
    pub const fn size(self) -> usize {
        match self {
            Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::U32 | Self::F32 => 4,
        }
    }
}

/// Shape of one accessor element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Scalar,
    Vec2,
    Vec3,
    Vec4,
    Mat2,
    Mat3,
    Mat4,
}

impl ElementKind {
    #[must_use]
    pub const fn components(self) -> usize {
        match self {
            Self::Scalar => 1,
            Self::Vec2 => 2,
            Self::Vec3 => 3,
            Self::Vec4 | Self::Mat2 => 4,
            Self::Mat3 => 9,
            Self::Mat4 => 16,
        }
    }
}

/// A typed view into a buffer view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessorDesc {
    /// `None` means every element is zero.
    pub buffer_view: Option<usize>,
    /// Offset relative to the start of the buffer view.
    pub byte_offset: usize,
    pub count: usize,
    pub component_type: ComponentType,
    pub element: ElementKind,
    /// Integer components map to `[0, 1]` (unsigned) or `[-1, 1]` (signed).
    pub normalized: bool,
    pub sparse: Option<SparseDesc>,
}

impl AccessorDesc {
    /// A tightly packed, non-normalized, dense accessor.
    #[must_use]
    pub const fn new(
        buffer_view: Option<usize>,
        count: usize,
        component_type: ComponentType,
        element: ElementKind,
    ) -> Self {
        Self {
            buffer_view,
            byte_offset: 0,
            count,
            component_type,
            element,
            normalized: false,
            sparse: None,
        }
    }

    /// Tightly packed size of one element in bytes.
    #[must_use]
    pub const fn element_size(&self) -> usize {
        self.component_type.size() * self.element.components()
    }
}

/// Elements replaced on top of an accessor's base data.
///
/// Indices and values are tightly packed in their own buffer views.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SparseDesc {
    /// Number of substituted elements.
    pub count: usize,
    pub indices_view: usize,
    pub indices_offset: usize,
    /// `U8`, `U16` or `U32`.
    pub index_type: ComponentType,
    pub values_view: usize,
    pub values_offset: usize,
}

/// A byte range of one buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferViewDesc {
    pub buffer: usize,
    pub byte_offset: usize,
    pub byte_length: usize,
    /// Distance between consecutive elements; `None` means tightly packed.
    pub byte_stride: Option<usize>,
}

/// Validated byte layout of a run of elements.
struct ElementReader<'a> {
    /// `None` for accessors without a buffer view.
    bytes: Option<&'a [u8]>,
    stride: usize,
    count: usize,
}

impl<'a> ElementReader<'a> {
    /// Bytes of element `i`, starting at its first component.
    fn element(&self, i: usize) -> Option<&'a [u8]> {
        self.bytes.map(|bytes| &bytes[i * self.stride..])
    }
}

/// Bytes of buffer view `view_index`, checked against its buffer.
fn view_bytes(desc: &SceneDescription, view_index: usize) -> Result<(&BufferViewDesc, &[u8])> {
    let view = lookup(&desc.buffer_views, Table::BufferView, view_index)?;
    let buffer = lookup(&desc.buffers, Table::Buffer, view.buffer)?;

    let view_end = view.byte_offset.checked_add(view.byte_length);
    match view_end.and_then(|end| buffer.get(view.byte_offset..end)) {
        Some(bytes) => Ok((view, bytes)),
        None => Err(Error::invalid_reference(
            Table::BufferView,
            view_index,
            format!(
                "bytes {}..+{} overrun buffer {} of {} bytes",
                view.byte_offset,
                view.byte_length,
                view.buffer,
                buffer.len()
            ),
        )),
    }
}

/// Checks that `count` elements of `element_size` bytes, `stride` apart and
/// starting at `offset`, fit in `view`.
fn elements_in_view<'a>(
    index: usize,
    view: &'a [u8],
    offset: usize,
    count: usize,
    stride: usize,
    element_size: usize,
) -> Result<ElementReader<'a>> {
    // Last element ends at offset + (count - 1) * stride + element_size.
    let required = match count {
        0 => Some(offset),
        n => (n - 1)
            .checked_mul(stride)
            .and_then(|span| span.checked_add(offset))
            .and_then(|span| span.checked_add(element_size)),
    };
    match required {
        Some(end) if end <= view.len() => Ok(ElementReader {
            bytes: Some(&view[offset..end]),
            stride,
            count,
        }),
        _ => Err(Error::invalid_reference(
            Table::Accessor,
            index,
            format!(
                "{count} elements at offset {offset} overrun a buffer view of {} bytes",
                view.len()
            ),
        )),
    }
}

fn element_reader<'a>(desc: &'a SceneDescription, index: usize, accessor: &AccessorDesc) -> Result<ElementReader<'a>> {
    let element_size = accessor.element_size();

    let Some(view_index) = accessor.buffer_view else {
        return Ok(ElementReader {
            bytes: None,
            stride: element_size,
            count: accessor.count,
        });
    };

    let (view, bytes) = view_bytes(desc, view_index)?;
    let stride = view.byte_stride.unwrap_or(element_size);
    if stride < element_size {
        return Err(Error::invalid_reference(
            Table::Accessor,
            index,
            format!("byte stride {stride} is smaller than the element size {element_size}"),
        ));
    }
    elements_in_view(index, bytes, accessor.byte_offset, accessor.count, stride, element_size)
}

/// Decodes every element of accessor `index` with `decode`, applying sparse
/// substitution when present.
fn decode_elements<T: Copy>(
    desc: &SceneDescription,
    index: usize,
    accessor: &AccessorDesc,
    zero: T,
    decode: impl Fn(&[u8]) -> T,
) -> Result<Vec<T>> {
    let reader = element_reader(desc, index, accessor)?;
    let mut out: Vec<T> = (0..reader.count)
        .map(|i| reader.element(i).map_or(zero, &decode))
        .collect();

    let Some(sparse) = accessor.sparse else {
        return Ok(out);
    };

    let index_size = match sparse.index_type {
        ComponentType::U8 | ComponentType::U16 | ComponentType::U32 => sparse.index_type.size(),
        other => {
            return Err(Error::invalid_reference(
                Table::Accessor,
                index,
                format!("sparse indices must be u8, u16 or u32, found {other:?}"),
            ));
        }
    };
    let (_, index_view) = view_bytes(desc, sparse.indices_view)?;
    let indices = elements_in_view(index, index_view, sparse.indices_offset, sparse.count, index_size, index_size)?;
    let (_, value_view) = view_bytes(desc, sparse.values_view)?;
    let element_size = accessor.element_size();
    let values = elements_in_view(index, value_view, sparse.values_offset, sparse.count, element_size, element_size)?;

    for k in 0..sparse.count {
        let (Some(index_bytes), Some(value_bytes)) = (indices.element(k), values.element(k)) else {
            continue;
        };
        let target = match sparse.index_type {
            ComponentType::U8 => usize::from(index_bytes[0]),
            ComponentType::U16 => usize::from(bytemuck::pod_read_unaligned::<u16>(&index_bytes[..2])),
            _ => usize::try_from(bytemuck::pod_read_unaligned::<u32>(&index_bytes[..4])).unwrap_or(usize::MAX),
        };
        let Some(slot) = out.get_mut(target) else {
            return Err(Error::invalid_reference(
                Table::Accessor,
                index,
                format!("sparse index {target} is past the accessor count {}", accessor.count),
            ));
        };
        *slot = decode(value_bytes);
    }
    Ok(out)
}

fn unsupported(index: usize, accessor: &AccessorDesc, expected: &str) -> Error {
    Error::invalid_reference(
        Table::Accessor,
        index,
        format!(
            "expected {expected}, found {:?} {:?}",
            accessor.component_type, accessor.element
        ),
    )
}

/// Whether the component type can feed a float attribute.
const fn is_vector_component(ty: ComponentType) -> bool {
    !matches!(ty, ComponentType::U32)
}

/// Reads one component at the start of `bytes` as `f32`.
#[inline]
#[allow(clippy::cast_precision_loss)]
fn read_component(ty: ComponentType, normalized: bool, bytes: &[u8]) -> f32 {
    match ty {
        ComponentType::F32 => bytemuck::pod_read_unaligned::<f32>(&bytes[..4]),
        ComponentType::U8 => {
            let v = f32::from(bytes[0]);
            if normalized { v / 255.0 } else { v }
        }
        ComponentType::I8 => {
            let v = f32::from(bytemuck::pod_read_unaligned::<i8>(&bytes[..1]));
            if normalized { (v / 127.0).max(-1.0) } else { v }
        }
        ComponentType::U16 => {
            let v = f32::from(bytemuck::pod_read_unaligned::<u16>(&bytes[..2]));
            if normalized { v / 65535.0 } else { v }
        }
        ComponentType::I16 => {
            let v = f32::from(bytemuck::pod_read_unaligned::<i16>(&bytes[..2]));
            if normalized { (v / 32767.0).max(-1.0) } else { v }
        }
        ComponentType::U32 => bytemuck::pod_read_unaligned::<u32>(&bytes[..4]) as f32,
    }
}

/// Reads the first `N` components of one element.
#[inline]
fn read_vector<const N: usize>(accessor: &AccessorDesc, bytes: &[u8]) -> [f32; N] {
    if accessor.component_type == ComponentType::F32 {
        return bytemuck::pod_read_unaligned(&bytes[..N * 4]);
    }
    let size = accessor.component_type.size();
    std::array::from_fn(|c| read_component(accessor.component_type, accessor.normalized, &bytes[c * size..]))
}

/// Decodes a `VEC3` accessor. `VEC4` is accepted and truncated to xyz.
pub fn read_vec3(desc: &SceneDescription, index: usize) -> Result<Vec<[f32; 3]>> {
    let accessor = lookup(&desc.accessors, Table::Accessor, index)?;
    let shape_ok = is_vector_component(accessor.component_type)
        && matches!(accessor.element, ElementKind::Vec3 | ElementKind::Vec4);
    if !shape_ok {
        return Err(unsupported(index, accessor, "float or 8/16-bit VEC3 or VEC4"));
    }
    decode_elements(desc, index, accessor, [0.0; 3], |b| read_vector::<3>(accessor, b))
}

/// Decodes a `VEC2` accessor.
pub fn read_vec2(desc: &SceneDescription, index: usize) -> Result<Vec<[f32; 2]>> {
    let accessor = lookup(&desc.accessors, Table::Accessor, index)?;
    if !is_vector_component(accessor.component_type) || accessor.element != ElementKind::Vec2 {
        return Err(unsupported(index, accessor, "float or 8/16-bit VEC2"));
    }
    decode_elements(desc, index, accessor, [0.0; 2], |b| read_vector::<2>(accessor, b))
}

/// Decodes a `SCALAR` index accessor, keeping its component width.
pub fn read_indices(desc: &SceneDescription, index: usize) -> Result<IndexBuffer> {
    let accessor = lookup(&desc.accessors, Table::Accessor, index)?;
    if accessor.element != ElementKind::Scalar {
        return Err(unsupported(index, accessor, "SCALAR indices"));
    }

    let buffer = match accessor.component_type {
        ComponentType::U16 => IndexBuffer::U16(decode_elements(desc, index, accessor, 0, |b| {
            bytemuck::pod_read_unaligned::<u16>(&b[..2])
        })?),
        ComponentType::I16 => IndexBuffer::I16(decode_elements(desc, index, accessor, 0, |b| {
            bytemuck::pod_read_unaligned::<i16>(&b[..2])
        })?),
        ComponentType::U32 => IndexBuffer::U32(decode_elements(desc, index, accessor, 0, |b| {
            bytemuck::pod_read_unaligned::<u32>(&b[..4])
        })?),
        _ => return Err(unsupported(index, accessor, "u16, u32 or i16 indices")),
    };
    Ok(buffer)
}
