//! Vertex Assembly
//!
//! Merges separate attribute streams into one interleaved vertex array.
//!
//! The position stream defines the vertex count `N`. Every other stream is
//! optional and may be shorter than `N`; vertex `i` takes `attr[i]` when the
//! stream has it and zero otherwise. Positions are never truncated and no
//! stream ever grows the count.

use bytemuck::{Pod, Zeroable};

use strata_core::errors::{Error, Result};
use strata_core::Handedness;

/// Interleaved vertex as uploaded to the GPU (44 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub tex_coord: [f32; 2],
}

impl Vertex {
    pub const ATTRIBUTES: [wgpu::VertexAttribute; 4] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x3,
        2 => Float32x3,
        3 => Float32x2
    ];

    /// Buffer layout matching [`Vertex::ATTRIBUTES`].
    #[must_use]
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/// Borrowed attribute streams of one primitive.
#[derive(Debug, Clone, Copy, Default)]
pub struct VertexStreams<'a> {
    pub positions: &'a [[f32; 3]],
    pub normals: Option<&'a [[f32; 3]]>,
    pub tangents: Option<&'a [[f32; 3]]>,
    pub tex_coords: Option<&'a [[f32; 2]]>,
}

/// Assembled vertices of one primitive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VertexAttributeSet {
    vertices: Vec<Vertex>,
}

impl VertexAttributeSet {
    #[inline]
    #[must_use]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Interleaved bytes, ready for a vertex buffer upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.vertices)
    }

    /// Positions in vertex order.
    pub fn positions(&self) -> impl Iterator<Item = [f32; 3]> + '_ {
        self.vertices.iter().map(|v| v.position)
    }

    /// Negates x of position, normal and tangent, converting between
    /// right- and left-handed coordinate systems.
    pub fn mirror_x(&mut self) {
        for v in &mut self.vertices {
            v.position[0] = -v.position[0];
            v.normal[0] = -v.normal[0];
            v.tangent[0] = -v.tangent[0];
        }
    }

    /// Applies a [`Handedness`] conversion.
    pub fn convert(&mut self, handedness: Handedness) {
        match handedness {
            Handedness::Preserve => {}
            Handedness::MirrorX => self.mirror_x(),
        }
    }
}

#[inline]
fn padded<const N: usize>(stream: Option<&[[f32; N]]>, i: usize) -> [f32; N] {
    stream.and_then(|s| s.get(i)).copied().unwrap_or([0.0; N])
}

/// Interleaves the streams of mesh `mesh` into one vertex array.
///
/// Fails with [`Error::EmptyGeometry`] when there are no positions.
pub fn assemble_vertices(mesh: usize, streams: &VertexStreams<'_>) -> Result<VertexAttributeSet> {
    let count = streams.positions.len();
    if count == 0 {
        return Err(Error::EmptyGeometry { mesh });
    }

    for (name, len) in [
        ("normal", streams.normals.map(<[_]>::len)),
        ("tangent", streams.tangents.map(<[_]>::len)),
        ("texcoord", streams.tex_coords.map(<[_]>::len)),
    ] {
        if let Some(len) = len.filter(|&len| len != count) {
            log::debug!("Mesh {mesh}: {name} stream has {len} entries for {count} positions");
        }
    }

    let vertices = streams
        .positions
        .iter()
        .enumerate()
        .map(|(i, &position)| Vertex {
            position,
            normal: padded(streams.normals, i),
            tangent: padded(streams.tangents, i),
            tex_coord: padded(streams.tex_coords, i),
        })
        .collect();

    Ok(VertexAttributeSet { vertices })
}
