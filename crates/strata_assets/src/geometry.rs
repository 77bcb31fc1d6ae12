use strata_core::errors::{lookup, Error, Result, Table};
use strata_core::Handedness;

use crate::accessor::{read_indices, read_vec2, read_vec3};
use crate::description::{SceneDescription, VertexSemantic};
use crate::index::IndexBuffer;
use crate::vertex::{assemble_vertices, VertexAttributeSet, VertexStreams};

/// Upload-ready geometry of one primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct PrimitiveGeometry {
    pub vertices: VertexAttributeSet,
    /// `None` for non-indexed primitives.
    pub indices: Option<IndexBuffer>,
    pub material: Option<usize>,
}

/// Upload-ready geometry of one mesh, primitives in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGeometry {
    pub mesh: usize,
    pub primitives: Vec<PrimitiveGeometry>,
}

impl MeshGeometry {
    /// Material of the first primitive.
    #[must_use]
    pub fn material(&self) -> Option<usize> {
        self.primitives.first().and_then(|p| p.material)
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.primitives.iter().map(|p| p.vertices.len()).sum()
    }
}

/// Decodes and assembles every primitive of mesh `mesh`.
///
/// A mesh without primitives, or a primitive without positions, is
/// [`Error::EmptyGeometry`]. Primitive materials are checked against the
/// material table.
pub fn build_mesh_geometry(desc: &SceneDescription, mesh: usize, handedness: Handedness) -> Result<MeshGeometry> {
    let mesh_desc = lookup(&desc.meshes, Table::Mesh, mesh)?;
    if mesh_desc.primitives.is_empty() {
        return Err(Error::EmptyGeometry { mesh });
    }

    let mut primitives = Vec::with_capacity(mesh_desc.primitives.len());
    for (p, primitive) in mesh_desc.primitives.iter().enumerate() {
        if let Some(material) = primitive.material.filter(|&m| m >= desc.materials.len()) {
            return Err(Error::invalid_reference(
                Table::Mesh,
                mesh,
                format!(
                    "primitive {p} uses material {material}, but only {} materials exist",
                    desc.materials.len()
                ),
            ));
        }

        let Some(position_accessor) = primitive.attribute(VertexSemantic::Position) else {
            return Err(Error::EmptyGeometry { mesh });
        };
        let positions = read_vec3(desc, position_accessor)?;
        let normals = primitive
            .attribute(VertexSemantic::Normal)
            .map(|a| read_vec3(desc, a))
            .transpose()?;
        let tangents = primitive
            .attribute(VertexSemantic::Tangent)
            .map(|a| read_vec3(desc, a))
            .transpose()?;
        let tex_coords = primitive
            .attribute(VertexSemantic::TexCoord0)
            .map(|a| read_vec2(desc, a))
            .transpose()?;

        let mut vertices = assemble_vertices(
            mesh,
            &VertexStreams {
                positions: &positions,
                normals: normals.as_deref(),
                tangents: tangents.as_deref(),
                tex_coords: tex_coords.as_deref(),
            },
        )?;
        vertices.convert(handedness);

        let indices = primitive.indices.map(|a| read_indices(desc, a)).transpose()?;
        if let Some(max) = indices.as_ref().and_then(IndexBuffer::max_index) {
            if max as usize >= vertices.len() {
                log::warn!(
                    "Mesh {mesh} primitive {p}: index {max} exceeds vertex count {}",
                    vertices.len()
                );
            }
        }

        primitives.push(PrimitiveGeometry {
            vertices,
            indices,
            material: primitive.material,
        });
    }

    let geometry = MeshGeometry { mesh, primitives };
    if geometry.primitives.iter().any(|p| p.material != geometry.material()) {
        log::warn!(
            "Mesh {mesh}: primitives use different materials; material {:?} is the mesh material",
            geometry.material()
        );
    }
    Ok(geometry)
}
