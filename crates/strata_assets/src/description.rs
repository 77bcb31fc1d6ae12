//! Scene Description
//!
//! [`SceneDescription`] is the immutable, index-addressed input of a
//! resolution pass: the tables of a glTF document after parsing and buffer
//! loading. Every cross-reference between tables is a plain index and is
//! validated lazily by the pass that follows it.
//!
//! Descriptions usually come from [`crate::gltf::import`], but can also be
//! assembled in code with the `push_*` helpers:
//!
//! ```rust,ignore
//! let mut desc = SceneDescription::default();
//! let positions = desc.push_vec3_accessor(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
//! let mesh = desc.push_mesh(MeshDesc::new().with_primitive(PrimitiveDesc::new(positions)));
//! let node = desc.push_node(SceneNode::new().with_mesh(mesh));
//! desc.push_scene(SceneRoots::new([node]));
//! ```

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use strata_core::errors::{lookup, Result, Table};
use strata_core::SceneSelection;
use strata_scene::SceneNode;

use crate::accessor::{AccessorDesc, BufferViewDesc, ComponentType, ElementKind};
use crate::image::ImageDesc;
use crate::index::IndexBuffer;
use crate::material::{MaterialDesc, TextureDesc};
use crate::sampler::SamplerDesc;

/// Root node list of one scene.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SceneRoots {
    pub name: Option<String>,
    pub nodes: SmallVec<[usize; 4]>,
}

impl SceneRoots {
    #[must_use]
    pub fn new(nodes: impl IntoIterator<Item = usize>) -> Self {
        Self {
            name: None,
            nodes: nodes.into_iter().collect(),
        }
    }
}

/// Vertex attributes the assembler consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VertexSemantic {
    Position,
    Normal,
    Tangent,
    TexCoord0,
}

/// One draw-call's worth of geometry inside a mesh.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrimitiveDesc {
    /// Semantic → accessor index.
    pub attributes: FxHashMap<VertexSemantic, usize>,
    /// Index accessor; `None` draws vertices in order.
    pub indices: Option<usize>,
    pub material: Option<usize>,
}

impl PrimitiveDesc {
    /// A primitive with only a position accessor.
    #[must_use]
    pub fn new(positions: usize) -> Self {
        let mut attributes = FxHashMap::default();
        attributes.insert(VertexSemantic::Position, positions);
        Self {
            attributes,
            indices: None,
            material: None,
        }
    }

    #[must_use]
    pub fn with_attribute(mut self, semantic: VertexSemantic, accessor: usize) -> Self {
        self.attributes.insert(semantic, accessor);
        self
    }

    #[must_use]
    pub fn with_indices(mut self, accessor: usize) -> Self {
        self.indices = Some(accessor);
        self
    }

    #[must_use]
    pub fn with_material(mut self, material: usize) -> Self {
        self.material = Some(material);
        self
    }

    #[inline]
    #[must_use]
    pub fn attribute(&self, semantic: VertexSemantic) -> Option<usize> {
        self.attributes.get(&semantic).copied()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeshDesc {
    pub name: Option<String>,
    pub primitives: Vec<PrimitiveDesc>,
}

impl MeshDesc {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_primitive(mut self, primitive: PrimitiveDesc) -> Self {
        self.primitives.push(primitive);
        self
    }

    /// Material of the first primitive; this is the mesh's material for draw purposes.
    #[must_use]
    pub fn material(&self) -> Option<usize> {
        self.primitives.first().and_then(|p| p.material)
    }
}

/// Every table a resolution pass reads.
#[derive(Debug, Clone, Default)]
pub struct SceneDescription {
    pub scenes: Vec<SceneRoots>,
    pub default_scene: Option<usize>,
    pub nodes: Vec<SceneNode>,
    pub meshes: Vec<MeshDesc>,
    pub accessors: Vec<AccessorDesc>,
    pub buffer_views: Vec<BufferViewDesc>,
    pub buffers: Vec<Vec<u8>>,
    pub materials: Vec<MaterialDesc>,
    pub textures: Vec<TextureDesc>,
    pub images: Vec<ImageDesc>,
    pub samplers: Vec<SamplerDesc>,
}

impl SceneDescription {
    /// Root nodes of the selected scene.
    ///
    /// [`SceneSelection::Default`] takes the default scene, then the first
    /// scene, and yields no roots for a description without scenes.
    pub fn roots(&self, selection: SceneSelection) -> Result<&[usize]> {
        let index = match selection {
            SceneSelection::Index(i) => i,
            SceneSelection::Default => match self.default_scene {
                Some(i) => i,
                None if self.scenes.is_empty() => return Ok(&[][..]),
                None => 0,
            },
        };
        Ok(lookup(&self.scenes, Table::Scene, index)?.nodes.as_slice())
    }

    // ========================================================================
    // Builders
    // ========================================================================

    pub fn push_node(&mut self, node: SceneNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    pub fn push_mesh(&mut self, mesh: MeshDesc) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn push_scene(&mut self, scene: SceneRoots) -> usize {
        self.scenes.push(scene);
        self.scenes.len() - 1
    }

    pub fn push_material(&mut self, material: MaterialDesc) -> usize {
        self.materials.push(material);
        self.materials.len() - 1
    }

    pub fn push_texture(&mut self, texture: TextureDesc) -> usize {
        self.textures.push(texture);
        self.textures.len() - 1
    }

    pub fn push_image(&mut self, image: ImageDesc) -> usize {
        self.images.push(image);
        self.images.len() - 1
    }

    pub fn push_sampler(&mut self, sampler: SamplerDesc) -> usize {
        self.samplers.push(sampler);
        self.samplers.len() - 1
    }

    /// Stores `bytes` in a new buffer with a single view and a tightly packed
    /// accessor over it. Returns the accessor index.
    pub fn push_accessor_bytes(
        &mut self,
        bytes: Vec<u8>,
        count: usize,
        component_type: ComponentType,
        element: ElementKind,
    ) -> usize {
        let buffer = self.buffers.len();
        let byte_length = bytes.len();
        self.buffers.push(bytes);

        self.buffer_views.push(BufferViewDesc {
            buffer,
            byte_offset: 0,
            byte_length,
            byte_stride: None,
        });
        self.accessors.push(AccessorDesc::new(
            Some(self.buffer_views.len() - 1),
            count,
            component_type,
            element,
        ));
        self.accessors.len() - 1
    }

    pub fn push_vec3_accessor(&mut self, values: &[[f32; 3]]) -> usize {
        let bytes: Vec<u8> = bytemuck::cast_slice(values).to_vec();
        self.push_accessor_bytes(bytes, values.len(), ComponentType::F32, ElementKind::Vec3)
    }

    pub fn push_vec2_accessor(&mut self, values: &[[f32; 2]]) -> usize {
        let bytes: Vec<u8> = bytemuck::cast_slice(values).to_vec();
        self.push_accessor_bytes(bytes, values.len(), ComponentType::F32, ElementKind::Vec2)
    }

    pub fn push_index_accessor(&mut self, indices: &IndexBuffer) -> usize {
        let component_type = match indices {
            IndexBuffer::U16(_) => ComponentType::U16,
            IndexBuffer::U32(_) => ComponentType::U32,
            IndexBuffer::I16(_) => ComponentType::I16,
        };
        self.push_accessor_bytes(
            indices.as_bytes().to_vec(),
            indices.len(),
            component_type,
            ElementKind::Scalar,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::Error;

    #[test]
    fn default_scene_falls_back_to_first() {
        let mut desc = SceneDescription::default();
        assert!(desc.roots(SceneSelection::Default).unwrap().is_empty());

        desc.push_scene(SceneRoots::new([0, 1]));
        desc.push_scene(SceneRoots::new([2]));
        assert_eq!(desc.roots(SceneSelection::Default).unwrap(), &[0, 1]);

        desc.default_scene = Some(1);
        assert_eq!(desc.roots(SceneSelection::Default).unwrap(), &[2]);
        assert_eq!(desc.roots(SceneSelection::Index(0)).unwrap(), &[0, 1]);
    }

    #[test]
    fn missing_scene_is_out_of_range() {
        let mut desc = SceneDescription::default();
        desc.push_scene(SceneRoots::new([0]));
        assert!(matches!(
            desc.roots(SceneSelection::Index(3)),
            Err(Error::OutOfRange { table: Table::Scene, index: 3, len: 1 })
        ));
    }

    #[test]
    fn mesh_material_is_first_primitive() {
        let mesh = MeshDesc::new()
            .with_primitive(PrimitiveDesc::new(0).with_material(4))
            .with_primitive(PrimitiveDesc::new(1).with_material(2));
        assert_eq!(mesh.material(), Some(4));
        assert_eq!(MeshDesc::new().material(), None);
    }
}
