//! Scene description tables and the per-asset resolution steps.
//!
//! - [`SceneDescription`]: index-addressed input tables
//! - [`accessor`]: typed decoding of buffer data
//! - [`vertex`]: interleaving attribute streams into [`Vertex`] arrays
//! - [`geometry`]: per-mesh decode + assembly
//! - [`material`]: material → texture → image/sampler binding
//! - [`image`], [`sampler`]: GPU format and sampler state mapping
//! - `gltf` (feature `gltf`): glTF 2.0 import

pub mod accessor;
pub mod description;
pub mod geometry;
pub mod image;
pub mod index;
pub mod material;
pub mod sampler;
pub mod vertex;

#[cfg(feature = "gltf")]
pub mod gltf;

pub use accessor::{read_indices, read_vec2, read_vec3, AccessorDesc, BufferViewDesc, ComponentType, ElementKind};
pub use description::{MeshDesc, PrimitiveDesc, SceneDescription, SceneRoots, VertexSemantic};
pub use geometry::{build_mesh_geometry, MeshGeometry, PrimitiveGeometry};
pub use self::image::{resolve_image, ImageDesc, PixelComponent, TextureUpload};
pub use index::IndexBuffer;
pub use material::{MaterialBinding, MaterialBindingTable, MaterialChannel, MaterialDesc, TextureBinding, TextureDesc};
pub use sampler::{MagFilter, MinFilter, SamplerDesc, SamplerState, WrapMode};
pub use vertex::{assemble_vertices, Vertex, VertexAttributeSet, VertexStreams};
