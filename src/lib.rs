//! # Strata
//!
//! Resolves glTF scene descriptions into upload-ready tables: per-mesh world
//! transforms, interleaved vertex and index buffers, material texture
//! bindings, texture uploads and sampler state.
//!
//! ```rust,ignore
//! use strata::prelude::*;
//!
//! let desc = strata::gltf::import("scene.gltf")?;
//! let resolver = SceneResolver::new(ResolveSettings::default());
//! let scene = resolver.reload(&desc)?;
//! for item in scene.draw_items() {
//!     println!("mesh {} at {:?}", item.mesh, item.world.w_axis);
//! }
//! ```
//!
//! The workspace is split into:
//!
//! - [`strata_core`]: error type and settings
//! - [`strata_scene`]: node hierarchy, transform accumulation, snapshot publishing
//! - [`strata_assets`]: description tables, decoding, binding and vertex assembly

pub mod resolver;

pub use strata_assets as assets;
pub use strata_scene as scene;

#[cfg(feature = "gltf")]
pub use strata_assets::gltf;

pub use resolver::{resolve_scene, DrawItem, ResolvedScene, SceneResolver};
pub use strata_assets::{
    IndexBuffer, MaterialBinding, MaterialBindingTable, MeshGeometry, SceneDescription, TextureBinding, Vertex,
    VertexAttributeSet,
};
pub use strata_core::{Error, Handedness, ResolveSettings, Result, RotationMode, SceneSelection, Table};
pub use strata_scene::{MeshTransformTable, ResolvedMesh, SceneNode};

pub mod prelude {
    pub use crate::resolver::{resolve_scene, DrawItem, ResolvedScene, SceneResolver};
    pub use strata_assets::{
        MaterialChannel, MaterialDesc, MeshDesc, PrimitiveDesc, SamplerDesc, SceneDescription, SceneRoots, TextureDesc,
        VertexSemantic,
    };
    pub use strata_core::{Error, Handedness, ResolveSettings, Result, RotationMode, SceneSelection, Table};
    pub use strata_scene::SceneNode;
}
