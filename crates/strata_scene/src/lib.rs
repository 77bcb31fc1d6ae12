//! Scene hierarchy for Strata.
//!
//! - [`SceneNode`]: a node of the scene file's tree (local transform, children, mesh)
//! - [`transform_system`]: depth-first world transform accumulation
//! - [`MeshTransformTable`]: mesh → world transform output of a pass
//! - [`Published`]: atomic publish-by-replace cell for finished passes

pub mod node;
pub mod publish;
pub mod table;
pub mod transform;
pub mod transform_system;

pub use node::SceneNode;
pub use publish::Published;
pub use table::{MeshTransformTable, ResolvedMesh};
pub use transform_system::{accumulate_node_transforms, accumulate_world_transforms, walk_hierarchy};
