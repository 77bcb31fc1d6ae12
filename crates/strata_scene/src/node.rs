use glam::{Mat4, Quat, Vec3};
use smallvec::SmallVec;

use strata_core::RotationMode;

use crate::transform::compose_trs;

/// One element of a scene's node tree, as described by the scene file.
///
/// # Transform
///
/// A node's local transform is either a full matrix or separate
/// translation / rotation / scale components. When `matrix` is present it
/// takes precedence and the TRS fields are ignored entirely. Missing TRS
/// components are identity.
///
/// # Hierarchy
///
/// Parents are implicit: a node lists its children by index into the node
/// table. Nodes are read-only during resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneNode {
    pub name: Option<String>,

    // === Local Transform ===
    pub matrix: Option<Mat4>,
    pub translation: Option<Vec3>,
    pub rotation: Option<Quat>,
    pub scale: Option<Vec3>,

    // === Hierarchy & Components ===
    pub children: SmallVec<[usize; 4]>,
    pub mesh: Option<usize>,
}

impl SceneNode {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn with_matrix(mut self, matrix: Mat4) -> Self {
        self.matrix = Some(matrix);
        self
    }

    #[must_use]
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = Some(translation);
        self
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = Some(rotation);
        self
    }

    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = Some(scale);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = usize>) -> Self {
        self.children.extend(children);
        self
    }

    #[must_use]
    pub fn with_mesh(mut self, mesh: usize) -> Self {
        self.mesh = Some(mesh);
        self
    }

    /// Returns the child indices in listed order.
    #[inline]
    #[must_use]
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Computes the local matrix of this node.
    ///
    /// An explicit matrix is returned verbatim. Otherwise the present TRS
    /// components are combined as `T * R * S`, with `R` only taking part when
    /// `rotation` is [`RotationMode::Apply`].
    #[must_use]
    pub fn local_matrix(&self, rotation: RotationMode) -> Mat4 {
        if let Some(matrix) = self.matrix {
            return matrix;
        }
        compose_trs(self.translation, self.rotation, self.scale, rotation)
    }
}
