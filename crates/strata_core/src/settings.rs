//! Resolution Settings
//!
//! [`ResolveSettings`] is an immutable snapshot handed to every resolution pass.
//! It can be built in code or loaded from JSON:
//!
//! ```rust,ignore
//! use strata_core::settings::{ResolveSettings, RotationMode};
//!
//! let settings = ResolveSettings::from_json(r#"{ "rotation": "apply" }"#)?;
//! assert_eq!(settings.rotation, RotationMode::Apply);
//! ```
//!
//! Every field has a default, so partial documents are accepted.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::Result;

// ---------------------------------------------------------------------------
// RotationMode
// ---------------------------------------------------------------------------

/// How node rotation quaternions take part in local transforms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RotationMode {
    /// Rotation components are ignored; local = `T * S`.
    ///
    /// This matches the renderer the resolved tables were first written for.
    #[default]
    Ignore,
    /// Rotation components are composed; local = `T * R * S`.
    Apply,
}

// ---------------------------------------------------------------------------
// Handedness
// ---------------------------------------------------------------------------

/// Coordinate-system conversion applied to assembled vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    /// Vertices are emitted as stored in the file (glTF is right-handed).
    #[default]
    Preserve,
    /// Negate the x component of position, normal and tangent.
    ///
    /// Converts glTF data for left-handed renderers.
    MirrorX,
}

// ---------------------------------------------------------------------------
// SceneSelection
// ---------------------------------------------------------------------------

/// Which scene of a multi-scene file provides the root nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SceneSelection {
    /// The file's default scene, falling back to the first scene.
    #[default]
    Default,
    /// A specific scene index.
    Index(usize),
}

// ---------------------------------------------------------------------------
// ResolveSettings
// ---------------------------------------------------------------------------

/// Configuration for a resolution pass.
///
/// | Field                         | Description                                   | Default    |
/// |-------------------------------|-----------------------------------------------|------------|
/// | `rotation`                    | Whether node rotations are composed           | `Ignore`   |
/// | `handedness`                  | Vertex coordinate conversion                  | `Preserve` |
/// | `scene`                       | Scene providing the root nodes                | `Default`  |
/// | `include_unreferenced_meshes` | Draw meshes no node references (at identity)  | `true`     |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolveSettings {
    pub rotation: RotationMode,
    pub handedness: Handedness,
    pub scene: SceneSelection,
    /// When `true`, the draw list contains every mesh of the description.
    /// Meshes that no reachable node references are drawn with the identity
    /// transform. When `false`, only referenced meshes are drawn.
    pub include_unreferenced_meshes: bool,
}

impl Default for ResolveSettings {
    fn default() -> Self {
        Self {
            rotation: RotationMode::default(),
            handedness: Handedness::default(),
            scene: SceneSelection::default(),
            include_unreferenced_meshes: true,
        }
    }
}

impl ResolveSettings {
    /// Parses settings from a JSON document. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        log::debug!("Loaded resolve settings: {settings:?}");
        Ok(settings)
    }

    /// Reads and parses a JSON settings file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&text)
    }

    #[must_use]
    pub fn with_rotation(mut self, rotation: RotationMode) -> Self {
        self.rotation = rotation;
        self
    }

    #[must_use]
    pub fn with_handedness(mut self, handedness: Handedness) -> Self {
        self.handedness = handedness;
        self
    }

    #[must_use]
    pub fn with_scene(mut self, scene: SceneSelection) -> Self {
        self.scene = scene;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::Error;

    #[test]
    fn empty_document_yields_defaults() {
        let settings = ResolveSettings::from_json("{}").unwrap();
        assert_eq!(settings, ResolveSettings::default());
        assert_eq!(settings.rotation, RotationMode::Ignore);
        assert!(settings.include_unreferenced_meshes);
    }

    #[test]
    fn partial_document_overrides_fields() {
        let settings = ResolveSettings::from_json(
            r#"{ "rotation": "apply", "handedness": "mirror_x", "scene": { "index": 2 } }"#,
        )
        .unwrap();
        assert_eq!(settings.rotation, RotationMode::Apply);
        assert_eq!(settings.handedness, Handedness::MirrorX);
        assert_eq!(settings.scene, SceneSelection::Index(2));
        assert!(settings.include_unreferenced_meshes);
    }

    #[test]
    fn malformed_document_is_a_settings_error() {
        let err = ResolveSettings::from_json(r#"{ "rotation": "sideways" }"#).unwrap_err();
        assert!(matches!(err, Error::Settings(_)));
    }

    #[test]
    fn builder_helpers() {
        let settings = ResolveSettings::default()
            .with_rotation(RotationMode::Apply)
            .with_scene(SceneSelection::Index(1));
        assert_eq!(settings.rotation, RotationMode::Apply);
        assert_eq!(settings.scene, SceneSelection::Index(1));
        assert_eq!(settings.handedness, Handedness::Preserve);
    }
}
