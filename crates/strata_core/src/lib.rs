//! Strata core: the error type and resolution settings shared by all crates.

pub mod errors;
pub mod settings;

pub use errors::{Error, Result, Table};
pub use settings::{Handedness, ResolveSettings, RotationMode, SceneSelection};
