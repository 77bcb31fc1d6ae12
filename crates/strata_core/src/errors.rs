//! Error Types
//!
//! This module defines the error type shared by every Strata crate.
//!
//! # Overview
//!
//! [`Error`] covers the failure modes of a resolution pass:
//! - Indices that fall outside their table ([`Error::OutOfRange`])
//! - Cross-references the core cannot resolve ([`Error::InvalidReference`])
//! - Meshes without vertices ([`Error::EmptyGeometry`])
//! - Image layouts the core does not recognize ([`Error::UnsupportedFormat`])
//!
//! plus the ambient failures of importing and configuring (I/O, glTF parsing,
//! settings JSON).
//!
//! None of these are recoverable inside a pass. A failure anywhere aborts the
//! whole pass, and the previously published snapshot stays in effect.
//!
//! # Usage
//!
//! ```rust,ignore
//! use strata_core::errors::{Error, Result, Table};
//!
//! fn node(index: usize, len: usize) -> Result<()> {
//!     if index >= len {
//!         return Err(Error::out_of_range(Table::Node, index, len));
//!     }
//!     Ok(())
//! }
//! ```

use std::fmt;

use thiserror::Error;

/// Names the description table an indexed error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Scene,
    Node,
    Mesh,
    Primitive,
    Accessor,
    BufferView,
    Buffer,
    Material,
    Texture,
    Image,
    Sampler,
}

impl Table {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scene => "scene",
            Self::Node => "node",
            Self::Mesh => "mesh",
            Self::Primitive => "primitive",
            Self::Accessor => "accessor",
            Self::BufferView => "buffer view",
            Self::Buffer => "buffer",
            Self::Material => "material",
            Self::Texture => "texture",
            Self::Image => "image",
            Self::Sampler => "sampler",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The error type for every Strata operation.
#[derive(Error, Debug)]
pub enum Error {
    // ========================================================================
    // Resolution Errors
    // ========================================================================
    /// An index points past the end of its table.
    #[error("{table} index {index} is out of range (table has {len} entries)")]
    OutOfRange {
        /// Table being indexed
        table: Table,
        /// The offending index
        index: usize,
        /// Length of the table at the time of the lookup
        len: usize,
    },

    /// A cross-reference cannot be resolved to something the core understands.
    #[error("{table} {index} has an invalid reference: {reason}")]
    InvalidReference {
        /// Table of the item holding the reference
        table: Table,
        /// Index of the item holding the reference
        index: usize,
        /// What could not be resolved
        reason: String,
    },

    /// A mesh has zero vertices.
    #[error("mesh {mesh} has no vertices")]
    EmptyGeometry {
        /// Mesh index
        mesh: usize,
    },

    /// An image's pixel format or layout is not recognized.
    #[error("image {image} has an unsupported format: {detail}")]
    UnsupportedFormat {
        /// Image index
        image: usize,
        /// Description of the rejected layout
        detail: String,
    },

    /// A node is reachable from itself.
    #[error("node {node} is part of a cycle in the scene hierarchy")]
    CyclicHierarchy {
        /// First node found to repeat on a root-to-leaf path
        node: usize,
    },

    // ========================================================================
    // Import & Configuration Errors
    // ========================================================================
    /// Scene-file parsing or decoding failed.
    #[error("import error: {0}")]
    Import(String),

    /// File I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings JSON could not be parsed.
    #[error("settings error: {0}")]
    Settings(#[from] serde_json::Error),
}

impl Error {
    #[inline]
    #[must_use]
    pub fn out_of_range(table: Table, index: usize, len: usize) -> Self {
        Self::OutOfRange { table, index, len }
    }

    #[inline]
    #[must_use]
    pub fn invalid_reference(table: Table, index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidReference {
            table,
            index,
            reason: reason.into(),
        }
    }

    #[inline]
    #[must_use]
    pub fn unsupported_format(image: usize, detail: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            image,
            detail: detail.into(),
        }
    }
}

/// Alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

/// Looks up `index` in `items`, reporting [`Error::OutOfRange`] for `table`.
#[inline]
pub fn lookup<T>(items: &[T], table: Table, index: usize) -> Result<&T> {
    items
        .get(index)
        .ok_or_else(|| Error::out_of_range(table, index, items.len()))
}
