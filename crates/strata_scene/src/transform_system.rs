//! Transform System
//!
//! Resolves the node hierarchy into world matrices. The system only borrows
//! the node table and a root list; it never mutates nodes, and every pass
//! builds its output from scratch.
//!
//! # Traversal
//!
//! Depth-first preorder, children in the order each node lists them. The walk
//! uses an explicit stack so deep hierarchies cannot overflow the call stack.
//! Every stack frame carries the parent's world matrix, so
//! `world(node) = world(parent) * local(node)` with roots starting from
//! identity.
//!
//! # Failure
//!
//! A root or child index outside the node table fails with
//! [`Error::OutOfRange`]; a node reachable from itself fails with
//! [`Error::CyclicHierarchy`]. In both cases nothing is returned, so callers
//! keep whatever they published before.

use glam::Mat4;

use strata_core::errors::{lookup, Error, Result, Table};
use strata_core::RotationMode;

use crate::node::SceneNode;
use crate::table::MeshTransformTable;
use crate::transform::compose_world;

enum Visit {
    Enter { node: usize, parent_world: Mat4 },
    Exit { node: usize },
}

/// Walks every node reachable from `roots`, calling `visit(index, node, world)`
/// in preorder.
pub fn walk_hierarchy<F>(
    nodes: &[SceneNode],
    roots: &[usize],
    rotation: RotationMode,
    mut visit: F,
) -> Result<()>
where
    F: FnMut(usize, &SceneNode, &Mat4),
{
    // Nodes on the current root-to-node path.
    let mut on_path = vec![false; nodes.len()];
    let mut stack: Vec<Visit> = Vec::with_capacity(64);

    for &root in roots.iter().rev() {
        stack.push(Visit::Enter {
            node: root,
            parent_world: Mat4::IDENTITY,
        });
    }

    while let Some(frame) = stack.pop() {
        let (index, parent_world) = match frame {
            Visit::Enter { node, parent_world } => (node, parent_world),
            Visit::Exit { node } => {
                on_path[node] = false;
                continue;
            }
        };

        let node = lookup(nodes, Table::Node, index)?;
        if on_path[index] {
            return Err(Error::CyclicHierarchy { node: index });
        }
        on_path[index] = true;

        let world = compose_world(&parent_world, &node.local_matrix(rotation));
        log::trace!("node {index} world translation {:?}", world.w_axis.truncate());
        visit(index, node, &world);

        stack.push(Visit::Exit { node: index });
        for &child in node.children().iter().rev() {
            stack.push(Visit::Enter {
                node: child,
                parent_world: world,
            });
        }
    }

    Ok(())
}

/// Resolves the world transform of every mesh-referencing node reachable from
/// `roots`.
///
/// A mesh referenced by more than one visited node keeps the transform of the
/// last visit and is reported once after the walk.
pub fn accumulate_world_transforms(
    nodes: &[SceneNode],
    roots: &[usize],
    rotation: RotationMode,
) -> Result<MeshTransformTable> {
    let mut table = MeshTransformTable::new();

    walk_hierarchy(nodes, roots, rotation, |index, node, world| {
        if let Some(mesh) = node.mesh {
            table.record(mesh, index, *world);
        }
    })?;

    for entry in table.shared() {
        log::warn!(
            "Mesh {} is reached by {} node visits; node {} wins",
            entry.mesh,
            entry.visits,
            entry.node
        );
    }

    log::debug!(
        "Accumulated transforms for {} meshes from {} roots",
        table.len(),
        roots.len()
    );
    Ok(table)
}

/// Resolves the world transform of every node reachable from `roots`.
///
/// Unreachable nodes are `None`.
pub fn accumulate_node_transforms(
    nodes: &[SceneNode],
    roots: &[usize],
    rotation: RotationMode,
) -> Result<Vec<Option<Mat4>>> {
    let mut worlds = vec![None; nodes.len()];
    walk_hierarchy(nodes, roots, rotation, |index, _, world| {
        worlds[index] = Some(*world);
    })?;
    Ok(worlds)
}
