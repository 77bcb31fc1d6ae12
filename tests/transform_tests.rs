//! Transform accumulation tests
//!
//! Tests for:
//! - Two-level composition order (`world = parent * local`)
//! - Roots composing from identity
//! - Matrix precedence over TRS components
//! - Rotation handling (ignored by default, applied on request)
//! - Determinism across repeated passes
//! - Out-of-range children and cycles

use glam::{Mat4, Quat, Vec3};
use std::f32::consts::FRAC_PI_2;
use strata::scene::{accumulate_node_transforms, accumulate_world_transforms};
use strata::{Error, RotationMode, SceneNode};

// ============================================================================
// Helper
// ============================================================================

const EPSILON: f32 = 1e-5;

fn vec3_approx(a: Vec3, b: Vec3) -> bool {
    (a - b).abs().max_element() < EPSILON
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn two_level_tree_composes_parent_then_child() {
    let nodes = vec![
        SceneNode::new()
            .with_translation(Vec3::new(1.0, 0.0, 0.0))
            .with_children([1]),
        SceneNode::new().with_scale(Vec3::splat(2.0)).with_mesh(0),
    ];

    let table = accumulate_world_transforms(&nodes, &[0], RotationMode::Ignore).unwrap();
    let world = table.world_transform(0).unwrap();

    let t1 = Mat4::from_translation(Vec3::new(1.0, 0.0, 0.0));
    let t2 = Mat4::from_scale(Vec3::splat(2.0));
    assert_eq!(world, t1 * t2);
    assert!(vec3_approx(world.transform_point3(Vec3::ZERO), Vec3::new(1.0, 0.0, 0.0)));
    assert!(vec3_approx(world.transform_point3(Vec3::X), Vec3::new(3.0, 0.0, 0.0)));
}

#[test]
fn root_composes_from_identity() {
    let nodes = vec![
        SceneNode::new()
            .with_translation(Vec3::new(5.0, 0.0, 0.0))
            .with_children([1]),
        SceneNode::new().with_mesh(0),
    ];

    let table = accumulate_world_transforms(&nodes, &[0], RotationMode::Ignore).unwrap();
    assert_eq!(
        table.world_transform(0),
        Some(Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)))
    );
}

#[test]
fn matrix_takes_precedence_over_trs() {
    let matrix = Mat4::from_translation(Vec3::new(0.0, 0.0, -3.0));
    let nodes = vec![
        SceneNode::new()
            .with_matrix(matrix)
            .with_translation(Vec3::new(100.0, 0.0, 0.0))
            .with_scale(Vec3::splat(9.0))
            .with_mesh(0),
    ];

    let table = accumulate_world_transforms(&nodes, &[0], RotationMode::Apply).unwrap();
    assert_eq!(table.world_transform(0), Some(matrix));
}

#[test]
fn deep_chain_accumulates_translations() {
    let depth = 1_000;
    let mut nodes: Vec<SceneNode> = (0..depth)
        .map(|i| SceneNode::new().with_translation(Vec3::X).with_children([i + 1]))
        .collect();
    nodes.push(SceneNode::new().with_mesh(0));

    let table = accumulate_world_transforms(&nodes, &[0], RotationMode::Ignore).unwrap();
    let position = table.world_transform(0).unwrap().w_axis.truncate();
    assert!(vec3_approx(position, Vec3::new(depth as f32, 0.0, 0.0)));
}

#[test]
fn one_transform_per_mesh_referencing_node() {
    let nodes = vec![
        SceneNode::new().with_children([1, 2, 3]),
        SceneNode::new().with_mesh(0),
        SceneNode::new().with_mesh(1),
        SceneNode::new(),
    ];

    let table = accumulate_world_transforms(&nodes, &[0], RotationMode::Ignore).unwrap();
    assert_eq!(table.len(), 2);
    assert!(table.contains(0));
    assert!(table.contains(1));
}

#[test]
fn node_transforms_cover_reachable_nodes_only() {
    let nodes = vec![
        SceneNode::new().with_translation(Vec3::Y).with_children([1]),
        SceneNode::new(),
        SceneNode::new().with_translation(Vec3::Z),
    ];

    let worlds = accumulate_node_transforms(&nodes, &[0], RotationMode::Ignore).unwrap();
    assert_eq!(worlds[1], Some(Mat4::from_translation(Vec3::Y)));
    assert_eq!(worlds[2], None);
}

// ============================================================================
// Rotation
// ============================================================================

#[test]
fn rotation_is_ignored_by_default() {
    let nodes = vec![
        SceneNode::new()
            .with_rotation(Quat::from_rotation_y(FRAC_PI_2))
            .with_translation(Vec3::new(0.0, 2.0, 0.0))
            .with_mesh(0),
    ];

    let table = accumulate_world_transforms(&nodes, &[0], RotationMode::default()).unwrap();
    assert_eq!(
        table.world_transform(0),
        Some(Mat4::from_translation(Vec3::new(0.0, 2.0, 0.0)))
    );
}

#[test]
fn rotation_applies_when_requested() {
    let nodes = vec![
        SceneNode::new()
            .with_rotation(Quat::from_rotation_z(FRAC_PI_2))
            .with_children([1]),
        SceneNode::new().with_translation(Vec3::X).with_mesh(0),
    ];

    let table = accumulate_world_transforms(&nodes, &[0], RotationMode::Apply).unwrap();
    let position = table.world_transform(0).unwrap().w_axis.truncate();
    assert!(vec3_approx(position, Vec3::Y));
}

// ============================================================================
// Determinism
// ============================================================================

#[test]
fn repeated_passes_are_bit_identical() {
    let nodes = vec![
        SceneNode::new()
            .with_translation(Vec3::new(0.1, 0.2, 0.3))
            .with_scale(Vec3::new(1.7, 0.3, 2.9))
            .with_children([1, 2]),
        SceneNode::new()
            .with_translation(Vec3::new(-4.2, 1.1, 0.01))
            .with_mesh(0),
        SceneNode::new().with_scale(Vec3::splat(0.33)).with_mesh(1),
    ];

    let first = accumulate_world_transforms(&nodes, &[0], RotationMode::Ignore).unwrap();
    let second = accumulate_world_transforms(&nodes, &[0], RotationMode::Ignore).unwrap();
    for (a, b) in first.iter().zip(second.iter()) {
        assert_eq!(a.mesh, b.mesh);
        let bits_a = a.world.to_cols_array().map(f32::to_bits);
        let bits_b = b.world.to_cols_array().map(f32::to_bits);
        assert_eq!(bits_a, bits_b);
    }
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn child_index_past_table_is_out_of_range() {
    let nodes = vec![SceneNode::new().with_children([1, 7]), SceneNode::new()];

    let err = accumulate_world_transforms(&nodes, &[0], RotationMode::Ignore).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { index: 7, len: 2, .. }));
}

#[test]
fn cycle_is_reported() {
    let nodes = vec![
        SceneNode::new().with_children([1]),
        SceneNode::new().with_children([2]),
        SceneNode::new().with_children([1]),
    ];

    let err = accumulate_world_transforms(&nodes, &[0], RotationMode::Ignore).unwrap_err();
    assert!(matches!(err, Error::CyclicHierarchy { node: 1 }));
}
