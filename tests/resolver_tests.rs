//! Resolution pass tests
//!
//! Tests for:
//! - Full pass over an in-memory description
//! - Material binding failures and atomicity
//! - Publish-on-success semantics of `SceneResolver`
//! - Draw list ordering and unreferenced meshes
//! - Settings loaded from JSON

use glam::{Mat4, Vec3};
use strata::assets::{ImageDesc, SamplerDesc, WrapMode};
use strata::prelude::*;
use strata::IndexBuffer;

// ============================================================================
// Helper
// ============================================================================

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Root at x = 5 with one triangle mesh below it, plus a second mesh that no
/// node references. The triangle's material binds a base-color texture.
fn sample_scene() -> SceneDescription {
    let mut desc = SceneDescription::default();

    let positions = desc.push_vec3_accessor(&[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]);
    let normals = desc.push_vec3_accessor(&[[0.0, 0.0, 1.0]; 3]);
    let indices = desc.push_index_accessor(&IndexBuffer::U32(vec![0, 1, 2]));

    let image = desc.push_image(ImageDesc::rgba8(1, 1, vec![255u8, 0, 0, 255]));
    let sampler = desc.push_sampler(SamplerDesc {
        wrap_s: WrapMode::ClampToEdge,
        ..Default::default()
    });
    let texture = desc.push_texture(TextureDesc::new(image, Some(sampler)));
    let material = desc.push_material(MaterialDesc::default().with_texture(MaterialChannel::BaseColor, texture));

    let triangle = desc.push_mesh(
        MeshDesc::new().with_primitive(
            PrimitiveDesc::new(positions)
                .with_attribute(VertexSemantic::Normal, normals)
                .with_indices(indices)
                .with_material(material),
        ),
    );
    desc.push_mesh(MeshDesc::new().with_primitive(PrimitiveDesc::new(positions)));

    let leaf = desc.push_node(SceneNode::new().with_mesh(triangle));
    let root = desc.push_node(
        SceneNode::new()
            .with_translation(Vec3::new(5.0, 0.0, 0.0))
            .with_children([leaf]),
    );
    desc.push_scene(SceneRoots::new([root]));
    desc
}

// ============================================================================
// Full Pass
// ============================================================================

#[test]
fn resolves_sample_scene() -> anyhow::Result<()> {
    init_logging();
    let scene = resolve_scene(&sample_scene(), &ResolveSettings::default())?;

    assert_eq!(
        scene.world_transform(0),
        Some(Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)))
    );
    assert_eq!(scene.meshes().get(0).and_then(|m| m.material), Some(0));

    let geometry = scene.geometry(0).unwrap();
    assert_eq!(geometry.vertex_count(), 3);
    assert_eq!(geometry.primitives[0].indices.as_ref().map(IndexBuffer::len), Some(3));
    assert_eq!(geometry.primitives[0].vertices.vertices()[2].normal, [0.0, 0.0, 1.0]);

    let binding = scene.materials().get(0).unwrap();
    let base = binding.base_color.unwrap();
    assert_eq!((base.texture, base.image, base.sampler), (0, 0, Some(0)));
    assert!(binding.normal.is_none());

    assert_eq!(scene.images().len(), 1);
    assert_eq!(scene.images()[0].row_pitch, 4);
    assert_eq!(scene.samplers().len(), 1);
    Ok(())
}

#[test]
fn draw_items_append_unreferenced_meshes() {
    let desc = sample_scene();

    let scene = resolve_scene(&desc, &ResolveSettings::default()).unwrap();
    let items: Vec<_> = scene.draw_items().collect();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].mesh, 0);
    assert!(items[0].material.is_some());
    assert_eq!(items[1].mesh, 1);
    assert_eq!(items[1].world, Mat4::IDENTITY);
    assert!(items[1].material.is_none());

    let settings = ResolveSettings {
        include_unreferenced_meshes: false,
        ..Default::default()
    };
    let scene = resolve_scene(&desc, &settings).unwrap();
    assert_eq!(scene.draw_items().count(), 1);
}

#[test]
fn missing_scene_selection_fails() {
    let settings = ResolveSettings::default().with_scene(SceneSelection::Index(4));
    let err = resolve_scene(&sample_scene(), &settings).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { table: Table::Scene, .. }));
}

#[test]
fn node_referencing_missing_mesh_fails() {
    let mut desc = sample_scene();
    desc.nodes[0].mesh = Some(9);
    let err = resolve_scene(&desc, &ResolveSettings::default()).unwrap_err();
    assert!(matches!(err, Error::InvalidReference { table: Table::Node, index: 0, .. }));
}

#[test]
fn unsupported_image_fails_the_pass() {
    let mut desc = sample_scene();
    desc.images[0].components = 3;
    let err = resolve_scene(&desc, &ResolveSettings::default()).unwrap_err();
    assert!(matches!(err, Error::UnsupportedFormat { image: 0, .. }));
}

// ============================================================================
// Material Atomicity
// ============================================================================

#[test]
fn normal_texture_past_table_fails_without_partial_table() {
    init_logging();
    let resolver = SceneResolver::default();
    let published = resolver.reload(&sample_scene()).unwrap();

    let mut desc = sample_scene();
    desc.materials.push(MaterialDesc::default().with_texture(MaterialChannel::Normal, 42));

    let err = resolver.reload(&desc).unwrap_err();
    assert!(matches!(
        err,
        Error::InvalidReference { table: Table::Material, index: 1, .. }
    ));

    // Readers still see the earlier table, with its single material.
    let current = resolver.snapshot().unwrap();
    assert!(std::sync::Arc::ptr_eq(&published, &current));
    assert_eq!(resolver.generation(), 1);
    assert_eq!(current.materials().len(), 1);
}

// ============================================================================
// Publishing
// ============================================================================

#[test]
fn failed_reload_keeps_previous_snapshot() {
    init_logging();
    let resolver = SceneResolver::default();
    assert!(resolver.snapshot().is_none());

    let good = sample_scene();
    let published = resolver.reload(&good).unwrap();
    assert_eq!(resolver.generation(), 1);

    let mut broken = sample_scene();
    broken.nodes[1].children.push(99);
    let err = resolver.reload(&broken).unwrap_err();
    assert!(matches!(err, Error::OutOfRange { table: Table::Node, index: 99, .. }));

    let current = resolver.snapshot().unwrap();
    assert!(std::sync::Arc::ptr_eq(&published, &current));
    assert_eq!(resolver.generation(), 1);
}

#[test]
fn failed_first_reload_publishes_nothing() {
    let resolver = SceneResolver::default();
    let mut broken = sample_scene();
    broken.meshes[1].primitives.clear();

    assert!(matches!(resolver.reload(&broken), Err(Error::EmptyGeometry { mesh: 1 })));
    assert!(resolver.snapshot().is_none());
    assert_eq!(resolver.generation(), 0);
}

#[test]
fn successful_reload_replaces_snapshot() {
    let resolver = SceneResolver::default();
    let first = resolver.reload(&sample_scene()).unwrap();

    let mut moved = sample_scene();
    moved.nodes[1].translation = Some(Vec3::new(-2.0, 0.0, 0.0));
    resolver.reload(&moved).unwrap();

    let current = resolver.snapshot().unwrap();
    assert_eq!(
        current.world_transform(0),
        Some(Mat4::from_translation(Vec3::new(-2.0, 0.0, 0.0)))
    );
    // Earlier readers keep their snapshot.
    assert_eq!(
        first.world_transform(0),
        Some(Mat4::from_translation(Vec3::new(5.0, 0.0, 0.0)))
    );
    assert_eq!(resolver.generation(), 2);
}

// ============================================================================
// Settings
// ============================================================================

#[test]
fn settings_from_json_drive_the_pass() {
    let settings = ResolveSettings::from_json(r#"{ "handedness": "mirror_x" }"#).unwrap();
    assert_eq!(settings.rotation, RotationMode::Ignore);

    let scene = resolve_scene(&sample_scene(), &settings).unwrap();
    let v = scene.geometry(0).unwrap().primitives[0].vertices.vertices()[1];
    assert_eq!(v.position, [-1.0, 0.0, 0.0]);
}

#[test]
fn settings_survive_a_json_round_trip() -> anyhow::Result<()> {
    let settings = ResolveSettings::default()
        .with_rotation(RotationMode::Apply)
        .with_scene(SceneSelection::Index(2));
    let json = serde_json::to_string(&settings)?;
    assert_eq!(ResolveSettings::from_json(&json)?, settings);

    let value: serde_json::Value = serde_json::from_str(&json)?;
    assert_eq!(value["rotation"], "apply");
    assert_eq!(value["scene"]["index"], 2);
    Ok(())
}
