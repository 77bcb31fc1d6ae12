//! Scene Resolution
//!
//! A resolution pass turns a [`SceneDescription`] into a [`ResolvedScene`]:
//!
//! 1. World transforms: depth-first over the selected scene's roots
//! 2. Material bindings: material → texture → image/sampler
//! 3. Geometry: every mesh's primitives decoded and assembled
//! 4. Images and samplers: GPU formats and sampler state
//!
//! Any failure aborts the pass. [`SceneResolver`] publishes a pass only when
//! it completed, so readers keep the previous scene on error.

use std::sync::Arc;
use std::time::Instant;

use glam::Mat4;

use strata_assets::{
    build_mesh_geometry, resolve_image, MaterialBinding, MaterialBindingTable, MeshGeometry, SamplerState,
    SceneDescription, TextureUpload,
};
use strata_core::{Error, ResolveSettings, Result, Table};
use strata_scene::{accumulate_world_transforms, MeshTransformTable, Published};

/// Everything a renderer needs to draw one scene.
#[derive(Debug, Clone)]
pub struct ResolvedScene {
    settings: ResolveSettings,
    meshes: MeshTransformTable,
    materials: MaterialBindingTable,
    /// Indexed by mesh index.
    geometry: Vec<MeshGeometry>,
    images: Vec<TextureUpload>,
    samplers: Vec<SamplerState>,
}

/// One mesh ready to draw.
#[derive(Debug, Clone, Copy)]
pub struct DrawItem<'a> {
    pub mesh: usize,
    pub world: Mat4,
    pub geometry: &'a MeshGeometry,
    /// Binding of the mesh's material; `None` means "no material".
    pub material: Option<&'a MaterialBinding>,
}

impl ResolvedScene {
    /// Per-mesh world transforms, in traversal order.
    #[must_use]
    pub fn meshes(&self) -> &MeshTransformTable {
        &self.meshes
    }

    #[must_use]
    pub fn materials(&self) -> &MaterialBindingTable {
        &self.materials
    }

    #[must_use]
    pub fn geometry(&self, mesh: usize) -> Option<&MeshGeometry> {
        self.geometry.get(mesh)
    }

    #[must_use]
    pub fn images(&self) -> &[TextureUpload] {
        &self.images
    }

    #[must_use]
    pub fn samplers(&self) -> &[SamplerState] {
        &self.samplers
    }

    #[must_use]
    pub fn settings(&self) -> &ResolveSettings {
        &self.settings
    }

    #[must_use]
    pub fn world_transform(&self, mesh: usize) -> Option<Mat4> {
        self.meshes.world_transform(mesh)
    }

    /// Meshes to draw: reachable meshes in traversal order, then (if enabled
    /// in the settings) meshes no node references, with an identity transform.
    pub fn draw_items(&self) -> impl Iterator<Item = DrawItem<'_>> {
        let reachable = self.meshes.iter().filter_map(|entry| {
            Some(DrawItem {
                mesh: entry.mesh,
                world: entry.world,
                geometry: self.geometry.get(entry.mesh)?,
                material: entry.material.and_then(|m| self.materials.get(m)),
            })
        });

        let unreferenced = self
            .geometry
            .iter()
            .filter(|g| self.settings.include_unreferenced_meshes && !self.meshes.contains(g.mesh))
            .map(|geometry| DrawItem {
                mesh: geometry.mesh,
                world: Mat4::IDENTITY,
                geometry,
                material: geometry.material().and_then(|m| self.materials.get(m)),
            });

        reachable.chain(unreferenced)
    }
}

/// Runs one complete resolution pass.
pub fn resolve_scene(desc: &SceneDescription, settings: &ResolveSettings) -> Result<ResolvedScene> {
    let start = Instant::now();

    let roots = desc.roots(settings.scene)?;
    let mut meshes = accumulate_world_transforms(&desc.nodes, roots, settings.rotation)?;
    if let Some(entry) = meshes.iter().find(|entry| entry.mesh >= desc.meshes.len()) {
        return Err(Error::invalid_reference(
            Table::Node,
            entry.node,
            format!("mesh {} does not exist ({} meshes)", entry.mesh, desc.meshes.len()),
        ));
    }

    let materials =
        MaterialBindingTable::build(&desc.materials, &desc.textures, desc.images.len(), desc.samplers.len())?;

    let geometry = (0..desc.meshes.len())
        .map(|mesh| build_mesh_geometry(desc, mesh, settings.handedness))
        .collect::<Result<Vec<_>>>()?;
    for mesh in &geometry {
        meshes.set_material(mesh.mesh, mesh.material());
    }

    let images = desc
        .images
        .iter()
        .enumerate()
        .map(|(index, image)| resolve_image(index, image))
        .collect::<Result<Vec<_>>>()?;
    let samplers = desc.samplers.iter().map(SamplerState::from).collect();

    log::debug!(
        "Resolved {} of {} meshes, {} materials, {} images in {:?}",
        meshes.len(),
        geometry.len(),
        materials.len(),
        images.len(),
        start.elapsed()
    );

    Ok(ResolvedScene {
        settings: *settings,
        meshes,
        materials,
        geometry,
        images,
        samplers,
    })
}

/// Resolves descriptions and publishes the results for concurrent readers.
///
/// Reloads are serialized. A reload that fails leaves the last published
/// scene in place and returns the error.
pub struct SceneResolver {
    settings: ResolveSettings,
    published: Published<ResolvedScene>,
}

impl SceneResolver {
    #[must_use]
    pub fn new(settings: ResolveSettings) -> Self {
        Self {
            settings,
            published: Published::new(),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &ResolveSettings {
        &self.settings
    }

    /// Resolves `desc` and publishes it on success.
    pub fn reload(&self, desc: &SceneDescription) -> Result<Arc<ResolvedScene>> {
        let result = self.published.try_publish_with(|| resolve_scene(desc, &self.settings));
        match &result {
            Ok(scene) => log::info!(
                "Published scene generation {} ({} meshes)",
                self.published.generation(),
                scene.meshes().len()
            ),
            Err(e) => log::error!("Scene reload failed, keeping previous snapshot: {e}"),
        }
        result
    }

    /// The last published scene, if any.
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<ResolvedScene>> {
        self.published.snapshot()
    }

    /// Number of successful reloads.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.published.generation()
    }
}

impl Default for SceneResolver {
    fn default() -> Self {
        Self::new(ResolveSettings::default())
    }
}
