//! Loads a glTF file, resolves it and prints per-mesh transforms, geometry
//! sizes and bounds, material bindings and sampler descriptors.
//!
//! ```text
//! scene_inspector <file.gltf|file.glb> [settings.json]
//! ```
//!
//! Set `RUST_LOG=debug` to see pass timings.

use std::path::PathBuf;

use anyhow::{bail, Context};
use strata::assets::{MaterialChannel, MeshGeometry};
use strata::{ResolveSettings, SceneResolver};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args_os().skip(1);
    let Some(scene_path) = args.next().map(PathBuf::from) else {
        bail!("usage: scene_inspector <file.gltf> [settings.json]");
    };
    let settings = match args.next() {
        Some(path) => ResolveSettings::from_json_file(&path)
            .with_context(|| format!("failed to read settings from {}", PathBuf::from(&path).display()))?,
        None => ResolveSettings::default(),
    };
    log::debug!("Settings: {settings:?}");

    let desc = strata::gltf::import(&scene_path)?;
    let resolver = SceneResolver::new(settings);
    let scene = resolver.reload(&desc)?;

    println!("{}", scene_path.display());
    println!(
        "  {} meshes reachable, {} materials, {} images, {} samplers",
        scene.meshes().len(),
        scene.materials().len(),
        scene.images().len(),
        scene.samplers().len()
    );

    for item in scene.draw_items() {
        let translation = item.world.w_axis.truncate();
        let (scale, _, _) = item.world.to_scale_rotation_translation();
        let indices: usize = item
            .geometry
            .primitives
            .iter()
            .filter_map(|p| p.indices.as_ref().map(strata::IndexBuffer::len))
            .sum();
        println!(
            "  mesh {:>3}: {} primitives, {} vertices, {} indices, translation {:?}, scale {:?}",
            item.mesh,
            item.geometry.primitives.len(),
            item.geometry.vertex_count(),
            indices,
            translation.to_array(),
            scale.to_array()
        );

        if let Some((min, max)) = local_bounds(item.geometry) {
            println!("            local bounds {min:?} .. {max:?}");
        }

        match item.material {
            Some(binding) => {
                print!("            material {}:", binding.material);
                for channel in MaterialChannel::ALL {
                    match binding.channel(channel) {
                        Some(tex) => print!(" {}=texture {}/image {}", channel.as_str(), tex.texture, tex.image),
                        None => print!(" {}=none", channel.as_str()),
                    }
                }
                println!();
            }
            None => println!("            no material"),
        }
    }

    for upload in scene.images() {
        println!(
            "  image {:>3}: {}x{} {:?}, {} bytes per row",
            upload.image, upload.width, upload.height, upload.format, upload.row_pitch
        );
    }

    for (index, sampler) in scene.samplers().iter().enumerate() {
        let label = format!("sampler {index}");
        let descriptor = sampler.descriptor(Some(label.as_str()));
        println!(
            "  {label:>11}: address {:?}/{:?}/{:?}, filter mag {:?} min {:?} mip {:?}",
            descriptor.address_mode_u,
            descriptor.address_mode_v,
            descriptor.address_mode_w,
            descriptor.mag_filter,
            descriptor.min_filter,
            descriptor.mipmap_filter
        );
    }

    Ok(())
}

/// Axis-aligned bounds of every primitive's positions, in mesh space.
fn local_bounds(geometry: &MeshGeometry) -> Option<([f32; 3], [f32; 3])> {
    geometry
        .primitives
        .iter()
        .flat_map(|p| p.vertices.positions())
        .fold(None::<([f32; 3], [f32; 3])>, |bounds, p| {
            let (min, max) = bounds.unwrap_or((p, p));
            Some((
                std::array::from_fn(|axis| min[axis].min(p[axis])),
                std::array::from_fn(|axis| max[axis].max(p[axis])),
            ))
        })
}
