//! glTF Import
//!
//! Converts a glTF 2.0 document into a [`SceneDescription`]. Parsing, buffer
//! loading and image decoding are done by the `gltf` crate; this module maps
//! its document model onto the description tables and normalizes images to
//! four channels.
//!
//! Only data the resolver consumes is carried over: scenes, nodes, meshes
//! (position, normal, tangent, first texcoord), accessors, buffer views,
//! buffers, material texture references, textures, images and samplers.

use std::path::Path;
use std::sync::Arc;

use glam::{Mat4, Quat, Vec3};
use rustc_hash::FxHashMap;

use strata_core::errors::{Error, Result};
use strata_scene::SceneNode;

use crate::accessor::{AccessorDesc, BufferViewDesc, ComponentType, ElementKind, SparseDesc};
use crate::description::{MeshDesc, PrimitiveDesc, SceneDescription, SceneRoots, VertexSemantic};
use crate::image::{ImageDesc, PixelComponent};
use crate::material::{MaterialDesc, TextureDesc};
use crate::sampler::{MagFilter, MinFilter, SamplerDesc, WrapMode};

/// Extensions a document may require and still resolve correctly.
const HANDLED_EXTENSIONS: &[&str] = &[
    // Quantized attributes decode through `accessor`.
    "KHR_mesh_quantization",
    // Material factors only; texture references are unchanged.
    "KHR_materials_emissive_strength",
    "KHR_materials_ior",
    "KHR_materials_unlit",
];

/// Loads a `.gltf` or `.glb` file with its buffers and images.
pub fn import(path: impl AsRef<Path>) -> Result<SceneDescription> {
    let path = path.as_ref();
    let bytes = std::fs::read(path)?;
    let base = path.parent().unwrap_or_else(|| Path::new("./"));
    let desc = load(&bytes, Some(base), &path.display().to_string())?;
    log::info!(
        "Loaded glTF {} ({} nodes, {} meshes, {} images)",
        path.display(),
        desc.nodes.len(),
        desc.meshes.len(),
        desc.images.len()
    );
    Ok(desc)
}

/// Loads a self-contained `.gltf` or `.glb` from memory. Relative URIs
/// resolve against the working directory.
pub fn import_slice(bytes: &[u8]) -> Result<SceneDescription> {
    load(bytes, None, "glTF slice")
}

fn load(bytes: &[u8], base: Option<&Path>, source: &str) -> Result<SceneDescription> {
    let import_error = |e: gltf::Error| Error::Import(format!("failed to load {source}: {e}"));

    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice_without_validation(bytes).map_err(import_error)?;
    validate(&document, source)?;
    let buffers = gltf::import_buffers(&document, base, blob).map_err(import_error)?;
    let images = gltf::import_images(&document, base, &buffers).map_err(import_error)?;
    from_gltf(&document, buffers, images)
}

/// Runs the `gltf` crate's document checks except the required-extension
/// one, which [`from_gltf`] makes against [`HANDLED_EXTENSIONS`].
fn validate(document: &gltf::Document, source: &str) -> Result<()> {
    use gltf::json::validation::{Error as Problem, Validate};

    let root = document.as_json();
    let mut problems = Vec::new();
    root.validate(root, gltf::json::Path::new, &mut |path, problem| {
        let path = path();
        if problem == Problem::Unsupported && path.as_str().starts_with("extensionsRequired") {
            return;
        }
        problems.push(format!("{path}: {problem}"));
    });

    if problems.is_empty() {
        Ok(())
    } else {
        Err(Error::Import(format!("{source} is not valid glTF: {}", problems.join("; "))))
    }
}

/// Builds a description from an already imported document.
///
/// Fails with [`Error::Import`] when the document requires an extension
/// outside [`HANDLED_EXTENSIONS`].
pub fn from_gltf(
    document: &gltf::Document,
    buffers: Vec<gltf::buffer::Data>,
    images: Vec<gltf::image::Data>,
) -> Result<SceneDescription> {
    let unsupported: Vec<&str> = document
        .extensions_required()
        .filter(|ext| !HANDLED_EXTENSIONS.contains(ext))
        .collect();
    if !unsupported.is_empty() {
        return Err(Error::Import(format!("glTF requires unsupported extensions: {unsupported:?}")));
    }
    let ignored: Vec<&str> = document
        .extensions_used()
        .filter(|ext| !HANDLED_EXTENSIONS.contains(ext))
        .collect();
    if !ignored.is_empty() {
        log::warn!("glTF uses extensions that are ignored: {ignored:?}");
    }

    let mut desc = SceneDescription {
        default_scene: document.default_scene().map(|s| s.index()),
        buffers: buffers.into_iter().map(|data| data.0).collect(),
        ..Default::default()
    };

    desc.scenes = document
        .scenes()
        .map(|scene| SceneRoots {
            name: scene.name().map(str::to_owned),
            nodes: scene.nodes().map(|n| n.index()).collect(),
        })
        .collect();

    desc.nodes = document.nodes().map(|node| convert_node(&node)).collect();
    desc.meshes = document.meshes().map(|mesh| convert_mesh(&mesh)).collect();

    desc.accessors = document
        .accessors()
        .map(|accessor| AccessorDesc {
            buffer_view: accessor.view().map(|v| v.index()),
            byte_offset: accessor.offset(),
            count: accessor.count(),
            component_type: component_type(accessor.data_type()),
            element: element_kind(accessor.dimensions()),
            normalized: accessor.normalized(),
            sparse: accessor.sparse().map(|sparse| convert_sparse(&sparse)),
        })
        .collect();

    desc.buffer_views = document
        .views()
        .map(|view| BufferViewDesc {
            buffer: view.buffer().index(),
            byte_offset: view.offset(),
            byte_length: view.length(),
            byte_stride: view.stride(),
        })
        .collect();

    desc.materials = document
        .materials()
        .map(|material| {
            let pbr = material.pbr_metallic_roughness();
            MaterialDesc {
                name: material.name().map(str::to_owned),
                base_color_texture: pbr.base_color_texture().map(|info| info.texture().index()),
                metallic_roughness_texture: pbr.metallic_roughness_texture().map(|info| info.texture().index()),
                normal_texture: material.normal_texture().map(|info| info.texture().index()),
            }
        })
        .collect();

    desc.textures = document
        .textures()
        .map(|texture| TextureDesc {
            name: texture.name().map(str::to_owned),
            image: texture.source().index(),
            sampler: texture.sampler().index(),
        })
        .collect();

    desc.samplers = document
        .samplers()
        .map(|sampler| SamplerDesc {
            name: sampler.name().map(str::to_owned),
            wrap_s: wrap_mode(sampler.wrap_s()),
            wrap_t: wrap_mode(sampler.wrap_t()),
            mag_filter: sampler.mag_filter().map(|f| match f {
                gltf::texture::MagFilter::Nearest => MagFilter::Nearest,
                gltf::texture::MagFilter::Linear => MagFilter::Linear,
            }),
            min_filter: sampler.min_filter().map(min_filter),
        })
        .collect();

    let names: Vec<Option<String>> = document.images().map(|i| i.name().map(str::to_owned)).collect();
    desc.images = images
        .into_iter()
        .enumerate()
        .map(|(index, data)| convert_image(index, names.get(index).cloned().flatten(), data))
        .collect::<Result<_>>()?;

    Ok(desc)
}

fn convert_node(node: &gltf::Node<'_>) -> SceneNode {
    let mut out = SceneNode {
        name: node.name().map(str::to_owned),
        children: node.children().map(|c| c.index()).collect(),
        mesh: node.mesh().map(|m| m.index()),
        ..Default::default()
    };
    match node.transform() {
        gltf::scene::Transform::Matrix { matrix } => {
            out.matrix = Some(Mat4::from_cols_array_2d(&matrix));
        }
        gltf::scene::Transform::Decomposed {
            translation,
            rotation,
            scale,
        } => {
            out.translation = Some(Vec3::from_array(translation));
            out.rotation = Some(Quat::from_array(rotation));
            out.scale = Some(Vec3::from_array(scale));
        }
    }
    out
}

fn convert_mesh(mesh: &gltf::Mesh<'_>) -> MeshDesc {
    let primitives = mesh
        .primitives()
        .map(|primitive| {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!(
                    "Mesh {} primitive {}: mode {:?} is passed through as triangles",
                    mesh.index(),
                    primitive.index(),
                    primitive.mode()
                );
            }
            let mut attributes = FxHashMap::default();
            for (semantic, accessor) in primitive.attributes() {
                let semantic = match semantic {
                    gltf::Semantic::Positions => VertexSemantic::Position,
                    gltf::Semantic::Normals => VertexSemantic::Normal,
                    gltf::Semantic::Tangents => VertexSemantic::Tangent,
                    gltf::Semantic::TexCoords(0) => VertexSemantic::TexCoord0,
                    other => {
                        log::trace!("Mesh {}: skipping attribute {other:?}", mesh.index());
                        continue;
                    }
                };
                attributes.insert(semantic, accessor.index());
            }
            PrimitiveDesc {
                attributes,
                indices: primitive.indices().map(|a| a.index()),
                material: primitive.material().index(),
            }
        })
        .collect();

    MeshDesc {
        name: mesh.name().map(str::to_owned),
        primitives,
    }
}

fn component_type(data_type: gltf::accessor::DataType) -> ComponentType {
    use gltf::accessor::DataType;
    match data_type {
        DataType::I8 => ComponentType::I8,
        DataType::U8 => ComponentType::U8,
        DataType::I16 => ComponentType::I16,
        DataType::U16 => ComponentType::U16,
        DataType::U32 => ComponentType::U32,
        DataType::F32 => ComponentType::F32,
    }
}

fn convert_sparse(sparse: &gltf::accessor::sparse::Sparse<'_>) -> SparseDesc {
    use gltf::accessor::sparse::IndexType;

    let indices = sparse.indices();
    let values = sparse.values();
    SparseDesc {
        count: sparse.count(),
        indices_view: indices.view().index(),
        indices_offset: indices.offset(),
        index_type: match indices.index_type() {
            IndexType::U8 => ComponentType::U8,
            IndexType::U16 => ComponentType::U16,
            IndexType::U32 => ComponentType::U32,
        },
        values_view: values.view().index(),
        values_offset: values.offset(),
    }
}

fn element_kind(dimensions: gltf::accessor::Dimensions) -> ElementKind {
    use gltf::accessor::Dimensions;
    match dimensions {
        Dimensions::Scalar => ElementKind::Scalar,
        Dimensions::Vec2 => ElementKind::Vec2,
        Dimensions::Vec3 => ElementKind::Vec3,
        Dimensions::Vec4 => ElementKind::Vec4,
        Dimensions::Mat2 => ElementKind::Mat2,
        Dimensions::Mat3 => ElementKind::Mat3,
        Dimensions::Mat4 => ElementKind::Mat4,
    }
}

fn wrap_mode(mode: gltf::texture::WrappingMode) -> WrapMode {
    match mode {
        gltf::texture::WrappingMode::ClampToEdge => WrapMode::ClampToEdge,
        gltf::texture::WrappingMode::MirroredRepeat => WrapMode::MirroredRepeat,
        gltf::texture::WrappingMode::Repeat => WrapMode::Repeat,
    }
}

fn min_filter(filter: gltf::texture::MinFilter) -> MinFilter {
    match filter {
        gltf::texture::MinFilter::Nearest => MinFilter::Nearest,
        gltf::texture::MinFilter::Linear => MinFilter::Linear,
        gltf::texture::MinFilter::NearestMipmapNearest => MinFilter::NearestMipmapNearest,
        gltf::texture::MinFilter::LinearMipmapNearest => MinFilter::LinearMipmapNearest,
        gltf::texture::MinFilter::NearestMipmapLinear => MinFilter::NearestMipmapLinear,
        gltf::texture::MinFilter::LinearMipmapLinear => MinFilter::LinearMipmapLinear,
    }
}

/// Expands 8-bit and RGB float images to four channels. 16-bit layouts are
/// kept as decoded; the resolver rejects them.
fn convert_image(index: usize, name: Option<String>, data: gltf::image::Data) -> Result<ImageDesc> {
    use gltf::image::Format;

    let gltf::image::Data {
        pixels,
        format,
        width,
        height,
    } = data;
    let malformed = || Error::Import(format!("image {index}: pixel data does not match {width}x{height} {format:?}"));

    let (component, components, pixels) = match format {
        Format::R8G8B8A8 => (PixelComponent::U8, 4, pixels),
        Format::R8 => {
            let buffer = image::GrayImage::from_raw(width, height, pixels).ok_or_else(malformed)?;
            (PixelComponent::U8, 4, image::DynamicImage::ImageLuma8(buffer).to_rgba8().into_raw())
        }
        Format::R8G8 => {
            let buffer = image::GrayAlphaImage::from_raw(width, height, pixels).ok_or_else(malformed)?;
            (PixelComponent::U8, 4, image::DynamicImage::ImageLumaA8(buffer).to_rgba8().into_raw())
        }
        Format::R8G8B8 => {
            let buffer = image::RgbImage::from_raw(width, height, pixels).ok_or_else(malformed)?;
            (PixelComponent::U8, 4, image::DynamicImage::ImageRgb8(buffer).to_rgba8().into_raw())
        }
        Format::R32G32B32FLOAT => {
            let floats: Vec<f32> = pixels
                .chunks_exact(4)
                .map(bytemuck::pod_read_unaligned::<f32>)
                .collect();
            let buffer = image::Rgb32FImage::from_raw(width, height, floats).ok_or_else(malformed)?;
            let rgba = image::DynamicImage::ImageRgb32F(buffer).to_rgba32f().into_raw();
            let bytes: Vec<u8> = bytemuck::cast_slice(&rgba).to_vec();
            (PixelComponent::F32, 4, bytes)
        }
        Format::R32G32B32A32FLOAT => (PixelComponent::F32, 4, pixels),
        Format::R16 => (PixelComponent::U16, 1, pixels),
        Format::R16G16 => (PixelComponent::U16, 2, pixels),
        Format::R16G16B16 => (PixelComponent::U16, 3, pixels),
        Format::R16G16B16A16 => (PixelComponent::U16, 4, pixels),
    };

    Ok(ImageDesc {
        name,
        width,
        height,
        components,
        component,
        data: Arc::from(pixels),
    })
}
