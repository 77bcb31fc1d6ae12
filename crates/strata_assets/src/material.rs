//! Material Binding
//!
//! Resolves each material's texture references into concrete
//! (texture, image, sampler) triples.
//!
//! # Channels
//!
//! A material may use up to three texture channels, see [`MaterialChannel`].
//! Absent channels stay `None`: the binding table never invents a default
//! texture or factor. Supplying those is the renderer's job.
//!
//! # Validation
//!
//! The table is built in one pass over the materials. The first reference
//! that cannot be resolved fails the whole build with
//! [`Error::InvalidReference`]:
//!
//! - material → texture index past the texture table
//! - texture → image index past the image table
//! - texture → sampler index past the sampler table

use strata_core::errors::{Error, Result, Table};

/// Texture slots a material can bind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaterialChannel {
    BaseColor,
    MetallicRoughness,
    Normal,
}

impl MaterialChannel {
    pub const ALL: [Self; 3] = [Self::BaseColor, Self::MetallicRoughness, Self::Normal];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BaseColor => "base color",
            Self::MetallicRoughness => "metallic-roughness",
            Self::Normal => "normal",
        }
    }
}

/// Texture references of one material, as described by the scene file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialDesc {
    pub name: Option<String>,
    pub base_color_texture: Option<usize>,
    pub metallic_roughness_texture: Option<usize>,
    pub normal_texture: Option<usize>,
}

impl MaterialDesc {
    #[must_use]
    pub fn texture(&self, channel: MaterialChannel) -> Option<usize> {
        match channel {
            MaterialChannel::BaseColor => self.base_color_texture,
            MaterialChannel::MetallicRoughness => self.metallic_roughness_texture,
            MaterialChannel::Normal => self.normal_texture,
        }
    }

    #[must_use]
    pub fn with_texture(mut self, channel: MaterialChannel, texture: usize) -> Self {
        let slot = match channel {
            MaterialChannel::BaseColor => &mut self.base_color_texture,
            MaterialChannel::MetallicRoughness => &mut self.metallic_roughness_texture,
            MaterialChannel::Normal => &mut self.normal_texture,
        };
        *slot = Some(texture);
        self
    }
}

/// An image paired with an optional sampler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureDesc {
    pub name: Option<String>,
    pub image: usize,
    /// `None` uses the renderer's default sampler.
    pub sampler: Option<usize>,
}

impl TextureDesc {
    #[must_use]
    pub fn new(image: usize, sampler: Option<usize>) -> Self {
        Self {
            name: None,
            image,
            sampler,
        }
    }
}

/// A fully resolved texture reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureBinding {
    pub texture: usize,
    pub image: usize,
    pub sampler: Option<usize>,
}

/// Resolved texture channels of one material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MaterialBinding {
    pub material: usize,
    pub base_color: Option<TextureBinding>,
    pub metallic_roughness: Option<TextureBinding>,
    pub normal: Option<TextureBinding>,
}

impl MaterialBinding {
    #[must_use]
    pub fn channel(&self, channel: MaterialChannel) -> Option<&TextureBinding> {
        match channel {
            MaterialChannel::BaseColor => self.base_color.as_ref(),
            MaterialChannel::MetallicRoughness => self.metallic_roughness.as_ref(),
            MaterialChannel::Normal => self.normal.as_ref(),
        }
    }

    /// Channels that have a texture bound.
    pub fn bound_channels(&self) -> impl Iterator<Item = (MaterialChannel, &TextureBinding)> {
        MaterialChannel::ALL
            .into_iter()
            .filter_map(move |channel| self.channel(channel).map(|binding| (channel, binding)))
    }
}

/// One [`MaterialBinding`] per material index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MaterialBindingTable {
    bindings: Vec<MaterialBinding>,
}

impl MaterialBindingTable {
    /// Resolves every material against the texture, image and sampler tables.
    pub fn build(
        materials: &[MaterialDesc],
        textures: &[TextureDesc],
        image_count: usize,
        sampler_count: usize,
    ) -> Result<Self> {
        let resolve_texture = |material: usize, channel: MaterialChannel, texture: usize| {
            let Some(desc) = textures.get(texture) else {
                return Err(Error::invalid_reference(
                    Table::Material,
                    material,
                    format!(
                        "{} texture {texture} does not exist ({} textures)",
                        channel.as_str(),
                        textures.len()
                    ),
                ));
            };
            if desc.image >= image_count {
                return Err(Error::invalid_reference(
                    Table::Texture,
                    texture,
                    format!("image {} does not exist ({image_count} images)", desc.image),
                ));
            }
            if let Some(sampler) = desc.sampler.filter(|&s| s >= sampler_count) {
                return Err(Error::invalid_reference(
                    Table::Texture,
                    texture,
                    format!("sampler {sampler} does not exist ({sampler_count} samplers)"),
                ));
            }
            Ok(TextureBinding {
                texture,
                image: desc.image,
                sampler: desc.sampler,
            })
        };

        let mut bindings = Vec::with_capacity(materials.len());
        for (index, desc) in materials.iter().enumerate() {
            let mut slots = [None; 3];
            for (slot, channel) in slots.iter_mut().zip(MaterialChannel::ALL) {
                if let Some(texture) = desc.texture(channel) {
                    *slot = Some(resolve_texture(index, channel, texture)?);
                }
            }
            let [base_color, metallic_roughness, normal] = slots;
            bindings.push(MaterialBinding {
                material: index,
                base_color,
                metallic_roughness,
                normal,
            });
        }

        log::debug!(
            "Bound {} materials against {} textures",
            bindings.len(),
            textures.len()
        );
        Ok(Self { bindings })
    }

    #[must_use]
    pub fn get(&self, material: usize) -> Option<&MaterialBinding> {
        self.bindings.get(material)
    }

    pub fn iter(&self) -> impl Iterator<Item = &MaterialBinding> {
        self.bindings.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}
