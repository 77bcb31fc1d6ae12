//! Sampler Resolution
//!
//! glTF sampler parameters mapped onto wgpu sampler state. Wrap S/T become
//! address modes U/V; W follows V since glTF has no 3D textures. Missing
//! filters default to linear, and a mipmapped minification filter sets the
//! mipmap filter and marks the texture as wanting a mip chain.

/// Texture coordinate wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WrapMode {
    ClampToEdge,
    MirroredRepeat,
    #[default]
    Repeat,
}

impl From<WrapMode> for wgpu::AddressMode {
    fn from(mode: WrapMode) -> Self {
        match mode {
            WrapMode::ClampToEdge => Self::ClampToEdge,
            WrapMode::MirroredRepeat => Self::MirrorRepeat,
            WrapMode::Repeat => Self::Repeat,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MagFilter {
    Nearest,
    Linear,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MinFilter {
    Nearest,
    Linear,
    NearestMipmapNearest,
    LinearMipmapNearest,
    NearestMipmapLinear,
    LinearMipmapLinear,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SamplerDesc {
    pub name: Option<String>,
    pub wrap_s: WrapMode,
    pub wrap_t: WrapMode,
    pub mag_filter: Option<MagFilter>,
    pub min_filter: Option<MinFilter>,
}

/// Resolved sampler parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplerState {
    pub address_mode_u: wgpu::AddressMode,
    pub address_mode_v: wgpu::AddressMode,
    pub address_mode_w: wgpu::AddressMode,
    pub mag_filter: wgpu::FilterMode,
    pub min_filter: wgpu::FilterMode,
    pub mipmap_filter: wgpu::MipmapFilterMode,
    /// The minification filter samples a mip chain.
    pub uses_mipmaps: bool,
}

impl SamplerState {
    /// Descriptor for `wgpu::Device::create_sampler`.
    #[must_use]
    pub fn descriptor<'a>(&self, label: Option<&'a str>) -> wgpu::SamplerDescriptor<'a> {
        wgpu::SamplerDescriptor {
            label,
            address_mode_u: self.address_mode_u,
            address_mode_v: self.address_mode_v,
            address_mode_w: self.address_mode_w,
            mag_filter: self.mag_filter,
            min_filter: self.min_filter,
            mipmap_filter: self.mipmap_filter,
            ..Default::default()
        }
    }
}

impl From<&SamplerDesc> for SamplerState {
    fn from(desc: &SamplerDesc) -> Self {
        let mag_filter = match desc.mag_filter {
            Some(MagFilter::Nearest) => wgpu::FilterMode::Nearest,
            Some(MagFilter::Linear) | None => wgpu::FilterMode::Linear,
        };

        let (min_filter, mipmap_filter) = match desc.min_filter {
            Some(MinFilter::Nearest) => (wgpu::FilterMode::Nearest, None),
            Some(MinFilter::Linear) | None => (wgpu::FilterMode::Linear, None),
            Some(MinFilter::NearestMipmapNearest) => {
                (wgpu::FilterMode::Nearest, Some(wgpu::MipmapFilterMode::Nearest))
            }
            Some(MinFilter::LinearMipmapNearest) => {
                (wgpu::FilterMode::Linear, Some(wgpu::MipmapFilterMode::Nearest))
            }
            Some(MinFilter::NearestMipmapLinear) => {
                (wgpu::FilterMode::Nearest, Some(wgpu::MipmapFilterMode::Linear))
            }
            Some(MinFilter::LinearMipmapLinear) => {
                (wgpu::FilterMode::Linear, Some(wgpu::MipmapFilterMode::Linear))
            }
        };

        Self {
            address_mode_u: desc.wrap_s.into(),
            address_mode_v: desc.wrap_t.into(),
            address_mode_w: desc.wrap_t.into(),
            mag_filter,
            min_filter,
            mipmap_filter: mipmap_filter.unwrap_or(wgpu::MipmapFilterMode::Linear),
            uses_mipmaps: mipmap_filter.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_repeat_and_linear() {
        let state = SamplerState::from(&SamplerDesc::default());
        assert_eq!(state.address_mode_u, wgpu::AddressMode::Repeat);
        assert_eq!(state.mag_filter, wgpu::FilterMode::Linear);
        assert_eq!(state.min_filter, wgpu::FilterMode::Linear);
        assert!(!state.uses_mipmaps);
    }

    #[test]
    fn w_follows_t() {
        let desc = SamplerDesc {
            wrap_s: WrapMode::ClampToEdge,
            wrap_t: WrapMode::MirroredRepeat,
            ..Default::default()
        };
        let state = SamplerState::from(&desc);
        assert_eq!(state.address_mode_u, wgpu::AddressMode::ClampToEdge);
        assert_eq!(state.address_mode_v, wgpu::AddressMode::MirrorRepeat);
        assert_eq!(state.address_mode_w, wgpu::AddressMode::MirrorRepeat);
    }

    #[test]
    fn mipmapped_min_filter_sets_mipmap_filter() {
        let desc = SamplerDesc {
            mag_filter: Some(MagFilter::Nearest),
            min_filter: Some(MinFilter::NearestMipmapLinear),
            ..Default::default()
        };
        let state = SamplerState::from(&desc);
        assert_eq!(state.mag_filter, wgpu::FilterMode::Nearest);
        assert_eq!(state.min_filter, wgpu::FilterMode::Nearest);
        assert_eq!(state.mipmap_filter, wgpu::MipmapFilterMode::Linear);
        assert!(state.uses_mipmaps);
    }

    #[test]
    fn descriptor_carries_state() {
        let state = SamplerState::from(&SamplerDesc {
            wrap_s: WrapMode::ClampToEdge,
            min_filter: Some(MinFilter::LinearMipmapNearest),
            ..Default::default()
        });
        let descriptor = state.descriptor(Some("albedo"));
        assert_eq!(descriptor.label, Some("albedo"));
        assert_eq!(descriptor.address_mode_u, wgpu::AddressMode::ClampToEdge);
        assert_eq!(descriptor.address_mode_w, wgpu::AddressMode::Repeat);
        assert_eq!(descriptor.min_filter, wgpu::FilterMode::Linear);
        assert_eq!(descriptor.mipmap_filter, wgpu::MipmapFilterMode::Nearest);
    }
}
