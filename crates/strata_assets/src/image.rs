//! Image Resolution
//!
//! Maps decoded image descriptions onto GPU texture formats. Only four-channel
//! layouts are accepted, matching what the importer produces:
//!
//! | Components | Component type | Format         |
//! |------------|----------------|----------------|
//! | 4          | `u8`           | `Rgba8Unorm`   |
//! | 4          | `f32`          | `Rgba32Float`  |
//!
//! Everything else is [`Error::UnsupportedFormat`].

use std::sync::Arc;

use strata_core::errors::{Error, Result};

/// Scalar type of each pixel component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelComponent {
    U8,
    U16,
    F32,
}

impl PixelComponent {
    #[must_use]
    pub const fn bits(self) -> u32 {
        match self {
            Self::U8 => 8,
            Self::U16 => 16,
            Self::F32 => 32,
        }
    }
}

/// Decoded pixels of one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageDesc {
    pub name: Option<String>,
    pub width: u32,
    pub height: u32,
    /// Channels per pixel.
    pub components: u32,
    pub component: PixelComponent,
    /// Rows top to bottom, tightly packed.
    pub data: Arc<[u8]>,
}

impl ImageDesc {
    #[must_use]
    pub fn rgba8(width: u32, height: u32, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: None,
            width,
            height,
            components: 4,
            component: PixelComponent::U8,
            data: data.into(),
        }
    }
}

/// An image ready for `Queue::write_texture`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureUpload {
    pub image: usize,
    pub format: wgpu::TextureFormat,
    pub width: u32,
    pub height: u32,
    /// Bytes per row of pixels.
    pub row_pitch: u32,
    pub data: Arc<[u8]>,
}

impl TextureUpload {
    #[must_use]
    pub fn extent(&self) -> wgpu::Extent3d {
        wgpu::Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: 1,
        }
    }
}

/// Picks the texture format and row pitch of image `index`.
pub fn resolve_image(index: usize, desc: &ImageDesc) -> Result<TextureUpload> {
    let format = match (desc.component, desc.components) {
        (PixelComponent::U8, 4) => wgpu::TextureFormat::Rgba8Unorm,
        (PixelComponent::F32, 4) => wgpu::TextureFormat::Rgba32Float,
        (component, components) => {
            return Err(Error::unsupported_format(
                index,
                format!("{components} channels of {} bits", component.bits()),
            ));
        }
    };

    if desc.width == 0 || desc.height == 0 {
        return Err(Error::unsupported_format(
            index,
            format!("zero-sized image {}x{}", desc.width, desc.height),
        ));
    }

    let row_pitch = u64::from(desc.components) * u64::from(desc.width) * u64::from(desc.component.bits()) / 8;
    let expected = row_pitch * u64::from(desc.height);
    if expected != desc.data.len() as u64 {
        return Err(Error::unsupported_format(
            index,
            format!("expected {expected} bytes of pixel data, found {}", desc.data.len()),
        ));
    }
    let row_pitch = u32::try_from(row_pitch)
        .map_err(|_| Error::unsupported_format(index, format!("row pitch {row_pitch} exceeds u32")))?;

    Ok(TextureUpload {
        image: index,
        format,
        width: desc.width,
        height: desc.height,
        row_pitch,
        data: Arc::clone(&desc.data),
    })
}
