/// Index data of a primitive, kept at its stored component width.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexBuffer {
    U16(Vec<u16>),
    U32(Vec<u32>),
    /// Signed 16-bit indices, as some exporters write them.
    I16(Vec<i16>),
}

impl IndexBuffer {
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::U16(v) => v.len(),
            Self::U32(v) => v.len(),
            Self::I16(v) => v.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw little-endian bytes, ready for a buffer upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::U16(v) => bytemuck::cast_slice(v),
            Self::U32(v) => bytemuck::cast_slice(v),
            Self::I16(v) => bytemuck::cast_slice(v),
        }
    }

    /// Size of one index in bytes.
    #[must_use]
    pub fn stride(&self) -> usize {
        match self {
            Self::U16(_) | Self::I16(_) => 2,
            Self::U32(_) => 4,
        }
    }

    /// The matching wgpu index format.
    ///
    /// wgpu has no signed index format; `I16` data is reinterpreted as
    /// `Uint16`, which is exact for every non-negative index.
    #[must_use]
    pub fn format(&self) -> wgpu::IndexFormat {
        match self {
            Self::U16(_) | Self::I16(_) => wgpu::IndexFormat::Uint16,
            Self::U32(_) => wgpu::IndexFormat::Uint32,
        }
    }

    /// Largest index value, or `None` for an empty buffer.
    #[must_use]
    pub fn max_index(&self) -> Option<u32> {
        match self {
            Self::U16(v) => v.iter().max().map(|&i| u32::from(i)),
            Self::U32(v) => v.iter().max().copied(),
            Self::I16(v) => v.iter().max().map(|&i| i.max(0) as u32),
        }
    }
}
