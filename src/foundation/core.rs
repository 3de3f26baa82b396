use crate::foundation::error::{DrawError, DrawResult};

/// Maximum number of planes a format may carry.
pub const MAX_PLANES: usize = 3;

/// Pixel grid of one plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct PlaneDims {
    /// Width in samples.
    pub width: u32,
    /// Height in samples.
    pub height: u32,
}

impl PlaneDims {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of samples in the plane.
    pub fn len(self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleType {
    #[default]
    Integer,
    Float,
}

/// Constant video format description, as negotiated with the host.
///
/// Subsampling is expressed as log2 factors: `subsampling_w == 1` halves the
/// width of planes 1 and 2.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct VideoFormat {
    /// Luma width in pixels.
    pub width: u32,
    /// Luma height in pixels.
    pub height: u32,
    /// Plane count (1 for gray, 3 for YUV/RGB).
    pub num_planes: u8,
    #[serde(default)]
    pub subsampling_w: u8,
    #[serde(default)]
    pub subsampling_h: u8,
    pub bits_per_sample: u8,
    #[serde(default)]
    pub sample_type: SampleType,
}

impl VideoFormat {
    /// Single-plane 8-bit format.
    pub fn gray8(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            num_planes: 1,
            subsampling_w: 0,
            subsampling_h: 0,
            bits_per_sample: 8,
            sample_type: SampleType::Integer,
        }
    }

    /// Three-plane format with 4:2:0 chroma.
    pub fn yuv420(width: u32, height: u32, bits_per_sample: u8) -> Self {
        Self {
            width,
            height,
            num_planes: 3,
            subsampling_w: 1,
            subsampling_h: 1,
            bits_per_sample,
            sample_type: SampleType::Integer,
        }
    }

    /// Three-plane format without subsampling.
    pub fn yuv444(width: u32, height: u32, bits_per_sample: u8) -> Self {
        Self {
            subsampling_w: 0,
            subsampling_h: 0,
            ..Self::yuv420(width, height, bits_per_sample)
        }
    }

    /// Reject formats the drawing pipeline cannot fill.
    pub fn validate(&self) -> DrawResult<()> {
        if self.sample_type != SampleType::Integer
            || !(8..=16).contains(&self.bits_per_sample)
        {
            return Err(DrawError::config(format!(
                "only constant 8..16 bit integer formats are supported (got {:?}, {} bits)",
                self.sample_type, self.bits_per_sample
            )));
        }
        if self.num_planes == 0 || self.num_planes as usize > MAX_PLANES {
            return Err(DrawError::config(format!(
                "format must have 1..={MAX_PLANES} planes (got {})",
                self.num_planes
            )));
        }
        if self.width == 0 || self.height == 0 {
            return Err(DrawError::config("format dimensions must be non-zero"));
        }
        if self.subsampling_w > 4 || self.subsampling_h > 4 {
            return Err(DrawError::config("subsampling factors must be <= 4"));
        }
        Ok(())
    }

    /// Dimensions of `plane`; planes after the first are subsampled.
    pub fn plane_dims(&self, plane: usize) -> PlaneDims {
        if plane == 0 {
            return PlaneDims::new(self.width, self.height);
        }
        PlaneDims::new(
            self.width >> self.subsampling_w,
            self.height >> self.subsampling_h,
        )
    }

    /// Bytes needed to hold one sample.
    pub fn bytes_per_sample(&self) -> usize {
        if self.bits_per_sample <= 8 { 1 } else { 2 }
    }

    /// Largest representable sample value.
    pub fn max_sample(&self) -> u32 {
        (1u32 << self.bits_per_sample) - 1
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
