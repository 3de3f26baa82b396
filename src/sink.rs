use crate::foundation::core::{PlaneDims, VideoFormat};
use crate::foundation::error::{DrawError, DrawResult};
use crate::lut::Lut;

/// Consumer of per-plane LUTs.
///
/// The sink owns sample memory and decides how floats become samples; the
/// drawing core never clamps or rounds.
pub trait FrameSink {
    /// Number of planes the sink holds.
    fn plane_count(&self) -> usize;
    /// Pixel grid of `plane`.
    fn plane_dims(&self, plane: usize) -> PlaneDims;
    /// Store `lut` into `plane`.
    fn write_plane(&mut self, plane: usize, lut: &Lut) -> DrawResult<()>;
}

/// Sample storage of one plane.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaneData {
    U8(Vec<u8>),
    U16(Vec<u16>),
}

/// One plane of a planar integer frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plane {
    dims: PlaneDims,
    /// Samples per row, `>= dims.width`.
    stride: usize,
    /// Largest value the format's bit depth allows.
    max_sample: u16,
    data: PlaneData,
}

impl Plane {
    fn blank(dims: PlaneDims, stride: usize, format: &VideoFormat) -> Self {
        let len = stride * dims.height as usize;
        let data = if format.bytes_per_sample() == 1 {
            PlaneData::U8(vec![0; len])
        } else {
            PlaneData::U16(vec![0; len])
        };
        let max_sample = u16::try_from(format.max_sample()).unwrap_or(u16::MAX);
        Self {
            dims,
            stride,
            max_sample,
            data,
        }
    }

    pub fn dims(&self) -> PlaneDims {
        self.dims
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn data(&self) -> &PlaneData {
        &self.data
    }

    /// Sample at column `x`, row `y`, widened to `u16`.
    pub fn sample(&self, x: u32, y: u32) -> Option<u16> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        let i = y as usize * self.stride + x as usize;
        match &self.data {
            PlaneData::U8(v) => v.get(i).map(|&s| u16::from(s)),
            PlaneData::U16(v) => v.get(i).copied(),
        }
    }

    /// Overwrite the sample at `(x, y)`; the value is saturated to the format's bit depth.
    pub fn set_sample(&mut self, x: u32, y: u32, value: u16) -> DrawResult<()> {
        if x >= self.dims.width || y >= self.dims.height {
            return Err(DrawError::config(format!(
                "sample ({x}, {y}) outside {}x{} plane",
                self.dims.width, self.dims.height
            )));
        }
        let i = y as usize * self.stride + x as usize;
        let value = value.min(self.max_sample);
        match &mut self.data {
            PlaneData::U8(v) => v[i] = value as u8,
            PlaneData::U16(v) => v[i] = value,
        }
        Ok(())
    }

    /// Tightly packed rows (stride padding removed).
    pub fn packed_samples(&self) -> PlaneData {
        let w = self.dims.width as usize;
        let h = self.dims.height as usize;
        match &self.data {
            PlaneData::U8(v) => PlaneData::U8(pack_rows(v, w, h, self.stride)),
            PlaneData::U16(v) => PlaneData::U16(pack_rows(v, w, h, self.stride)),
        }
    }
}

fn pack_rows<T: Copy>(src: &[T], width: usize, height: usize, stride: usize) -> Vec<T> {
    let mut out = Vec::with_capacity(width * height);
    for row in src.chunks(stride.max(1)).take(height) {
        out.extend_from_slice(&row[..width]);
    }
    out
}

/// Planar integer frame; the crate's own [`FrameSink`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    format: VideoFormat,
    planes: Vec<Plane>,
}

/// Row alignment used for freshly allocated planes, in samples.
const ROW_ALIGN: usize = 32;

impl Frame {
    /// Allocate a zero-filled frame for `format`.
    pub fn new(format: VideoFormat) -> DrawResult<Self> {
        format.validate()?;
        let planes = (0..format.num_planes as usize)
            .map(|p| {
                let dims = format.plane_dims(p);
                let stride = (dims.width as usize).div_ceil(ROW_ALIGN) * ROW_ALIGN;
                Plane::blank(dims, stride, &format)
            })
            .collect();
        Ok(Self { format, planes })
    }

    pub fn format(&self) -> &VideoFormat {
        &self.format
    }

    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    pub fn plane(&self, plane: usize) -> Option<&Plane> {
        self.planes.get(plane)
    }

    pub fn plane_mut(&mut self, plane: usize) -> Option<&mut Plane> {
        self.planes.get_mut(plane)
    }

    fn checked_plane_mut(&mut self, plane: usize) -> DrawResult<&mut Plane> {
        let count = self.planes.len();
        self.planes.get_mut(plane).ok_or_else(|| {
            DrawError::config(format!("plane {plane} out of range ({count} planes)"))
        })
    }
}

impl FrameSink for Frame {
    fn plane_count(&self) -> usize {
        self.planes.len()
    }

    fn plane_dims(&self, plane: usize) -> PlaneDims {
        self.planes
            .get(plane)
            .map(Plane::dims)
            .unwrap_or(PlaneDims::new(0, 0))
    }

    /// Truncates toward zero and saturates to the format's bit depth; NaN becomes 0.
    fn write_plane(&mut self, plane: usize, lut: &Lut) -> DrawResult<()> {
        let max = self.format.max_sample() as f32;
        let target = self.checked_plane_mut(plane)?;
        if lut.dims() != target.dims {
            return Err(DrawError::config(format!(
                "lut is {}x{} but plane {plane} is {}x{}",
                lut.width(),
                lut.height(),
                target.dims.width,
                target.dims.height
            )));
        }

        let w = target.dims.width as usize;
        if w == 0 {
            return Ok(());
        }
        let stride = target.stride;
        let values = lut.as_slice().chunks(w);
        match &mut target.data {
            PlaneData::U8(dst) => {
                for (dst_row, src_row) in dst.chunks_mut(stride).zip(values) {
                    for (d, &v) in dst_row.iter_mut().zip(src_row) {
                        *d = to_sample(v, max) as u8;
                    }
                }
            }
            PlaneData::U16(dst) => {
                for (dst_row, src_row) in dst.chunks_mut(stride).zip(values) {
                    for (d, &v) in dst_row.iter_mut().zip(src_row) {
                        *d = to_sample(v, max) as u16;
                    }
                }
            }
        }
        Ok(())
    }
}

#[inline]
fn to_sample(v: f32, max: f32) -> f32 {
    // `clamp` keeps NaN, the integer cast below maps it to 0.
    v.clamp(0.0, max)
}

#[cfg(test)]
#[path = "../tests/unit/sink.rs"]
mod tests;
