use std::sync::Arc;

use crate::expression::{CompiledExpr, Representation};
use crate::foundation::core::{MAX_PLANES, VideoFormat};
use crate::foundation::error::{DrawError, DrawResult};
use crate::lut::{Lut, LutBuilder, LutThreading};
use crate::sink::{Frame, FrameSink};

/// User-facing filter configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DrawConfig {
    /// One expression per plane. Missing trailing planes reuse the last one;
    /// a blank expression leaves its plane untouched.
    pub exprs: Vec<String>,
    #[serde(default)]
    pub representation: Representation,
    #[serde(default)]
    pub threading: LutThreading,
}

impl DrawConfig {
    pub fn new<S: Into<String>>(exprs: impl IntoIterator<Item = S>) -> Self {
        Self {
            exprs: exprs.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    pub fn with_threading(mut self, threading: LutThreading) -> Self {
        self.threading = threading;
        self
    }
}

#[derive(Debug)]
struct PlaneLut {
    expr: Arc<CompiledExpr>,
    lut: Lut,
}

/// Constructed drawing filter: compiled expressions plus one LUT per processed plane.
///
/// Construction does all the work; applying the filter to a frame only copies
/// LUT values into the sink.
#[derive(Debug)]
pub struct DrawFilter {
    format: VideoFormat,
    planes: Vec<Option<PlaneLut>>,
}

impl DrawFilter {
    #[tracing::instrument(skip(config), fields(exprs = config.exprs.len()))]
    pub fn new(format: VideoFormat, config: &DrawConfig) -> DrawResult<Self> {
        format.validate()?;
        let builder = LutBuilder::new(&config.threading)?;

        let num_planes = format.num_planes as usize;
        if config.exprs.is_empty() {
            return Err(DrawError::config("at least one expression is required"));
        }
        if config.exprs.len() > num_planes {
            return Err(DrawError::config(format!(
                "too many expressions: {} given, format has {num_planes} planes",
                config.exprs.len()
            )));
        }

        let mut compiled: Vec<Option<Arc<CompiledExpr>>> =
            Vec::with_capacity(config.exprs.len());
        for (i, src) in config.exprs.iter().enumerate() {
            if src.trim().is_empty() {
                compiled.push(None);
                continue;
            }
            let expr = CompiledExpr::compile(src, config.representation)
                .map_err(|e| with_plane_context(e, i))?;
            compiled.push(Some(Arc::new(expr)));
        }

        let mut planes = Vec::with_capacity(MAX_PLANES);
        for p in 0..num_planes {
            let slot = compiled.get(p).or(compiled.last()).cloned().flatten();
            let Some(expr) = slot else {
                tracing::debug!(plane = p, "plane copied from source");
                planes.push(None);
                continue;
            };
            if p >= compiled.len() {
                tracing::debug!(plane = p, expr = expr.source(), "reusing last expression");
            }
            let dims = format.plane_dims(p);
            let lut = builder
                .build(&expr, dims)
                .map_err(|e| with_plane_context(e, p))?;
            planes.push(Some(PlaneLut { expr, lut }));
        }

        Ok(Self { format, planes })
    }

    pub fn format(&self) -> &VideoFormat {
        &self.format
    }

    /// Whether `plane` is overwritten by this filter.
    pub fn processes(&self, plane: usize) -> bool {
        matches!(self.planes.get(plane), Some(Some(_)))
    }

    pub fn lut(&self, plane: usize) -> Option<&Lut> {
        self.planes.get(plane)?.as_ref().map(|p| &p.lut)
    }

    pub fn expr(&self, plane: usize) -> Option<&Arc<CompiledExpr>> {
        self.planes.get(plane)?.as_ref().map(|p| &p.expr)
    }

    /// Write every processed plane into `sink`; other planes are left alone.
    ///
    /// The sink's geometry is checked for all planes before anything is
    /// written, so a mismatch leaves the sink unmodified.
    pub fn apply(&self, sink: &mut dyn FrameSink) -> DrawResult<()> {
        if sink.plane_count() != self.planes.len() {
            return Err(DrawError::config(format!(
                "sink has {} planes, filter was built for {}",
                sink.plane_count(),
                self.planes.len()
            )));
        }
        for (p, plane) in self.processed() {
            let want = plane.lut.dims();
            let got = sink.plane_dims(p);
            if want != got {
                return Err(DrawError::config(format!(
                    "plane {p} is {}x{}, filter expects {}x{}",
                    got.width, got.height, want.width, want.height
                )));
            }
        }
        for (p, plane) in self.processed() {
            sink.write_plane(p, &plane.lut)?;
        }
        Ok(())
    }

    fn processed(&self) -> impl Iterator<Item = (usize, &PlaneLut)> {
        self.planes
            .iter()
            .enumerate()
            .filter_map(|(p, slot)| slot.as_ref().map(|plane| (p, plane)))
    }

    /// Produce the output frame for `src`: unprocessed planes are copied.
    pub fn process_frame(&self, src: &Frame) -> DrawResult<Frame> {
        if src.format() != &self.format {
            return Err(DrawError::config(
                "frame format differs from the filter's format",
            ));
        }
        let mut dst = src.clone();
        self.apply(&mut dst)?;
        Ok(dst)
    }
}

fn with_plane_context(err: DrawError, plane: usize) -> DrawError {
    match err {
        DrawError::Lex(m) => DrawError::Lex(format!("plane {plane}: {m}")),
        DrawError::Arity(m) => DrawError::Arity(format!("plane {plane}: {m}")),
        DrawError::Balance(m) => DrawError::Balance(format!("plane {plane}: {m}")),
        DrawError::Type(m) => DrawError::Type(format!("plane {plane}: {m}")),
        DrawError::Config(m) => DrawError::Config(format!("plane {plane}: {m}")),
        other => other,
    }
}

#[cfg(test)]
#[path = "../tests/unit/filter.rs"]
mod tests;
