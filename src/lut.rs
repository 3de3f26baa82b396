use rayon::prelude::*;

use crate::expression::CompiledExpr;
use crate::expression::vm::{Operand, eval_program_with_stack};
use crate::foundation::core::PlaneDims;
use crate::foundation::error::{DrawError, DrawResult};

/// Row-major per-coordinate values for one plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Lut {
    dims: PlaneDims,
    data: Vec<f32>,
}

impl Lut {
    /// Wrap precomputed values; `data.len()` must equal `dims.len()`.
    pub fn from_vec(dims: PlaneDims, data: Vec<f32>) -> DrawResult<Self> {
        if data.len() != dims.len() {
            return Err(DrawError::config(format!(
                "lut for {}x{} plane needs {} values, got {}",
                dims.width,
                dims.height,
                dims.len(),
                data.len()
            )));
        }
        Ok(Self { dims, data })
    }

    pub fn dims(&self) -> PlaneDims {
        self.dims
    }

    pub fn width(&self) -> u32 {
        self.dims.width
    }

    pub fn height(&self) -> u32 {
        self.dims.height
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Value at column `x`, row `y`.
    pub fn get(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.dims.width || y >= self.dims.height {
            return None;
        }
        self.data
            .get(y as usize * self.dims.width as usize + x as usize)
            .copied()
    }

    pub fn row(&self, y: u32) -> Option<&[f32]> {
        if y >= self.dims.height {
            return None;
        }
        let w = self.dims.width as usize;
        let start = y as usize * w;
        self.data.get(start..start + w)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
/// Threading controls for LUT construction.
pub struct LutThreading {
    /// Split rows across a rayon pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

impl Default for LutThreading {
    fn default() -> Self {
        Self {
            parallel: true,
            threads: None,
        }
    }
}

impl LutThreading {
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            threads: None,
        }
    }

    pub fn validate(&self) -> DrawResult<()> {
        if let Some(n) = self.threads
            && n == 0
        {
            return Err(DrawError::config(
                "lut threading 'threads' must be >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// Evaluates expressions into LUTs with one fixed threading setup.
///
/// A dedicated rayon pool (`threads: Some(n)`) is built once here and shared
/// by every [`LutBuilder::build`] call.
#[derive(Debug)]
pub struct LutBuilder {
    parallel: bool,
    pool: Option<rayon::ThreadPool>,
}

impl LutBuilder {
    pub fn new(threading: &LutThreading) -> DrawResult<Self> {
        threading.validate()?;
        let pool = match (threading.parallel, threading.threads) {
            (true, Some(n)) => Some(build_thread_pool(n)?),
            _ => None,
        };
        Ok(Self {
            parallel: threading.parallel,
            pool,
        })
    }

    /// Worker count of the dedicated pool, if one was built.
    pub fn pool_threads(&self) -> Option<usize> {
        self.pool.as_ref().map(rayon::ThreadPool::current_num_threads)
    }

    /// Evaluate `expr` at every coordinate of a `dims` plane.
    #[tracing::instrument(skip(self, expr), fields(expr = expr.source()))]
    pub fn build(&self, expr: &CompiledExpr, dims: PlaneDims) -> DrawResult<Lut> {
        let mut data = vec![0.0f32; dims.len()];

        if !dims.is_empty() {
            match (&self.pool, self.parallel) {
                (Some(pool), _) => pool.install(|| fill_rows_parallel(expr, dims, &mut data))?,
                (None, true) => fill_rows_parallel(expr, dims, &mut data)?,
                (None, false) => fill_rows_sequential(expr, dims, &mut data)?,
            }
        }

        Ok(Lut { dims, data })
    }
}

/// One-off LUT build; see [`LutBuilder`] to reuse a thread pool.
pub fn build_lut(
    expr: &CompiledExpr,
    dims: PlaneDims,
    threading: &LutThreading,
) -> DrawResult<Lut> {
    LutBuilder::new(threading)?.build(expr, dims)
}

fn fill_rows_sequential(expr: &CompiledExpr, dims: PlaneDims, data: &mut [f32]) -> DrawResult<()> {
    let mut stack: Vec<Operand> = Vec::with_capacity(expr.program().len());
    for (y, row) in data.chunks_mut(dims.width as usize).enumerate() {
        fill_row(expr, y as u32, row, &mut stack)?;
    }
    Ok(())
}

fn fill_rows_parallel(expr: &CompiledExpr, dims: PlaneDims, data: &mut [f32]) -> DrawResult<()> {
    let cap = expr.program().len();
    data.par_chunks_mut(dims.width as usize)
        .enumerate()
        .try_for_each_init(
            || Vec::<Operand>::with_capacity(cap),
            |stack, (y, row)| fill_row(expr, y as u32, row, stack),
        )
}

fn fill_row(
    expr: &CompiledExpr,
    y: u32,
    row: &mut [f32],
    stack: &mut Vec<Operand>,
) -> DrawResult<()> {
    for (x, out) in row.iter_mut().enumerate() {
        *out = eval_program_with_stack(expr.program(), stack, x as u32, y)?;
    }
    Ok(())
}

fn build_thread_pool(threads: usize) -> DrawResult<rayon::ThreadPool> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| DrawError::config(format!("failed to build rayon thread pool: {e}")))
}

#[cfg(test)]
#[path = "../tests/unit/lut.rs"]
mod tests;
