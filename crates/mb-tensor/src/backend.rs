use std::fmt::{self, Debug};
use std::str::FromStr;

use crate::cpu::CpuBackend;
use crate::error::{Result, TensorError};
use crate::gemm::GemmBackend;
use crate::shape::MatrixSpec;
use crate::storage;

/// Trait for pluggable dense f64 compute backends.
///
/// Data is passed in as row-major slices and results are returned as owned
/// vectors. Result buffers are allocated fallibly, so an oversized request
/// surfaces as `TensorError::Allocation` instead of aborting the process.
pub trait ComputeBackend: Send + Sync + Debug {
    /// Returns the name of this backend (e.g., "cpu", "gemm").
    fn name(&self) -> &str;

    /// Matrix multiplication: C = A @ B.
    ///
    /// - `a`: row-major data of shape [m, k]
    /// - `b`: row-major data of shape [k, n]
    /// - Returns: row-major data of shape [m, n]
    fn matmul(&self, a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<Vec<f64>>;

    /// Transposed-left multiplication: C = A^T @ B.
    ///
    /// - `a`: row-major data of shape [k, m], read in transposed order
    /// - `b`: row-major data of shape [k, n]
    /// - Returns: row-major data of shape [m, n]
    ///
    /// The transpose of `a` is never materialized.
    fn matmul_tn(&self, a: &[f64], b: &[f64], k: usize, m: usize, n: usize)
        -> Result<Vec<f64>>;

    /// Inner product of two equal-length vectors.
    fn dot(&self, a: &[f64], b: &[f64]) -> Result<f64>;
}

/// Checks that `data` holds exactly `rows * cols` elements.
pub(crate) fn check_operand(data: &[f64], rows: usize, cols: usize) -> Result<()> {
    match rows.checked_mul(cols) {
        Some(n) if n == data.len() => Ok(()),
        _ => Err(TensorError::ShapeMismatch {
            expected: vec![rows, cols],
            got: vec![data.len()],
        }),
    }
}

/// Allocates the zero-filled `[m, n]` output of a product.
///
/// Runs inside every `matmul`/`matmul_tn` call, so its cost is part of any
/// timing taken around them.
pub(crate) fn alloc_output(m: usize, n: usize) -> Result<Vec<f64>> {
    storage::try_zeros(MatrixSpec::new(m, n)?)
}

/// Selects one of the built-in backends by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum BackendKind {
    /// Straightforward loops, the correctness reference.
    Cpu,
    /// Cache-blocked kernels from `matrixmultiply`.
    #[default]
    Gemm,
}

impl BackendKind {
    pub fn create(&self) -> Box<dyn ComputeBackend> {
        match self {
            BackendKind::Cpu => Box::new(CpuBackend::new()),
            BackendKind::Gemm => Box::new(GemmBackend::new()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Cpu => "cpu",
            BackendKind::Gemm => "gemm",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cpu" => Ok(BackendKind::Cpu),
            "gemm" => Ok(BackendKind::Gemm),
            other => Err(format!("unknown backend '{other}', expected 'cpu' or 'gemm'")),
        }
    }
}
