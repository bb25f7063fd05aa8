pub mod matmul;

use crate::backend::{alloc_output, check_operand, ComputeBackend};
use crate::error::{Result, TensorError};

/// Pure-Rust CPU compute backend.
///
/// Implements all operations with straightforward loops optimized for
/// correctness rather than peak performance. Intended as a reference
/// implementation for the faster backends to be checked against.
#[derive(Debug, Clone)]
pub struct CpuBackend;

impl CpuBackend {
    pub fn new() -> Self {
        CpuBackend
    }
}

impl Default for CpuBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for CpuBackend {
    fn name(&self) -> &str {
        "cpu"
    }

    fn matmul(&self, a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<Vec<f64>> {
        check_operand(a, m, k)?;
        check_operand(b, k, n)?;

        let mut c = alloc_output(m, n)?;
        matmul::gemm_nn(a, b, &mut c, m, k, n);
        Ok(c)
    }

    fn matmul_tn(
        &self,
        a: &[f64],
        b: &[f64],
        k: usize,
        m: usize,
        n: usize,
    ) -> Result<Vec<f64>> {
        check_operand(a, k, m)?;
        check_operand(b, k, n)?;

        let mut c = alloc_output(m, n)?;
        matmul::gemm_tn(a, b, &mut c, k, m, n);
        Ok(c)
    }

    fn dot(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        if a.len() != b.len() {
            return Err(TensorError::ShapeMismatch {
                expected: vec![a.len()],
                got: vec![b.len()],
            });
        }
        Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
    }
}
