use crate::backend::{alloc_output, check_operand, ComputeBackend};
use crate::error::{Result, TensorError};

/// Compute backend built on the cache-blocked `dgemm` kernel of the
/// `matrixmultiply` crate.
///
/// `dgemm` addresses every operand through explicit row and column strides,
/// so A^T @ B is the same call as A @ B with the strides of A swapped.
#[derive(Debug, Clone)]
pub struct GemmBackend;

impl GemmBackend {
    pub fn new() -> Self {
        GemmBackend
    }

    /// C[m x n] = op(A)[m x k] @ B[k x n], where op(A) is described by
    /// `(rsa, csa)`.
    fn gemm(
        a: &[f64],
        (rsa, csa): (usize, usize),
        b: &[f64],
        m: usize,
        k: usize,
        n: usize,
    ) -> Result<Vec<f64>> {
        let mut c = alloc_output(m, n)?;
        // SAFETY: the operands were length-checked against m, k, n by the
        // caller and `c` holds exactly m * n elements, so every strided
        // access dgemm makes stays in bounds.
        unsafe {
            matrixmultiply::dgemm(
                m,
                k,
                n,
                1.0,
                a.as_ptr(),
                rsa as isize,
                csa as isize,
                b.as_ptr(),
                n as isize,
                1,
                0.0,
                c.as_mut_ptr(),
                n as isize,
                1,
            );
        }
        Ok(c)
    }
}

impl Default for GemmBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl ComputeBackend for GemmBackend {
    fn name(&self) -> &str {
        "gemm"
    }

    fn matmul(&self, a: &[f64], b: &[f64], m: usize, k: usize, n: usize) -> Result<Vec<f64>> {
        check_operand(a, m, k)?;
        check_operand(b, k, n)?;
        Self::gemm(a, (k, 1), b, m, k, n)
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
        // a is stored [k x m]; element (i, p) of A^T lives at a[p * m + i].
        Self::gemm(a, (1, m), b, m, k, n)
    }

    fn dot(&self, a: &[f64], b: &[f64]) -> Result<f64> {
        if a.len() != b.len() {
            return Err(TensorError::ShapeMismatch {
                expected: vec![a.len()],
                got: vec![b.len()],
            });
        }
        if a.is_empty() {
            return Ok(0.0);
        }
        // [1 x k] @ [k x 1]
        let c = Self::gemm(a, (a.len(), 1), b, 1, a.len(), 1)?;
        Ok(c[0])
    }
}
