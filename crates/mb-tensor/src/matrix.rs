use rand::Rng;
use tracing::debug;

use crate::backend::ComputeBackend;
use crate::cpu::matmul;
use crate::error::{Result, TensorError};
use crate::shape::MatrixSpec;
use crate::storage;

/// A dense, row-major matrix of f64 values.
///
/// Operations that require computation are dispatched to a `ComputeBackend`.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    data: Vec<f64>,
    spec: MatrixSpec,
}

impl Matrix {
    /// Create a matrix from row-major data and a shape.
    ///
    /// # Panics
    /// Panics if `data.len()` is not `rows * cols`.
    pub fn new(data: Vec<f64>, spec: MatrixSpec) -> Self {
        assert_eq!(
            Some(data.len()),
            spec.numel(),
            "data length {} does not match shape {}",
            data.len(),
            spec,
        );
        Matrix { data, spec }
    }

    /// Create a zero-filled matrix.
    pub fn zeros(spec: MatrixSpec) -> Result<Self> {
        Ok(Matrix {
            data: storage::try_zeros(spec)?,
            spec,
        })
    }

    /// Create a matrix whose entries are independent uniform draws from [0, 1).
    pub fn random<R: Rng + ?Sized>(spec: MatrixSpec, rng: &mut R) -> Result<Self> {
        debug!(shape = %spec, "generating random matrix");
        Ok(Matrix {
            data: storage::try_random(spec, rng)?,
            spec,
        })
    }

    pub fn spec(&self) -> MatrixSpec {
        self.spec
    }

    pub fn rows(&self) -> usize {
        self.spec.rows()
    }

    pub fn cols(&self) -> usize {
        self.spec.cols()
    }

    /// Returns the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Element at row `i`, column `j`.
    ///
    /// # Panics
    /// Panics if the index is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f64 {
        assert!(
            i < self.rows() && j < self.cols(),
            "index ({i}, {j}) out of bounds for {}",
            self.spec
        );
        self.data[i * self.cols() + j]
    }

    /// Matrix product `self @ other`.
    ///
    /// self is [m, k], other is [k, n], result is [m, n]. The backend
    /// allocates and zero-fills the [m, n] output as part of this call, so
    /// a caller timing it also times that fill (800 MB for a 10000x10000
    /// result).
    pub fn matmul(&self, other: &Matrix, backend: &dyn ComputeBackend) -> Result<Matrix> {
        let (m, k) = (self.rows(), self.cols());
        let (k2, n) = (other.rows(), other.cols());
        if k != k2 {
            return Err(TensorError::MatmulMismatch { m, k, k2, n });
        }

        let data = backend.matmul(&self.data, &other.data, m, k, n)?;
        Ok(Matrix::new(data, MatrixSpec::new(m, n)?))
    }

    /// Transposed-left product `self^T @ other` without copying `self`.
    ///
    /// self is [k, m], other is [k, n], result is [m, n]. As with
    /// [`matmul`](Self::matmul), the zero-filled output buffer is allocated
    /// inside the call.
    pub fn transpose_matmul(
        &self,
        other: &Matrix,
        backend: &dyn ComputeBackend,
    ) -> Result<Matrix> {
        let (k, m) = (self.rows(), self.cols());
        let (k2, n) = (other.rows(), other.cols());
        if k != k2 {
            return Err(TensorError::MatmulMismatch { m, k, k2, n });
        }

        let data = backend.matmul_tn(&self.data, &other.data, k, m, n)?;
        Ok(Matrix::new(data, MatrixSpec::new(m, n)?))
    }

    /// Materialized transpose.
    pub fn transpose(&self) -> Result<Matrix> {
        let spec = self.spec.transposed();
        let mut data = storage::try_zeros(spec)?;
        matmul::transpose(&self.data, &mut data, self.rows(), self.cols());
        Ok(Matrix { data, spec })
    }

    /// True if the matrix is square and `|m[i][j] - m[j][i]| <= tol` everywhere.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        if !self.spec.is_square() {
            return false;
        }
        let n = self.rows();
        (0..n).all(|i| (i + 1..n).all(|j| (self.get(i, j) - self.get(j, i)).abs() <= tol))
    }
}
