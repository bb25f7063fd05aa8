//! Timing of elementary vector operations: filling a vector with random
//! values, summing it, and taking its Euclidean norm through the inner
//! product of both the reference `CpuBackend` and the selected backend, so
//! one run shows the two side by side.

use std::fmt;
use std::time::Instant;

use mb_tensor::{storage, ComputeBackend, CpuBackend, MatrixSpec};
use rand::Rng;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{BenchError, Result};

/// Default number of elements in the timed vector.
pub const DEFAULT_VECTOR_LEN: usize = 10_000_000;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VectorBenchmarkResult {
    pub backend: String,
    pub len: usize,
    pub init_seconds: f64,
    pub sum: f64,
    pub sum_seconds: f64,
    pub norm: f64,
    pub norm_seconds: f64,
    /// Norm computed by the reference loop backend on the same data.
    pub reference_norm: f64,
    pub reference_norm_seconds: f64,
}

impl fmt::Display for VectorBenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Initialized {} random elements in {:.4} seconds.",
            self.len, self.init_seconds
        )?;
        writeln!(
            f,
            "Sum of elements = {} calculated in {:.4} seconds.",
            self.sum, self.sum_seconds
        )?;
        writeln!(
            f,
            "Norm of vector (cpu) = {} calculated in {:.4} seconds.",
            self.reference_norm, self.reference_norm_seconds
        )?;
        write!(
            f,
            "Norm of vector ({}) = {} calculated in {:.4} seconds.",
            self.backend, self.norm, self.norm_seconds
        )
    }
}

pub(crate) fn run<R: Rng + ?Sized>(
    backend: &dyn ComputeBackend,
    rng: &mut R,
    len: usize,
) -> Result<VectorBenchmarkResult> {
    if len == 0 {
        return Err(BenchError::shape(
            "vector length must be at least 1",
            vec![vec![len]],
        ));
    }
    let spec = MatrixSpec::new(1, len)?;

    info!(len, "initializing random vector");
    let start = Instant::now();
    let v = storage::try_random(spec, rng)?;
    let init_seconds = start.elapsed().as_secs_f64();

    let start = Instant::now();
    let sum: f64 = v.iter().sum();
    let sum_seconds = start.elapsed().as_secs_f64();

    let (reference_norm, reference_norm_seconds) = timed_norm(&CpuBackend::new(), &v)?;
    let (norm, norm_seconds) = timed_norm(backend, &v)?;
    debug!(
        init_seconds,
        sum_seconds,
        reference_norm_seconds,
        norm_seconds,
        "vector timings"
    );

    Ok(VectorBenchmarkResult {
        backend: backend.name().to_string(),
        len,
        init_seconds,
        sum,
        sum_seconds,
        norm,
        norm_seconds,
        reference_norm,
        reference_norm_seconds,
    })
}

fn timed_norm(backend: &dyn ComputeBackend, v: &[f64]) -> Result<(f64, f64)> {
    let start = Instant::now();
    let norm = backend.dot(v, v)?.sqrt();
    Ok((norm, start.elapsed().as_secs_f64()))
}
