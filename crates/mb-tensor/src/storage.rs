use rand::Rng;

use crate::error::{Result, TensorError};
use crate::shape::MatrixSpec;

fn alloc_error(spec: MatrixSpec, reason: impl Into<String>) -> TensorError {
    TensorError::Allocation {
        rows: spec.rows(),
        cols: spec.cols(),
        reason: reason.into(),
    }
}

/// Reserve an empty buffer with exact capacity for `spec`.
///
/// Fails instead of aborting when the element count overflows or the
/// allocator refuses the request.
fn reserve(spec: MatrixSpec) -> Result<(Vec<f64>, usize)> {
    let n = spec
        .numel()
        .ok_or_else(|| alloc_error(spec, "element count overflows usize"))?;
    let mut buf = Vec::new();
    buf.try_reserve_exact(n)
        .map_err(|e| alloc_error(spec, e.to_string()))?;
    Ok((buf, n))
}

/// Allocate a zero-filled buffer for a matrix of shape `spec`.
pub fn try_zeros(spec: MatrixSpec) -> Result<Vec<f64>> {
    let (mut buf, n) = reserve(spec)?;
    buf.resize(n, 0.0);
    Ok(buf)
}

/// Allocate a buffer for `spec` filled with independent uniform draws from [0, 1).
pub fn try_random<R: Rng + ?Sized>(spec: MatrixSpec, rng: &mut R) -> Result<Vec<f64>> {
    let (mut buf, n) = reserve(spec)?;
    buf.extend((0..n).map(|_| rng.gen::<f64>()));
    Ok(buf)
}
