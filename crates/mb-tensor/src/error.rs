use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TensorError {
    #[error("invalid dimension: {rows}x{cols} (both dimensions must be at least 1)")]
    InvalidDimension { rows: usize, cols: usize },
    #[error("cannot parse matrix shape {0:?}, expected ROWSxCOLS")]
    InvalidShapeSyntax(String),
    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch { expected: Vec<usize>, got: Vec<usize> },
    #[error("matmul dimension mismatch: [{m}x{k}] @ [{k2}x{n}]")]
    MatmulMismatch {
        m: usize,
        k: usize,
        k2: usize,
        n: usize,
    },
    #[error("cannot allocate {rows}x{cols} f64 buffer: {reason}")]
    Allocation {
        rows: usize,
        cols: usize,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, TensorError>;
