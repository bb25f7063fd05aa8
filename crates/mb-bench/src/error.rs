use mb_tensor::TensorError;
use thiserror::Error;

/// The two ways a benchmark invocation can fail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BenchError {
    #[error("ShapeMismatchError: {reason} (got {})", format_dims(.dims))]
    ShapeMismatch {
        reason: String,
        dims: Vec<Vec<usize>>,
    },
    #[error("AllocationError: cannot allocate a {rows}x{cols} matrix: {reason}")]
    Allocation {
        rows: usize,
        cols: usize,
        reason: String,
    },
}

impl BenchError {
    pub(crate) fn shape(reason: impl Into<String>, dims: Vec<Vec<usize>>) -> Self {
        BenchError::ShapeMismatch {
            reason: reason.into(),
            dims,
        }
    }
}

fn format_dims(dims: &[Vec<usize>]) -> String {
    if dims.is_empty() {
        return "no shapes".to_string();
    }
    dims.iter()
        .map(|d| {
            d.iter()
                .map(|x| x.to_string())
                .collect::<Vec<_>>()
                .join("x")
        })
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<TensorError> for BenchError {
    fn from(err: TensorError) -> Self {
        match err {
            TensorError::Allocation { rows, cols, reason } => {
                BenchError::Allocation { rows, cols, reason }
            }
            TensorError::InvalidDimension { rows, cols } => BenchError::shape(
                "matrix dimensions must be at least 1",
                vec![vec![rows, cols]],
            ),
            TensorError::InvalidShapeSyntax(text) => {
                BenchError::shape(format!("cannot parse shape {text:?}"), vec![])
            }
            TensorError::ShapeMismatch { expected, got } => {
                BenchError::shape("operand does not match its shape", vec![expected, got])
            }
            TensorError::MatmulMismatch { m, k, k2, n } => BenchError::shape(
                "contraction dimensions differ",
                vec![vec![m, k], vec![k2, n]],
            ),
        }
    }
}

pub type Result<T> = std::result::Result<T, BenchError>;
