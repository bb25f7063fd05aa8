use std::fmt;

use mb_tensor::MatrixSpec;
use serde::Serialize;

use crate::operation::OperationKind;

/// Outcome of one matrix benchmark run. Only metadata is kept; the matrices
/// themselves are dropped when the run ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BenchmarkResult {
    pub operation: OperationKind,
    pub backend: String,
    pub input_shapes: Vec<MatrixSpec>,
    pub result_shape: MatrixSpec,
    /// Wall-clock seconds spent in the single timed operation.
    pub elapsed_seconds: f64,
}

impl fmt::Display for BenchmarkResult {
    /// One line, e.g.
    /// `Computed transpose(X) * X for X of shape 1000x10000 in 4.32 seconds.`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Computed {} for ", self.operation.formula())?;
        match (self.operation, self.input_shapes.as_slice()) {
            (OperationKind::DotProduct, [a]) => write!(f, "A and B of shape {a}")?,
            (OperationKind::TransposeMultiplyAb, [a, b]) => {
                write!(f, "A of shape {a} and B of shape {b}")?
            }
            (OperationKind::TransposeMultiplyXx, [x]) => write!(f, "X of shape {x}")?,
            (_, shapes) => {
                let shapes: Vec<String> = shapes.iter().map(|s| s.to_string()).collect();
                write!(f, "shapes {}", shapes.join(", "))?
            }
        }
        write!(f, " in {:.2} seconds.", self.elapsed_seconds)
    }
}
