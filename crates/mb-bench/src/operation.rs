use std::fmt;

use mb_tensor::MatrixSpec;
use serde::Serialize;

use crate::error::{BenchError, Result};

/// Default side length of the square operands of [`OperationKind::DotProduct`].
pub const DEFAULT_DOT_PRODUCT_SIZE: usize = 10;
/// Default `(rows, cols)` of both A and B in [`OperationKind::TransposeMultiplyAb`].
pub const DEFAULT_TRANSPOSE_AB_SHAPE: (usize, usize) = (6000, 4000);
/// Default `(rows, cols)` of X in [`OperationKind::TransposeMultiplyXx`].
pub const DEFAULT_TRANSPOSE_XX_SHAPE: (usize, usize) = (1000, 10000);

/// The linear-algebra operation a benchmark times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// A @ B for two independent n x n matrices.
    DotProduct,
    /// A^T @ B for independent A (n x m) and B (n x m').
    TransposeMultiplyAb,
    /// X^T @ X for a single X (n x p).
    TransposeMultiplyXx,
}

impl OperationKind {
    pub const ALL: [OperationKind; 3] = [
        OperationKind::DotProduct,
        OperationKind::TransposeMultiplyAb,
        OperationKind::TransposeMultiplyXx,
    ];

    /// Number of `MatrixSpec` values the operation takes.
    pub fn arity(&self) -> usize {
        match self {
            OperationKind::DotProduct | OperationKind::TransposeMultiplyXx => 1,
            OperationKind::TransposeMultiplyAb => 2,
        }
    }

    /// The operation written as a formula, e.g. `transpose(A) * B`.
    pub fn formula(&self) -> &'static str {
        match self {
            OperationKind::DotProduct => "A * B",
            OperationKind::TransposeMultiplyAb => "transpose(A) * B",
            OperationKind::TransposeMultiplyXx => "transpose(X) * X",
        }
    }

    /// The shapes used when the caller supplies none.
    pub fn default_inputs(&self) -> Result<Vec<MatrixSpec>> {
        let specs = match self {
            OperationKind::DotProduct => vec![MatrixSpec::square(DEFAULT_DOT_PRODUCT_SIZE)?],
            OperationKind::TransposeMultiplyAb => {
                let (rows, cols) = DEFAULT_TRANSPOSE_AB_SHAPE;
                vec![MatrixSpec::new(rows, cols)?, MatrixSpec::new(rows, cols)?]
            }
            OperationKind::TransposeMultiplyXx => {
                let (rows, cols) = DEFAULT_TRANSPOSE_XX_SHAPE;
                vec![MatrixSpec::new(rows, cols)?]
            }
        };
        Ok(specs)
    }

    /// Checks `inputs` against the operation's shape contract and returns
    /// the shape of the product.
    ///
    /// Only shapes are inspected; nothing is allocated.
    pub fn result_shape(&self, inputs: &[MatrixSpec]) -> Result<MatrixSpec> {
        if inputs.len() != self.arity() {
            return Err(BenchError::shape(
                format!(
                    "{} takes {} matrix shape(s), {} given",
                    self.formula(),
                    self.arity(),
                    inputs.len()
                ),
                inputs.iter().map(MatrixSpec::dims).collect(),
            ));
        }

        match (self, inputs) {
            (OperationKind::DotProduct, [a]) => {
                if !a.is_square() {
                    return Err(BenchError::shape(
                        "A * B requires square matrices",
                        vec![a.dims()],
                    ));
                }
                Ok(*a)
            }
            (OperationKind::TransposeMultiplyAb, [a, b]) => {
                if a.rows() != b.rows() {
                    return Err(BenchError::shape(
                        "transpose(A) * B requires A and B to have the same number of rows",
                        vec![a.dims(), b.dims()],
                    ));
                }
                Ok(MatrixSpec::new(a.cols(), b.cols())?)
            }
            (OperationKind::TransposeMultiplyXx, [x]) => Ok(MatrixSpec::square(x.cols())?),
            _ => Err(BenchError::shape(
                format!("unexpected operands for {}", self.formula()),
                inputs.iter().map(MatrixSpec::dims).collect(),
            )),
        }
    }

    /// Specs of the matrices actually generated: A * B draws two matrices
    /// of the single given shape.
    pub(crate) fn operand_specs(&self, inputs: &[MatrixSpec]) -> Vec<MatrixSpec> {
        match (self, inputs) {
            (OperationKind::DotProduct, [a]) => vec![*a, *a],
            _ => inputs.to_vec(),
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OperationKind::DotProduct => "dot_product",
            OperationKind::TransposeMultiplyAb => "transpose_multiply_ab",
            OperationKind::TransposeMultiplyXx => "transpose_multiply_xx",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(rows: usize, cols: usize) -> MatrixSpec {
        MatrixSpec::new(rows, cols).unwrap()
    }

    #[test]
    fn test_result_shapes() {
        assert_eq!(
            OperationKind::DotProduct.result_shape(&[spec(10, 10)]).unwrap(),
            spec(10, 10)
        );
        assert_eq!(
            OperationKind::TransposeMultiplyAb
                .result_shape(&[spec(6000, 4000), spec(6000, 4000)])
                .unwrap(),
            spec(4000, 4000)
        );
        assert_eq!(
            OperationKind::TransposeMultiplyAb
                .result_shape(&[spec(6, 3), spec(6, 5)])
                .unwrap(),
            spec(3, 5)
        );
        assert_eq!(
            OperationKind::TransposeMultiplyXx
                .result_shape(&[spec(1000, 10000)])
                .unwrap(),
            spec(10000, 10000)
        );
    }

    #[test]
    fn test_non_square_dot_product() {
        let err = OperationKind::DotProduct
            .result_shape(&[spec(5, 7)])
            .unwrap_err();
        assert_eq!(
            err,
            BenchError::ShapeMismatch {
                reason: "A * B requires square matrices".to_string(),
                dims: vec![vec![5, 7]],
            }
        );
    }

    #[test]
    fn test_row_count_mismatch() {
        let err = OperationKind::TransposeMultiplyAb
            .result_shape(&[spec(6, 3), spec(7, 3)])
            .unwrap_err();
        match err {
            BenchError::ShapeMismatch { dims, .. } => {
                assert_eq!(dims, vec![vec![6, 3], vec![7, 3]]);
            }
            other => panic!("expected a shape mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_wrong_arity() {
        assert!(OperationKind::TransposeMultiplyAb
            .result_shape(&[spec(6, 3)])
            .is_err());
        assert!(OperationKind::DotProduct
            .result_shape(&[spec(2, 2), spec(2, 2)])
            .is_err());
        assert!(OperationKind::TransposeMultiplyXx.result_shape(&[]).is_err());
    }

    #[test]
    fn test_default_inputs_satisfy_contract() {
        for op in OperationKind::ALL {
            let inputs = op.default_inputs().unwrap();
            assert_eq!(inputs.len(), op.arity());
            assert!(op.result_shape(&inputs).is_ok());
        }
        assert_eq!(
            OperationKind::TransposeMultiplyXx.default_inputs().unwrap(),
            vec![spec(1000, 10000)]
        );
    }

    #[test]
    fn test_operand_specs() {
        assert_eq!(
            OperationKind::DotProduct.operand_specs(&[spec(3, 3)]),
            vec![spec(3, 3), spec(3, 3)]
        );
        assert_eq!(
            OperationKind::TransposeMultiplyXx.operand_specs(&[spec(4, 2)]),
            vec![spec(4, 2)]
        );
    }

    #[test]
    fn test_serialized_names_match_display() {
        for op in OperationKind::ALL {
            let json = serde_json::to_string(&op).unwrap();
            assert_eq!(json, format!("\"{op}\""));
        }
    }
}
