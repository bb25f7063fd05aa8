use std::time::Instant;

use mb_tensor::{ComputeBackend, Matrix, MatrixSpec};
use tracing::{debug, info};

use crate::config::BenchConfig;
use crate::error::{BenchError, Result};
use crate::operation::OperationKind;
use crate::result::BenchmarkResult;
use crate::vector::{self, VectorBenchmarkResult};

/// A validated benchmark request: the operation, its input shapes and the
/// shape of the product.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BenchmarkPlan {
    pub operation: OperationKind,
    pub inputs: Vec<MatrixSpec>,
    pub result_shape: MatrixSpec,
}

impl BenchmarkPlan {
    /// Validate `inputs` for `operation`. Nothing is allocated here, so a
    /// shape mismatch is reported before any matrix exists.
    pub fn new(operation: OperationKind, inputs: &[MatrixSpec]) -> Result<Self> {
        let result_shape = operation.result_shape(inputs)?;
        Ok(BenchmarkPlan {
            operation,
            inputs: inputs.to_vec(),
            result_shape,
        })
    }
}

/// Generates random dense matrices, times one multiplication on them and
/// reports shapes and elapsed time.
///
/// A runner holds no per-run state, so one instance can serve concurrent
/// invocations from several threads; each invocation allocates its own
/// matrices.
#[derive(Debug)]
pub struct MatrixBenchmarkRunner {
    config: BenchConfig,
    backend: Box<dyn ComputeBackend>,
}

impl MatrixBenchmarkRunner {
    /// Create a runner using the backend selected in `config`.
    pub fn new(config: BenchConfig) -> Self {
        let backend = config.backend.create();
        Self::with_backend(config, backend)
    }

    /// Create a runner with an explicit backend, overriding `config.backend`.
    pub fn with_backend(config: BenchConfig, backend: Box<dyn ComputeBackend>) -> Self {
        debug!(backend = backend.name(), seed = ?config.seed, "benchmark runner created");
        MatrixBenchmarkRunner { config, backend }
    }

    /// Run `operation` once on freshly generated matrices of the given shapes.
    pub fn run(&self, operation: OperationKind, inputs: &[MatrixSpec]) -> Result<BenchmarkResult> {
        let (result, _product) = self.run_materialized(operation, inputs)?;
        Ok(result)
    }

    /// Like [`run`](Self::run), but also hands back the product matrix.
    pub fn run_materialized(
        &self,
        operation: OperationKind,
        inputs: &[MatrixSpec],
    ) -> Result<(BenchmarkResult, Matrix)> {
        let plan = BenchmarkPlan::new(operation, inputs)?;
        self.execute(&plan)
    }

    fn execute(&self, plan: &BenchmarkPlan) -> Result<(BenchmarkResult, Matrix)> {
        let mut rng = self.config.rng();
        let operand_specs = plan.operation.operand_specs(&plan.inputs);
        let names: Vec<String> = operand_specs.iter().map(|s| s.to_string()).collect();
        info!(
            operation = %plan.operation,
            "creating {} random matrices of shape {}",
            operand_specs.len(),
            names.join(", ")
        );
        let operands = operand_specs
            .iter()
            .map(|spec| Matrix::random(*spec, &mut rng))
            .collect::<mb_tensor::Result<Vec<_>>>()?;

        info!(backend = self.backend.name(), "computing {}", plan.operation.formula());
        let backend = self.backend.as_ref();
        let start = Instant::now();
        let product = match (plan.operation, operands.as_slice()) {
            (OperationKind::DotProduct, [a, b]) => a.matmul(b, backend)?,
            (OperationKind::TransposeMultiplyAb, [a, b]) => a.transpose_matmul(b, backend)?,
            (OperationKind::TransposeMultiplyXx, [x]) => x.transpose_matmul(x, backend)?,
            _ => {
                return Err(BenchError::shape(
                    format!("unexpected operands for {}", plan.operation.formula()),
                    plan.inputs.iter().map(MatrixSpec::dims).collect(),
                ))
            }
        };
        let elapsed = start.elapsed();
        debug_assert_eq!(product.spec(), plan.result_shape);
        debug!(elapsed_ms = elapsed.as_secs_f64() * 1e3, "timed operation finished");

        let result = BenchmarkResult {
            operation: plan.operation,
            backend: self.backend.name().to_string(),
            input_shapes: plan.inputs.clone(),
            result_shape: plan.result_shape,
            elapsed_seconds: elapsed.as_secs_f64(),
        };
        Ok((result, product))
    }

    /// Time filling, summing and taking the norm of a random vector of `len`
    /// elements.
    pub fn run_vector(&self, len: usize) -> Result<VectorBenchmarkResult> {
        let mut rng = self.config.rng();
        vector::run(self.backend.as_ref(), &mut rng, len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mb_tensor::{BackendKind, CpuBackend};

    fn spec(rows: usize, cols: usize) -> MatrixSpec {
        MatrixSpec::new(rows, cols).unwrap()
    }

    fn runner() -> MatrixBenchmarkRunner {
        MatrixBenchmarkRunner::new(BenchConfig::new().with_seed(Some(2024)))
    }

    #[test]
    fn test_dot_product_square() {
        let r = runner()
            .run(OperationKind::DotProduct, &[spec(10, 10)])
            .unwrap();
        assert_eq!(r.operation, OperationKind::DotProduct);
        assert_eq!(r.input_shapes, vec![spec(10, 10)]);
        assert_eq!(r.result_shape, spec(10, 10));
        assert!(r.elapsed_seconds >= 0.0 && r.elapsed_seconds.is_finite());
    }

    #[test]
    fn test_dot_product_non_square_fails() {
        let err = runner()
            .run(OperationKind::DotProduct, &[spec(5, 7)])
            .unwrap_err();
        assert!(matches!(err, BenchError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_transpose_ab_row_mismatch_fails() {
        let err = runner()
            .run(OperationKind::TransposeMultiplyAb, &[spec(6, 3), spec(7, 3)])
            .unwrap_err();
        assert!(matches!(err, BenchError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_shape_check_precedes_allocation() {
        // Generating these operands would fail with an allocation error, so a
        // shape mismatch proves validation ran first.
        let huge = usize::MAX / 4;
        let err = runner()
            .run(OperationKind::TransposeMultiplyAb, &[spec(huge, 3), spec(huge - 1, 3)])
            .unwrap_err();
        assert!(matches!(err, BenchError::ShapeMismatch { .. }));

        let err = runner()
            .run(OperationKind::DotProduct, &[spec(huge, huge - 1)])
            .unwrap_err();
        assert!(matches!(err, BenchError::ShapeMismatch { .. }));
    }

    #[test]
    fn test_oversized_request_is_allocation_error() {
        let huge = usize::MAX / 4;
        let err = runner()
            .run(OperationKind::TransposeMultiplyXx, &[spec(huge, 2)])
            .unwrap_err();
        assert!(matches!(err, BenchError::Allocation { .. }));
    }

    #[test]
    fn test_transpose_ab_result_shape() {
        let r = runner()
            .run(OperationKind::TransposeMultiplyAb, &[spec(12, 4), spec(12, 7)])
            .unwrap();
        assert_eq!(r.result_shape, spec(4, 7));
        assert_eq!(r.input_shapes, vec![spec(12, 4), spec(12, 7)]);
    }

    #[test]
    fn test_gram_product_is_symmetric() {
        for kind in [BackendKind::Cpu, BackendKind::Gemm] {
            let runner = MatrixBenchmarkRunner::new(BenchConfig::new().with_backend(kind));
            let (r, product) = runner
                .run_materialized(OperationKind::TransposeMultiplyXx, &[spec(30, 12)])
                .unwrap();
            assert_eq!(r.result_shape, spec(12, 12));
            assert_eq!(r.backend, kind.as_str());
            assert!(product.is_symmetric(1e-9));
        }
    }

    #[test]
    fn test_repeated_runs_have_same_shape() {
        let runner = MatrixBenchmarkRunner::new(BenchConfig::new());
        let inputs = [spec(9, 5), spec(9, 6)];
        let a = runner.run(OperationKind::TransposeMultiplyAb, &inputs).unwrap();
        let b = runner.run(OperationKind::TransposeMultiplyAb, &inputs).unwrap();
        assert_eq!(a.result_shape, b.result_shape);
    }

    #[test]
    fn test_seed_makes_products_reproducible() {
        let a = runner()
            .run_materialized(OperationKind::DotProduct, &[spec(6, 6)])
            .unwrap()
            .1;
        let b = runner()
            .run_materialized(OperationKind::DotProduct, &[spec(6, 6)])
            .unwrap()
            .1;
        assert_eq!(a, b);
    }

    #[test]
    fn test_backends_agree() {
        let config = BenchConfig::new().with_seed(Some(77));
        let cpu = MatrixBenchmarkRunner::with_backend(config, Box::new(CpuBackend::new()));
        let gemm = MatrixBenchmarkRunner::new(config.with_backend(BackendKind::Gemm));
        let inputs = [spec(16, 5), spec(16, 8)];
        let (_, x) = cpu
            .run_materialized(OperationKind::TransposeMultiplyAb, &inputs)
            .unwrap();
        let (_, y) = gemm
            .run_materialized(OperationKind::TransposeMultiplyAb, &inputs)
            .unwrap();
        for (p, q) in x.data().iter().zip(y.data()) {
            approx::assert_relative_eq!(p, q, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_plan_for_large_defaults() {
        let plan = BenchmarkPlan::new(
            OperationKind::TransposeMultiplyAb,
            &[spec(6000, 4000), spec(6000, 4000)],
        )
        .unwrap();
        assert_eq!(plan.result_shape, spec(4000, 4000));

        let plan =
            BenchmarkPlan::new(OperationKind::TransposeMultiplyXx, &[spec(1000, 10000)]).unwrap();
        assert_eq!(plan.result_shape, spec(10000, 10000));
    }

    #[test]
    fn test_concurrent_invocations() {
        let runner = runner();
        let results: Vec<BenchmarkResult> = std::thread::scope(|s| {
            let handles: Vec<_> = OperationKind::ALL
                .iter()
                .map(|&op| {
                    let runner = &runner;
                    s.spawn(move || {
                        let inputs = match op {
                            OperationKind::TransposeMultiplyAb => vec![spec(8, 3), spec(8, 4)],
                            _ => vec![spec(8, 8)],
                        };
                        runner.run(op, &inputs).unwrap()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        assert_eq!(results[0].result_shape, spec(8, 8));
        assert_eq!(results[1].result_shape, spec(3, 4));
        assert_eq!(results[2].result_shape, spec(8, 8));
    }
}
