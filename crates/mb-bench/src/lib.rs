//! `mb-bench` - Dense matrix multiplication benchmarks.
//!
//! A benchmark generates random matrices, times exactly one product on them
//! and returns a [`BenchmarkResult`] describing shapes and elapsed time.
//! Matrix generation is never part of the timed interval.

pub mod config;
pub mod error;
pub mod operation;
pub mod result;
pub mod runner;
pub mod vector;

pub use config::BenchConfig;
pub use error::{BenchError, Result};
pub use operation::OperationKind;
pub use result::BenchmarkResult;
pub use runner::{BenchmarkPlan, MatrixBenchmarkRunner};
pub use vector::{VectorBenchmarkResult, DEFAULT_VECTOR_LEN};
