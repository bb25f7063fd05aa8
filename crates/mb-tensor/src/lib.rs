//! `mb-tensor` - Dense f64 matrices with pluggable compute backends for matbench.
//!
//! This crate provides:
//! - A `Matrix` type holding row-major f64 data
//! - `MatrixSpec`, the validated shape of a matrix
//! - Fallible buffer allocation, so oversized requests become errors
//! - A `ComputeBackend` trait with a reference `CpuBackend` and a
//!   `matrixmultiply`-based `GemmBackend`

pub mod backend;
pub mod cpu;
pub mod error;
pub mod gemm;
pub mod matrix;
pub mod shape;
pub mod storage;

// Re-export primary types at the crate root for convenience.
pub use backend::{BackendKind, ComputeBackend};
pub use cpu::CpuBackend;
pub use error::{Result, TensorError};
pub use gemm::GemmBackend;
pub use matrix::Matrix;
pub use shape::MatrixSpec;
