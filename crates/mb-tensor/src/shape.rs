use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Result, TensorError};

/// The shape of a dense 2-D matrix.
///
/// Both dimensions are at least 1. Instances are immutable once built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MatrixSpec {
    rows: usize,
    cols: usize,
}

impl MatrixSpec {
    /// Create a shape, rejecting zero dimensions.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        if rows == 0 || cols == 0 {
            return Err(TensorError::InvalidDimension { rows, cols });
        }
        Ok(MatrixSpec { rows, cols })
    }

    /// Create an `n x n` shape.
    pub fn square(n: usize) -> Result<Self> {
        Self::new(n, n)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Total number of elements, or `None` if it overflows `usize`.
    pub fn numel(&self) -> Option<usize> {
        self.rows.checked_mul(self.cols)
    }

    /// The shape of this matrix's transpose.
    pub fn transposed(&self) -> MatrixSpec {
        MatrixSpec {
            rows: self.cols,
            cols: self.rows,
        }
    }

    /// Dimensions as `[rows, cols]`, the form used in error reports.
    pub fn dims(&self) -> Vec<usize> {
        vec![self.rows, self.cols]
    }
}

impl fmt::Display for MatrixSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

impl FromStr for MatrixSpec {
    type Err = TensorError;

    /// Parses `ROWSxCOLS` (an upper-case `X` is accepted too).
    fn from_str(s: &str) -> Result<Self> {
        let bad = || TensorError::InvalidShapeSyntax(s.to_string());
        let (rows, cols) = s
            .trim()
            .split_once(['x', 'X'])
            .ok_or_else(bad)?;
        let rows = rows.trim().parse::<usize>().map_err(|_| bad())?;
        let cols = cols.trim().parse::<usize>().map_err(|_| bad())?;
        MatrixSpec::new(rows, cols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_spec() {
        let s = MatrixSpec::new(6000, 4000).unwrap();
        assert_eq!(s.rows(), 6000);
        assert_eq!(s.cols(), 4000);
        assert_eq!(s.numel(), Some(24_000_000));
        assert!(!s.is_square());
        assert!(MatrixSpec::square(10).unwrap().is_square());
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert_eq!(
            MatrixSpec::new(0, 3),
            Err(TensorError::InvalidDimension { rows: 0, cols: 3 })
        );
        assert!(MatrixSpec::new(3, 0).is_err());
    }

    #[test]
    fn test_transposed() {
        let s = MatrixSpec::new(2, 5).unwrap();
        assert_eq!(s.transposed(), MatrixSpec::new(5, 2).unwrap());
    }

    #[test]
    fn test_numel_overflow() {
        let s = MatrixSpec::new(usize::MAX, 2).unwrap();
        assert_eq!(s.numel(), None);
    }

    #[test]
    fn test_display_and_parse() {
        let s = MatrixSpec::new(1000, 10000).unwrap();
        assert_eq!(s.to_string(), "1000x10000");
        assert_eq!("1000x10000".parse::<MatrixSpec>().unwrap(), s);
        assert_eq!(" 1000 X 10000 ".parse::<MatrixSpec>().unwrap(), s);
    }

    #[test]
    fn test_parse_errors() {
        assert!("1000".parse::<MatrixSpec>().is_err());
        assert!("ax3".parse::<MatrixSpec>().is_err());
        assert!(matches!(
            "0x3".parse::<MatrixSpec>(),
            Err(TensorError::InvalidDimension { .. })
        ));
    }
}
