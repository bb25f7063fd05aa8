//! Reference loop kernels for `CpuBackend`.
//!
//! All kernels accumulate into a zero-initialized `c` and walk `b` and `c`
//! row-wise in the innermost loop (i-k-j order), which keeps the hot loop on
//! contiguous memory for row-major data.

/// C[m x n] += A[m x k] @ B[k x n]
pub fn gemm_nn(a: &[f64], b: &[f64], c: &mut [f64], m: usize, k: usize, n: usize) {
    for i in 0..m {
        let c_row = &mut c[i * n..(i + 1) * n];
        for p in 0..k {
            let a_ip = a[i * k + p];
            let b_row = &b[p * n..(p + 1) * n];
            for (c_ij, &b_pj) in c_row.iter_mut().zip(b_row) {
                *c_ij += a_ip * b_pj;
            }
        }
    }
}

/// C[m x n] += A^T @ B, with A stored as [k x m] and B as [k x n].
///
/// Row `p` of A supplies the `p`-th term for every output row, so the
/// transpose is expressed purely through indexing.
pub fn gemm_tn(a: &[f64], b: &[f64], c: &mut [f64], k: usize, m: usize, n: usize) {
    for p in 0..k {
        let a_row = &a[p * m..(p + 1) * m];
        let b_row = &b[p * n..(p + 1) * n];
        for (i, &a_pi) in a_row.iter().enumerate() {
            let c_row = &mut c[i * n..(i + 1) * n];
            for (c_ij, &b_pj) in c_row.iter_mut().zip(b_row) {
                *c_ij += a_pi * b_pj;
            }
        }
    }
}

/// Materialized transpose: dst[cols x rows] = src[rows x cols]^T.
pub fn transpose(src: &[f64], dst: &mut [f64], rows: usize, cols: usize) {
    for i in 0..rows {
        for j in 0..cols {
            dst[j * rows + i] = src[i * cols + j];
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gemm_tn_matches_transpose_then_nn() {
        // A is 3x2, so A^T is 2x3; B is 3x2.
        let a = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = [7.0, 8.0, 9.0, 10.0, 11.0, 12.0];

        let mut fused = [0.0; 4];
        gemm_tn(&a, &b, &mut fused, 3, 2, 2);

        let mut at = [0.0; 6];
        transpose(&a, &mut at, 3, 2);
        let mut explicit = [0.0; 4];
        gemm_nn(&at, &b, &mut explicit, 2, 3, 2);

        assert_eq!(fused, explicit);
        // [1,3,5;2,4,6] @ [7,8;9,10;11,12]
        assert_eq!(fused, [89.0, 98.0, 116.0, 128.0]);
    }

    #[test]
    fn test_transpose() {
        let src = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let mut dst = [0.0; 6];
        transpose(&src, &mut dst, 2, 3);
        assert_eq!(dst, [1.0, 4.0, 2.0, 5.0, 3.0, 6.0]);
    }
}
