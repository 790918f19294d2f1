//! Backend abstraction for the matrix-product kernels.
//!
//! This module defines the [`GemmBackend`] trait, marker structs for each
//! backend, and the [`ActiveBackend`] type alias that serves as the single
//! point of backend selection based on Cargo features.

use crate::matrix::{MatrixView, MatrixViewMut};
use crate::scalar::Scalar;
use crate::Result;

/// A kernel computing `C = A * B` over strided matrix views.
///
/// Operand shapes are validated by the caller ([`mult_mat`](crate::mult_mat)):
/// `a` is `m x k`, `b` is `k x n`, `c` is `m x n`. Every stride of every
/// operand may be any non-zero value, including negative ones.
pub trait GemmBackend<T: Scalar> {
    /// Name reported in trace output.
    const NAME: &'static str;

    fn gemm(c: &mut MatrixViewMut<'_, T>, a: &MatrixView<'_, T>, b: &MatrixView<'_, T>)
        -> Result<()>;
}

// ---------------------------------------------------------------------------
// Marker structs
// ---------------------------------------------------------------------------

/// Backend using faer's strided matmul on the views' own memory.
#[cfg(feature = "faer")]
pub struct FaerBackend;

/// Fallback backend using explicit loops (no external library).
pub struct NaiveBackend;

// ---------------------------------------------------------------------------
// ActiveBackend type alias -- the single point of backend selection
// ---------------------------------------------------------------------------

/// The active GEMM backend, selected by Cargo features.
///
/// - `faer` -> [`FaerBackend`]
/// - no backend feature -> [`NaiveBackend`]
#[cfg(feature = "faer")]
pub type ActiveBackend = FaerBackend;

#[cfg(not(feature = "faer"))]
pub type ActiveBackend = NaiveBackend;

// ---------------------------------------------------------------------------
// Implementations
// ---------------------------------------------------------------------------

impl<T: Scalar> GemmBackend<T> for NaiveBackend {
    const NAME: &'static str = "naive";

    fn gemm(
        c: &mut MatrixViewMut<'_, T>,
        a: &MatrixView<'_, T>,
        b: &MatrixView<'_, T>,
    ) -> Result<()> {
        debug_assert_eq!(c.dims(), [a.nrows(), b.ncols()]);
        debug_assert_eq!(a.ncols(), b.nrows());
        for (i, mut c_row) in c.iter_rows_mut().enumerate() {
            let a_row = a.row(i, ..);
            for (j, out) in c_row.iter_mut().enumerate() {
                *out = a_row.dot(&b.column(.., j))?;
            }
        }
        Ok(())
    }
}

#[cfg(feature = "faer")]
impl<T: Scalar> GemmBackend<T> for FaerBackend {
    const NAME: &'static str = "faer";

    fn gemm(
        c: &mut MatrixViewMut<'_, T>,
        a: &MatrixView<'_, T>,
        b: &MatrixView<'_, T>,
    ) -> Result<()> {
        use faer::linalg::matmul::matmul_with_conj;
        use faer::mat::{MatMut, MatRef};
        use faer::{Accum, Conj, Par};

        let [m, k] = a.dims();
        let n = b.ncols();
        debug_assert_eq!(c.dims(), [m, n]);
        debug_assert_eq!(b.nrows(), k);

        if m == 0 || n == 0 {
            return Ok(());
        }
        if k == 0 {
            c.fill(T::zero());
            return Ok(());
        }

        // SAFETY: each view's layout was validated against its buffer, so every
        // (i, j) below its dims maps to an in-bounds element; `c` is injective
        // and exclusively borrowed, and cannot alias `a` or `b`.
        unsafe {
            let a_mat: MatRef<'_, T> =
                MatRef::from_raw_parts(a.as_ptr(), m, k, a.row_stride(), a.col_stride());
            let b_mat: MatRef<'_, T> =
                MatRef::from_raw_parts(b.as_ptr(), k, n, b.row_stride(), b.col_stride());
            let c_mat: MatMut<'_, T> = MatMut::from_raw_parts_mut(
                c.as_mut_ptr(),
                m,
                n,
                c.row_stride(),
                c.col_stride(),
            );

            matmul_with_conj(
                c_mat,
                Accum::Replace,
                a_mat,
                Conj::No,
                b_mat,
                Conj::No,
                T::one(),
                Par::Seq,
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Matrix, Range};

    fn check_2x2<B: GemmBackend<f64>>() {
        let a = Matrix::from([[1.0, 2.0], [3.0, 4.0]]);
        let b = Matrix::from([[5.0, 6.0], [7.0, 8.0]]);
        let mut c = Matrix::<f64>::zeros(2, 2);
        B::gemm(&mut c.view_mut(), &a.view(), &b.view()).unwrap();
        assert_eq!(c.as_slice(), &[19.0, 22.0, 43.0, 50.0]);
    }

    fn check_strided<B: GemmBackend<f64>>() {
        // a^T (3x2) * reversed-column b (2x4) into a transposed output
        let a = Matrix::from_fn(2, 3, |r, c| (r * 3 + c + 1) as f64);
        let b = Matrix::from_fn(2, 4, |r, c| (r * 4 + c + 1) as f64);
        let mut out = Matrix::<f64>::zeros(4, 3);
        {
            let mut c = out.t_mut();
            let b_rev = b.sub(.., Range::to_end(3, -1));
            B::gemm(&mut c, &a.t(), &b_rev).unwrap();
        }
        for i in 0..3 {
            for j in 0..4 {
                let expected = a[(0, i)] * b[(0, 3 - j)] + a[(1, i)] * b[(1, 3 - j)];
                assert_eq!(out[(j, i)], expected);
            }
        }
    }

    #[test]
    fn test_naive_gemm_2x2() {
        check_2x2::<NaiveBackend>();
    }

    #[test]
    fn test_naive_gemm_strided_operands() {
        check_strided::<NaiveBackend>();
    }

    #[test]
    fn test_naive_gemm_zero_inner_dim() {
        let a = Matrix::<f64>::zeros(2, 0);
        let b = Matrix::<f64>::zeros(0, 3);
        let mut c = Matrix::filled(2, 3, 5.0);
        NaiveBackend::gemm(&mut c.view_mut(), &a.view(), &b.view()).unwrap();
        assert!(c.as_slice().iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_active_backend_name() {
        let name = <ActiveBackend as GemmBackend<f64>>::NAME;
        if cfg!(feature = "faer") {
            assert_eq!(name, "faer");
        } else {
            assert_eq!(name, "naive");
        }
    }

    #[cfg(feature = "faer")]
    #[test]
    fn test_faer_gemm_2x2() {
        check_2x2::<FaerBackend>();
    }

    #[cfg(feature = "faer")]
    #[test]
    fn test_faer_gemm_strided_operands() {
        check_strided::<FaerBackend>();
    }

    #[cfg(feature = "faer")]
    #[test]
    fn test_faer_gemm_zero_inner_dim() {
        let a = Matrix::<f64>::zeros(2, 0);
        let b = Matrix::<f64>::zeros(0, 3);
        let mut c = Matrix::filled(2, 3, 5.0);
        FaerBackend::gemm(&mut c.view_mut(), &a.view(), &b.view()).unwrap();
        assert!(c.as_slice().iter().all(|&x| x == 0.0));
    }
}
