//! Linear algebra over views.
//!
//! The products [`mult`] and [`mult_mat`] validate shapes and hand the views'
//! own pointers and strides to the [`ActiveBackend`]; nothing is copied.
//! Outputs are never resized: callers pre-size them. Because outputs are
//! exclusive borrows, an output can never alias one of the inputs.
//!
//! # Key functions
//!
//! - `mult`: `y = M x`
//! - `mult_mat`: `C = A B`
//! - `mult_general`: `C = A B` on the loop kernel, whatever the active backend
//! - `transpose`, `transform`, `dot`, `cross3`, `vector_angle`, `proj`

use crate::backend::{ActiveBackend, GemmBackend, NaiveBackend};
use crate::matrix::{as_column, as_column_mut, MatrixView, MatrixViewMut};
use crate::scalar::Scalar;
use crate::vector::{VectorView, VectorViewMut};
use crate::{mismatch, Result};
use num_traits::Float;

// ============================================================================
// Products
// ============================================================================

/// `a` is `m x k`, `b` is `k x n`, `c` is `m x n`.
fn check_product(op: &'static str, c: [usize; 2], a: [usize; 2], b: [usize; 2]) -> Result<()> {
    if a[1] != b[0] {
        return Err(mismatch(op, &[a[1]], &[b[0]]));
    }
    if c != [a[0], b[1]] {
        return Err(mismatch(op, &[a[0], b[1]], &c));
    }
    Ok(())
}

/// Matrix-vector product `y = m * x`.
///
/// # Errors
/// [`MatpackError::DimensionMismatch`](crate::MatpackError::DimensionMismatch)
/// unless `m.ncols() == x.len()` and `y.len() == m.nrows()`.
#[tracing::instrument(skip(y, m, x), fields(nrows = m.nrows(), ncols = m.ncols()))]
pub fn mult<T: Scalar>(
    y: &mut VectorViewMut<'_, T>,
    m: &MatrixView<'_, T>,
    x: &VectorView<'_, T>,
) -> Result<()> {
    check_product("mult", [y.len(), 1], m.dims(), [x.len(), 1])?;
    tracing::debug!(
        backend = <ActiveBackend as GemmBackend<T>>::NAME,
        "dispatching matrix-vector product"
    );
    let mut y_col = as_column_mut(y.reborrow());
    ActiveBackend::gemm(&mut y_col, m, &as_column(*x))
}

/// Matrix-matrix product `c = a * b`.
///
/// Any operand may be a sub-view, transposed, or have negative strides.
///
/// # Errors
/// [`MatpackError::DimensionMismatch`](crate::MatpackError::DimensionMismatch)
/// unless `a.ncols() == b.nrows()` and `c` is `a.nrows() x b.ncols()`.
#[tracing::instrument(skip(c, a, b), fields(m = a.nrows(), k = a.ncols(), n = b.ncols()))]
pub fn mult_mat<T: Scalar>(
    c: &mut MatrixViewMut<'_, T>,
    a: &MatrixView<'_, T>,
    b: &MatrixView<'_, T>,
) -> Result<()> {
    check_product("mult_mat", c.dims(), a.dims(), b.dims())?;
    tracing::debug!(
        backend = <ActiveBackend as GemmBackend<T>>::NAME,
        "dispatching matrix product"
    );
    ActiveBackend::gemm(c, a, b)
}

/// `c = a * b` on the explicit loop kernel.
///
/// Same contract as [`mult_mat`]; useful as a reference result and for element
/// types no external backend supports.
#[tracing::instrument(skip(c, a, b), fields(m = a.nrows(), k = a.ncols(), n = b.ncols()))]
pub fn mult_general<T: Scalar>(
    c: &mut MatrixViewMut<'_, T>,
    a: &MatrixView<'_, T>,
    b: &MatrixView<'_, T>,
) -> Result<()> {
    check_product("mult_general", c.dims(), a.dims(), b.dims())?;
    NaiveBackend::gemm(c, a, b)
}

// ============================================================================
// Reinterpretation and elementwise maps
// ============================================================================

/// Transposed view; writes through neither view are hidden from the other.
#[inline]
pub fn transpose<'a, T>(m: MatrixView<'a, T>) -> MatrixView<'a, T> {
    m.t()
}

#[inline]
pub fn transpose_mut<'a, T>(m: MatrixViewMut<'a, T>) -> MatrixViewMut<'a, T> {
    m.into_t()
}

/// `y[i] = f(x[i])`.
pub fn transform<T: Copy>(
    y: &mut VectorViewMut<'_, T>,
    f: impl Fn(T) -> T,
    x: &VectorView<'_, T>,
) -> Result<()> {
    if y.len() != x.len() {
        return Err(mismatch("transform", &[y.len()], &[x.len()]));
    }
    for (d, &s) in y.iter_mut().zip(x.iter()) {
        *d = f(s);
    }
    Ok(())
}

/// `y[(r, c)] = f(x[(r, c)])`.
pub fn transform_mat<T: Copy>(
    y: &mut MatrixViewMut<'_, T>,
    f: impl Fn(T) -> T,
    x: &MatrixView<'_, T>,
) -> Result<()> {
    if y.dims() != x.dims() {
        return Err(mismatch("transform", &y.dims(), &x.dims()));
    }
    for (mut d, s) in y.iter_rows_mut().zip(x.iter_rows()) {
        transform(&mut d, &f, &s)?;
    }
    Ok(())
}

// ============================================================================
// Vector geometry
// ============================================================================

/// `Σ a[i] * b[i]`.
#[inline]
pub fn dot<T: Scalar>(a: &VectorView<'_, T>, b: &VectorView<'_, T>) -> Result<T> {
    a.dot(b)
}

/// Cross product of two 3-vectors: `c = a x b`.
pub fn cross3<T: Scalar>(
    c: &mut VectorViewMut<'_, T>,
    a: &VectorView<'_, T>,
    b: &VectorView<'_, T>,
) -> Result<()> {
    for n in [c.len(), a.len(), b.len()] {
        if n != 3 {
            return Err(mismatch("cross3", &[3], &[n]));
        }
    }
    let (a0, a1, a2) = (a[0], a[1], a[2]);
    let (b0, b1, b2) = (b[0], b[1], b[2]);
    c[0] = a1 * b2 - a2 * b1;
    c[1] = a2 * b0 - a0 * b2;
    c[2] = a0 * b1 - a1 * b0;
    Ok(())
}

/// Angle between two vectors, in degrees.
///
/// The cosine is clamped to `[-1, 1]` before `acos`, so rounding on
/// (anti)parallel vectors cannot produce NaN.
pub fn vector_angle<T: Scalar + Float>(a: &VectorView<'_, T>, b: &VectorView<'_, T>) -> Result<T> {
    let ab = a.dot(b)?;
    let cos = ab / a.dot(a)?.sqrt() / b.dot(b)?.sqrt();
    let one = T::one();
    Ok(cos.max(-one).min(one).acos().to_degrees())
}

/// Projection of `b` onto `a`: `c = a * (a . b) / (a . a)`.
pub fn proj<T: Scalar>(
    c: &mut VectorViewMut<'_, T>,
    a: &VectorView<'_, T>,
    b: &VectorView<'_, T>,
) -> Result<()> {
    let scale = a.dot(b)? / a.dot(a)?;
    c.assign(a)?;
    *c *= scale;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Matrix, MatpackError, Range, Vector};
    use approx::assert_relative_eq;

    #[test]
    fn test_mult_identity() {
        let m = Matrix::<f64>::identity(2);
        let x = Vector::from([3.5, -1.25]);
        let mut y = Vector::<f64>::zeros(2);
        mult(&mut y.view_mut(), &m.view(), &x.view()).unwrap();
        assert_eq!(y.as_slice(), x.as_slice());
    }

    #[test]
    fn test_mult_strided_operands() {
        let m = Matrix::from([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]]);
        let x = Vector::from([1.0, 0.0, 2.0, 0.0, 3.0]);
        let mut y = Vector::<f64>::zeros(6);
        mult(
            &mut y.sub_mut(Range::new(5, 3, -2)),
            &m.t(),
            &x.sub(Range::new(0, 2, 4)),
        )
        .unwrap();
        // m^T * [1, 3] = [13, 17, 21], written to y[5], y[3], y[1]
        assert_eq!(y.as_slice(), &[0.0, 21.0, 0.0, 17.0, 0.0, 13.0]);
    }

    #[test]
    fn test_mult_mismatch() {
        let m = Matrix::<f64>::zeros(2, 3);
        let x = Vector::<f64>::zeros(2);
        let mut y = Vector::<f64>::zeros(2);
        let err = mult(&mut y.view_mut(), &m.view(), &x.view()).unwrap_err();
        assert!(matches!(err, MatpackError::DimensionMismatch { op: "mult", .. }));

        let x = Vector::<f64>::zeros(3);
        let mut y = Vector::<f64>::zeros(3);
        let err = mult(&mut y.view_mut(), &m.view(), &x.view()).unwrap_err();
        assert_eq!(
            err,
            MatpackError::DimensionMismatch {
                op: "mult",
                expected: vec![2, 1],
                found: vec![3, 1],
            }
        );
    }

    #[test]
    fn test_mult_mat_matches_general() {
        let a = Matrix::from_fn(3, 4, |r, c| (r as f64) - 0.5 * c as f64);
        let b = Matrix::from_fn(4, 2, |r, c| 1.0 + (r * c) as f64);
        let mut c1 = Matrix::<f64>::zeros(3, 2);
        let mut c2 = Matrix::<f64>::zeros(3, 2);
        mult_mat(&mut c1.view_mut(), &a.view(), &b.view()).unwrap();
        mult_general(&mut c2.view_mut(), &a.view(), &b.view()).unwrap();
        for (x, y) in c1.as_slice().iter().zip(c2.as_slice()) {
            assert_relative_eq!(*x, *y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_mult_mat_output_shape_checked() {
        let a = Matrix::<f64>::zeros(2, 3);
        let b = Matrix::<f64>::zeros(3, 4);
        let mut c = Matrix::<f64>::zeros(4, 2);
        assert!(mult_mat(&mut c.view_mut(), &a.view(), &b.view()).is_err());
        assert!(mult_general(&mut c.view_mut(), &a.view(), &b.view()).is_err());
        assert!(mult_mat(&mut c.t_mut(), &a.view(), &b.view()).is_ok());
    }

    #[test]
    fn test_transpose_involution_and_write_through() {
        let mut m = Matrix::from_fn(3, 3, |r, c| (3 * r + c + 1) as i32);
        assert_eq!(transpose(m.view())[(0, 2)], 7);
        assert_eq!(transpose(transpose(m.view())), m.view());
        transpose_mut(m.view_mut())[(2, 1)] = 0;
        assert_eq!(m[(1, 2)], 0);
    }

    #[test]
    fn test_transform() {
        let x = Vector::from([1.0, 4.0, 9.0]);
        let mut y = Vector::<f64>::zeros(3);
        transform(&mut y.view_mut(), f64::sqrt, &x.view()).unwrap();
        assert_eq!(y.as_slice(), &[1.0, 2.0, 3.0]);
        assert!(transform(&mut y.sub_mut(0..2), f64::sqrt, &x.view()).is_err());

        let m = Matrix::from([[1.0, -2.0], [-3.0, 4.0]]);
        let mut out = Matrix::<f64>::zeros(2, 2);
        transform_mat(&mut out.view_mut(), f64::abs, &m.t()).unwrap();
        assert_eq!(out.as_slice(), &[1.0, 3.0, 2.0, 4.0]);
    }

    #[test]
    fn test_cross3() {
        let x = Vector::from([1.0, 0.0, 0.0]);
        let y = Vector::from([0.0, 1.0, 0.0]);
        let mut z = Vector::<f64>::zeros(3);
        cross3(&mut z.view_mut(), &x.view(), &y.view()).unwrap();
        assert_eq!(z.as_slice(), &[0.0, 0.0, 1.0]);
        cross3(&mut z.view_mut(), &y.view(), &x.view()).unwrap();
        assert_eq!(z.as_slice(), &[0.0, 0.0, -1.0]);
        let short = Vector::from([1.0, 2.0]);
        assert!(cross3(&mut z.view_mut(), &short.view(), &y.view()).is_err());
    }

    #[test]
    fn test_vector_angle() {
        let x = Vector::from([1.0, 0.0]);
        let y = Vector::from([0.0, 2.0]);
        let d = Vector::from([3.0, 3.0]);
        assert_relative_eq!(vector_angle(&x.view(), &y.view()).unwrap(), 90.0, epsilon = 1e-9);
        assert_relative_eq!(vector_angle(&x.view(), &d.view()).unwrap(), 45.0, epsilon = 1e-9);
        // rounding can leave the cosine one ulp short of 1
        assert_relative_eq!(vector_angle(&d.view(), &d.view()).unwrap(), 0.0, epsilon = 1e-5);
        let neg = Vector::from([-3.0, -3.0]);
        assert_relative_eq!(vector_angle(&d.view(), &neg.view()).unwrap(), 180.0, epsilon = 1e-5);
    }

    #[test]
    fn test_proj() {
        let a = Vector::from([2.0, 0.0]);
        let b = Vector::from([3.0, 4.0]);
        let mut c = Vector::<f64>::zeros(2);
        proj(&mut c.view_mut(), &a.view(), &b.view()).unwrap();
        assert_eq!(c.as_slice(), &[3.0, 0.0]);
    }
}
