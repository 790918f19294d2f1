//! Strided vector and matrix views over owned buffers.
//!
//! Owning containers ([`Vector`], [`Matrix`]) allocate one contiguous buffer.
//! Everything else goes through borrowed views that never allocate: a view is
//! a pointer into that buffer plus one [`Range`] (vectors) or a row and a
//! column [`Range`] (matrices). Sub-ranging composes ranges in O(1), so a view
//! of a view of a view costs the same as a view of the owner.
//!
//! # Core Types
//!
//! - [`Range`] / [`Extent`]: `(start, extent, stride)` selections, with
//!   [`Extent::ToEnd`] for "the rest of the parent dimension"
//! - [`VectorView`] / [`VectorViewMut`] / [`Vector`]: read-only view, mutable
//!   view and owning 1D container
//! - [`MatrixView`] / [`MatrixViewMut`] / [`Matrix`]: the 2D analogue with
//!   independent row and column ranges
//! - [`Iter1D`] / [`IterMut1D`] / [`Rows`] / [`RowsMut`]: stride-aware iterators
//!
//! # Linear algebra
//!
//! - [`mult`], [`mult_mat`]: products that map views onto the active
//!   [`GemmBackend`] without copying
//! - [`mult_general`]: the backend-free kernel
//! - [`transpose`], [`as_column`], [`as_row`]: zero-copy reinterpretations
//! - [`transform`], [`transform_mat`], [`dot`], [`cross3`], [`vector_angle`], [`proj`]
//!
//! # Example
//!
//! ```rust
//! use matpack::{Range, Vector};
//!
//! let mut v = Vector::from([1.0, 2.0, 3.0, 4.0, 5.0]);
//! {
//!     let mut sub = v.sub_mut(Range::new(1, 3, 1));
//!     sub *= 2.0;
//! }
//! assert_eq!(v.as_slice(), &[1.0, 4.0, 6.0, 8.0, 5.0]);
//! ```
//!
//! # Feature flags
//!
//! - `faer`: run [`mult`] and [`mult_mat`] on faer's strided matmul kernel.
//! - `unchecked-indexing`: `m[(r, c)]` on an owning [`Matrix`] skips the shape
//!   assertion and only checks the row-major offset against the buffer, so a
//!   column index past `ncols` reads into the following row. Indexing a view
//!   is always checked against the view's own extent, because sibling views
//!   may hold the neighbouring elements mutably.

mod backend;
mod iter;
mod linalg;
mod matrix;
mod range;
mod scalar;
mod vector;

pub use backend::{ActiveBackend, GemmBackend, NaiveBackend};
#[cfg(feature = "faer")]
pub use backend::FaerBackend;
pub use iter::{copy, copy_rows, fill, fill_rows, Iter1D, IterMut1D, Rows, RowsMut};
pub use linalg::{
    cross3, dot, mult, mult_general, mult_mat, proj, transform, transform_mat, transpose,
    transpose_mut, vector_angle,
};
pub use matrix::{as_column, as_column_mut, as_row, as_row_mut, Matrix, MatrixView, MatrixViewMut};
pub use range::{Extent, Range};
pub use scalar::Scalar;
pub use vector::{Vector, VectorView, VectorViewMut};

/// Whether the crate was built with the `unchecked-indexing` feature.
pub const UNCHECKED_INDEXING: bool = cfg!(feature = "unchecked-indexing");

/// Errors raised by view construction and arithmetic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatpackError {
    /// Operand extents do not conform.
    #[error("dimension mismatch in {op}: expected {expected:?}, found {found:?}")]
    DimensionMismatch {
        op: &'static str,
        expected: Vec<usize>,
        found: Vec<usize>,
    },

    /// A range addresses indices outside its parent.
    #[error("range {range:?} exceeds parent extent {parent}")]
    OutOfBounds { range: Range, parent: usize },

    /// A strided layout reaches outside its backing buffer.
    #[error("strided layout addresses offsets {lowest}..={highest}, buffer length is {len}")]
    BufferOverrun {
        lowest: isize,
        highest: isize,
        len: usize,
    },

    /// Zero stride is not allowed for the specified dimension.
    #[error("invalid stride 0 for dim {dim}")]
    ZeroStride { dim: usize },

    /// Two distinct matrix positions would share one element of a mutable view.
    #[error("mutable matrix view addresses an element more than once")]
    OverlappingView,
}

/// Result type for view operations.
pub type Result<T> = std::result::Result<T, MatpackError>;

pub(crate) fn mismatch(op: &'static str, expected: &[usize], found: &[usize]) -> MatpackError {
    MatpackError::DimensionMismatch {
        op,
        expected: expected.to_vec(),
        found: found.to_vec(),
    }
}
