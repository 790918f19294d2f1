//! Two-dimensional views and the owning, row-major [`Matrix`].
//!
//! A matrix view is a backing buffer plus a layout: the buffer offset of
//! element `(0, 0)`, the two extents and the two strides. Element `(r, c)`
//! lives at `offset + r * row_stride + c * col_stride`. Transposition swaps
//! the two dimensions; sub-ranging, row and column extraction and the diagonal
//! all derive a new offset/stride in O(1) and never copy.

use crate::iter::{copy_rows, fill_rows, Rows, RowsMut};
use crate::range::{compose_stride, Range};
use crate::scalar::Scalar;
use crate::vector::{VectorView, VectorViewMut};
use crate::{mismatch, MatpackError, Result, UNCHECKED_INDEXING};
use num_traits::{FromPrimitive, One, Zero};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{AddAssign, DivAssign, Index, IndexMut, MulAssign, SubAssign};

// ============================================================================
// Layout
// ============================================================================

fn check_row_major(len: usize, nrows: usize, ncols: usize) -> Result<()> {
    match nrows.checked_mul(ncols) {
        Some(n) if n == len => Ok(()),
        n => Err(mismatch("from_row_major", &[n.unwrap_or(usize::MAX)], &[len])),
    }
}

/// Offset, extents and strides of a 2D selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Layout {
    offset: usize,
    dims: [usize; 2],
    strides: [isize; 2],
}

impl Layout {
    /// Dense row-major `nrows x ncols` at the start of a buffer.
    #[inline]
    pub(crate) fn row_major(nrows: usize, ncols: usize) -> Self {
        Self {
            offset: 0,
            dims: [nrows, ncols],
            strides: [ncols.max(1) as isize, 1],
        }
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.dims[0] == 0 || self.dims[1] == 0
    }

    /// Only meaningful for `(r, c)` inside a validated layout.
    #[inline]
    fn index(&self, r: usize, c: usize) -> isize {
        self.offset as isize + r as isize * self.strides[0] + c as isize * self.strides[1]
    }

    /// Buffer offset of `(r, c)`, checked against the view's own shape.
    #[inline]
    fn element_offset(&self, r: usize, c: usize, len: usize) -> usize {
        let [nr, nc] = self.dims;
        assert!(
            r < nr && c < nc,
            "index ({r}, {c}) out of bounds for shape ({nr}, {nc})"
        );
        let idx = self.index(r, c);
        debug_assert!(idx >= 0 && (idx as usize) < len);
        idx as usize
    }

    /// Rows as one range: element `(r, 0)` of every row.
    #[inline]
    pub(crate) fn row_range(&self) -> Range {
        Range::new(self.offset, self.dims[0], self.strides[0])
    }

    /// Columns relative to a row's first element.
    #[inline]
    pub(crate) fn col_range(&self) -> Range {
        Range::new(0, self.dims[1], self.strides[1])
    }

    fn sub(&self, rows: Range, cols: Range) -> Self {
        let r = rows.resolve(self.dims[0]);
        let c = cols.resolve(self.dims[1]);
        let offset = if r.is_empty() || c.is_empty() {
            self.offset
        } else {
            self.index(r.start(), c.start()) as usize
        };
        Self {
            offset,
            dims: [r.bound(), c.bound()],
            strides: [
                compose_stride(self.strides[0], r.stride(), r.len()),
                compose_stride(self.strides[1], c.stride(), c.len()),
            ],
        }
    }

    /// Selection along dimension `axis` with the other index fixed at `at`.
    fn line(&self, axis: usize, at: usize, sel: Range) -> Range {
        let other = 1 - axis;
        let n = self.dims[other];
        assert!(at < n, "index {at} out of bounds for extent {n}");
        let sel = sel.resolve(self.dims[axis]);
        let start = if sel.is_empty() {
            self.offset
        } else {
            let mut at_sel = [at, at];
            at_sel[axis] = sel.start();
            self.index(at_sel[0], at_sel[1]) as usize
        };
        Range::new(
            start,
            sel.bound(),
            compose_stride(self.strides[axis], sel.stride(), sel.len()),
        )
    }

    #[inline]
    fn row(&self, r: usize, cols: Range) -> Range {
        self.line(1, r, cols)
    }

    #[inline]
    fn column(&self, rows: Range, c: usize) -> Range {
        self.line(0, c, rows)
    }

    /// Elements `(i, i)`; stride `row_stride + col_stride`.
    ///
    /// Panics when that stride is 0 and more than one element is selected.
    fn diagonal(&self) -> Range {
        let n = self.dims[0].min(self.dims[1]);
        let stride = self.strides[0] + self.strides[1];
        assert!(
            stride != 0 || n <= 1,
            "diagonal would address one element {n} times"
        );
        Range::new(self.offset, n, if stride == 0 { 1 } else { stride })
    }

    #[inline]
    fn transposed(&self) -> Self {
        Self {
            offset: self.offset,
            dims: [self.dims[1], self.dims[0]],
            strides: [self.strides[1], self.strides[0]],
        }
    }

    /// Lowest and highest buffer index a non-empty layout reaches, or `None`
    /// if either (or the element count) does not fit in the index types.
    fn reach(&self) -> Option<(isize, isize)> {
        self.dims[0].checked_mul(self.dims[1])?;
        let mut lowest = isize::try_from(self.offset).ok()?;
        let mut highest = lowest;
        for (&n, &s) in self.dims.iter().zip(self.strides.iter()) {
            let span = isize::try_from(n - 1).ok()?.checked_mul(s)?;
            if span < 0 {
                lowest = lowest.checked_add(span)?;
            } else {
                highest = highest.checked_add(span)?;
            }
        }
        Some((lowest, highest))
    }

    /// Reject zero strides and layouts that reach outside a buffer of `len`.
    fn validate(&self, len: usize) -> Result<()> {
        for (dim, &s) in self.strides.iter().enumerate() {
            if s == 0 {
                return Err(MatpackError::ZeroStride { dim });
            }
        }
        if self.is_empty() {
            return Ok(());
        }
        let (lowest, highest) = self.reach().unwrap_or((isize::MIN, isize::MAX));
        if lowest < 0 || highest as usize >= len {
            return Err(MatpackError::BufferOverrun {
                lowest,
                highest,
                len,
            });
        }
        Ok(())
    }

    /// Whether distinct positions always address distinct elements.
    ///
    /// Holds when each row fits strictly between two row starts, or the
    /// same for columns. Survives sub-ranging and transposition.
    fn is_injective(&self) -> bool {
        let [nr, nc] = self.dims;
        if nr <= 1 || nc <= 1 {
            return true;
        }
        let rs = self.strides[0].unsigned_abs();
        let cs = self.strides[1].unsigned_abs();
        let fits = |step: usize, n: usize, gap: usize| {
            step.checked_mul(n - 1).is_some_and(|width| width < gap)
        };
        fits(cs, nc, rs) || fits(rs, nr, cs)
    }

    fn contiguous_parts(&self) -> Option<(usize, usize)> {
        let [nr, nc] = self.dims;
        let n = nr * nc;
        if n == 0 {
            return Some((0, 0));
        }
        let row_dense = nc <= 1 || self.strides[1] == 1;
        let rows_packed = nr <= 1 || self.strides[0] == nc as isize;
        (row_dense && rows_packed).then_some((self.offset, n))
    }
}

// ============================================================================
// MatrixView
// ============================================================================

/// Read-only strided 2D view.
pub struct MatrixView<'a, T> {
    ptr: *const T,
    len: usize,
    layout: Layout,
    _marker: PhantomData<&'a [T]>,
}

unsafe impl<T: Sync> Send for MatrixView<'_, T> {}
unsafe impl<T: Sync> Sync for MatrixView<'_, T> {}

impl<T> Clone for MatrixView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for MatrixView<'_, T> {}

impl<'a, T> MatrixView<'a, T> {
    /// View `data` with an arbitrary strided layout.
    ///
    /// # Errors
    /// - [`MatpackError::ZeroStride`] for a zero stride
    /// - [`MatpackError::BufferOverrun`] if any element lies outside `data`
    pub fn from_strided(
        data: &'a [T],
        dims: [usize; 2],
        strides: [isize; 2],
        offset: usize,
    ) -> Result<Self> {
        let layout = Layout {
            offset,
            dims,
            strides,
        };
        layout.validate(data.len())?;
        Ok(unsafe { Self::from_raw(data.as_ptr(), data.len(), layout) })
    }

    /// View `data` as a dense row-major `nrows x ncols` matrix.
    pub fn from_row_major(data: &'a [T], nrows: usize, ncols: usize) -> Result<Self> {
        check_row_major(data.len(), nrows, ncols)?;
        let layout = Layout::row_major(nrows, ncols);
        Ok(unsafe { Self::from_raw(data.as_ptr(), data.len(), layout) })
    }

    /// # Safety
    /// `ptr..ptr+len` must be borrowed for `'a` and every element of `layout`
    /// must lie below `len`.
    #[inline]
    pub(crate) unsafe fn from_raw(ptr: *const T, len: usize, layout: Layout) -> Self {
        Self {
            ptr,
            len,
            layout,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.layout.dims[0]
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.layout.dims[1]
    }

    /// `[nrows, ncols]`.
    #[inline]
    pub fn dims(&self) -> [usize; 2] {
        self.layout.dims
    }

    /// `[row_stride, col_stride]`.
    #[inline]
    pub fn strides(&self) -> [isize; 2] {
        self.layout.strides
    }

    #[inline]
    pub fn row_stride(&self) -> isize {
        self.layout.strides[0]
    }

    #[inline]
    pub fn col_stride(&self) -> isize {
        self.layout.strides[1]
    }

    /// Buffer offset of element `(0, 0)`.
    #[inline]
    pub fn offset(&self) -> usize {
        self.layout.offset
    }

    /// Row selection in buffer coordinates: element `(r, 0)` for each row.
    #[inline]
    pub fn row_range(&self) -> Range {
        self.layout.row_range()
    }

    /// Column selection relative to the start of a row.
    #[inline]
    pub fn col_range(&self) -> Range {
        self.layout.col_range()
    }

    /// Number of addressed elements.
    #[inline]
    pub fn nelem(&self) -> usize {
        self.nrows() * self.ncols()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> Option<&'a T> {
        if r < self.nrows() && c < self.ncols() {
            Some(unsafe { &*self.ptr.add(self.layout.index(r, c) as usize) })
        } else {
            None
        }
    }

    /// Sub-view `m(rows, cols)`, both ranges in this view's index space.
    #[inline]
    pub fn sub(&self, rows: impl Into<Range>, cols: impl Into<Range>) -> MatrixView<'a, T> {
        unsafe { Self::from_raw(self.ptr, self.len, self.layout.sub(rows.into(), cols.into())) }
    }

    /// Part of row `r`, selected by `cols`.
    #[inline]
    pub fn row(&self, r: usize, cols: impl Into<Range>) -> VectorView<'a, T> {
        unsafe { VectorView::from_raw(self.ptr, self.len, self.layout.row(r, cols.into())) }
    }

    /// Part of column `c`, selected by `rows`.
    #[inline]
    pub fn column(&self, rows: impl Into<Range>, c: usize) -> VectorView<'a, T> {
        unsafe { VectorView::from_raw(self.ptr, self.len, self.layout.column(rows.into(), c)) }
    }

    /// Transposed view over the same memory.
    #[inline]
    pub fn t(&self) -> MatrixView<'a, T> {
        unsafe { Self::from_raw(self.ptr, self.len, self.layout.transposed()) }
    }

    /// Elements `(i, i)` for `i < min(nrows, ncols)`.
    ///
    /// # Panics
    /// Panics if `row_stride + col_stride == 0` and the diagonal has more than
    /// one element, e.g. a layout with strides `[1, -1]`: every `(i, i)` would
    /// be the same element.
    #[inline]
    pub fn diagonal(&self) -> VectorView<'a, T> {
        unsafe { VectorView::from_raw(self.ptr, self.len, self.layout.diagonal()) }
    }

    #[inline]
    pub fn iter_rows(&self) -> Rows<'a, T> {
        unsafe {
            Rows::new(
                self.ptr,
                self.len,
                self.layout.row_range(),
                self.layout.col_range(),
            )
        }
    }

    /// Row-major element iterator.
    pub fn iter(&self) -> impl Iterator<Item = &'a T> + 'a {
        self.iter_rows().flat_map(|row| row.iter())
    }

    /// Whether the view is a dense row-major block.
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.layout.contiguous_parts().is_some()
    }

    /// Row-major elements as a slice, if the view is dense.
    pub fn as_slice(&self) -> Option<&'a [T]> {
        let (start, n) = self.layout.contiguous_parts()?;
        if n == 0 {
            return Some(&[][..]);
        }
        Some(unsafe { std::slice::from_raw_parts(self.ptr.add(start), n) })
    }

    /// Address of element `(0, 0)`.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.wrapping_add(self.layout.offset)
    }
}

impl<T: Copy> MatrixView<'_, T> {
    /// Dense row-major copy of the addressed elements.
    pub fn to_matrix(&self) -> Matrix<T> {
        Matrix::from_view(self)
    }
}

impl<T: Scalar> MatrixView<'_, T> {
    pub fn sum(&self) -> T {
        self.iter_rows().fold(T::zero(), |acc, row| acc + row.sum())
    }

    /// Arithmetic mean; `None` for an empty view.
    pub fn mean(&self) -> Option<T>
    where
        T: FromPrimitive,
    {
        if self.is_empty() {
            return None;
        }
        Some(self.sum() / T::from_usize(self.nelem())?)
    }

    pub fn min(&self) -> Option<T>
    where
        T: PartialOrd,
    {
        self.iter_rows().filter_map(|row| row.min()).reduce(|a, x| if x < a { x } else { a })
    }

    pub fn max(&self) -> Option<T>
    where
        T: PartialOrd,
    {
        self.iter_rows().filter_map(|row| row.max()).reduce(|a, x| if x > a { x } else { a })
    }
}

impl<T> Index<(usize, usize)> for MatrixView<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, (r, c): (usize, usize)) -> &T {
        unsafe { &*self.ptr.add(self.layout.element_offset(r, c, self.len)) }
    }
}

impl<'a, 'b, T: PartialEq> PartialEq<MatrixView<'b, T>> for MatrixView<'a, T> {
    fn eq(&self, other: &MatrixView<'b, T>) -> bool {
        self.dims() == other.dims() && self.iter_rows().zip(other.iter_rows()).all(|(a, b)| a == b)
    }
}

impl<T> fmt::Debug for MatrixView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixView")
            .field("dims", &self.layout.dims)
            .field("strides", &self.layout.strides)
            .field("offset", &self.layout.offset)
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for MatrixView<'_, T> {
    /// One line per row, elements separated by spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.iter_rows().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            fmt::Display::fmt(&row, f)?;
        }
        Ok(())
    }
}

// ============================================================================
// MatrixViewMut
// ============================================================================

/// Mutable strided 2D view.
///
/// Distinct positions always address distinct elements; constructors reject
/// layouts where two positions would share one.
pub struct MatrixViewMut<'a, T> {
    ptr: *mut T,
    len: usize,
    layout: Layout,
    _marker: PhantomData<&'a mut [T]>,
}

unsafe impl<T: Send> Send for MatrixViewMut<'_, T> {}
unsafe impl<T: Sync> Sync for MatrixViewMut<'_, T> {}

impl<'a, T> MatrixViewMut<'a, T> {
    /// Mutable view of `data` with an arbitrary strided layout.
    ///
    /// # Errors
    /// - [`MatpackError::ZeroStride`] for a zero stride
    /// - [`MatpackError::BufferOverrun`] if any element lies outside `data`
    /// - [`MatpackError::OverlappingView`] if two positions share an element
    pub fn from_strided(
        data: &'a mut [T],
        dims: [usize; 2],
        strides: [isize; 2],
        offset: usize,
    ) -> Result<Self> {
        let layout = Layout {
            offset,
            dims,
            strides,
        };
        layout.validate(data.len())?;
        if !layout.is_injective() {
            return Err(MatpackError::OverlappingView);
        }
        Ok(unsafe { Self::from_raw(data.as_mut_ptr(), data.len(), layout) })
    }

    pub fn from_row_major(data: &'a mut [T], nrows: usize, ncols: usize) -> Result<Self> {
        check_row_major(data.len(), nrows, ncols)?;
        let layout = Layout::row_major(nrows, ncols);
        Ok(unsafe { Self::from_raw(data.as_mut_ptr(), data.len(), layout) })
    }

    /// # Safety
    /// `ptr..ptr+len` must be exclusively borrowed for `'a`, every element of
    /// `layout` must lie below `len` and `layout` must be injective.
    #[inline]
    pub(crate) unsafe fn from_raw(ptr: *mut T, len: usize, layout: Layout) -> Self {
        debug_assert!(layout.is_injective());
        Self {
            ptr,
            len,
            layout,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn as_view(&self) -> MatrixView<'_, T> {
        unsafe { MatrixView::from_raw(self.ptr, self.len, self.layout) }
    }

    #[inline]
    pub fn into_view(self) -> MatrixView<'a, T> {
        unsafe { MatrixView::from_raw(self.ptr, self.len, self.layout) }
    }

    #[inline]
    pub fn reborrow(&mut self) -> MatrixViewMut<'_, T> {
        unsafe { MatrixViewMut::from_raw(self.ptr, self.len, self.layout) }
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.layout.dims[0]
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.layout.dims[1]
    }

    #[inline]
    pub fn dims(&self) -> [usize; 2] {
        self.layout.dims
    }

    #[inline]
    pub fn strides(&self) -> [isize; 2] {
        self.layout.strides
    }

    #[inline]
    pub fn row_stride(&self) -> isize {
        self.layout.strides[0]
    }

    #[inline]
    pub fn col_stride(&self) -> isize {
        self.layout.strides[1]
    }

    #[inline]
    pub fn nelem(&self) -> usize {
        self.nrows() * self.ncols()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.layout.is_empty()
    }

    #[inline]
    pub fn get(&self, r: usize, c: usize) -> Option<&T> {
        self.as_view().get(r, c)
    }

    #[inline]
    pub fn get_mut(&mut self, r: usize, c: usize) -> Option<&mut T> {
        if r < self.nrows() && c < self.ncols() {
            Some(unsafe { &mut *self.ptr.add(self.layout.index(r, c) as usize) })
        } else {
            None
        }
    }

    #[inline]
    pub fn sub(&self, rows: impl Into<Range>, cols: impl Into<Range>) -> MatrixView<'_, T> {
        self.as_view().sub(rows, cols)
    }

    #[inline]
    pub fn sub_mut(
        &mut self,
        rows: impl Into<Range>,
        cols: impl Into<Range>,
    ) -> MatrixViewMut<'_, T> {
        self.reborrow().into_sub(rows, cols)
    }

    #[inline]
    pub fn into_sub(self, rows: impl Into<Range>, cols: impl Into<Range>) -> MatrixViewMut<'a, T> {
        unsafe { Self::from_raw(self.ptr, self.len, self.layout.sub(rows.into(), cols.into())) }
    }

    #[inline]
    pub fn row(&self, r: usize, cols: impl Into<Range>) -> VectorView<'_, T> {
        self.as_view().row(r, cols)
    }

    #[inline]
    pub fn row_mut(&mut self, r: usize, cols: impl Into<Range>) -> VectorViewMut<'_, T> {
        unsafe { VectorViewMut::from_raw(self.ptr, self.len, self.layout.row(r, cols.into())) }
    }

    #[inline]
    pub fn column(&self, rows: impl Into<Range>, c: usize) -> VectorView<'_, T> {
        self.as_view().column(rows, c)
    }

    #[inline]
    pub fn column_mut(&mut self, rows: impl Into<Range>, c: usize) -> VectorViewMut<'_, T> {
        unsafe { VectorViewMut::from_raw(self.ptr, self.len, self.layout.column(rows.into(), c)) }
    }

    #[inline]
    pub fn t(&self) -> MatrixView<'_, T> {
        self.as_view().t()
    }

    /// Mutable transposed view; writes land in this view's elements.
    #[inline]
    pub fn t_mut(&mut self) -> MatrixViewMut<'_, T> {
        self.reborrow().into_t()
    }

    #[inline]
    pub fn into_t(self) -> MatrixViewMut<'a, T> {
        unsafe { Self::from_raw(self.ptr, self.len, self.layout.transposed()) }
    }

    #[inline]
    pub fn diagonal(&self) -> VectorView<'_, T> {
        self.as_view().diagonal()
    }

    /// # Panics
    /// Same condition as [`MatrixView::diagonal`].
    #[inline]
    pub fn diagonal_mut(&mut self) -> VectorViewMut<'_, T> {
        unsafe { VectorViewMut::from_raw(self.ptr, self.len, self.layout.diagonal()) }
    }

    #[inline]
    pub fn iter_rows(&self) -> Rows<'_, T> {
        self.as_view().iter_rows()
    }

    #[inline]
    pub fn iter_rows_mut(&mut self) -> RowsMut<'_, T> {
        self.reborrow().into_rows()
    }

    /// Consume the view into its rows; the rows may be held simultaneously.
    #[inline]
    pub fn into_rows(self) -> RowsMut<'a, T> {
        unsafe {
            RowsMut::new(
                self.ptr,
                self.len,
                self.layout.row_range(),
                self.layout.col_range(),
            )
        }
    }

    #[inline]
    pub fn is_contiguous(&self) -> bool {
        self.layout.contiguous_parts().is_some()
    }

    pub fn as_slice(&self) -> Option<&[T]> {
        self.as_view().as_slice()
    }

    pub fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        let (start, n) = self.layout.contiguous_parts()?;
        if n == 0 {
            return Some(&mut [][..]);
        }
        Some(unsafe { std::slice::from_raw_parts_mut(self.ptr.add(start), n) })
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.wrapping_add(self.layout.offset)
    }

    /// Address of element `(0, 0)`, for handing to external kernels.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.wrapping_add(self.layout.offset)
    }
}

impl<T: Copy> MatrixViewMut<'_, T> {
    pub fn fill(&mut self, x: T) {
        fill_rows(x, self.iter_rows_mut());
    }

    /// Element-by-element copy from `src`, honoring every stride.
    ///
    /// # Errors
    /// [`MatpackError::DimensionMismatch`] if the shapes differ.
    pub fn assign(&mut self, src: &MatrixView<'_, T>) -> Result<()> {
        if self.dims() != src.dims() {
            return Err(mismatch("assign", &self.dims(), &src.dims()));
        }
        copy_rows(src.iter_rows(), self.iter_rows_mut());
        Ok(())
    }
}

impl<T: Scalar> MatrixViewMut<'_, T> {
    fn zip_apply(
        &mut self,
        op: &'static str,
        x: &MatrixView<'_, T>,
        f: impl Fn(T, T) -> T,
    ) -> Result<()> {
        if self.dims() != x.dims() {
            return Err(mismatch(op, &self.dims(), &x.dims()));
        }
        for (mut d, s) in self.iter_rows_mut().zip(x.iter_rows()) {
            for (a, &b) in d.iter_mut().zip(s.iter()) {
                *a = f(*a, b);
            }
        }
        Ok(())
    }

    pub fn try_add_assign(&mut self, x: &MatrixView<'_, T>) -> Result<()> {
        self.zip_apply("add_assign", x, |a, b| a + b)
    }

    pub fn try_sub_assign(&mut self, x: &MatrixView<'_, T>) -> Result<()> {
        self.zip_apply("sub_assign", x, |a, b| a - b)
    }

    /// Elementwise (Hadamard) product.
    pub fn try_mul_assign(&mut self, x: &MatrixView<'_, T>) -> Result<()> {
        self.zip_apply("mul_assign", x, |a, b| a * b)
    }

    pub fn try_div_assign(&mut self, x: &MatrixView<'_, T>) -> Result<()> {
        self.zip_apply("div_assign", x, |a, b| a / b)
    }

    fn apply_scalar(&mut self, f: impl Fn(T) -> T) {
        for mut row in self.iter_rows_mut() {
            for a in row.iter_mut() {
                *a = f(*a);
            }
        }
    }
}

impl<T: Scalar> AddAssign<T> for MatrixViewMut<'_, T> {
    fn add_assign(&mut self, x: T) {
        self.apply_scalar(|a| a + x);
    }
}

impl<T: Scalar> SubAssign<T> for MatrixViewMut<'_, T> {
    fn sub_assign(&mut self, x: T) {
        self.apply_scalar(|a| a - x);
    }
}

impl<T: Scalar> MulAssign<T> for MatrixViewMut<'_, T> {
    fn mul_assign(&mut self, x: T) {
        self.apply_scalar(|a| a * x);
    }
}

impl<T: Scalar> DivAssign<T> for MatrixViewMut<'_, T> {
    fn div_assign(&mut self, x: T) {
        self.apply_scalar(|a| a / x);
    }
}

impl<T> Index<(usize, usize)> for MatrixViewMut<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, (r, c): (usize, usize)) -> &T {
        unsafe { &*self.ptr.add(self.layout.element_offset(r, c, self.len)) }
    }
}

impl<T> IndexMut<(usize, usize)> for MatrixViewMut<'_, T> {
    #[inline]
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut T {
        unsafe { &mut *self.ptr.add(self.layout.element_offset(r, c, self.len)) }
    }
}

impl<T> fmt::Debug for MatrixViewMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MatrixViewMut")
            .field("dims", &self.layout.dims)
            .field("strides", &self.layout.strides)
            .field("offset", &self.layout.offset)
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for MatrixViewMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_view(), f)
    }
}

// ============================================================================
// Matrix
// ============================================================================

/// Owning, dense row-major matrix.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Matrix<T> {
    data: Vec<T>,
    nrows: usize,
    ncols: usize,
}

impl<T> Matrix<T> {
    /// Empty `0 x 0` matrix.
    pub fn new() -> Self {
        Self {
            data: Vec::new(),
            nrows: 0,
            ncols: 0,
        }
    }

    /// Take ownership of a row-major buffer.
    ///
    /// # Errors
    /// [`MatpackError::DimensionMismatch`] if `data.len() != nrows * ncols`.
    pub fn from_row_major(data: Vec<T>, nrows: usize, ncols: usize) -> Result<Self> {
        check_row_major(data.len(), nrows, ncols)?;
        Ok(Self { data, nrows, ncols })
    }

    /// Build from `f(r, c)`, evaluated in row-major order.
    pub fn from_fn(nrows: usize, ncols: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(nrows * ncols);
        for r in 0..nrows {
            for c in 0..ncols {
                data.push(f(r, c));
            }
        }
        Self { data, nrows, ncols }
    }

    #[inline]
    pub fn nrows(&self) -> usize {
        self.nrows
    }

    #[inline]
    pub fn ncols(&self) -> usize {
        self.ncols
    }

    #[inline]
    pub fn dims(&self) -> [usize; 2] {
        [self.nrows, self.ncols]
    }

    #[inline]
    pub fn nelem(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn view(&self) -> MatrixView<'_, T> {
        unsafe {
            MatrixView::from_raw(
                self.data.as_ptr(),
                self.data.len(),
                Layout::row_major(self.nrows, self.ncols),
            )
        }
    }

    #[inline]
    pub fn view_mut(&mut self) -> MatrixViewMut<'_, T> {
        let layout = Layout::row_major(self.nrows, self.ncols);
        unsafe { MatrixViewMut::from_raw(self.data.as_mut_ptr(), self.data.len(), layout) }
    }

    #[inline]
    pub fn sub(&self, rows: impl Into<Range>, cols: impl Into<Range>) -> MatrixView<'_, T> {
        self.view().sub(rows, cols)
    }

    #[inline]
    pub fn sub_mut(
        &mut self,
        rows: impl Into<Range>,
        cols: impl Into<Range>,
    ) -> MatrixViewMut<'_, T> {
        self.view_mut().into_sub(rows, cols)
    }

    #[inline]
    pub fn row(&self, r: usize, cols: impl Into<Range>) -> VectorView<'_, T> {
        self.view().row(r, cols)
    }

    #[inline]
    pub fn row_mut(&mut self, r: usize, cols: impl Into<Range>) -> VectorViewMut<'_, T> {
        let range = Layout::row_major(self.nrows, self.ncols).row(r, cols.into());
        unsafe { VectorViewMut::from_raw(self.data.as_mut_ptr(), self.data.len(), range) }
    }

    #[inline]
    pub fn column(&self, rows: impl Into<Range>, c: usize) -> VectorView<'_, T> {
        self.view().column(rows, c)
    }

    #[inline]
    pub fn column_mut(&mut self, rows: impl Into<Range>, c: usize) -> VectorViewMut<'_, T> {
        let range = Layout::row_major(self.nrows, self.ncols).column(rows.into(), c);
        unsafe { VectorViewMut::from_raw(self.data.as_mut_ptr(), self.data.len(), range) }
    }

    /// Transposed view; no copy.
    #[inline]
    pub fn t(&self) -> MatrixView<'_, T> {
        self.view().t()
    }

    #[inline]
    pub fn t_mut(&mut self) -> MatrixViewMut<'_, T> {
        self.view_mut().into_t()
    }

    #[inline]
    pub fn diagonal(&self) -> VectorView<'_, T> {
        self.view().diagonal()
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Row-major offset of `(r, c)`.
    ///
    /// With `unchecked-indexing` the shape check is skipped and `c` may run
    /// into the following rows; the owner borrows its whole buffer, so the
    /// slice bound check on `data` is the only one memory safety needs.
    #[inline]
    fn offset_of(&self, r: usize, c: usize) -> usize {
        if !UNCHECKED_INDEXING {
            assert!(
                r < self.nrows && c < self.ncols,
                "index ({r}, {c}) out of bounds for shape ({}, {})",
                self.nrows,
                self.ncols
            );
        }
        match r.checked_mul(self.ncols).and_then(|o| o.checked_add(c)) {
            Some(i) => i,
            None => panic!("index ({r}, {c}) overflows"),
        }
    }
}

impl<T: Clone> Matrix<T> {
    pub fn filled(nrows: usize, ncols: usize, x: T) -> Self {
        Self {
            data: vec![x; nrows * ncols],
            nrows,
            ncols,
        }
    }
}

impl<T: Clone + Zero> Matrix<T> {
    pub fn zeros(nrows: usize, ncols: usize) -> Self {
        Self::filled(nrows, ncols, T::zero())
    }

    /// Replace the buffer with a fresh zeroed `nrows x ncols` one.
    ///
    /// Previous contents are discarded.
    pub fn resize(&mut self, nrows: usize, ncols: usize) {
        tracing::debug!(
            old_rows = self.nrows,
            old_cols = self.ncols,
            nrows,
            ncols,
            "reallocating matrix buffer"
        );
        self.data = vec![T::zero(); nrows * ncols];
        self.nrows = nrows;
        self.ncols = ncols;
    }
}

impl<T: Clone + Zero + One> Matrix<T> {
    pub fn identity(n: usize) -> Self {
        Self::from_fn(n, n, |r, c| if r == c { T::one() } else { T::zero() })
    }
}

impl<T: Copy> Matrix<T> {
    /// Dense copy of exactly the elements `m` addresses.
    pub fn from_view(m: &MatrixView<'_, T>) -> Self {
        Self {
            data: m.iter().copied().collect(),
            nrows: m.nrows(),
            ncols: m.ncols(),
        }
    }

    pub fn fill(&mut self, x: T) {
        self.data.fill(x);
    }

    pub fn assign(&mut self, src: &MatrixView<'_, T>) -> Result<()> {
        self.view_mut().assign(src)
    }
}

impl<T, const R: usize, const C: usize> From<[[T; C]; R]> for Matrix<T> {
    fn from(rows: [[T; C]; R]) -> Self {
        Self {
            data: rows.into_iter().flatten().collect(),
            nrows: R,
            ncols: C,
        }
    }
}

impl<T: Copy> From<MatrixView<'_, T>> for Matrix<T> {
    fn from(m: MatrixView<'_, T>) -> Self {
        Self::from_view(&m)
    }
}

impl<T> Index<(usize, usize)> for Matrix<T> {
    type Output = T;

    #[inline]
    fn index(&self, (r, c): (usize, usize)) -> &T {
        &self.data[self.offset_of(r, c)]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T> {
    #[inline]
    fn index_mut(&mut self, (r, c): (usize, usize)) -> &mut T {
        let i = self.offset_of(r, c);
        &mut self.data[i]
    }
}

impl<T: Scalar> AddAssign<T> for Matrix<T> {
    fn add_assign(&mut self, x: T) {
        let mut v = self.view_mut();
        v += x;
    }
}

impl<T: Scalar> SubAssign<T> for Matrix<T> {
    fn sub_assign(&mut self, x: T) {
        let mut v = self.view_mut();
        v -= x;
    }
}

impl<T: Scalar> MulAssign<T> for Matrix<T> {
    fn mul_assign(&mut self, x: T) {
        let mut v = self.view_mut();
        v *= x;
    }
}

impl<T: Scalar> DivAssign<T> for Matrix<T> {
    fn div_assign(&mut self, x: T) {
        let mut v = self.view_mut();
        v /= x;
    }
}

impl<T: fmt::Display> fmt::Display for Matrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.view(), f)
    }
}

// ============================================================================
// Rank lift
// ============================================================================

/// A vector as an `n x 1` matrix over the same memory.
pub fn as_column<'a, T>(v: VectorView<'a, T>) -> MatrixView<'a, T> {
    let (ptr, len) = v.raw_parts();
    unsafe { MatrixView::from_raw(ptr, len, lifted(v.range(), true)) }
}

/// A vector as a `1 x n` matrix over the same memory.
pub fn as_row<'a, T>(v: VectorView<'a, T>) -> MatrixView<'a, T> {
    let (ptr, len) = v.raw_parts();
    unsafe { MatrixView::from_raw(ptr, len, lifted(v.range(), false)) }
}

pub fn as_column_mut<'a, T>(v: VectorViewMut<'a, T>) -> MatrixViewMut<'a, T> {
    let (ptr, len, range) = v.into_raw_parts();
    unsafe { MatrixViewMut::from_raw(ptr, len, lifted(range, true)) }
}

pub fn as_row_mut<'a, T>(v: VectorViewMut<'a, T>) -> MatrixViewMut<'a, T> {
    let (ptr, len, range) = v.into_raw_parts();
    unsafe { MatrixViewMut::from_raw(ptr, len, lifted(range, false)) }
}

/// Layout of a resolved vector range seen as one column (or one row). The
/// unit dimension gets stride 1, which is never used to address memory.
fn lifted(range: Range, column: bool) -> Layout {
    let n = range.bound();
    let (dims, strides) = if column {
        ([n, 1], [range.stride(), 1])
    } else {
        ([1, n], [1, range.stride()])
    };
    Layout {
        offset: range.start(),
        dims,
        strides,
    }
}
