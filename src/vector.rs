//! One-dimensional views and the owning [`Vector`].
//!
//! - [`VectorView`]: read-only, `Copy`, may alias other read-only views
//! - [`VectorViewMut`]: exclusive, writes are visible through the owner
//! - [`Vector`]: owns a contiguous buffer and hands out the two views above
//!
//! Both views carry the backing buffer as pointer + length and one resolved
//! [`Range`]. Every element access goes through [`Range::index`]; no view ever
//! materializes a slice over memory outside its own selection.

use crate::iter::{copy, fill, Iter1D, IterMut1D};
use crate::range::Range;
use crate::scalar::Scalar;
use crate::{mismatch, Result};
use num_traits::{FromPrimitive, Zero};
use std::fmt;
use std::marker::PhantomData;
use std::ops::{AddAssign, DivAssign, Index, IndexMut, MulAssign, SubAssign};

/// Buffer offset of logical index `i`, checked against the view's extent.
///
/// A view never reaches past its own selection: sibling views (rows of one
/// matrix, say) may hold the neighbouring elements mutably.
#[inline]
pub(crate) fn element_offset(range: &Range, i: usize, len: usize) -> usize {
    let n = range.bound();
    assert!(i < n, "index {i} out of bounds for extent {n}");
    let idx = range.index(i);
    debug_assert!(idx >= 0 && (idx as usize) < len);
    idx as usize
}

#[inline]
fn contiguous_parts(range: &Range) -> Option<(usize, usize)> {
    let n = range.bound();
    if n <= 1 || range.stride() == 1 {
        Some((range.start(), n))
    } else {
        None
    }
}

// ============================================================================
// VectorView
// ============================================================================

/// Read-only strided view of a 1D selection.
pub struct VectorView<'a, T> {
    ptr: *const T,
    len: usize,
    range: Range,
    _marker: PhantomData<&'a [T]>,
}

unsafe impl<T: Sync> Send for VectorView<'_, T> {}
unsafe impl<T: Sync> Sync for VectorView<'_, T> {}

impl<T> Clone for VectorView<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for VectorView<'_, T> {}

impl<'a, T> VectorView<'a, T> {
    /// View the elements of `data` that `range` selects.
    ///
    /// # Errors
    /// Returns [`MatpackError::OutOfBounds`](crate::MatpackError::OutOfBounds)
    /// if `range` selects indices outside `data`.
    pub fn new(data: &'a [T], range: impl Into<Range>) -> Result<Self> {
        let range = range.into().try_resolve(data.len())?;
        Ok(unsafe { Self::from_raw(data.as_ptr(), data.len(), range) })
    }

    /// View the whole slice.
    #[inline]
    pub fn from_slice(data: &'a [T]) -> Self {
        unsafe { Self::from_raw(data.as_ptr(), data.len(), Range::new(0, data.len(), 1)) }
    }

    /// One-element view of a single value.
    #[inline]
    pub fn from_ref(x: &'a T) -> Self {
        Self::from_slice(std::slice::from_ref(x))
    }

    /// # Safety
    /// `ptr..ptr+len` must be borrowed (shared) for `'a`, `range` must be
    /// resolved and every index it selects must lie below `len`.
    #[inline]
    pub(crate) unsafe fn from_raw(ptr: *const T, len: usize, range: Range) -> Self {
        Self {
            ptr,
            len,
            range,
            _marker: PhantomData,
        }
    }

    /// Number of selected elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.range.bound()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Selection in backing-buffer coordinates.
    #[inline]
    pub fn range(&self) -> Range {
        self.range
    }

    #[inline]
    pub fn stride(&self) -> isize {
        self.range.stride()
    }

    /// Sub-view; `range` is expressed in this view's index space.
    ///
    /// # Panics
    /// Panics if `range` selects indices outside `0..self.len()`.
    #[inline]
    pub fn sub(&self, range: impl Into<Range>) -> VectorView<'a, T> {
        unsafe { Self::from_raw(self.ptr, self.len, self.range.compose(&range.into())) }
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&'a T> {
        if i < self.len() {
            Some(unsafe { self.get_unchecked(i) })
        } else {
            None
        }
    }

    /// # Safety
    /// `i` must be below `self.len()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, i: usize) -> &'a T {
        debug_assert!(i < self.len());
        &*self.ptr.add(self.range.index(i) as usize)
    }

    #[inline]
    pub fn iter(&self) -> Iter1D<'a, T> {
        unsafe { Iter1D::new(self.ptr, self.len, self.range) }
    }

    /// Whether consecutive elements are adjacent in memory.
    #[inline]
    pub fn is_contiguous(&self) -> bool {
        contiguous_parts(&self.range).is_some()
    }

    /// The selected elements as a slice, if the view is contiguous.
    ///
    /// This is the hand-off point to code that expects a dense buffer.
    pub fn as_slice(&self) -> Option<&'a [T]> {
        let (start, n) = contiguous_parts(&self.range)?;
        if n == 0 {
            return Some(&[][..]);
        }
        Some(unsafe { std::slice::from_raw_parts(self.ptr.add(start), n) })
    }

    /// Address of element 0.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.wrapping_add(self.range.start())
    }

    /// Base pointer and length of the whole backing buffer.
    #[inline]
    pub(crate) fn raw_parts(&self) -> (*const T, usize) {
        (self.ptr, self.len)
    }
}

impl<'a, T: Copy> VectorView<'a, T> {
    /// Deep copy of the selected elements.
    pub fn to_vector(&self) -> Vector<T> {
        Vector::from_view(self)
    }
}

impl<'a, T: Scalar> VectorView<'a, T> {
    /// Sum of the selected elements; zero for an empty view.
    pub fn sum(&self) -> T {
        self.iter().fold(T::zero(), |acc, &x| acc + x)
    }

    /// `Σ self[i] * other[i]`.
    ///
    /// # Errors
    /// [`MatpackError::DimensionMismatch`](crate::MatpackError::DimensionMismatch)
    /// if the extents differ.
    pub fn dot(&self, other: &VectorView<'_, T>) -> Result<T> {
        if self.len() != other.len() {
            return Err(mismatch("dot", &[self.len()], &[other.len()]));
        }
        Ok(self
            .iter()
            .zip(other.iter())
            .fold(T::zero(), |acc, (&a, &b)| acc + a * b))
    }

    /// Arithmetic mean; `None` for an empty view.
    pub fn mean(&self) -> Option<T>
    where
        T: FromPrimitive,
    {
        if self.is_empty() {
            return None;
        }
        Some(self.sum() / T::from_usize(self.len())?)
    }

    /// Smallest element; `None` for an empty view.
    pub fn min(&self) -> Option<T>
    where
        T: PartialOrd,
    {
        self.iter()
            .copied()
            .reduce(|acc, x| if x < acc { x } else { acc })
    }

    /// Largest element; `None` for an empty view.
    pub fn max(&self) -> Option<T>
    where
        T: PartialOrd,
    {
        self.iter()
            .copied()
            .reduce(|acc, x| if x > acc { x } else { acc })
    }
}

impl<T> Index<usize> for VectorView<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        unsafe { &*self.ptr.add(element_offset(&self.range, i, self.len)) }
    }
}

impl<'a, T> IntoIterator for VectorView<'a, T> {
    type Item = &'a T;
    type IntoIter = Iter1D<'a, T>;

    fn into_iter(self) -> Iter1D<'a, T> {
        self.iter()
    }
}

impl<'a, 'b, T: PartialEq> PartialEq<VectorView<'b, T>> for VectorView<'a, T> {
    fn eq(&self, other: &VectorView<'b, T>) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T> fmt::Debug for VectorView<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorView")
            .field("range", &self.range)
            .field("buffer_len", &self.len)
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for VectorView<'_, T> {
    /// Elements separated by single spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, x) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            fmt::Display::fmt(x, f)?;
        }
        Ok(())
    }
}

// ============================================================================
// VectorViewMut
// ============================================================================

/// Mutable strided view of a 1D selection.
///
/// Writes land in the backing buffer and are visible through the owner once
/// the view is gone.
pub struct VectorViewMut<'a, T> {
    ptr: *mut T,
    len: usize,
    range: Range,
    _marker: PhantomData<&'a mut [T]>,
}

unsafe impl<T: Send> Send for VectorViewMut<'_, T> {}
unsafe impl<T: Sync> Sync for VectorViewMut<'_, T> {}

impl<'a, T> VectorViewMut<'a, T> {
    /// Mutable view of the elements of `data` that `range` selects.
    ///
    /// # Errors
    /// Returns [`MatpackError::OutOfBounds`](crate::MatpackError::OutOfBounds)
    /// if `range` selects indices outside `data`.
    pub fn new(data: &'a mut [T], range: impl Into<Range>) -> Result<Self> {
        let range = range.into().try_resolve(data.len())?;
        Ok(unsafe { Self::from_raw(data.as_mut_ptr(), data.len(), range) })
    }

    #[inline]
    pub fn from_slice(data: &'a mut [T]) -> Self {
        let len = data.len();
        unsafe { Self::from_raw(data.as_mut_ptr(), len, Range::new(0, len, 1)) }
    }

    /// One-element view of a single value.
    #[inline]
    pub fn from_mut(x: &'a mut T) -> Self {
        Self::from_slice(std::slice::from_mut(x))
    }

    /// # Safety
    /// `ptr..ptr+len` must be usable for writes for `'a`, `range` must be
    /// resolved, every index it selects must lie below `len`, and no other live
    /// reference may touch those indices.
    #[inline]
    pub(crate) unsafe fn from_raw(ptr: *mut T, len: usize, range: Range) -> Self {
        Self {
            ptr,
            len,
            range,
            _marker: PhantomData,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.range.bound()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn range(&self) -> Range {
        self.range
    }

    #[inline]
    pub fn stride(&self) -> isize {
        self.range.stride()
    }

    /// Reborrow as a read-only view.
    #[inline]
    pub fn as_view(&self) -> VectorView<'_, T> {
        unsafe { VectorView::from_raw(self.ptr, self.len, self.range) }
    }

    /// Downgrade into a read-only view with the full lifetime.
    #[inline]
    pub fn into_view(self) -> VectorView<'a, T> {
        unsafe { VectorView::from_raw(self.ptr, self.len, self.range) }
    }

    /// Shorter-lived mutable view of the same selection.
    #[inline]
    pub fn reborrow(&mut self) -> VectorViewMut<'_, T> {
        unsafe { VectorViewMut::from_raw(self.ptr, self.len, self.range) }
    }

    #[inline]
    pub fn sub(&self, range: impl Into<Range>) -> VectorView<'_, T> {
        self.as_view().sub(range)
    }

    #[inline]
    pub fn sub_mut(&mut self, range: impl Into<Range>) -> VectorViewMut<'_, T> {
        self.reborrow().into_sub(range)
    }

    /// Consume the view, keeping only `range` of it.
    #[inline]
    pub fn into_sub(self, range: impl Into<Range>) -> VectorViewMut<'a, T> {
        unsafe { Self::from_raw(self.ptr, self.len, self.range.compose(&range.into())) }
    }

    #[inline]
    pub fn get(&self, i: usize) -> Option<&T> {
        self.as_view().get(i)
    }

    #[inline]
    pub fn get_mut(&mut self, i: usize) -> Option<&mut T> {
        if i < self.len() {
            Some(unsafe { self.get_unchecked_mut(i) })
        } else {
            None
        }
    }

    /// # Safety
    /// `i` must be below `self.len()`.
    #[inline]
    pub unsafe fn get_unchecked(&self, i: usize) -> &T {
        debug_assert!(i < self.len());
        &*self.ptr.add(self.range.index(i) as usize)
    }

    /// # Safety
    /// `i` must be below `self.len()`.
    #[inline]
    pub unsafe fn get_unchecked_mut(&mut self, i: usize) -> &mut T {
        debug_assert!(i < self.len());
        &mut *self.ptr.add(self.range.index(i) as usize)
    }

    #[inline]
    pub fn iter(&self) -> Iter1D<'_, T> {
        self.as_view().iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> IterMut1D<'_, T> {
        unsafe { IterMut1D::new(self.ptr, self.len, self.range) }
    }

    #[inline]
    pub fn is_contiguous(&self) -> bool {
        contiguous_parts(&self.range).is_some()
    }

    pub fn as_slice(&self) -> Option<&[T]> {
        self.as_view().as_slice()
    }

    pub fn as_mut_slice(&mut self) -> Option<&mut [T]> {
        let (start, n) = contiguous_parts(&self.range)?;
        if n == 0 {
            return Some(&mut [][..]);
        }
        Some(unsafe { std::slice::from_raw_parts_mut(self.ptr.add(start), n) })
    }

    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.wrapping_add(self.range.start())
    }

    /// Address of element 0, for handing to external kernels.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.wrapping_add(self.range.start())
    }

    #[inline]
    pub(crate) fn into_raw_parts(self) -> (*mut T, usize, Range) {
        (self.ptr, self.len, self.range)
    }
}

impl<'a, T: Copy> VectorViewMut<'a, T> {
    /// Write `x` to every selected element.
    pub fn fill(&mut self, x: T) {
        fill(x, self.iter_mut());
    }

    /// Element-by-element copy from `src`, honoring both strides.
    ///
    /// # Errors
    /// [`MatpackError::DimensionMismatch`](crate::MatpackError::DimensionMismatch)
    /// if the extents differ.
    pub fn assign(&mut self, src: &VectorView<'_, T>) -> Result<()> {
        if self.len() != src.len() {
            return Err(mismatch("assign", &[self.len()], &[src.len()]));
        }
        copy(src.iter(), self.iter_mut());
        Ok(())
    }

    /// Copy the `src` selection onto the `dst` selection of this same view.
    ///
    /// Both ranges are in this view's index space. When the two selections
    /// can overlap in memory the source is read out completely before the
    /// first write, so the result always equals "read all, then write all"
    /// whatever the strides' signs.
    ///
    /// # Errors
    /// [`MatpackError::DimensionMismatch`](crate::MatpackError::DimensionMismatch)
    /// if the two selections differ in extent.
    pub fn copy_within(&mut self, src: impl Into<Range>, dst: impl Into<Range>) -> Result<()> {
        let src = self.range.compose(&src.into());
        let dst = self.range.compose(&dst.into());
        let count = src.bound();
        if count != dst.bound() {
            return Err(mismatch("copy_within", &[dst.bound()], &[count]));
        }
        if count == 0 {
            return Ok(());
        }

        let (src_lo, src_hi) = src.hull();
        let (dst_lo, dst_hi) = dst.hull();
        let targets = unsafe { IterMut1D::new(self.ptr, self.len, dst) };
        if src_lo <= dst_hi && dst_lo <= src_hi {
            tracing::trace!(count, "overlapping copy_within, materializing source");
            let staged: Vec<T> = unsafe { Iter1D::new(self.ptr, self.len, src) }
                .copied()
                .collect();
            for (d, s) in targets.zip(staged) {
                *d = s;
            }
        } else {
            copy(unsafe { Iter1D::new(self.ptr, self.len, src) }, targets);
        }
        Ok(())
    }
}

impl<'a, T: Scalar> VectorViewMut<'a, T> {
    fn zip_apply(
        &mut self,
        op: &'static str,
        x: &VectorView<'_, T>,
        f: impl Fn(T, T) -> T,
    ) -> Result<()> {
        if self.len() != x.len() {
            return Err(mismatch(op, &[self.len()], &[x.len()]));
        }
        for (d, &s) in self.iter_mut().zip(x.iter()) {
            *d = f(*d, s);
        }
        Ok(())
    }

    /// Elementwise `self[i] += x[i]`.
    pub fn try_add_assign(&mut self, x: &VectorView<'_, T>) -> Result<()> {
        self.zip_apply("add_assign", x, |a, b| a + b)
    }

    /// Elementwise `self[i] -= x[i]`.
    pub fn try_sub_assign(&mut self, x: &VectorView<'_, T>) -> Result<()> {
        self.zip_apply("sub_assign", x, |a, b| a - b)
    }

    /// Elementwise `self[i] *= x[i]`.
    pub fn try_mul_assign(&mut self, x: &VectorView<'_, T>) -> Result<()> {
        self.zip_apply("mul_assign", x, |a, b| a * b)
    }

    /// Elementwise `self[i] /= x[i]`.
    pub fn try_div_assign(&mut self, x: &VectorView<'_, T>) -> Result<()> {
        self.zip_apply("div_assign", x, |a, b| a / b)
    }

    #[inline]
    fn apply_scalar(&mut self, f: impl Fn(T) -> T) {
        for d in self.iter_mut() {
            *d = f(*d);
        }
    }
}

impl<T: Scalar> AddAssign<T> for VectorViewMut<'_, T> {
    fn add_assign(&mut self, x: T) {
        self.apply_scalar(|a| a + x);
    }
}

impl<T: Scalar> SubAssign<T> for VectorViewMut<'_, T> {
    fn sub_assign(&mut self, x: T) {
        self.apply_scalar(|a| a - x);
    }
}

impl<T: Scalar> MulAssign<T> for VectorViewMut<'_, T> {
    fn mul_assign(&mut self, x: T) {
        self.apply_scalar(|a| a * x);
    }
}

impl<T: Scalar> DivAssign<T> for VectorViewMut<'_, T> {
    fn div_assign(&mut self, x: T) {
        self.apply_scalar(|a| a / x);
    }
}

impl<T> Index<usize> for VectorViewMut<'_, T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        unsafe { &*self.ptr.add(element_offset(&self.range, i, self.len)) }
    }
}

impl<T> IndexMut<usize> for VectorViewMut<'_, T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        unsafe { &mut *self.ptr.add(element_offset(&self.range, i, self.len)) }
    }
}

impl<'a, T> IntoIterator for VectorViewMut<'a, T> {
    type Item = &'a mut T;
    type IntoIter = IterMut1D<'a, T>;

    fn into_iter(self) -> IterMut1D<'a, T> {
        unsafe { IterMut1D::new(self.ptr, self.len, self.range) }
    }
}

impl<T> fmt::Debug for VectorViewMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VectorViewMut")
            .field("range", &self.range)
            .field("buffer_len", &self.len)
            .finish()
    }
}

impl<T: fmt::Display> fmt::Display for VectorViewMut<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.as_view(), f)
    }
}

// ============================================================================
// Vector
// ============================================================================

/// Owning, contiguous 1D container.
///
/// Views borrow the vector, so it cannot be resized, moved out of or dropped
/// while one is alive. Moving the buffer out (`std::mem::take`) leaves an
/// empty vector behind.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Vector<T> {
    data: Vec<T>,
}

impl<T> Vector<T> {
    /// Empty vector.
    #[inline]
    pub fn new() -> Self {
        Self { data: Vec::new() }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn view(&self) -> VectorView<'_, T> {
        VectorView::from_slice(&self.data)
    }

    #[inline]
    pub fn view_mut(&mut self) -> VectorViewMut<'_, T> {
        VectorViewMut::from_slice(&mut self.data)
    }

    #[inline]
    pub fn sub(&self, range: impl Into<Range>) -> VectorView<'_, T> {
        self.view().sub(range)
    }

    #[inline]
    pub fn sub_mut(&mut self, range: impl Into<Range>) -> VectorViewMut<'_, T> {
        self.view_mut().into_sub(range)
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
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.data.iter()
    }

    #[inline]
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.data.iter_mut()
    }

    #[inline]
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: Clone> Vector<T> {
    /// `n` copies of `x`.
    pub fn filled(n: usize, x: T) -> Self {
        Self { data: vec![x; n] }
    }
}

impl<T: Clone + Zero> Vector<T> {
    pub fn zeros(n: usize) -> Self {
        Self::filled(n, T::zero())
    }

    /// Replace the buffer with a fresh zeroed one of `n` elements.
    ///
    /// Previous contents are discarded even when `n` equals the current length.
    pub fn resize(&mut self, n: usize) {
        tracing::debug!(old = self.data.len(), new = n, "reallocating vector buffer");
        self.data = vec![T::zero(); n];
    }
}

impl<T: Copy> Vector<T> {
    /// Deep copy of exactly the elements `v` selects.
    pub fn from_view(v: &VectorView<'_, T>) -> Self {
        Self {
            data: v.iter().copied().collect(),
        }
    }

    pub fn fill(&mut self, x: T) {
        self.data.fill(x);
    }

    /// Element-by-element copy from `src`; extents must match.
    pub fn assign(&mut self, src: &VectorView<'_, T>) -> Result<()> {
        self.view_mut().assign(src)
    }
}

impl<T: Scalar> Vector<T> {
    /// `extent` values `start, start + step, start + 2*step, ...`.
    pub fn linspace(start: T, extent: usize, step: T) -> Self {
        let mut data = Vec::with_capacity(extent);
        let mut x = start;
        for _ in 0..extent {
            data.push(x);
            x = x + step;
        }
        Self { data }
    }
}

impl<T> From<Vec<T>> for Vector<T> {
    fn from(data: Vec<T>) -> Self {
        Self { data }
    }
}

impl<T, const N: usize> From<[T; N]> for Vector<T> {
    fn from(data: [T; N]) -> Self {
        Self {
            data: Vec::from(data),
        }
    }
}

impl<T: Clone> From<&[T]> for Vector<T> {
    fn from(data: &[T]) -> Self {
        Self {
            data: data.to_vec(),
        }
    }
}

impl<T: Copy> From<VectorView<'_, T>> for Vector<T> {
    fn from(v: VectorView<'_, T>) -> Self {
        Self::from_view(&v)
    }
}

impl<T> FromIterator<T> for Vector<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().collect(),
        }
    }
}

impl<T> Index<usize> for Vector<T> {
    type Output = T;

    #[inline]
    fn index(&self, i: usize) -> &T {
        &self.data[i]
    }
}

impl<T> IndexMut<usize> for Vector<T> {
    #[inline]
    fn index_mut(&mut self, i: usize) -> &mut T {
        &mut self.data[i]
    }
}

impl<T: Scalar> AddAssign<T> for Vector<T> {
    fn add_assign(&mut self, x: T) {
        let mut v = self.view_mut();
        v += x;
    }
}

impl<T: Scalar> SubAssign<T> for Vector<T> {
    fn sub_assign(&mut self, x: T) {
        let mut v = self.view_mut();
        v -= x;
    }
}

impl<T: Scalar> MulAssign<T> for Vector<T> {
    fn mul_assign(&mut self, x: T) {
        let mut v = self.view_mut();
        v *= x;
    }
}

impl<T: Scalar> DivAssign<T> for Vector<T> {
    fn div_assign(&mut self, x: T) {
        let mut v = self.view_mut();
        v /= x;
    }
}

impl<T: fmt::Display> fmt::Display for Vector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.view(), f)
    }
}
