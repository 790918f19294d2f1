//! Stride-aware iterators.
//!
//! [`Iter1D`] / [`IterMut1D`] walk the elements of one dimension, adding the
//! stride to their position on every step. [`Rows`] / [`RowsMut`] walk the rows
//! of a matrix view, each row being itself a vector view over the same memory.

use crate::range::Range;
use crate::vector::{VectorView, VectorViewMut};
use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

/// Read-only iterator over a strided 1D selection.
///
/// Two iterators compare equal iff they currently point at the same memory
/// address, regardless of how they got there.
pub struct Iter1D<'a, T> {
    ptr: *const T,
    len: usize,
    pos: isize,
    remaining: usize,
    stride: isize,
    _marker: PhantomData<&'a T>,
}

unsafe impl<T: Sync> Send for Iter1D<'_, T> {}
unsafe impl<T: Sync> Sync for Iter1D<'_, T> {}

impl<T> Clone for Iter1D<'_, T> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, T> Iter1D<'a, T> {
    /// `ptr..ptr+len` must be a live shared borrow for `'a`, and every index of
    /// `range` must lie inside it.
    #[inline]
    pub(crate) unsafe fn new(ptr: *const T, len: usize, range: Range) -> Self {
        Self {
            ptr,
            len,
            pos: range.start() as isize,
            remaining: range.bound(),
            stride: range.stride(),
            _marker: PhantomData,
        }
    }

    /// Address of the element the next call to `next` yields.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.wrapping_offset(self.pos)
    }

    /// Number of steps from `other` to `self`: pointer difference divided by
    /// the stride.
    #[inline]
    pub fn distance(&self, other: &Self) -> isize {
        (self.pos - other.pos) / self.stride
    }

    #[inline]
    pub fn stride(&self) -> isize {
        self.stride
    }
}

impl<'a, T> Iterator for Iter1D<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.pos as usize;
        debug_assert!(self.pos >= 0 && idx < self.len);
        self.pos += self.stride;
        self.remaining -= 1;
        Some(unsafe { &*self.ptr.add(idx) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter1D<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let idx = (self.pos + self.remaining as isize * self.stride) as usize;
        debug_assert!(idx < self.len);
        Some(unsafe { &*self.ptr.add(idx) })
    }
}

impl<T> ExactSizeIterator for Iter1D<'_, T> {}
impl<T> FusedIterator for Iter1D<'_, T> {}

impl<T> PartialEq for Iter1D<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.as_ptr(), other.as_ptr())
    }
}

impl<T> Eq for Iter1D<'_, T> {}

impl<T> fmt::Debug for Iter1D<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter1D")
            .field("pos", &self.pos)
            .field("remaining", &self.remaining)
            .field("stride", &self.stride)
            .finish()
    }
}

/// Mutable iterator over a strided 1D selection.
///
/// A non-zero stride guarantees that every yielded reference is distinct.
pub struct IterMut1D<'a, T> {
    ptr: *mut T,
    len: usize,
    pos: isize,
    remaining: usize,
    stride: isize,
    _marker: PhantomData<&'a mut T>,
}

unsafe impl<T: Send> Send for IterMut1D<'_, T> {}
unsafe impl<T: Sync> Sync for IterMut1D<'_, T> {}

impl<'a, T> IterMut1D<'a, T> {
    /// `ptr..ptr+len` must be exclusively borrowed for `'a`, and every index of
    /// `range` must lie inside it.
    #[inline]
    pub(crate) unsafe fn new(ptr: *mut T, len: usize, range: Range) -> Self {
        Self {
            ptr,
            len,
            pos: range.start() as isize,
            remaining: range.bound(),
            stride: range.stride(),
            _marker: PhantomData,
        }
    }

    /// Address of the element the next call to `next` yields.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.ptr.wrapping_offset(self.pos)
    }

    /// Number of steps from `other` to `self`.
    #[inline]
    pub fn distance(&self, other: &Self) -> isize {
        (self.pos - other.pos) / self.stride
    }
}

impl<'a, T> Iterator for IterMut1D<'a, T> {
    type Item = &'a mut T;

    #[inline]
    fn next(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.pos as usize;
        debug_assert!(self.pos >= 0 && idx < self.len);
        self.pos += self.stride;
        self.remaining -= 1;
        Some(unsafe { &mut *self.ptr.add(idx) })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for IterMut1D<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<&'a mut T> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let idx = (self.pos + self.remaining as isize * self.stride) as usize;
        debug_assert!(idx < self.len);
        Some(unsafe { &mut *self.ptr.add(idx) })
    }
}

impl<T> ExactSizeIterator for IterMut1D<'_, T> {}
impl<T> FusedIterator for IterMut1D<'_, T> {}

impl<T> PartialEq for IterMut1D<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.as_ptr(), other.as_ptr())
    }
}

impl<T> fmt::Debug for IterMut1D<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IterMut1D")
            .field("pos", &self.pos)
            .field("remaining", &self.remaining)
            .field("stride", &self.stride)
            .finish()
    }
}

/// Iterator over the rows of a matrix view.
pub struct Rows<'a, T> {
    ptr: *const T,
    len: usize,
    rows: Range,
    cols: Range,
    front: usize,
    back: usize,
    _marker: PhantomData<&'a T>,
}

unsafe impl<T: Sync> Send for Rows<'_, T> {}
unsafe impl<T: Sync> Sync for Rows<'_, T> {}

impl<'a, T> Rows<'a, T> {
    #[inline]
    pub(crate) unsafe fn new(ptr: *const T, len: usize, rows: Range, cols: Range) -> Self {
        Self {
            ptr,
            len,
            rows,
            cols,
            front: 0,
            back: rows.bound(),
            _marker: PhantomData,
        }
    }

    #[inline]
    fn row(&self, r: usize) -> VectorView<'a, T> {
        unsafe { VectorView::from_raw(self.ptr, self.len, self.cols.shifted(self.rows.index(r))) }
    }
}

impl<'a, T> Iterator for Rows<'a, T> {
    type Item = VectorView<'a, T>;

    #[inline]
    fn next(&mut self) -> Option<VectorView<'a, T>> {
        if self.front == self.back {
            return None;
        }
        let row = self.row(self.front);
        self.front += 1;
        Some(row)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<'a, T> DoubleEndedIterator for Rows<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<VectorView<'a, T>> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.row(self.back))
    }
}

impl<T> ExactSizeIterator for Rows<'_, T> {}
impl<T> FusedIterator for Rows<'_, T> {}

/// Iterator over the rows of a mutable matrix view.
///
/// Mutable matrix views never address one element from two positions, so
/// the yielded rows are disjoint and may be held simultaneously.
pub struct RowsMut<'a, T> {
    ptr: *mut T,
    len: usize,
    rows: Range,
    cols: Range,
    front: usize,
    back: usize,
    _marker: PhantomData<&'a mut T>,
}

unsafe impl<T: Send> Send for RowsMut<'_, T> {}
unsafe impl<T: Sync> Sync for RowsMut<'_, T> {}

impl<'a, T> RowsMut<'a, T> {
    #[inline]
    pub(crate) unsafe fn new(ptr: *mut T, len: usize, rows: Range, cols: Range) -> Self {
        Self {
            ptr,
            len,
            rows,
            cols,
            front: 0,
            back: rows.bound(),
            _marker: PhantomData,
        }
    }

    #[inline]
    fn row(&self, r: usize) -> VectorViewMut<'a, T> {
        unsafe {
            VectorViewMut::from_raw(self.ptr, self.len, self.cols.shifted(self.rows.index(r)))
        }
    }
}

impl<'a, T> Iterator for RowsMut<'a, T> {
    type Item = VectorViewMut<'a, T>;

    #[inline]
    fn next(&mut self) -> Option<VectorViewMut<'a, T>> {
        if self.front == self.back {
            return None;
        }
        let row = self.row(self.front);
        self.front += 1;
        Some(row)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.back - self.front;
        (n, Some(n))
    }
}

impl<'a, T> DoubleEndedIterator for RowsMut<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<VectorViewMut<'a, T>> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(self.row(self.back))
    }
}

impl<T> ExactSizeIterator for RowsMut<'_, T> {}
impl<T> FusedIterator for RowsMut<'_, T> {}

// ============================================================================
// Generic copy
// ============================================================================

/// Copy element by element from `src` into `dst`, honoring both strides.
///
/// Stops at the shorter of the two iterators; callers check extents first.
pub fn copy<T: Copy>(src: Iter1D<'_, T>, dst: IterMut1D<'_, T>) {
    for (d, s) in dst.zip(src) {
        *d = *s;
    }
}

/// Write `x` to every element `dst` yields.
pub fn fill<T: Copy>(x: T, dst: IterMut1D<'_, T>) {
    for d in dst {
        *d = x;
    }
}

/// Row-wise [`copy`] between two matrix views.
pub fn copy_rows<T: Copy>(src: Rows<'_, T>, dst: RowsMut<'_, T>) {
    for (mut d, s) in dst.zip(src) {
        copy(s.iter(), d.iter_mut());
    }
}

/// Row-wise [`fill`].
pub fn fill_rows<T: Copy>(x: T, dst: RowsMut<'_, T>) {
    for mut d in dst {
        fill(x, d.iter_mut());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Matrix, Vector};

    #[test]
    fn test_iter_honors_stride() {
        let v = Vector::from([0, 1, 2, 3, 4, 5, 6, 7]);
        let got: Vec<i32> = v.sub(Range::new(1, 3, 3)).iter().copied().collect();
        assert_eq!(got, vec![1, 4, 7]);
        let rev: Vec<i32> = v.sub(Range::to_end(7, -2)).iter().copied().collect();
        assert_eq!(rev, vec![7, 5, 3, 1]);
    }

    #[test]
    fn test_iter_double_ended() {
        let v = Vector::from([0, 1, 2, 3, 4, 5]);
        let view = v.sub(Range::new(0, 3, 2));
        let back: Vec<i32> = view.iter().rev().copied().collect();
        assert_eq!(back, vec![4, 2, 0]);
        assert_eq!(view.iter().len(), 3);
    }

    #[test]
    fn test_iter_equality_is_address_based() {
        let v = Vector::from([0, 1, 2, 3, 4, 5]);
        let a = v.sub(Range::new(0, 3, 2)).iter();
        let mut b = v.sub(Range::new(2, 2, 1)).iter();
        let mut a2 = a.clone();
        a2.next();
        // a2 now points at index 2, as does b before stepping
        assert!(a2 == b);
        assert_eq!(a2.distance(&a), 1);
        b.next();
        assert!(a2 != b);
    }

    #[test]
    fn test_iter_end_positions_coincide() {
        let v = Vector::from([1.0, 2.0, 3.0]);
        let mut it = v.view().iter();
        let mut tail = v.sub(2..3).iter();
        assert_eq!(it.by_ref().count(), 3);
        tail.next();
        assert!(it == tail);
    }

    #[test]
    fn test_copy_between_strides() {
        let src = Vector::from([1, 2, 3, 4, 5, 6]);
        let mut dst = Vector::from([0; 6]);
        copy(
            src.sub(Range::new(0, 3, 2)).iter(),
            dst.sub_mut(Range::new(5, 3, -1)).iter_mut(),
        );
        assert_eq!(dst.as_slice(), &[0, 0, 0, 5, 3, 1]);
    }

    #[test]
    fn test_rows_iterate_transposed() {
        let m = Matrix::from([[1, 2, 3], [4, 5, 6]]);
        let t = m.view().t();
        let rows: Vec<Vec<i32>> = t.iter_rows().map(|r| r.iter().copied().collect()).collect();
        assert_eq!(rows, vec![vec![1, 4], vec![2, 5], vec![3, 6]]);
        assert_eq!(t.iter_rows().rev().next().map(|r| r[0]), Some(3));
    }

    #[test]
    fn test_rows_mut_are_disjoint() {
        let mut m = Matrix::from([[1, 2], [3, 4], [5, 6]]);
        {
            let mut rows: Vec<_> = m.view_mut().into_rows().collect();
            let (first, rest) = rows.split_at_mut(1);
            first[0].fill(0);
            rest[1][1] = 9;
        }
        assert_eq!(m.as_slice(), &[0, 0, 3, 4, 5, 9]);
    }

    #[test]
    fn test_copy_rows_and_fill_rows() {
        let src = Matrix::from([[1, 2], [3, 4]]);
        let mut dst = Matrix::<i32>::zeros(2, 2);
        copy_rows(src.view().t().iter_rows(), dst.view_mut().into_rows());
        assert_eq!(dst.as_slice(), &[1, 3, 2, 4]);
        fill_rows(7, dst.sub_mut(0..1, ..).into_rows());
        assert_eq!(dst.as_slice(), &[7, 7, 2, 4]);
    }
}
