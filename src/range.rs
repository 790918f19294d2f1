//! `(start, extent, stride)` selections of a linear index space.
//!
//! A [`Range`] either has a concrete extent or runs to the end of whatever it
//! is applied to ([`Extent::ToEnd`]). Views only ever store bounded ranges:
//! an open range is resolved against the parent extent the moment it is used
//! to sub-range a view.

use crate::{MatpackError, Result};
use std::fmt;
use std::ops;

/// Number of elements selected by a [`Range`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extent {
    /// Exactly this many elements.
    Bound(usize),
    /// Every remaining element of the parent dimension in stride direction.
    ToEnd,
}

impl fmt::Display for Extent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Extent::Bound(n) => write!(f, "{n}"),
            Extent::ToEnd => f.write_str(".."),
        }
    }
}

/// A strided selection: indices `start + i * stride` for `0 <= i < extent`.
///
/// # Panics
/// All constructors panic on a zero stride.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    start: usize,
    extent: Extent,
    stride: isize,
}

impl Range {
    /// Bounded range of `extent` elements.
    #[inline]
    pub fn new(start: usize, extent: usize, stride: isize) -> Self {
        assert!(stride != 0, "range stride must be non-zero");
        Self {
            start,
            extent: Extent::Bound(extent),
            stride,
        }
    }

    /// Range from `start` to the end of the parent dimension.
    ///
    /// With a negative stride the range walks down towards index 0.
    #[inline]
    pub fn to_end(start: usize, stride: isize) -> Self {
        assert!(stride != 0, "range stride must be non-zero");
        Self {
            start,
            extent: Extent::ToEnd,
            stride,
        }
    }

    /// The whole parent dimension.
    #[inline]
    pub fn all() -> Self {
        Self::to_end(0, 1)
    }

    /// Every `stride`-th element of the parent dimension, starting at 0.
    #[inline]
    pub fn all_strided(stride: isize) -> Self {
        Self::to_end(0, stride)
    }

    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    #[inline]
    pub fn stride(&self) -> isize {
        self.stride
    }

    /// Concrete extent, or `None` for an unresolved [`Extent::ToEnd`] range.
    #[inline]
    pub fn len(&self) -> Option<usize> {
        match self.extent {
            Extent::Bound(n) => Some(n),
            Extent::ToEnd => None,
        }
    }

    /// Whether the range is bounded with extent 0.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.extent == Extent::Bound(0)
    }

    /// Index of the `i`-th selected element: `start + i * stride`.
    ///
    /// Wraps on overflow; use [`Range::checked_index`] for ranges that have
    /// not been resolved against a parent.
    #[inline]
    pub fn index(&self, i: usize) -> isize {
        (self.start as isize).wrapping_add((i as isize).wrapping_mul(self.stride))
    }

    /// `start + i * stride`, or `None` if it does not fit in an `isize`.
    #[inline]
    pub fn checked_index(&self, i: usize) -> Option<isize> {
        let start = isize::try_from(self.start).ok()?;
        isize::try_from(i).ok()?.checked_mul(self.stride)?.checked_add(start)
    }

    /// Resolve against a parent dimension of `parent_extent` elements.
    ///
    /// An open range takes every remaining element in stride direction. A
    /// bounded range is returned unchanged once every index it selects is known
    /// to lie in `0..parent_extent`.
    pub fn try_resolve(&self, parent_extent: usize) -> Result<Range> {
        let out_of_bounds = || MatpackError::OutOfBounds {
            range: *self,
            parent: parent_extent,
        };
        match self.extent {
            Extent::Bound(0) => Ok(*self),
            Extent::Bound(n) => {
                // n distinct indices cannot fit in fewer than n slots
                if self.start >= parent_extent || n > parent_extent {
                    return Err(out_of_bounds());
                }
                match self.checked_index(n - 1) {
                    Some(last) if last >= 0 && (last as usize) < parent_extent => Ok(*self),
                    _ => Err(out_of_bounds()),
                }
            }
            Extent::ToEnd => {
                let n = if self.stride > 0 {
                    if self.start > parent_extent {
                        return Err(out_of_bounds());
                    }
                    (parent_extent - self.start).div_ceil(self.stride as usize)
                } else if parent_extent == 0 && self.start == 0 {
                    0
                } else {
                    if self.start >= parent_extent {
                        return Err(out_of_bounds());
                    }
                    self.start / self.stride.unsigned_abs() + 1
                };
                Ok(Range::new(self.start, n, self.stride))
            }
        }
    }

    /// Resolve against a parent dimension.
    ///
    /// # Panics
    /// Panics if the range selects indices outside `0..parent_extent`.
    #[inline]
    pub fn resolve(&self, parent_extent: usize) -> Range {
        match self.try_resolve(parent_extent) {
            Ok(r) => r,
            Err(e) => panic!("{e}"),
        }
    }

    /// Map `inner`, expressed in this range's index space, to the index space
    /// this range itself lives in.
    ///
    /// `start = self.start + inner.start * self.stride`,
    /// `stride = inner.stride * self.stride`. An open `inner` takes the
    /// remaining extent of `self` when `self` is bounded. Composition is
    /// associative.
    ///
    /// An empty `inner` yields an empty range anchored at `self.start`.
    ///
    /// # Panics
    /// Panics if `inner` selects indices outside a bounded `self`, or if the
    /// composed start or stride of two open ranges does not fit in an `isize`.
    pub fn compose(&self, inner: &Range) -> Range {
        let inner = match self.extent {
            Extent::Bound(n) => inner.resolve(n),
            Extent::ToEnd => *inner,
        };
        let stride = compose_stride(self.stride, inner.stride, inner.len());
        if inner.is_empty() {
            return Range {
                start: self.start,
                extent: inner.extent,
                stride,
            };
        }
        let start = match self.checked_index(inner.start) {
            Some(start) => start,
            None => panic!("composed range start overflows"),
        };
        assert!(start >= 0, "composed range starts before index 0");
        Range {
            start: start as usize,
            extent: inner.extent,
            stride,
        }
    }

    /// Concrete extent of a range that views store. Views only hold resolved
    /// ranges, so `ToEnd` here is an internal logic error.
    #[inline]
    pub(crate) fn bound(&self) -> usize {
        match self.extent {
            Extent::Bound(n) => n,
            Extent::ToEnd => unreachable!("views store resolved ranges"),
        }
    }

    /// Same selection moved `offset` indices further into the buffer.
    ///
    /// An empty selection never dereferences its start, so it is clamped at 0.
    #[inline]
    pub(crate) fn shifted(&self, offset: isize) -> Range {
        let start = self.start as isize + offset;
        debug_assert!(start >= 0 || self.is_empty());
        Range {
            start: start.max(0) as usize,
            ..*self
        }
    }

    /// Smallest and largest index selected by a bounded, non-empty range.
    #[inline]
    pub(crate) fn hull(&self) -> (isize, isize) {
        let first = self.start as isize;
        let last = self.index(self.bound().saturating_sub(1));
        (first.min(last), first.max(last))
    }
}

/// Stride of an `inner` selection taken inside a dimension of stride `outer`.
///
/// A selection of at most one element never steps, so an overflowing product
/// only matters when `extent` is larger; that case panics.
#[inline]
pub(crate) fn compose_stride(outer: isize, inner: isize, extent: Option<usize>) -> isize {
    match outer.checked_mul(inner) {
        Some(s) => s,
        None if matches!(extent, Some(n) if n <= 1) => outer.signum() * inner.signum(),
        None => panic!("composed stride {outer} * {inner} overflows"),
    }
}

impl fmt::Display for Range {
    /// `extent stride start`, the order the array text format uses.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.extent, self.stride, self.start)
    }
}

impl From<ops::Range<usize>> for Range {
    fn from(r: ops::Range<usize>) -> Self {
        Range::new(r.start, r.end.saturating_sub(r.start), 1)
    }
}

impl From<ops::RangeInclusive<usize>> for Range {
    fn from(r: ops::RangeInclusive<usize>) -> Self {
        Range::new(*r.start(), r.end().saturating_add(1).saturating_sub(*r.start()), 1)
    }
}

impl From<ops::RangeFrom<usize>> for Range {
    fn from(r: ops::RangeFrom<usize>) -> Self {
        Range::to_end(r.start, 1)
    }
}

impl From<ops::RangeTo<usize>> for Range {
    fn from(r: ops::RangeTo<usize>) -> Self {
        Range::new(0, r.end, 1)
    }
}

impl From<ops::RangeFull> for Range {
    fn from(_: ops::RangeFull) -> Self {
        Range::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_follows_stride() {
        for &(s, n, k) in &[(0usize, 5usize, 1isize), (3, 4, 2), (9, 4, -3), (7, 1, -1)] {
            let r = Range::new(s, n, k);
            for i in 0..n {
                assert_eq!(r.index(i), s as isize + i as isize * k);
            }
        }
    }

    #[test]
    fn test_all_resolves_to_parent() {
        assert_eq!(Range::all().resolve(7), Range::new(0, 7, 1));
        assert_eq!(Range::all().resolve(0), Range::new(0, 0, 1));
    }

    #[test]
    fn test_to_end_positive_stride() {
        assert_eq!(Range::to_end(2, 1).resolve(10), Range::new(2, 8, 1));
        assert_eq!(Range::to_end(1, 3).resolve(10), Range::new(1, 3, 3));
        assert_eq!(Range::to_end(10, 1).resolve(10), Range::new(10, 0, 1));
    }

    #[test]
    fn test_to_end_negative_stride() {
        assert_eq!(Range::to_end(9, -1).resolve(10), Range::new(9, 10, -1));
        assert_eq!(Range::to_end(9, -2).resolve(10), Range::new(9, 5, -2));
        assert_eq!(Range::all_strided(-1).resolve(4), Range::new(0, 1, -1));
    }

    #[test]
    fn test_bounded_out_of_parent() {
        assert!(Range::new(0, 5, 1).try_resolve(4).is_err());
        assert!(Range::new(1, 3, -1).try_resolve(4).is_err());
        assert!(Range::new(5, 0, 1).try_resolve(4).is_ok());
        assert!(matches!(
            Range::to_end(5, 1).try_resolve(4),
            Err(MatpackError::OutOfBounds { parent: 4, .. })
        ));
    }

    #[test]
    fn test_huge_extent_is_out_of_bounds() {
        // (n - 1) * 4 wraps to 0 in release arithmetic
        let r = Range::new(0, (1usize << 62) + 1, 4);
        assert!(matches!(
            r.try_resolve(4),
            Err(MatpackError::OutOfBounds { parent: 4, .. })
        ));
        assert!(Range::new(1, 3, isize::MAX).try_resolve(usize::MAX).is_err());
        assert_eq!(Range::new(usize::MAX, 1, 1).checked_index(0), None);
        assert_eq!(Range::new(0, 3, isize::MAX).checked_index(2), None);
    }

    #[test]
    fn test_single_element_tolerates_huge_stride() {
        assert!(Range::new(0, 4, 1 << 40).try_resolve(4).is_err());
        let one = Range::new(2, 1, isize::MAX).resolve(4);
        let composed = Range::new(1, 3, -(1 << 40)).compose(&Range::new(0, 1, 1 << 40));
        assert_eq!(one.index(0), 2);
        assert_eq!(composed.start(), 1);
        assert_eq!(composed.len(), Some(1));
    }

    #[test]
    fn test_compose_empty_inner() {
        let r = Range::new(4, 3, 2).compose(&Range::new(3, 0, 1));
        assert!(r.is_empty());
        assert_eq!(r.start(), 4);
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_zero_stride_panics() {
        let _ = Range::new(0, 3, 0);
    }

    #[test]
    fn test_compose_bounded() {
        let outer = Range::new(2, 6, 3);
        let inner = Range::new(1, 3, 2);
        let r = outer.compose(&inner);
        assert_eq!(r, Range::new(5, 3, 6));
        for i in 0..3 {
            assert_eq!(r.index(i), outer.index(inner.index(i) as usize));
        }
    }

    #[test]
    fn test_compose_open_inner_takes_remaining() {
        let outer = Range::new(4, 6, 2);
        assert_eq!(outer.compose(&Range::to_end(2, 1)), Range::new(8, 4, 2));
        assert_eq!(outer.compose(&Range::to_end(5, -1)), Range::new(14, 6, -2));
    }

    #[test]
    fn test_compose_both_open_stays_open() {
        let r = Range::to_end(3, 2).compose(&Range::to_end(1, 2));
        assert_eq!(r.start(), 5);
        assert_eq!(r.stride(), 4);
        assert_eq!(r.extent(), Extent::ToEnd);
    }

    #[test]
    fn test_compose_associative() {
        let a = Range::new(1, 20, 2);
        let b = Range::new(18, 6, -3);
        let c = Range::new(1, 2, 4);
        assert_eq!(a.compose(&b).compose(&c), a.compose(&b.compose(&c)));
    }

    #[test]
    fn test_from_std_ranges() {
        assert_eq!(Range::from(2..5), Range::new(2, 3, 1));
        assert_eq!(Range::from(2..=5), Range::new(2, 4, 1));
        assert_eq!(Range::from(..4), Range::new(0, 4, 1));
        assert_eq!(Range::from(3..), Range::to_end(3, 1));
        assert_eq!(Range::from(..), Range::all());
    }

    #[test]
    fn test_display() {
        assert_eq!(Range::new(1, 4, 2).to_string(), "4 2 1");
        assert_eq!(Range::to_end(0, -1).to_string(), ".. -1 0");
    }
}
