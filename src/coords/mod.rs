//! Type-safe coordinate system wrappers
//!
//! GenBank feature tables and REFERENCE ranges are written in 1-based,
//! fully-closed coordinates (`10..20` covers eleven bases). Rust slicing is
//! 0-based and half-open. These newtypes keep the two apart so that the
//! single `-1` adjustment happens in exactly one place.
//!
//! | Type | Basis | Use Cases |
//! |------|-------|-----------|
//! | [`ZeroBasedPos`] | 0-based | String slicing, internal sequence access |
//! | [`OneBasedPos`] | 1-based | Feature locations, REFERENCE `(bases X to Y)` |
//!
//! # Examples
//!
//! ```
//! use ferro_genbank::coords::{OneBasedInterval, OneBasedPos};
//!
//! // GenBank `10..20`
//! let interval = OneBasedInterval::try_new(10, 20).unwrap();
//! assert_eq!(interval.len(), 11);
//!
//! let half_open = interval.to_zero_based_half_open();
//! assert_eq!(half_open.start.value(), 9);
//! assert_eq!(half_open.end.value(), 20);
//! assert_eq!(OneBasedPos::new(1).to_zero_based().as_index(), 0);
//! ```

use std::fmt;
use std::ops::Range;

use serde::Serialize;

/// Offset into the record sequence string
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ZeroBasedPos(u64);

/// Base number as written in a flat file; never 0
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct OneBasedPos(u64);

impl ZeroBasedPos {
    pub const fn new(offset: u64) -> Self {
        Self(offset)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn as_index(self) -> usize {
        self.0 as usize
    }
}

impl OneBasedPos {
    /// # Panics
    ///
    /// Panics on 0; use [`OneBasedPos::try_new`] for unchecked input.
    ///
    /// ```should_panic
    /// use ferro_genbank::coords::OneBasedPos;
    ///
    /// let pos = OneBasedPos::new(0);
    /// ```
    #[inline]
    pub fn new(pos: u64) -> Self {
        assert!(pos > 0, "1-based position cannot be 0");
        Self(pos)
    }

    /// `None` for 0
    ///
    /// ```
    /// use ferro_genbank::coords::OneBasedPos;
    ///
    /// assert!(OneBasedPos::try_new(1).is_some());
    /// assert!(OneBasedPos::try_new(0).is_none());
    /// ```
    #[inline]
    pub const fn try_new(pos: u64) -> Option<Self> {
        match pos {
            0 => None,
            n => Some(Self(n)),
        }
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    /// Offset of this base in the sequence string
    #[inline]
    pub const fn to_zero_based(self) -> ZeroBasedPos {
        ZeroBasedPos(self.0 - 1)
    }
}

impl fmt::Display for OneBasedPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A span between two positions of the same basis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Interval<P> {
    pub start: P,
    pub end: P,
}

/// `[start, end)` offsets, ready for slicing
pub type ZeroBasedInterval = Interval<ZeroBasedPos>;

/// `[start, end]` base numbers, i.e. a GenBank `start..end`
pub type OneBasedInterval = Interval<OneBasedPos>;

impl ZeroBasedInterval {
    pub const fn new(start: ZeroBasedPos, end: ZeroBasedPos) -> Self {
        Self { start, end }
    }

    pub const fn len(&self) -> u64 {
        self.end.value().saturating_sub(self.start.value())
    }

    pub const fn is_empty(&self) -> bool {
        self.end.value() <= self.start.value()
    }

    #[inline]
    pub const fn as_range(&self) -> Range<usize> {
        self.start.as_index()..self.end.as_index()
    }
}

impl OneBasedInterval {
    /// Caller guarantees `start <= end`
    pub fn new(start: OneBasedPos, end: OneBasedPos) -> Self {
        Self { start, end }
    }

    /// Build an interval from raw values, rejecting 0 and `start > end`
    ///
    /// ```
    /// use ferro_genbank::coords::OneBasedInterval;
    ///
    /// assert!(OneBasedInterval::try_new(5, 5).is_some());
    /// assert!(OneBasedInterval::try_new(0, 5).is_none());
    /// assert!(OneBasedInterval::try_new(6, 5).is_none());
    /// ```
    pub fn try_new(start: u64, end: u64) -> Option<Self> {
        let start = OneBasedPos::try_new(start)?;
        let end = OneBasedPos::try_new(end)?;
        (start <= end).then_some(Self { start, end })
    }

    pub fn point(pos: OneBasedPos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// The only place the 1-based closed to 0-based half-open shift happens
    ///
    /// The start moves down by one; the closed end already equals the
    /// exclusive 0-based end.
    pub fn to_zero_based_half_open(self) -> ZeroBasedInterval {
        Interval {
            start: self.start.to_zero_based(),
            end: ZeroBasedPos::new(self.end.value()),
        }
    }

    /// Number of bases covered, `end - start + 1`
    pub const fn len(&self) -> u64 {
        self.end.value() - self.start.value() + 1
    }

    /// Always false for intervals built through `try_new`
    pub const fn is_empty(&self) -> bool {
        self.end.value() < self.start.value()
    }
}

impl fmt::Display for OneBasedInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_based_to_zero_based() {
        assert_eq!(OneBasedPos::new(1).to_zero_based().value(), 0);
        assert_eq!(OneBasedPos::new(100).to_zero_based().as_index(), 99);
    }

    #[test]
    fn test_interval_conversion() {
        let closed = OneBasedInterval::try_new(1, 3).unwrap();
        let half_open = closed.to_zero_based_half_open();
        assert_eq!(half_open.as_range(), 0..3);
        assert_eq!(closed.len(), half_open.len());
    }

    #[test]
    fn test_single_base_interval() {
        let point = OneBasedInterval::point(OneBasedPos::new(7));
        assert_eq!(point.len(), 1);
        assert_eq!(point.to_zero_based_half_open().as_range(), 6..7);
    }

    #[test]
    fn test_try_new_rejects_reversed() {
        assert!(OneBasedInterval::try_new(20, 10).is_none());
        assert!(OneBasedInterval::try_new(10, 0).is_none());
    }

    #[test]
    fn test_interval_display() {
        let interval = OneBasedInterval::try_new(4286215, 4286223).unwrap();
        assert_eq!(interval.to_string(), "4286215..4286223");
    }

    #[test]
    #[should_panic(expected = "cannot be 0")]
    fn test_one_based_zero_panics() {
        OneBasedPos::new(0);
    }
}
