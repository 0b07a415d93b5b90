use std::{cmp, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::realm::AdjacencyRealm;

/// A closed range `[lower, upper]` of bounds from one realm. Intervals are immutable: every
/// operation that "changes" one returns a fresh interval and leaves its inputs alone.
///
/// Intervals order lexicographically by `(lower, upper)`, which is also the order
/// [`Ord::min`]/[`Ord::max`] use.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Interval<T: AdjacencyRealm> {
    lower: T,
    upper: T,
}

impl<T: AdjacencyRealm> Interval<T> {
    /// Create a new interval spanning `lower` to `upper` inclusive.
    ///
    /// # Panics
    ///
    /// If `lower` is above `upper`.
    pub fn new(lower: T, upper: T) -> Self {
        if lower > upper {
            panic!(
                "interval lower bound {:?} is above its upper bound {:?}",
                lower, upper
            );
        }
        Interval { lower, upper }
    }

    /// Create an interval containing exactly one bound.
    pub fn single(bound: T) -> Self {
        Interval {
            lower: bound.clone(),
            upper: bound,
        }
    }

    pub fn lower_bound(&self) -> &T {
        &self.lower
    }

    pub fn upper_bound(&self) -> &T {
        &self.upper
    }

    /// Does `bound` fall within this interval?
    pub fn contains(&self, bound: &T) -> bool {
        self.lower <= *bound && *bound <= self.upper
    }

    /// Do the two closed ranges overlap? Symmetric.
    pub fn intersects(&self, other: &Self) -> bool {
        self.lower <= other.upper && other.lower <= self.upper
    }

    /// The overlapping sub-range of the two intervals, or `None` if they are disjoint.
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let lower = cmp::max(&self.lower, &other.lower);
        let upper = cmp::min(&self.upper, &other.upper);
        if lower <= upper {
            Some(Interval {
                lower: lower.clone(),
                upper: upper.clone(),
            })
        } else {
            None
        }
    }

    /// Do the two intervals touch without overlapping? `[0, 9]` and `[10, 20]` are adjacent;
    /// `[0, 10]` and `[10, 20]` are not (they intersect), and neither are `[0, 8]` and
    /// `[10, 20]` (there is a gap at `9`).
    ///
    /// # Panics
    ///
    /// If the realm is non-sequential.
    pub fn is_adjacent_to(&self, other: &Self) -> bool {
        if self.upper < other.lower {
            self.upper.is_adjacent(&other.lower)
        } else if other.upper < self.lower {
            other.upper.is_adjacent(&self.lower)
        } else {
            false
        }
    }

    /// Combine two adjacent intervals into the single interval spanning both.
    ///
    /// # Panics
    ///
    /// If the two intervals are not adjacent: merging across a gap would silently claim bounds
    /// neither input covers, and merging overlapping intervals means the caller double-counted.
    pub fn merge_with(&self, other: &Self) -> Self {
        if !self.is_adjacent_to(other) {
            panic!(
                "cannot merge non-adjacent intervals {:?} and {:?}",
                self, other
            );
        }
        Interval {
            lower: cmp::min(&self.lower, &other.lower).clone(),
            upper: cmp::max(&self.upper, &other.upper).clone(),
        }
    }
}

impl<T: AdjacencyRealm + fmt::Display> fmt::Display for Interval<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.lower == self.upper {
            write!(f, "{}", self.lower)
        } else {
            write!(f, "[{}..{}]", self.lower, self.upper)
        }
    }
}
