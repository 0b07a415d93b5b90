use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{interval::Interval, realm::AdjacencyRealm};

/// One equivalence class of bounds: a non-empty union of intervals, stored sorted, pairwise
/// disjoint and (in sequential realms) maximally coalesced, so two symbols covering the same
/// bounds always compare equal.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Symbol<T: AdjacencyRealm> {
    intervals: Vec<Interval<T>>,
}

impl<T: AdjacencyRealm> Symbol<T> {
    /// Build a symbol from a collection of intervals. Duplicate intervals collapse to one;
    /// adjacent intervals are coalesced into a single spanning interval.
    ///
    /// # Panics
    ///
    /// If the collection is empty, or if two distinct input intervals overlap. Overlap means two
    /// sources claimed the same bounds for one symbol, which is a modelling error; only exact
    /// adjacency justifies an automatic merge.
    pub fn new<I: IntoIterator<Item = Interval<T>>>(intervals: I) -> Self {
        Symbol {
            intervals: normalize(intervals.into_iter().collect()),
        }
    }

    /// The sorted, coalesced intervals making up this symbol.
    pub fn intervals(&self) -> &[Interval<T>] {
        &self.intervals
    }

    /// Build the symbol covering every interval of every input symbol. Commutative and
    /// associative: any grouping or ordering of the same inputs produces an equal symbol.
    ///
    /// # Panics
    ///
    /// If `symbols` is empty, or if intervals of two distinct input symbols overlap.
    pub fn merge<I: IntoIterator<Item = Symbol<T>>>(symbols: I) -> Self {
        let mut intervals = Vec::new();
        for sym in symbols {
            intervals.extend(sym.intervals);
        }
        if intervals.is_empty() {
            panic!("cannot merge an empty collection of symbols");
        }
        Symbol {
            intervals: normalize(intervals),
        }
    }
}

impl<T: AdjacencyRealm> From<Interval<T>> for Symbol<T> {
    fn from(interval: Interval<T>) -> Self {
        Symbol {
            intervals: vec![interval],
        }
    }
}

/// Sort `intervals` and fold them left to right into the minimal equivalent list: equal inputs
/// deduplicate, adjacent runs coalesce (sequential realms only), and genuine overlap panics.
fn normalize<T: AdjacencyRealm>(mut intervals: Vec<Interval<T>>) -> Vec<Interval<T>> {
    if intervals.is_empty() {
        panic!("a symbol requires at least one interval");
    }
    intervals.sort();
    intervals.dedup();
    let mut out: Vec<Interval<T>> = Vec::with_capacity(intervals.len());
    for iv in intervals {
        match out.last_mut() {
            None => out.push(iv),
            Some(last) => {
                if last.intersects(&iv) {
                    panic!("a symbol's intervals may not overlap: {:?} and {:?}", last, iv);
                }
                if T::SEQUENTIAL && last.is_adjacent_to(&iv) {
                    *last = last.merge_with(&iv);
                } else {
                    out.push(iv);
                }
            }
        }
    }
    out
}

impl<T: AdjacencyRealm + fmt::Display> fmt::Display for Symbol<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, iv) in self.intervals.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", iv)?;
        }
        write!(f, "}}")
    }
}
