use std::{collections::BTreeSet, fmt};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
    interval::Interval,
    merge::{self, AlphabetMergeResult},
    realm::AdjacencyRealm,
    symbol::Symbol,
};

/// A set of symbols partitioning (part of) a realm's domain: no interval of any symbol may
/// intersect an interval of any other symbol. An alphabet is immutable once built, so it can be
/// handed to any number of downstream consumers.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Alphabet<T: AdjacencyRealm> {
    symbols: BTreeSet<Symbol<T>>,
}

impl<T: AdjacencyRealm> Alphabet<T> {
    /// Build an alphabet from a collection of symbols. Duplicate symbols collapse to one. The
    /// empty alphabet is valid.
    ///
    /// # Panics
    ///
    /// If intervals of two distinct symbols intersect.
    pub fn new<I: IntoIterator<Item = Symbol<T>>>(symbols: I) -> Self {
        let alphabet = Alphabet {
            symbols: symbols.into_iter().collect(),
        };
        {
            let tagged = alphabet.tagged_intervals();
            // Intervals are sorted by lower bound, so any intersection anywhere implies an
            // intersecting neighbouring pair.
            for w in tagged.windows(2) {
                if w[0].0.intersects(w[1].0) {
                    panic!(
                        "alphabet symbols may not overlap: {:?} and {:?} both cover {:?}",
                        w[0].1,
                        w[1].1,
                        w[0].0.intersection(w[1].0).unwrap()
                    );
                }
            }
        }
        alphabet
    }

    pub fn symbols(&self) -> &BTreeSet<Symbol<T>> {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Every interval of every symbol, tagged with its owning symbol and sorted by interval.
    pub(crate) fn tagged_intervals(&self) -> Vec<(&Interval<T>, &Symbol<T>)> {
        let mut tagged = self
            .symbols
            .iter()
            .flat_map(|sym| sym.intervals().iter().map(move |iv| (iv, sym)))
            .collect::<Vec<_>>();
        tagged.sort_by(|a, b| a.0.cmp(b.0));
        tagged
    }

    /// Compute the finest common refinement of `self` and `other`: a new alphabet in which every
    /// symbol lies entirely within (or entirely outside) each original symbol, together with a
    /// map from each original symbol to the new symbols carved out of it. Two alphabets whose
    /// symbols never overlap refine to their plain union, with every symbol surviving unchanged.
    ///
    /// # Panics
    ///
    /// For non-sequential realms only: when symbols of the two alphabets overlap without their
    /// boundaries lining up, splitting them would need a successor/predecessor the realm cannot
    /// provide.
    pub fn merge_with(&self, other: &Alphabet<T>) -> AlphabetMergeResult<T> {
        merge::merge(self, other)
    }
}

impl<T: AdjacencyRealm> From<Symbol<T>> for Alphabet<T> {
    fn from(symbol: Symbol<T>) -> Self {
        Alphabet {
            symbols: BTreeSet::from([symbol]),
        }
    }
}

impl<T: AdjacencyRealm> From<Interval<T>> for Alphabet<T> {
    fn from(interval: Interval<T>) -> Self {
        Alphabet::from(Symbol::from(interval))
    }
}

impl<T: AdjacencyRealm + fmt::Display> fmt::Display for Alphabet<T> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (i, sym) in self.symbols.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", sym)?;
        }
        write!(f, "}}")
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn iv(lower: i32, upper: i32) -> Interval<i32> {
        Interval::new(lower, upper)
    }

    #[test]
    fn symbols_are_kept_sorted_and_unique() {
        let a = Symbol::new([iv(10, 20), iv(50, 100)]);
        let b = Symbol::new([iv(30, 40)]);
        let alphabet = Alphabet::new([b.clone(), a.clone(), b.clone()]);
        assert_eq!(alphabet.len(), 2);
        assert!(alphabet.symbols().contains(&a));
        assert!(alphabet.symbols().contains(&b));
    }

    #[test]
    #[should_panic(expected = "alphabet symbols may not overlap")]
    fn overlapping_symbols_panic() {
        let a = Symbol::new([iv(10, 20), iv(50, 100), iv(200, 400)]);
        let b = Symbol::new([iv(15, 70), iv(120, 150)]);
        Alphabet::new([a, b]);
    }

    #[test]
    #[should_panic(expected = "alphabet symbols may not overlap")]
    fn equal_intervals_in_distinct_symbols_panic() {
        let a = Symbol::new([iv(10, 20), iv(50, 60)]);
        let b = Symbol::new([iv(10, 20), iv(80, 90)]);
        Alphabet::new([a, b]);
    }

    #[test]
    fn abutting_symbols_are_allowed() {
        // Adjacency across symbols is fine; only intersection is forbidden.
        let a = Symbol::new([iv(0, 10)]);
        let b = Symbol::new([iv(11, 20)]);
        assert_eq!(Alphabet::new([a, b]).len(), 2);
    }

    #[test]
    fn sugar_constructors() {
        let alphabet = Alphabet::from(iv(10, 20));
        assert_eq!(alphabet.len(), 1);
        let alphabet = Alphabet::from(Symbol::new([iv(10, 20), iv(30, 40)]));
        assert_eq!(alphabet.len(), 1);
        let empty = Alphabet::<i32>::new([]);
        assert!(empty.is_empty());
    }

    #[test]
    fn display_lists_symbols() {
        let alphabet = Alphabet::new([Symbol::new([iv(10, 20)]), Symbol::new([iv(5, 5)])]);
        assert_eq!(alphabet.to_string(), "{{5}, {[10..20]}}");
    }
}
