use std::{
    cmp,
    collections::{BTreeMap, BTreeSet},
};

use indexmap::IndexMap;

use crate::{alphabet::Alphabet, interval::Interval, realm::AdjacencyRealm, symbol::Symbol};

/// The grouping key of the refinement: which symbol of the left alphabet and which symbol of the
/// right alphabet cover an atomic interval. `None` on a side means that side covers nothing
/// there. Equality is order-sensitive, so `(A, None)` and `(None, A)` are distinct keys.
#[derive(Clone, Debug, Hash, PartialEq, Eq)]
pub(crate) struct SymbolPair<'a, T: AdjacencyRealm> {
    left: Option<&'a Symbol<T>>,
    right: Option<&'a Symbol<T>>,
}

impl<'a, T: AdjacencyRealm> SymbolPair<'a, T> {
    fn new(left: Option<&'a Symbol<T>>, right: Option<&'a Symbol<T>>) -> Self {
        if left.is_none() && right.is_none() {
            panic!("a symbol pair needs a symbol on at least one side");
        }
        SymbolPair { left, right }
    }
}

/// The outcome of refining two alphabets against each other: the new alphabet, plus enough
/// book-keeping to map every symbol of either input to the new symbols carved out of it.
#[derive(Clone, Debug)]
pub struct AlphabetMergeResult<T: AdjacencyRealm> {
    new_alphabet: Alphabet<T>,
    left_alphabet: Alphabet<T>,
    right_alphabet: Alphabet<T>,
    left_map: BTreeMap<Symbol<T>, BTreeSet<Symbol<T>>>,
    right_map: BTreeMap<Symbol<T>, BTreeSet<Symbol<T>>>,
}

impl<T: AdjacencyRealm> AlphabetMergeResult<T> {
    /// The refined alphabet. Each of its symbols lies entirely within, or entirely outside,
    /// every symbol of both input alphabets.
    pub fn new_alphabet(&self) -> &Alphabet<T> {
        &self.new_alphabet
    }

    /// The new symbols derived from `old_symbol`, which must be a symbol of `old_alphabet`, which
    /// in turn must be one of the two alphabets this result was computed from. The returned
    /// symbols' intervals union back to exactly `old_symbol`'s intervals.
    ///
    /// # Panics
    ///
    /// If `old_alphabet` was not an input of this merge, or `old_symbol` is not one of its
    /// symbols.
    pub fn new_symbols(&self, old_symbol: &Symbol<T>, old_alphabet: &Alphabet<T>) -> &BTreeSet<Symbol<T>> {
        let map = if *old_alphabet == self.left_alphabet {
            &self.left_map
        } else if *old_alphabet == self.right_alphabet {
            &self.right_map
        } else {
            panic!("alphabet was not an input of this merge");
        };
        map.get(old_symbol)
            .unwrap_or_else(|| panic!("symbol {:?} is not part of the given alphabet", old_symbol))
    }
}

pub(crate) fn merge<T: AdjacencyRealm>(
    left: &Alphabet<T>,
    right: &Alphabet<T>,
) -> AlphabetMergeResult<T> {
    // Merging an alphabet with an equal one refines nothing: map every symbol to itself.
    if left == right {
        let map = left
            .symbols()
            .iter()
            .map(|sym| (sym.clone(), BTreeSet::from([sym.clone()])))
            .collect::<BTreeMap<_, _>>();
        return AlphabetMergeResult {
            new_alphabet: left.clone(),
            left_alphabet: left.clone(),
            right_alphabet: right.clone(),
            left_map: map.clone(),
            right_map: map,
        };
    }

    let mut new_symbols = Vec::new();
    let mut left_map: BTreeMap<Symbol<T>, BTreeSet<Symbol<T>>> = BTreeMap::new();
    let mut right_map: BTreeMap<Symbol<T>, BTreeSet<Symbol<T>>> = BTreeMap::new();
    for (pair, atoms) in pair_groups(left, right) {
        // Renormalizing coalesces atomic intervals which a boundary of the *other* side had cut
        // apart but which belong to the same pair anyway.
        let new_sym = Symbol::new(atoms);
        if let Some(old) = pair.left {
            left_map
                .entry(old.clone())
                .or_default()
                .insert(new_sym.clone());
        }
        if let Some(old) = pair.right {
            right_map
                .entry(old.clone())
                .or_default()
                .insert(new_sym.clone());
        }
        new_symbols.push(new_sym);
    }

    AlphabetMergeResult {
        new_alphabet: Alphabet::new(new_symbols),
        left_alphabet: left.clone(),
        right_alphabet: right.clone(),
        left_map,
        right_map,
    }
}

/// Sweep both alphabets' interval sequences in bound order, cutting them into atomic intervals
/// at every boundary of either side, and group the atomic intervals by the pair of symbols
/// covering them. Regions covered by neither side produce nothing. Each alphabet's intervals are
/// disjoint, so one cursor per side suffices and the sweep is linear in the interval count.
fn pair_groups<'a, T: AdjacencyRealm>(
    left: &'a Alphabet<T>,
    right: &'a Alphabet<T>,
) -> IndexMap<SymbolPair<'a, T>, Vec<Interval<T>>> {
    let mut groups: IndexMap<SymbolPair<'a, T>, Vec<Interval<T>>> = IndexMap::new();
    let left_tagged = left.tagged_intervals();
    let right_tagged = right.tagged_intervals();
    let mut left_iter = left_tagged.into_iter();
    let mut right_iter = right_tagged.into_iter();
    let mut cur_left = left_iter.next();
    let mut cur_right = right_iter.next();
    // When the previous atomic interval ended inside a still-open interval, the next one must
    // start immediately after it. Otherwise we jump straight to the next lower bound, which is
    // what lets non-sequential realms merge as long as no interval needs splitting.
    let mut forced_low: Option<T> = None;

    while cur_left.is_some() || cur_right.is_some() {
        let low = match forced_low.take() {
            Some(b) => b,
            None => {
                let ll = cur_left.as_ref().map(|(iv, _)| iv.lower_bound());
                let rl = cur_right.as_ref().map(|(iv, _)| iv.lower_bound());
                match (ll, rl) {
                    (Some(a), Some(b)) => cmp::min(a, b).clone(),
                    (Some(a), None) => a.clone(),
                    (None, Some(b)) => b.clone(),
                    (None, None) => unreachable!(),
                }
            }
        };

        let left_covers = cur_left
            .as_ref()
            .is_some_and(|(iv, _)| *iv.lower_bound() <= low);
        let right_covers = cur_right
            .as_ref()
            .is_some_and(|(iv, _)| *iv.lower_bound() <= low);

        // The atomic interval ends at the nearest boundary: the end of a covering interval, or
        // just before the start of an interval opening part-way through a covering one.
        let mut up: Option<T> = None;
        if left_covers {
            if let Some((iv, _)) = &cur_left {
                up = Some(iv.upper_bound().clone());
            }
        }
        if right_covers {
            if let Some((iv, _)) = &cur_right {
                let u = iv.upper_bound();
                up = Some(match up {
                    Some(cur) if cur <= *u => cur,
                    _ => u.clone(),
                });
            }
        }
        // `low` always starts inside at least one interval: it is either a lower bound itself or
        // the continuation of an interval cut by the previous iteration.
        let mut up = up.expect("uncovered sweep position");
        if let Some((iv, _)) = &cur_left {
            if *iv.lower_bound() > low && *iv.lower_bound() <= up {
                up = iv.lower_bound().predecessor();
            }
        }
        if let Some((iv, _)) = &cur_right {
            if *iv.lower_bound() > low && *iv.lower_bound() <= up {
                up = iv.lower_bound().predecessor();
            }
        }

        let pair = SymbolPair::new(
            if left_covers {
                cur_left.as_ref().map(|&(_, sym)| sym)
            } else {
                None
            },
            if right_covers {
                cur_right.as_ref().map(|&(_, sym)| sym)
            } else {
                None
            },
        );
        groups
            .entry(pair)
            .or_default()
            .push(Interval::new(low.clone(), up.clone()));

        let left_open = left_covers
            && cur_left
                .as_ref()
                .is_some_and(|(iv, _)| *iv.upper_bound() > up);
        let right_open = right_covers
            && cur_right
                .as_ref()
                .is_some_and(|(iv, _)| *iv.upper_bound() > up);
        forced_low = if left_open || right_open {
            Some(up.successor())
        } else {
            None
        };
        if left_covers && !left_open {
            cur_left = left_iter.next();
        }
        if right_covers && !right_open {
            cur_right = right_iter.next();
        }
    }

    groups
}

#[cfg(test)]
mod test {
    use num_bigint::BigInt;

    use super::*;

    fn iv(lower: i32, upper: i32) -> Interval<i32> {
        Interval::new(lower, upper)
    }

    fn big(lower: i32, upper: i32) -> Interval<BigInt> {
        Interval::new(BigInt::from(lower), BigInt::from(upper))
    }

    fn siv(lower: &str, upper: &str) -> Interval<String> {
        Interval::new(String::from(lower), String::from(upper))
    }

    #[test]
    fn symbol_pair_equality_is_order_sensitive() {
        let a = Symbol::new([iv(0, 10)]);
        let b = Symbol::new([iv(20, 30)]);
        assert_eq!(SymbolPair::new(Some(&a), Some(&b)), SymbolPair::new(Some(&a), Some(&b)));
        assert_ne!(SymbolPair::new(Some(&a), Some(&b)), SymbolPair::new(Some(&b), Some(&a)));
        assert_ne!(SymbolPair::new(Some(&a), None), SymbolPair::new(None, Some(&a)));
    }

    #[test]
    #[should_panic(expected = "at least one side")]
    fn symbol_pair_needs_a_symbol() {
        SymbolPair::<i32>::new(None, None);
    }

    #[test]
    fn disjoint_alphabets_merge_to_their_union() {
        let x_sym = Symbol::new([iv(10, 20), iv(50, 100), iv(200, 400)]);
        let y_sym = Symbol::new([iv(30, 40), iv(450, 500), iv(600, 800)]);
        let x = Alphabet::from(x_sym.clone());
        let y = Alphabet::from(y_sym.clone());
        let result = x.merge_with(&y);
        assert_eq!(
            *result.new_alphabet(),
            Alphabet::new([x_sym.clone(), y_sym.clone()])
        );
        // No splitting occurred, so each original symbol maps to itself.
        assert_eq!(
            result.new_symbols(&y_sym, &y),
            &BTreeSet::from([y_sym.clone()])
        );
        assert_eq!(result.new_symbols(&x_sym, &x), &BTreeSet::from([x_sym]));
    }

    #[test]
    fn contained_symbol_survives_refinement_unchanged() {
        let outer = Symbol::new([iv(0, 10), iv(20, 30), iv(40, 500)]);
        let inner = Symbol::new([iv(100, 110), iv(120, 130), iv(140, 150)]);
        let x = Alphabet::from(outer.clone());
        let y = Alphabet::from(inner.clone());
        let result = x.merge_with(&y);
        // `inner` lies entirely within `outer`, so its three intervals regroup into one new
        // symbol equal to `inner` itself.
        assert_eq!(
            result.new_symbols(&inner, &y),
            &BTreeSet::from([inner.clone()])
        );
        // `outer` splits into its overlap with `inner` plus the rest.
        let outer_parts = result.new_symbols(&outer, &x);
        assert_eq!(outer_parts.len(), 2);
        assert!(outer_parts.contains(&inner));
        assert_eq!(Symbol::merge(outer_parts.iter().cloned()), outer);
    }

    #[test]
    fn overlap_splits_at_both_boundaries() {
        let x_sym = Symbol::new([iv(0, 50)]);
        let y_sym = Symbol::new([iv(25, 999)]);
        let x = Alphabet::from(x_sym.clone());
        let y = Alphabet::from(y_sym.clone());
        let result = x.merge_with(&y);
        assert_eq!(
            *result.new_alphabet(),
            Alphabet::new([
                Symbol::new([iv(0, 24)]),
                Symbol::new([iv(25, 50)]),
                Symbol::new([iv(51, 999)]),
            ])
        );
        assert_eq!(
            result.new_symbols(&x_sym, &x),
            &BTreeSet::from([Symbol::new([iv(0, 24)]), Symbol::new([iv(25, 50)])])
        );
        assert_eq!(
            result.new_symbols(&y_sym, &y),
            &BTreeSet::from([Symbol::new([iv(25, 50)]), Symbol::new([iv(51, 999)])])
        );
    }

    #[test]
    fn refinement_covers_exactly_the_original_symbols() {
        let x_sym = Symbol::new([iv(0, 100)]);
        let y_sym = Symbol::new([iv(20, 30), iv(50, 60), iv(90, 150)]);
        let x = Alphabet::from(x_sym.clone());
        let y = Alphabet::from(y_sym.clone());
        let result = x.merge_with(&y);
        assert_eq!(
            Symbol::merge(result.new_symbols(&x_sym, &x).iter().cloned()),
            x_sym
        );
        assert_eq!(
            Symbol::merge(result.new_symbols(&y_sym, &y).iter().cloned()),
            y_sym
        );
    }

    #[test]
    fn merging_equal_alphabets_short_circuits() {
        let sym = Symbol::new([iv(10, 20), iv(50, 100)]);
        let a = Alphabet::from(sym.clone());
        let b = a.clone();
        let result = a.merge_with(&b);
        assert_eq!(*result.new_alphabet(), a);
        assert_eq!(result.new_symbols(&sym, &a), &BTreeSet::from([sym]));
    }

    #[test]
    fn merging_with_the_empty_alphabet_changes_nothing() {
        let sym = Symbol::new([iv(10, 20)]);
        let a = Alphabet::from(sym.clone());
        let empty = Alphabet::<i32>::new([]);
        let result = a.merge_with(&empty);
        assert_eq!(*result.new_alphabet(), a);
        assert_eq!(result.new_symbols(&sym, &a), &BTreeSet::from([sym]));
    }

    #[test]
    fn bigint_alphabets_refine() {
        let x_sym = Symbol::new([big(0, 10), big(50, 100), big(200, 400)]);
        let y_sym = Symbol::new([big(30, 40), big(150, 170), big(600, 800)]);
        let x = Alphabet::from(x_sym.clone());
        let y = Alphabet::from(y_sym.clone());
        let result = x.merge_with(&y);
        assert_eq!(
            *result.new_alphabet(),
            Alphabet::new([x_sym, y_sym.clone()])
        );
        assert_eq!(result.new_symbols(&y_sym, &y), &BTreeSet::from([y_sym]));
    }

    #[test]
    fn string_alphabets_merge_when_boundaries_align() {
        let left_sym = Symbol::new([siv("a", "c"), siv("x", "z")]);
        let right_sym = Symbol::new([siv("a", "c")]);
        let left = Alphabet::from(left_sym.clone());
        let right = Alphabet::from(right_sym.clone());
        let result = left.merge_with(&right);
        assert_eq!(
            *result.new_alphabet(),
            Alphabet::new([
                Symbol::new([siv("a", "c")]),
                Symbol::new([siv("x", "z")]),
            ])
        );
        assert_eq!(result.new_symbols(&left_sym, &left).len(), 2);
        assert_eq!(
            result.new_symbols(&right_sym, &right),
            &BTreeSet::from([right_sym])
        );
    }

    #[test]
    #[should_panic(expected = "has no predecessor")]
    fn string_alphabets_cannot_split_misaligned_overlap() {
        let left = Alphabet::from(Symbol::new([siv("a", "m")]));
        let right = Alphabet::from(Symbol::new([siv("g", "z")]));
        left.merge_with(&right);
    }

    #[test]
    fn char_alphabets_refine_token_classes() {
        // A "letter" token class against an "identifier start" class including '_'.
        let letters = Symbol::new([
            Interval::new('A', 'Z'),
            Interval::new('a', 'z'),
        ]);
        let ident = Symbol::new([
            Interval::new('A', 'Z'),
            Interval::new('_', '_'),
            Interval::new('a', 'z'),
        ]);
        let result = Alphabet::from(letters.clone()).merge_with(&Alphabet::from(ident.clone()));
        let shared = Symbol::new([Interval::new('A', 'Z'), Interval::new('a', 'z')]);
        let underscore = Symbol::new([Interval::new('_', '_')]);
        assert_eq!(
            *result.new_alphabet(),
            Alphabet::new([shared.clone(), underscore.clone()])
        );
        assert_eq!(
            result.new_symbols(&ident, &Alphabet::from(ident.clone())),
            &BTreeSet::from([shared, underscore])
        );
    }

    #[test]
    #[should_panic(expected = "not an input of this merge")]
    fn new_symbols_rejects_foreign_alphabets() {
        let a = Alphabet::from(Symbol::new([iv(0, 10)]));
        let b = Alphabet::from(Symbol::new([iv(20, 30)]));
        let c = Alphabet::from(Symbol::new([iv(40, 50)]));
        let result = a.merge_with(&b);
        result.new_symbols(&Symbol::new([iv(40, 50)]), &c);
    }

    #[test]
    #[should_panic(expected = "is not part of the given alphabet")]
    fn new_symbols_rejects_foreign_symbols() {
        let a = Alphabet::from(Symbol::new([iv(0, 10)]));
        let b = Alphabet::from(Symbol::new([iv(20, 30)]));
        let result = a.merge_with(&b);
        result.new_symbols(&Symbol::new([iv(99, 99)]), &a);
    }
}
