use std::{cmp::Ordering, fmt::Debug, hash::Hash};

use num_bigint::BigInt;
use num_traits::{CheckedAdd, CheckedSub, One, PrimInt};

/// The adjacency rules for a bound type: in essence, what `bound + 1` and `bound - 1` mean.
/// Implementing this trait for a type makes it usable as an interval bound, and guarantees at the
/// type level that two intervals can only meet if their bounds live in the same realm.
///
/// Realms come in two kinds. *Sequential* realms (integers, big integers, code points) have a
/// well-defined notion of "the next bound", so touching intervals can be coalesced. Non-sequential
/// realms (e.g. `String` labels) only support ordering and intersection; their
/// [`successor`](AdjacencyRealm::successor), [`predecessor`](AdjacencyRealm::predecessor) and
/// [`is_adjacent`](AdjacencyRealm::is_adjacent) panic rather than guess, and `SEQUENTIAL` is
/// `false` so that callers can avoid them.
pub trait AdjacencyRealm: Ord + Clone + Hash + Debug {
    /// `true` if this realm has a meaningful successor/predecessor function.
    const SEQUENTIAL: bool;

    /// Return the bound immediately after `self`.
    ///
    /// # Panics
    ///
    /// If no such bound exists (e.g. `u8::MAX`), or if the realm is non-sequential.
    fn successor(&self) -> Self;

    /// Return the bound immediately before `self`.
    ///
    /// # Panics
    ///
    /// If no such bound exists, or if the realm is non-sequential.
    fn predecessor(&self) -> Self;

    /// Are `self` and `other` next to each other (in either direction)?
    ///
    /// For every sequential realm `a.is_adjacent(&b)` holds exactly when `a.successor() == b` or
    /// `b.successor() == a`.
    ///
    /// # Panics
    ///
    /// If the realm is non-sequential.
    fn is_adjacent(&self, other: &Self) -> bool {
        match self.cmp(other) {
            Ordering::Less => self.successor() == *other,
            Ordering::Greater => other.successor() == *self,
            Ordering::Equal => false,
        }
    }
}

fn int_successor<T: PrimInt + CheckedAdd + Debug>(bound: T) -> T {
    bound
        .checked_add(&T::one())
        .unwrap_or_else(|| panic!("no bound after {:?}", bound))
}

fn int_predecessor<T: PrimInt + CheckedSub + Debug>(bound: T) -> T {
    bound
        .checked_sub(&T::one())
        .unwrap_or_else(|| panic!("no bound before {:?}", bound))
}

macro_rules! IntRealm {
    ($($t:ty),*) => {$(
        impl AdjacencyRealm for $t {
            const SEQUENTIAL: bool = true;

            fn successor(&self) -> Self {
                int_successor(*self)
            }

            fn predecessor(&self) -> Self {
                int_predecessor(*self)
            }
        }
    )*}
}

IntRealm!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

impl AdjacencyRealm for BigInt {
    const SEQUENTIAL: bool = true;

    fn successor(&self) -> Self {
        self + BigInt::one()
    }

    fn predecessor(&self) -> Self {
        self - BigInt::one()
    }
}

impl AdjacencyRealm for char {
    const SEQUENTIAL: bool = true;

    /// The next code point, stepping over the surrogate gap.
    fn successor(&self) -> Self {
        let mut u = *self as u32 + 1;
        if u == 0xD800 {
            u = 0xE000;
        }
        char::from_u32(u).unwrap_or_else(|| panic!("no code point after {:?}", self))
    }

    fn predecessor(&self) -> Self {
        let mut u = (*self as u32)
            .checked_sub(1)
            .unwrap_or_else(|| panic!("no code point before {:?}", self));
        if u == 0xDFFF {
            u = 0xD7FF;
        }
        // Cannot fail: `u` is below a valid code point and not a surrogate.
        char::from_u32(u).unwrap()
    }
}

/// `String` bounds are ordered labels with nothing in between them defined: adjacency questions
/// have no answer, and asking one is a caller bug.
impl AdjacencyRealm for String {
    const SEQUENTIAL: bool = false;

    fn successor(&self) -> Self {
        panic!("string bound {:?} has no successor", self);
    }

    fn predecessor(&self) -> Self {
        panic!("string bound {:?} has no predecessor", self);
    }

    fn is_adjacent(&self, other: &Self) -> bool {
        panic!("adjacency of string bounds {:?} and {:?} is undefined", self, other);
    }
}
