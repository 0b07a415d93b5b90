//! A library for computing the character-class partitions a lexer generator needs before it can
//! build automata. When several token definitions each describe their own set of input ranges,
//! the generator must find the coarsest set of ranges that distinguishes every token from every
//! other: the *finest common refinement* of the tokens' alphabets. That refinement, and the
//! interval/symbol algebra underneath it, is what this crate provides. It builds no automata
//! itself: the refined alphabet is handed off to whatever determinizes and minimizes.
//!
//! Terminology used throughout:
//!
//!   * A *bound* is a single value from some totally ordered domain (an integer, a `char`, ...).
//!   * A *realm* ([`AdjacencyRealm`]) defines, for one bound type, what "the next bound" means,
//!     if anything. Implemented by the bound type itself.
//!   * An [`Interval`] is a closed range `[lower, upper]` of bounds from one realm.
//!   * A [`Symbol`] is a maximal union of disjoint, non-adjacent intervals: one equivalence
//!     class of bounds, e.g. all the characters one token accepts in some position.
//!   * An [`Alphabet`] is a set of symbols no two of which overlap: a partition of the covered
//!     part of the domain.
//!
//! [`Alphabet::merge_with`] folds two alphabets into their common refinement and reports, via
//! [`AlphabetMergeResult`], which new symbols each original symbol was carved into.
//!
//! Everything here is an immutable value with structural equality: operations return fresh
//! values and never mutate or alias their inputs, so alphabets can be shared freely across
//! downstream consumers. There are no recoverable errors in this crate; all failure modes are
//! caller contract violations and panic (see the `# Panics` sections).

pub mod alphabet;
pub mod interval;
pub mod merge;
pub mod realm;
pub mod symbol;

pub use alphabet::Alphabet;
pub use interval::Interval;
pub use merge::AlphabetMergeResult;
pub use realm::AdjacencyRealm;
pub use symbol::Symbol;
