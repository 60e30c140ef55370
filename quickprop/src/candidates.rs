//! Lazy candidate sequences used to enumerate and search shrink candidates.
//!
//! A [`Candidates<T>`] is consumed in order and may be abandoned at any point,
//! which is what makes first-match search cheap: elements after the match are
//! never computed. Sequences are finite in every use in this crate and are not
//! restartable once drained; a shrinker rebuilds one from scratch on demand.

use std::fmt;

/// A lazy, finite sequence of candidate values.
pub struct Candidates<T> {
    inner: Box<dyn Iterator<Item = T>>,
}

impl<T> fmt::Debug for Candidates<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Candidates").finish_non_exhaustive()
    }
}

impl<T: 'static> Candidates<T> {
    /// Wrap any iterator
    pub fn new<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
        I::IntoIter: 'static,
    {
        Self {
            inner: Box::new(iter.into_iter()),
        }
    }

    /// The empty sequence
    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }

    /// A single candidate
    pub fn once(value: T) -> Self {
        Self::new(std::iter::once(value))
    }

    /// Candidates from an owned list, in list order
    pub fn from_vec(values: Vec<T>) -> Self {
        Self::new(values)
    }

    /// Candidates from a slice, cloned up front
    pub fn from_slice(values: &[T]) -> Self
    where
        T: Clone,
    {
        Self::from_vec(values.to_vec())
    }

    /// Transform every candidate, keeping the sequence lazy
    pub fn map<U, F>(self, f: F) -> Candidates<U>
    where
        U: 'static,
        F: FnMut(T) -> U + 'static,
    {
        Candidates::new(self.inner.map(f))
    }

    /// All of `self`, then all of `other`
    pub fn append(self, other: Candidates<T>) -> Self {
        Self::new(self.inner.chain(other.inner))
    }

    /// Concatenate sequences in order
    pub fn concat<I>(parts: I) -> Self
    where
        I: IntoIterator<Item = Candidates<T>>,
        I::IntoIter: 'static,
    {
        Self::new(parts.into_iter().flatten())
    }

    /// Cartesian pairing, `self` varying slowest.
    ///
    /// The right-hand sequence is drained once and cached so it can be
    /// replayed for each left element.
    pub fn product<U>(self, other: Candidates<U>) -> Candidates<(T, U)>
    where
        T: Clone,
        U: Clone + 'static,
    {
        let right: Vec<U> = other.collect();
        Candidates::new(
            self.inner
                .flat_map(move |l| right.clone().into_iter().map(move |r| (l.clone(), r))),
        )
    }

    /// First candidate satisfying `predicate`.
    ///
    /// Scans in order and stops at the first match; later candidates are
    /// neither produced nor tested.
    pub fn find_first<P>(mut self, mut predicate: P) -> Option<T>
    where
        P: FnMut(&T) -> bool,
    {
        self.inner.find(|candidate| predicate(candidate))
    }
}

impl<T> Iterator for Candidates<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.inner.next()
    }
}
