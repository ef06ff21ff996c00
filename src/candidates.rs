//! Bounded, sorted lists of candidate neighbors.

use crate::distance::Value;
use crate::sort::SortPolicy;

use std::fmt::{self, Debug, Formatter};
use std::marker::PhantomData;

/// A candidate neighbor: a reference point and its distance from the query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate<V> {
    /// The index of the reference point.
    pub index: usize,
    /// The distance to the reference point.
    pub distance: V,
}

impl<V> Candidate<V> {
    /// Create a new candidate.
    pub fn new(index: usize, distance: V) -> Self {
        Self { index, distance }
    }
}

/// The best `k` candidates found so far for a single query point.
///
/// Candidates are kept sorted best-first according to the [SortPolicy] `S`.  A new candidate is
/// placed after any existing candidates at an equal distance, so ties are broken by arrival order,
/// and once the list is full a candidate that only ties the current worst one is rejected.
pub struct CandidateList<S, V> {
    entries: Vec<Candidate<V>>,
    capacity: usize,
    _sort: PhantomData<S>,
}

impl<S: SortPolicy, V: Value> CandidateList<S, V> {
    /// Create an empty list that holds at most `capacity` candidates.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            capacity,
            _sort: PhantomData,
        }
    }

    /// Get the maximum number of candidates.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get the current number of candidates.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if this list is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Check if this list holds as many candidates as it can.
    pub fn is_full(&self) -> bool {
        self.entries.len() >= self.capacity
    }

    /// Get the distance a new candidate has to beat to be kept.
    ///
    /// This is the policy's worst distance until the list fills up.
    pub fn worst_distance(&self) -> V {
        match self.entries.last() {
            Some(last) if self.is_full() => last.distance,
            _ => S::worst_distance(),
        }
    }

    /// Find where a candidate at the given distance belongs, if anywhere.
    pub fn position(&self, distance: V) -> Option<usize> {
        let pos = self
            .entries
            .partition_point(|c| !S::is_better(distance, c.distance));

        if pos < self.capacity {
            Some(pos)
        } else {
            None
        }
    }

    /// Insert a candidate at a specific position.
    ///
    /// Everything from `pos` onwards shifts back by one, and the worst candidate drops off the end
    /// if the list was already full.
    pub fn insert_at(&mut self, pos: usize, candidate: Candidate<V>) {
        debug_assert!(pos <= self.entries.len() && pos < self.capacity);

        if self.is_full() {
            self.entries.pop();
        }
        self.entries.insert(pos, candidate);
    }

    /// Offer a candidate to this list.
    ///
    /// Returns whether the candidate was kept.
    pub fn insert(&mut self, index: usize, distance: V) -> bool {
        if let Some(pos) = self.position(distance) {
            self.insert_at(pos, Candidate::new(index, distance));
            true
        } else {
            false
        }
    }

    /// Get the candidates, best first.
    pub fn as_slice(&self) -> &[Candidate<V>] {
        &self.entries
    }

    /// Iterate over the candidates, best first.
    pub fn iter(&self) -> std::slice::Iter<'_, Candidate<V>> {
        self.entries.iter()
    }
}

impl<S, V: Debug> Debug for CandidateList<S, V> {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_struct("CandidateList")
            .field("entries", &self.entries)
            .field("capacity", &self.capacity)
            .finish()
    }
}

impl<S, V: Clone> Clone for CandidateList<S, V> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            capacity: self.capacity,
            _sort: PhantomData,
        }
    }
}

impl<'a, S: SortPolicy, V: Value> IntoIterator for &'a CandidateList<S, V> {
    type Item = &'a Candidate<V>;
    type IntoIter = std::slice::Iter<'a, Candidate<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
