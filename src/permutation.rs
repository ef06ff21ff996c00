//! Index translation between original and reordered point sets.

/// A bijection between the original position of each point and its position after reordering.
///
/// Trees rearrange their points so that every node covers a contiguous range; this map lets
/// results be reported in terms of the caller's original indices.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Permutation {
    old_from_new: Vec<usize>,
    new_from_old: Vec<usize>,
}

impl Permutation {
    /// Create the identity permutation over `len` indices.
    pub fn identity(len: usize) -> Self {
        let indices: Vec<_> = (0..len).collect();
        Self {
            old_from_new: indices.clone(),
            new_from_old: indices,
        }
    }

    /// Create a permutation from an ordering already known to be valid.
    pub(crate) fn from_order(old_from_new: Vec<usize>) -> Self {
        let mut new_from_old = vec![0; old_from_new.len()];
        for (new, &old) in old_from_new.iter().enumerate() {
            new_from_old[old] = new;
        }

        Self {
            old_from_new,
            new_from_old,
        }
    }

    /// Create a permutation from the original index of each new position.
    ///
    /// Returns `None` unless `old_from_new` contains every index in `0..len` exactly once.
    pub fn from_old_from_new(old_from_new: Vec<usize>) -> Option<Self> {
        let len = old_from_new.len();
        let mut new_from_old = vec![usize::MAX; len];

        for (new, &old) in old_from_new.iter().enumerate() {
            let slot = new_from_old.get_mut(old)?;
            if *slot != usize::MAX {
                return None;
            }
            *slot = new;
        }

        Some(Self {
            old_from_new,
            new_from_old,
        })
    }

    /// Get the number of indices.
    pub fn len(&self) -> usize {
        self.old_from_new.len()
    }

    /// Check if this permutation is empty.
    pub fn is_empty(&self) -> bool {
        self.old_from_new.is_empty()
    }

    /// Check if this permutation leaves every index in place.
    pub fn is_identity(&self) -> bool {
        self.old_from_new.iter().enumerate().all(|(new, &old)| new == old)
    }

    /// Map a reordered index back to the original one.
    pub fn to_old(&self, new: usize) -> usize {
        self.old_from_new[new]
    }

    /// Map an original index to its reordered position.
    pub fn to_new(&self, old: usize) -> usize {
        self.new_from_old[old]
    }

    /// Get the original index of each reordered position.
    pub fn old_from_new(&self) -> &[usize] {
        &self.old_from_new
    }
}
