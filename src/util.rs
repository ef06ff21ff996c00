//! Internal utilities.

use std::cmp::Ordering;

/// A wrapper that extends a partial ordering into a total one.
///
/// Unordered values (i.e. NaN) compare equal to each other and greater than everything else.
#[derive(Clone, Copy, Debug)]
pub struct Ordered<T>(T);

impl<T> Ordered<T> {
    /// Wrap a value.
    pub fn new(item: T) -> Self {
        Self(item)
    }
}

impl<T> From<T> for Ordered<T> {
    fn from(item: T) -> Self {
        Self::new(item)
    }
}

impl<T: PartialOrd> Ord for Ordered<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        #[allow(clippy::eq_op)]
        let (lhs, rhs) = (self.0 == self.0, other.0 == other.0);
        match (lhs, rhs) {
            (true, true) => self.0.partial_cmp(&other.0).unwrap_or(Ordering::Equal),
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
        }
    }
}

impl<T: PartialOrd> PartialOrd for Ordered<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T: PartialOrd> PartialEq for Ordered<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T: PartialOrd> Eq for Ordered<T> {}
