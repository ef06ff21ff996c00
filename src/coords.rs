//! Types that can be read as points in a [coordinate space](https://en.wikipedia.org/wiki/Cartesian_coordinate_system).

use crate::distance::Value;

use num_traits::Float;

/// A point with a fixed number of coordinates.
///
/// Anything implementing this trait can be stored in a [PointSet](crate::points::PointSet) or
/// passed to the free distance functions.
pub trait Coordinates {
    /// The type of individual coordinates.
    type Value: Value;

    /// Get the number of dimensions this point has.
    fn dims(&self) -> usize;

    /// Get the `i`th coordinate of this point.
    fn coord(&self, i: usize) -> Self::Value;

    /// Find the first coordinate that is infinite or NaN, if any.
    fn non_finite_dim(&self) -> Option<usize> {
        (0..self.dims()).find(|&i| !self.coord(i).is_finite())
    }
}

impl<T: Value> Coordinates for [T] {
    type Value = T;

    fn dims(&self) -> usize {
        self.len()
    }

    fn coord(&self, i: usize) -> T {
        self[i]
    }

    fn non_finite_dim(&self) -> Option<usize> {
        self.iter().position(|x| !x.is_finite())
    }
}

impl<T: Value, const N: usize> Coordinates for [T; N] {
    type Value = T;

    fn dims(&self) -> usize {
        N
    }

    fn coord(&self, i: usize) -> T {
        self[i]
    }

    fn non_finite_dim(&self) -> Option<usize> {
        self.as_slice().non_finite_dim()
    }
}

impl<T: Value> Coordinates for Vec<T> {
    type Value = T;

    fn dims(&self) -> usize {
        self.len()
    }

    fn coord(&self, i: usize) -> T {
        self[i]
    }

    fn non_finite_dim(&self) -> Option<usize> {
        self.as_slice().non_finite_dim()
    }
}

impl<T: ?Sized + Coordinates> Coordinates for &T {
    type Value = T::Value;

    fn dims(&self) -> usize {
        (*self).dims()
    }

    fn coord(&self, i: usize) -> Self::Value {
        (*self).coord(i)
    }

    fn non_finite_dim(&self) -> Option<usize> {
        (*self).non_finite_dim()
    }
}
