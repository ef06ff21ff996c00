//! Abstract notions of distance.

use num_traits::{Float, NumAssign};

use std::fmt::Debug;

/// A number type suitable for coordinates and distance values.
///
/// This trait is automatically implemented for all types that support the required operations.
pub trait Value: Float + NumAssign + Debug {}

/// Blanket [Value] implementation.
impl<T: Float + NumAssign + Debug> Value for T {}

/// A distance function between two points given by their coordinates.
///
/// Metrics are held by value, so an implementation may carry parameters (weights, an exponent,
/// etc.) that affect every evaluation.  Distances don't need to be symmetric or obey the
/// [triangle inequality], but they must be *coordinate-monotone*: for points `$x$`, `$y$`, `$z$`,
///
/// ```math
/// \forall i: |x_i - y_i| \le |x_i - z_i| \implies d(x, y) \le d(x, z)
/// ```
///
/// Bounding-box distance estimates are exact lower and upper bounds only under that condition.
/// All [L<sup>p</sup> distances](crate::lp), and weighted variants with non-negative weights,
/// satisfy it.
///
/// [triangle inequality]: https://en.wikipedia.org/wiki/Triangle_inequality
pub trait Metric<V: Value> {
    /// Calculate the distance between two points.
    fn distance(&self, x: &[V], y: &[V]) -> V;

    /// The dimensionality this metric is defined for, if it only accepts one.
    ///
    /// Searches check this against their points before evaluating any distance.
    fn dims(&self) -> Option<usize> {
        None
    }
}

/// Blanket [Metric] implementation for references.
impl<V: Value, M: ?Sized + Metric<V>> Metric<V> for &M {
    fn distance(&self, x: &[V], y: &[V]) -> V {
        (**self).distance(x, y)
    }

    fn dims(&self) -> Option<usize> {
        (**self).dims()
    }
}
