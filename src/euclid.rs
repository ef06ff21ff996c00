//! [Euclidean space](https://en.wikipedia.org/wiki/Euclidean_space).

use crate::coords::Coordinates;
use crate::distance::{Metric, Value};

use num_traits::{zero, Float};

/// Compute the squared [Euclidean distance] between two points.
///
/// ```math
/// \mathrm{squared\_euclidean\_distance}(x, y) = \sum_i (x_i - y_i)^2
/// ```
///
/// [Euclidean distance]: https://en.wikipedia.org/wiki/Euclidean_distance
pub fn squared_euclidean_distance<T, U>(x: T, y: U) -> T::Value
where
    T: Coordinates,
    U: Coordinates<Value = T::Value>,
{
    debug_assert!(x.dims() == y.dims());

    let mut sum = zero();
    for i in 0..x.dims() {
        let diff = x.coord(i) - y.coord(i);
        sum += diff * diff;
    }

    sum
}

/// Compute the [Euclidean distance] between two points.
///
/// ```math
/// \begin{aligned}
/// \mathrm{euclidean\_distance}(x, y) &= \|x - y\|_2 \\
/// &= \sqrt{\sum_i (x_i - y_i)^2}
/// \end{aligned}
/// ```
///
/// [Euclidean distance]: https://en.wikipedia.org/wiki/Euclidean_distance
pub fn euclidean_distance<T, U>(x: T, y: U) -> T::Value
where
    T: Coordinates,
    U: Coordinates<Value = T::Value>,
{
    squared_euclidean_distance(x, y).sqrt()
}

/// The [Euclidean distance](euclidean_distance) metric.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Euclidean;

impl<V: Value> Metric<V> for Euclidean {
    fn distance(&self, x: &[V], y: &[V]) -> V {
        euclidean_distance(x, y)
    }
}

/// The [squared Euclidean distance](squared_euclidean_distance).
///
/// This avoids a square root per evaluation and ranks points identically to [Euclidean], but the
/// reported distances are squared.  It is not a true metric (the triangle inequality fails), which
/// doesn't matter for bounding-box pruning.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SquaredEuclidean;

impl<V: Value> Metric<V> for SquaredEuclidean {
    fn distance(&self, x: &[V], y: &[V]) -> V {
        squared_euclidean_distance(x, y)
    }
}

/// A Euclidean distance with a non-negative weight per dimension.
///
/// ```math
/// \mathrm{d}(x, y) = \sqrt{\sum_i w_i (x_i - y_i)^2}
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct WeightedEuclidean<V> {
    weights: Vec<V>,
}

impl<V: Value> WeightedEuclidean<V> {
    /// Create a weighted metric, with one weight per dimension.
    ///
    /// The metric only accepts points with exactly as many coordinates as there are weights;
    /// [NeighborSearch](crate::search::NeighborSearch) rejects anything else with
    /// [MetricDimensionMismatch](crate::error::Error::MetricDimensionMismatch).  Negative weights
    /// would break coordinate monotonicity, so they are clamped to zero.
    pub fn new<I: IntoIterator<Item = V>>(weights: I) -> Self {
        let weights = weights
            .into_iter()
            .map(|w| if w < zero() { zero() } else { w })
            .collect();

        Self { weights }
    }

    /// Get the per-dimension weights.
    pub fn weights(&self) -> &[V] {
        &self.weights
    }
}

impl<V: Value> Metric<V> for WeightedEuclidean<V> {
    fn distance(&self, x: &[V], y: &[V]) -> V {
        debug_assert!(x.len() == y.len());
        debug_assert!(x.len() == self.weights.len());

        let mut sum: V = zero();
        for ((&xi, &yi), &wi) in x.iter().zip(y).zip(&self.weights) {
            let diff = xi - yi;
            sum += wi * diff * diff;
        }

        sum.sqrt()
    }

    fn dims(&self) -> Option<usize> {
        Some(self.weights.len())
    }
}
