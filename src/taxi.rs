//! [Taxicab (Manhattan) distance](https://en.wikipedia.org/wiki/Taxicab_geometry).

use crate::coords::Coordinates;
use crate::distance::{Metric, Value};

use num_traits::{zero, Float};

/// Compute the taxicab distance between two points.
///
/// ```math
/// \begin{aligned}
/// \mathrm{taxicab\_distance}(x, y) &= \|x - y\|_1 \\
/// &= \sum_i |x_i - y_i|
/// \end{aligned}
/// ```
pub fn taxicab_distance<T, U>(x: T, y: U) -> T::Value
where
    T: Coordinates,
    U: Coordinates<Value = T::Value>,
{
    debug_assert!(x.dims() == y.dims());

    let mut sum = zero();
    for i in 0..x.dims() {
        sum += (x.coord(i) - y.coord(i)).abs();
    }

    sum
}

/// The [taxicab distance metric](taxicab_distance).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Taxicab;

impl<V: Value> Metric<V> for Taxicab {
    fn distance(&self, x: &[V], y: &[V]) -> V {
        taxicab_distance(x, y)
    }
}
