//! [Chebyshev distance](https://en.wikipedia.org/wiki/Chebyshev_distance).

use crate::coords::Coordinates;
use crate::distance::{Metric, Value};

use num_traits::{zero, Float};

/// Compute the Chebyshev distance between two points.
///
/// ```math
/// \begin{aligned}
/// \mathrm{chebyshev\_distance}(x, y) &= \|x - y\|_\infty \\
/// &= \max_i |x_i - y_i|
/// \end{aligned}
/// ```
pub fn chebyshev_distance<T, U>(x: T, y: U) -> T::Value
where
    T: Coordinates,
    U: Coordinates<Value = T::Value>,
{
    debug_assert!(x.dims() == y.dims());

    let mut max = zero();

    for i in 0..x.dims() {
        let diff = (x.coord(i) - y.coord(i)).abs();
        if diff > max {
            max = diff;
        }
    }

    max
}

/// The [Chebyshev distance metric](chebyshev_distance).
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Chebyshev;

impl<V: Value> Metric<V> for Chebyshev {
    fn distance(&self, x: &[V], y: &[V]) -> V {
        chebyshev_distance(x, y)
    }
}
