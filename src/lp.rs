//! L<sup>p</sup> spaces.

use crate::coords::Coordinates;
use crate::distance::{Metric, Value};
use crate::error::{Error, Result};

use num_traits::{zero, Float};

/// The L<sup>1</sup> metric.
pub use crate::taxi::Taxicab as L1;

/// Compute the L<sup>1</sup> distance between two points.
pub use crate::taxi::taxicab_distance as l1_distance;

/// The L<sup>2</sup> metric.
pub use crate::euclid::Euclidean as L2;

/// Compute the L<sup>2</sup> distance between two points.
pub use crate::euclid::euclidean_distance as l2_distance;

/// The L<sup>∞</sup> metric.
pub use crate::chebyshev::Chebyshev as Linf;

/// Compute the L<sup>∞</sup> distance between two points.
pub use crate::chebyshev::chebyshev_distance as linf_distance;

/// Compute the [L<sup>p</sup> distance] between two points.
///
/// [L<sup>p</sup> distance]: https://en.wikipedia.org/wiki/Lp_space
pub fn lp_distance<T, U>(p: T::Value, x: T, y: U) -> T::Value
where
    T: Coordinates,
    U: Coordinates<Value = T::Value>,
{
    debug_assert!(x.dims() == y.dims());

    let mut sum: T::Value = zero();
    for i in 0..x.dims() {
        sum += (x.coord(i) - y.coord(i)).abs().powf(p);
    }

    sum.powf(p.recip())
}

/// The L<sup>p</sup> metric for a fixed exponent `p`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Lp<V> {
    p: V,
}

impl<V: Value> Lp<V> {
    /// Create an L<sup>p</sup> metric.
    ///
    /// Any finite `p > 0` works.  Exponents below 1 don't define a norm, but the distances still
    /// grow with every coordinate difference, so searches with them stay exact.
    pub fn new(p: V) -> Result<Self> {
        if p > zero() && p.is_finite() {
            Ok(Self { p })
        } else {
            Err(Error::InvalidExponent)
        }
    }

    /// Get the exponent.
    pub fn p(&self) -> V {
        self.p
    }
}

impl<V: Value> Metric<V> for Lp<V> {
    fn distance(&self, x: &[V], y: &[V]) -> V {
        lp_distance(self.p, x, y)
    }
}
