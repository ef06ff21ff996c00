//! Axis-aligned bounding boxes.

use crate::distance::{Metric, Value};

use num_traits::zero;

/// A hyper-rectangle bound, given by the lower and upper extent of each dimension.
///
/// The distance estimates work by constructing the closest (or furthest) pair of points between
/// two regions and evaluating the metric on them.  That is exact for any coordinate-monotone
/// [Metric].
#[derive(Clone, Debug, PartialEq)]
pub struct HRectBound<V> {
    lo: Vec<V>,
    hi: Vec<V>,
}

impl<V: Value> HRectBound<V> {
    /// Create an empty bound, which contains no points.
    pub fn new(dims: usize) -> Self {
        Self {
            lo: vec![V::infinity(); dims],
            hi: vec![V::neg_infinity(); dims],
        }
    }

    /// Create the smallest bound containing every given point.
    pub fn from_points<'a, I>(dims: usize, points: I) -> Self
    where
        I: IntoIterator<Item = &'a [V]>,
        V: 'a,
    {
        let mut bound = Self::new(dims);
        for point in points {
            bound.grow(point);
        }
        bound
    }

    /// Expand this bound to contain a point.
    pub fn grow(&mut self, point: &[V]) {
        debug_assert!(point.len() == self.dims());

        for ((lo, hi), &x) in self.lo.iter_mut().zip(&mut self.hi).zip(point) {
            if x < *lo {
                *lo = x;
            }
            if x > *hi {
                *hi = x;
            }
        }
    }

    /// Get the number of dimensions.
    pub fn dims(&self) -> usize {
        self.lo.len()
    }

    /// Get the lower corner.
    pub fn lo(&self) -> &[V] {
        &self.lo
    }

    /// Get the upper corner.
    pub fn hi(&self) -> &[V] {
        &self.hi
    }

    /// Check whether this bound contains no points.
    pub fn is_empty(&self) -> bool {
        self.lo.iter().zip(&self.hi).any(|(lo, hi)| lo > hi)
    }

    /// Get the extent of the `i`th dimension.
    pub fn width(&self, i: usize) -> V {
        let width = self.hi[i] - self.lo[i];
        if width > zero() {
            width
        } else {
            zero()
        }
    }

    /// Find the widest dimension, and its width.
    pub fn widest_dim(&self) -> Option<(usize, V)> {
        let mut widest: Option<(usize, V)> = None;
        for i in 0..self.dims() {
            let width = self.width(i);
            if widest.map_or(true, |(_, w)| width > w) {
                widest = Some((i, width));
            }
        }
        widest
    }

    /// Check whether a point lies within this bound.
    pub fn contains(&self, point: &[V]) -> bool {
        self.lo
            .iter()
            .zip(&self.hi)
            .zip(point)
            .all(|((lo, hi), x)| lo <= x && x <= hi)
    }

    /// Get the coordinate in dimension `i` of the point in this bound closest to `x`.
    fn closest_coord(&self, i: usize, x: V) -> V {
        let (lo, hi) = (self.lo[i], self.hi[i]);
        if x < lo {
            lo
        } else if x > hi {
            hi
        } else {
            x
        }
    }

    /// Get the coordinate in dimension `i` of the corner of this bound furthest from `x`.
    fn furthest_coord(&self, i: usize, x: V) -> V {
        let (lo, hi) = (self.lo[i], self.hi[i]);
        if x - lo > hi - x {
            lo
        } else {
            hi
        }
    }

    /// Get the coordinates in dimension `i` of the closest pair of points between two bounds.
    fn closest_coords(&self, other: &Self, i: usize) -> (V, V) {
        if self.hi[i] < other.lo[i] {
            (self.hi[i], other.lo[i])
        } else if other.hi[i] < self.lo[i] {
            (self.lo[i], other.hi[i])
        } else {
            // The extents overlap, so the gap is zero
            let x = if self.lo[i] > other.lo[i] {
                self.lo[i]
            } else {
                other.lo[i]
            };
            (x, x)
        }
    }

    /// Get the coordinates in dimension `i` of the furthest pair of points between two bounds.
    fn furthest_coords(&self, other: &Self, i: usize) -> (V, V) {
        if other.hi[i] - self.lo[i] > self.hi[i] - other.lo[i] {
            (self.lo[i], other.hi[i])
        } else {
            (self.hi[i], other.lo[i])
        }
    }

    /// Find the point in this bound closest to the given one.
    pub fn closest_point(&self, point: &[V]) -> Vec<V> {
        point
            .iter()
            .enumerate()
            .map(|(i, &x)| self.closest_coord(i, x))
            .collect()
    }

    /// Find the corner of this bound furthest from the given point.
    pub fn furthest_point(&self, point: &[V]) -> Vec<V> {
        point
            .iter()
            .enumerate()
            .map(|(i, &x)| self.furthest_coord(i, x))
            .collect()
    }

    /// Find the closest pair of points between this bound and another one.
    pub fn closest_pair(&self, other: &Self) -> (Vec<V>, Vec<V>) {
        debug_assert!(self.dims() == other.dims());
        (0..self.dims()).map(|i| self.closest_coords(other, i)).unzip()
    }

    /// Find the furthest pair of points between this bound and another one.
    pub fn furthest_pair(&self, other: &Self) -> (Vec<V>, Vec<V>) {
        debug_assert!(self.dims() == other.dims());
        (0..self.dims()).map(|i| self.furthest_coords(other, i)).unzip()
    }

    /// Get the smallest possible distance from a point to anything in this bound.
    pub fn min_distance_to_point<M: Metric<V>>(&self, metric: &M, point: &[V]) -> V {
        pair_distance(metric, self.dims(), |i| (point[i], self.closest_coord(i, point[i])))
    }

    /// Get the largest possible distance from a point to anything in this bound.
    pub fn max_distance_to_point<M: Metric<V>>(&self, metric: &M, point: &[V]) -> V {
        pair_distance(metric, self.dims(), |i| (point[i], self.furthest_coord(i, point[i])))
    }

    /// Get the smallest possible distance between points in this bound and another one.
    pub fn min_distance<M: Metric<V>>(&self, metric: &M, other: &Self) -> V {
        debug_assert!(self.dims() == other.dims());
        pair_distance(metric, self.dims(), |i| self.closest_coords(other, i))
    }

    /// Get the largest possible distance between points in this bound and another one.
    pub fn max_distance<M: Metric<V>>(&self, metric: &M, other: &Self) -> V {
        debug_assert!(self.dims() == other.dims());
        pair_distance(metric, self.dims(), |i| self.furthest_coords(other, i))
    }
}

/// Points with at most this many dimensions are assembled on the stack.
const INLINE_DIMS: usize = 16;

/// Assemble a pair of points one dimension at a time, and measure the distance between them.
fn pair_distance<V, M, F>(metric: &M, dims: usize, mut coords: F) -> V
where
    V: Value,
    M: Metric<V>,
    F: FnMut(usize) -> (V, V),
{
    if dims <= INLINE_DIMS {
        let mut a = [V::zero(); INLINE_DIMS];
        let mut b = [V::zero(); INLINE_DIMS];
        for i in 0..dims {
            (a[i], b[i]) = coords(i);
        }
        metric.distance(&a[..dims], &b[..dims])
    } else {
        let (a, b): (Vec<V>, Vec<V>) = (0..dims).map(coords).unzip();
        metric.distance(&a, &b)
    }
}
