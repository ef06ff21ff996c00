//! Dense storage for sets of points.

use crate::coords::Coordinates;
use crate::distance::Value;
use crate::error::{Error, Result};

use std::ops::Index;

/// An ordered collection of points with a fixed dimensionality.
///
/// Coordinates are stored contiguously, one point after another.  Points are referred to by their
/// 0-based position in the set.  Every coordinate is finite.
#[derive(Clone, Debug, PartialEq)]
pub struct PointSet<V> {
    data: Vec<V>,
    dims: usize,
    len: usize,
}

impl<V: Value> PointSet<V> {
    /// Create an empty set of `dims`-dimensional points.
    pub fn new(dims: usize) -> Self {
        Self {
            data: Vec::new(),
            dims,
            len: 0,
        }
    }

    /// Collect a sequence of points.
    ///
    /// The dimensionality is taken from the first point.
    pub fn from_points<I>(points: I) -> Result<Self>
    where
        I: IntoIterator,
        I::Item: Coordinates<Value = V>,
    {
        let mut points = points.into_iter().peekable();
        let dims = points.peek().map_or(0, |p| p.dims());

        let mut set = Self::new(dims);
        for point in points {
            set.push(point)?;
        }
        Ok(set)
    }

    /// Wrap a flat buffer of coordinates, `dims` at a time.
    pub fn from_flat(data: Vec<V>, dims: usize) -> Result<Self> {
        let len = match dims {
            0 if data.is_empty() => 0,
            0 => return Err(Error::TruncatedBuffer { len: data.len(), dims }),
            _ if data.len() % dims != 0 => {
                return Err(Error::TruncatedBuffer { len: data.len(), dims });
            }
            _ => data.len() / dims,
        };

        for (i, coord) in data.iter().enumerate() {
            if !coord.is_finite() {
                return Err(Error::NonFinite {
                    index: i / dims,
                    dim: i % dims,
                });
            }
        }

        Ok(Self { data, dims, len })
    }

    /// Append a point to the set.
    pub fn push<T: Coordinates<Value = V>>(&mut self, point: T) -> Result<()> {
        if point.dims() != self.dims {
            return Err(Error::RaggedPoint {
                index: self.len,
                expected: self.dims,
                found: point.dims(),
            });
        }

        if let Some(dim) = point.non_finite_dim() {
            return Err(Error::NonFinite {
                index: self.len,
                dim,
            });
        }

        self.data.reserve(self.dims);
        for i in 0..self.dims {
            self.data.push(point.coord(i));
        }
        self.len += 1;
        Ok(())
    }

    /// Get the number of points.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if this set is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get the dimensionality of the points.
    pub fn dims(&self) -> usize {
        self.dims
    }

    /// Get the coordinates of the `i`th point.
    pub fn point(&self, i: usize) -> &[V] {
        &self.data[i * self.dims..(i + 1) * self.dims]
    }

    /// Iterate over the points in order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[V]> + '_ {
        (0..self.len).map(move |i| self.point(i))
    }

    /// Get the raw coordinate buffer.
    pub fn as_flat(&self) -> &[V] {
        &self.data
    }

    /// Create a copy of this set with its points rearranged, so that the `i`th point of the result
    /// is point `order[i]` of this set.
    pub(crate) fn permuted(&self, order: &[usize]) -> Self {
        debug_assert!(order.len() == self.len);

        let mut data = Vec::with_capacity(self.data.len());
        for &i in order {
            data.extend_from_slice(self.point(i));
        }

        Self {
            data,
            dims: self.dims,
            len: self.len,
        }
    }
}

impl<V: Value> Index<usize> for PointSet<V> {
    type Output = [V];

    fn index(&self, i: usize) -> &[V] {
        self.point(i)
    }
}
