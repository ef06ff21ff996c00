//! Error types.

use thiserror::Error;

/// Errors raised while building trees or configuring a search.
///
/// Every error is raised before any distance is evaluated, so a failed call never leaves partial
/// output behind.
#[derive(Clone, Debug, Eq, Error, PartialEq)]
#[non_exhaustive]
pub enum Error {
    /// A search for zero neighbors was requested.
    #[error("the number of neighbors must be at least 1")]
    ZeroNeighbors,

    /// More neighbors were requested than there are eligible reference points.
    #[error("requested {k} neighbors, but only {available} reference points are eligible")]
    TooManyNeighbors { k: usize, available: usize },

    /// The query and reference points live in different spaces.
    #[error("query points have {query} dimensions, but reference points have {reference}")]
    DimensionMismatch { reference: usize, query: usize },

    /// The metric is defined for a different number of dimensions than the points.
    #[error("the metric expects {metric} dimensions, but the points have {points}")]
    MetricDimensionMismatch { metric: usize, points: usize },

    /// An L<sup>p</sup> exponent is zero, negative, or not finite.
    #[error("the exponent of an Lp metric must be positive and finite")]
    InvalidExponent,

    /// A point doesn't have the same dimensionality as the ones before it.
    #[error("point {index} has {found} dimensions, expected {expected}")]
    RaggedPoint {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// A coordinate is NaN or infinite.
    #[error("coordinate {dim} of point {index} is not finite")]
    NonFinite { index: usize, dim: usize },

    /// A flat coordinate buffer doesn't hold a whole number of points.
    #[error("a buffer of {len} coordinates can't be split into points of {dims} dimensions")]
    TruncatedBuffer { len: usize, dims: usize },

    /// A tree was requested over no points.
    #[error("cannot build a tree over an empty point set")]
    EmptySet,

    /// A tree was requested with leaves that hold no points.
    #[error("the leaf size must be at least 1")]
    ZeroLeafSize,
}

/// Result type for fallible operations in this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = Error::TooManyNeighbors { k: 5, available: 3 };
        assert_eq!(
            err.to_string(),
            "requested 5 neighbors, but only 3 reference points are eligible",
        );

        let err = Error::DimensionMismatch { reference: 2, query: 3 };
        assert_eq!(
            err.to_string(),
            "query points have 3 dimensions, but reference points have 2",
        );

        let err = Error::MetricDimensionMismatch { metric: 4, points: 2 };
        assert_eq!(
            err.to_string(),
            "the metric expects 4 dimensions, but the points have 2",
        );
    }
}
