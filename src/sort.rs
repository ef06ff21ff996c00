//! Ranking policies, which define what makes one neighbor better than another.

use crate::bound::HRectBound;
use crate::distance::{Metric, Value};

/// A rule for ranking candidate neighbors.
///
/// Every pruning and insertion decision made during a search goes through this trait, so the same
/// algorithms find nearest neighbors, furthest neighbors, or anything else that can be expressed
/// as a strict order on distances plus optimistic distance bounds.
pub trait SortPolicy {
    /// Check whether `value` is strictly better than `reference`.
    fn is_better<V: Value>(value: V, reference: V) -> bool;

    /// A distance that every other distance is better than.
    fn worst_distance<V: Value>() -> V;

    /// A distance that is better than every other distance.
    fn best_distance<V: Value>() -> V;

    /// The best distance achievable between any point in one bound and any point in another.
    ///
    /// No pair of points can do better than this.
    fn best_node_to_node<V: Value, M: Metric<V>>(
        metric: &M,
        a: &HRectBound<V>,
        b: &HRectBound<V>,
    ) -> V;

    /// The best distance achievable between a point and any point in a bound.
    fn best_point_to_node<V: Value, M: Metric<V>>(
        metric: &M,
        point: &[V],
        bound: &HRectBound<V>,
    ) -> V;

    /// Get the worse of two distances.
    ///
    /// This is how a node's bound is derived from its children's: it has to hold for every point
    /// beneath it.
    fn combine_worst<V: Value>(a: V, b: V) -> V {
        if Self::is_better(a, b) {
            b
        } else {
            a
        }
    }
}

/// Ranks smaller distances first.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct NearestNeighborSort;

impl SortPolicy for NearestNeighborSort {
    fn is_better<V: Value>(value: V, reference: V) -> bool {
        value < reference
    }

    fn worst_distance<V: Value>() -> V {
        V::infinity()
    }

    fn best_distance<V: Value>() -> V {
        V::neg_infinity()
    }

    fn best_node_to_node<V: Value, M: Metric<V>>(
        metric: &M,
        a: &HRectBound<V>,
        b: &HRectBound<V>,
    ) -> V {
        a.min_distance(metric, b)
    }

    fn best_point_to_node<V: Value, M: Metric<V>>(
        metric: &M,
        point: &[V],
        bound: &HRectBound<V>,
    ) -> V {
        bound.min_distance_to_point(metric, point)
    }
}

/// Ranks larger distances first.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FurthestNeighborSort;

impl SortPolicy for FurthestNeighborSort {
    fn is_better<V: Value>(value: V, reference: V) -> bool {
        value > reference
    }

    fn worst_distance<V: Value>() -> V {
        V::neg_infinity()
    }

    fn best_distance<V: Value>() -> V {
        V::infinity()
    }

    fn best_node_to_node<V: Value, M: Metric<V>>(
        metric: &M,
        a: &HRectBound<V>,
        b: &HRectBound<V>,
    ) -> V {
        a.max_distance(metric, b)
    }

    fn best_point_to_node<V: Value, M: Metric<V>>(
        metric: &M,
        point: &[V],
        bound: &HRectBound<V>,
    ) -> V {
        bound.max_distance_to_point(metric, point)
    }
}
