//! Exact k-nearest and k-furthest [neighbor search] with single- and dual-tree algorithms.
//!
//! A [NeighborSearch] finds, for every point in a query set, the `k` points of a reference set that
//! rank best under a [SortPolicy].  It can compare every pair of points, walk a [SpaceTree] over
//! the reference points once per query, or walk query and reference trees together, pruning
//! pairs of subtrees whose bounding boxes prove they can't contain a better neighbor.  All three
//! give the same answers.
//!
//!     use dualtree::{Euclidean, NeighborSearch, PointSet, SearchOptions};
//!
//!     let points = PointSet::from_points([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [5.0, 5.0]])?;
//!     let search: NeighborSearch<_> = NeighborSearch::new(points, SearchOptions::default(), Euclidean)?;
//!
//!     let neighbors = search.search(1)?;
//!     assert_eq!(neighbors.distances_of(0), &[1.0]);
//!     assert_eq!(neighbors.neighbors(1), &[0]);
//!     # Ok::<(), dualtree::Error>(())
//!
//! [neighbor search]: https://en.wikipedia.org/wiki/Nearest_neighbor_search

pub mod bound;
pub mod candidates;
pub mod chebyshev;
pub mod coords;
pub mod distance;
pub mod error;
pub mod euclid;
pub mod lp;
pub mod matrix;
pub mod permutation;
pub mod points;
pub mod search;
pub mod sort;
pub mod taxi;
pub mod tree;

mod util;

pub use bound::HRectBound;
pub use candidates::{Candidate, CandidateList};
pub use chebyshev::{chebyshev_distance, Chebyshev};
pub use coords::Coordinates;
pub use distance::{Metric, Value};
pub use error::{Error, Result};
pub use euclid::{
    euclidean_distance, squared_euclidean_distance, Euclidean, SquaredEuclidean, WeightedEuclidean,
};
pub use lp::{lp_distance, Lp};
pub use matrix::Matrix;
pub use permutation::Permutation;
pub use points::PointSet;
pub use search::{
    NeighborSearch, Neighbors, SearchMode, SearchOptions, SearchStats, TreeHandle,
    DEFAULT_LEAF_SIZE,
};
pub use sort::{FurthestNeighborSort, NearestNeighborSort, SortPolicy};
pub use taxi::{taxicab_distance, Taxicab};
pub use tree::{Node, NodeId, SpaceTree};
