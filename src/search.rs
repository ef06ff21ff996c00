//! The k-best neighbor search engine.

use crate::candidates::CandidateList;
use crate::distance::{Metric, Value};
use crate::error::{Error, Result};
use crate::euclid::Euclidean;
use crate::matrix::Matrix;
use crate::points::PointSet;
use crate::sort::{NearestNeighborSort, SortPolicy};
use crate::tree::{NodeId, SpaceTree};

use tracing::debug;

use std::marker::PhantomData;
use std::ops::Deref;

/// The default maximum number of points in a tree leaf.
pub const DEFAULT_LEAF_SIZE: usize = 20;

/// The algorithm used to answer a search.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SearchMode {
    /// Compare every query point against every reference point.
    Naive,
    /// Descend the reference tree once per query point.
    SingleTree,
    /// Descend the query and reference trees together.
    DualTree,
}

/// Options for configuring a [NeighborSearch].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SearchOptions {
    /// Use brute force search.  Overrides `single_mode`.
    pub naive: bool,
    /// Use single-tree instead of dual-tree search.
    pub single_mode: bool,
    /// The maximum number of points in a tree leaf.  Ignored for trees that are passed in.
    pub leaf_size: usize,
}

impl SearchOptions {
    /// Options for brute force search.
    pub fn naive() -> Self {
        Self {
            naive: true,
            ..Self::default()
        }
    }

    /// Options for single-tree search.
    pub fn single_tree() -> Self {
        Self {
            single_mode: true,
            ..Self::default()
        }
    }

    /// Options for dual-tree search.
    pub fn dual_tree() -> Self {
        Self::default()
    }

    /// Set the leaf size.
    pub fn with_leaf_size(self, leaf_size: usize) -> Self {
        Self { leaf_size, ..self }
    }

    /// Get the search algorithm these options select.
    pub fn mode(&self) -> SearchMode {
        if self.naive {
            SearchMode::Naive
        } else if self.single_mode {
            SearchMode::SingleTree
        } else {
            SearchMode::DualTree
        }
    }
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            naive: false,
            single_mode: false,
            leaf_size: DEFAULT_LEAF_SIZE,
        }
    }
}

/// A tree that is either owned by a [NeighborSearch] or borrowed from elsewhere.
///
/// Owned trees are dropped along with the search; borrowed ones are left alone.
#[derive(Debug)]
pub enum TreeHandle<'a, V> {
    Owned(SpaceTree<V>),
    Borrowed(&'a SpaceTree<V>),
}

impl<V> TreeHandle<'_, V> {
    /// Check whether this handle owns its tree.
    pub fn is_owned(&self) -> bool {
        matches!(self, Self::Owned(_))
    }
}

impl<V> Deref for TreeHandle<'_, V> {
    type Target = SpaceTree<V>;

    fn deref(&self) -> &SpaceTree<V> {
        match self {
            Self::Owned(tree) => tree,
            Self::Borrowed(tree) => tree,
        }
    }
}

impl<V> From<SpaceTree<V>> for TreeHandle<'_, V> {
    fn from(tree: SpaceTree<V>) -> Self {
        Self::Owned(tree)
    }
}

impl<'a, V> From<&'a SpaceTree<V>> for TreeHandle<'a, V> {
    fn from(tree: &'a SpaceTree<V>) -> Self {
        Self::Borrowed(tree)
    }
}

/// Counters describing the work done by a search.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct SearchStats {
    /// The number of (query, reference) point pairs skipped by pruning.
    pub prunes: usize,
    /// The number of exact distance evaluations.
    pub base_cases: usize,
}

/// The result of a [NeighborSearch].
///
/// Both matrices have `k` rows and one column per query point, indexed by the query's original
/// position.  Each column is sorted best-first.
#[derive(Clone, Debug, PartialEq)]
pub struct Neighbors<V> {
    indices: Matrix<usize>,
    distances: Matrix<V>,
    stats: SearchStats,
}

impl<V> Neighbors<V> {
    /// Get the number of neighbors found per query.
    pub fn k(&self) -> usize {
        self.indices.rows()
    }

    /// Get the number of query points.
    pub fn len(&self) -> usize {
        self.indices.cols()
    }

    /// Check if there were no query points.
    ///
    /// Searches reject empty query sets, so this is always `false` for a search result.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the reference indices of a query point's neighbors, best first.
    pub fn neighbors(&self, query: usize) -> &[usize] {
        self.indices.column(query)
    }

    /// Get the distances to a query point's neighbors, best first.
    pub fn distances_of(&self, query: usize) -> &[V] {
        self.distances.column(query)
    }

    /// Get the full neighbor index matrix.
    pub fn indices(&self) -> &Matrix<usize> {
        &self.indices
    }

    /// Get the full distance matrix.
    pub fn distances(&self) -> &Matrix<V> {
        &self.distances
    }

    /// Get the work counters for this search.
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// Split this result into its index and distance matrices.
    pub fn into_parts(self) -> (Matrix<usize>, Matrix<V>) {
        (self.indices, self.distances)
    }
}

/// Finds the `k` best reference points for every query point.
///
/// "Best" is defined by the [SortPolicy] `S`, e.g. [NearestNeighborSort] or
/// [FurthestNeighborSort](crate::sort::FurthestNeighborSort).  Results are exact, whichever
/// [SearchMode] is used.
///
/// If no query set is given, the reference set is searched against itself, and no point is ever
/// reported as its own neighbor.
///
/// Searches don't modify the trees: the per-node bounds used for pruning live only as long as one
/// call to [search](Self::search).
#[derive(Debug)]
pub struct NeighborSearch<'a, V, M = Euclidean, S = NearestNeighborSort> {
    reference: TreeHandle<'a, V>,
    query: Option<TreeHandle<'a, V>>,
    mode: SearchMode,
    metric: M,
    _sort: PhantomData<S>,
}

impl<V, M, S> NeighborSearch<'static, V, M, S>
where
    V: Value,
    M: Metric<V>,
    S: SortPolicy,
{
    /// Prepare to search a set of points against itself.
    pub fn new(reference: PointSet<V>, options: SearchOptions, metric: M) -> Result<Self> {
        check_points(&reference, None, &metric)?;

        let reference = Self::build_tree(reference, options, true)?;
        Self::from_handles(reference.into(), None, options, metric)
    }

    /// Prepare to search a set of query points against a set of reference points.
    pub fn with_queries(
        reference: PointSet<V>,
        query: PointSet<V>,
        options: SearchOptions,
        metric: M,
    ) -> Result<Self> {
        check_points(&reference, Some(&query), &metric)?;

        let reference = Self::build_tree(reference, options, true)?;
        let query = Self::build_tree(query, options, false)?;
        Self::from_handles(reference.into(), Some(query.into()), options, metric)
    }

    /// Build the tree a search mode needs.
    fn build_tree(
        points: PointSet<V>,
        options: SearchOptions,
        reference: bool,
    ) -> Result<SpaceTree<V>> {
        match options.mode() {
            SearchMode::Naive => SpaceTree::single_node(points),
            // Single-tree search only walks the reference tree
            SearchMode::SingleTree if !reference => SpaceTree::single_node(points),
            _ => SpaceTree::build(points, options.leaf_size),
        }
    }
}

impl<'a, V, M, S> NeighborSearch<'a, V, M, S>
where
    V: Value,
    M: Metric<V>,
    S: SortPolicy,
{
    /// Prepare to search the points in a tree against themselves.
    pub fn from_tree(reference: &'a SpaceTree<V>, options: SearchOptions, metric: M) -> Result<Self> {
        Self::from_handles(reference.into(), None, options, metric)
    }

    /// Prepare to search the points in one tree against those in another.
    pub fn from_trees(
        reference: &'a SpaceTree<V>,
        query: &'a SpaceTree<V>,
        options: SearchOptions,
        metric: M,
    ) -> Result<Self> {
        Self::from_handles(reference.into(), Some(query.into()), options, metric)
    }

    /// Prepare a search over owned or borrowed trees.
    ///
    /// The trees are used as-is, whatever the search mode; naive search works with any tree shape.
    pub fn from_handles(
        reference: TreeHandle<'a, V>,
        query: Option<TreeHandle<'a, V>>,
        options: SearchOptions,
        metric: M,
    ) -> Result<Self> {
        if let Some(query) = &query {
            check_dims(reference.dims(), query.dims())?;
        }
        check_metric(&metric, reference.dims())?;

        let mode = options.mode();
        debug!(
            ?mode,
            references = reference.len(),
            queries = query.as_ref().map_or(reference.len(), |q| q.len()),
            same_set = query.is_none(),
            owned = reference.is_owned(),
            "Prepared neighbor search"
        );

        Ok(Self {
            reference,
            query,
            mode,
            metric,
            _sort: PhantomData,
        })
    }

    /// Get the search algorithm in use.
    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Get the metric in use.
    pub fn metric(&self) -> &M {
        &self.metric
    }

    /// Get the reference tree.
    pub fn reference_tree(&self) -> &TreeHandle<'a, V> {
        &self.reference
    }

    /// Get the query tree, unless the reference set is searched against itself.
    pub fn query_tree(&self) -> Option<&TreeHandle<'a, V>> {
        self.query.as_ref()
    }

    /// Check whether the reference set is searched against itself.
    pub fn is_same_set(&self) -> bool {
        self.query.is_none()
    }

    /// Find the `k` best neighbors of every query point.
    ///
    /// `k` must be between 1 and the number of reference points (minus one, when searching a set
    /// against itself).
    pub fn search(&self, k: usize) -> Result<Neighbors<V>> {
        let reference: &SpaceTree<V> = &self.reference;
        let (query, same_set) = match &self.query {
            Some(query) => (&**query, false),
            None => (reference, true),
        };

        let available = reference.len() - usize::from(same_set);
        if k == 0 {
            return Err(Error::ZeroNeighbors);
        } else if k > available {
            return Err(Error::TooManyNeighbors { k, available });
        }

        debug!(k, mode = ?self.mode, queries = query.len(), "Starting neighbor search");

        let mut traversal = Traversal::<V, M, S>::new(reference, query, same_set, &self.metric, k);
        match self.mode {
            SearchMode::Naive => traversal.naive(),
            SearchMode::SingleTree => traversal.single_tree(),
            SearchMode::DualTree => traversal.dual_tree(),
        }
        let neighbors = traversal.finish();

        debug!(
            prunes = neighbors.stats.prunes,
            base_cases = neighbors.stats.base_cases,
            "Finished neighbor search"
        );

        Ok(neighbors)
    }
}

/// Validate the inputs of a search before any trees are built.
fn check_points<V: Value, M: Metric<V>>(
    reference: &PointSet<V>,
    query: Option<&PointSet<V>>,
    metric: &M,
) -> Result<()> {
    if reference.is_empty() || query.is_some_and(|q| q.is_empty()) {
        return Err(Error::EmptySet);
    }

    if let Some(query) = query {
        check_dims(reference.dims(), query.dims())?;
    }
    check_metric(metric, reference.dims())
}

/// Check that a metric accepts points of the given dimensionality.
fn check_metric<V: Value, M: Metric<V>>(metric: &M, points: usize) -> Result<()> {
    match metric.dims() {
        Some(dims) if dims != points => Err(Error::MetricDimensionMismatch {
            metric: dims,
            points,
        }),
        _ => Ok(()),
    }
}

/// Check that query and reference points have the same dimensionality.
fn check_dims(reference: usize, query: usize) -> Result<()> {
    if reference == query {
        Ok(())
    } else {
        Err(Error::DimensionMismatch { reference, query })
    }
}

/// The state of a single search.
///
/// Candidate lists are indexed by position in the query tree, and `bounds` by query node.  A
/// node's bound is the worst k-th best distance of any query point beneath it, so any reference
/// node that can't beat it can be skipped for the whole query node.
struct Traversal<'t, V, M, S> {
    reference: &'t SpaceTree<V>,
    query: &'t SpaceTree<V>,
    same_set: bool,
    metric: &'t M,
    k: usize,
    lists: Vec<CandidateList<S, V>>,
    bounds: Vec<V>,
    stats: SearchStats,
}

impl<'t, V, M, S> Traversal<'t, V, M, S>
where
    V: Value,
    M: Metric<V>,
    S: SortPolicy,
{
    fn new(
        reference: &'t SpaceTree<V>,
        query: &'t SpaceTree<V>,
        same_set: bool,
        metric: &'t M,
        k: usize,
    ) -> Self {
        Self {
            reference,
            query,
            same_set,
            metric,
            k,
            lists: (0..query.len()).map(|_| CandidateList::new(k)).collect(),
            bounds: vec![S::worst_distance(); query.node_count()],
            stats: SearchStats::default(),
        }
    }

    /// Compute the true distance between two points, and offer it to the query's candidates.
    fn evaluate(&mut self, q: usize, r: usize) {
        if self.same_set && q == r {
            return;
        }

        let (query, reference) = (self.query, self.reference);
        let distance = self
            .metric
            .distance(query.points().point(q), reference.points().point(r));
        self.stats.base_cases += 1;
        self.lists[q].insert(r, distance);
    }

    /// Brute force search.
    fn naive(&mut self) {
        for q in 0..self.query.len() {
            for r in 0..self.reference.len() {
                self.evaluate(q, r);
            }
        }
    }

    /// Single-tree search, one query point at a time.
    fn single_tree(&mut self) {
        let (query, reference) = (self.query, self.reference);
        let root = reference.root();

        for q in 0..query.len() {
            let point = query.points().point(q);
            let bound = S::best_point_to_node(self.metric, point, reference.node(root).bound());
            self.single_recursion(q, root, bound);
        }
    }

    fn single_recursion(&mut self, q: usize, r: NodeId, bound: V) {
        let (query, reference) = (self.query, self.reference);
        let node = reference.node(r);

        let list = &self.lists[q];
        if list.is_full() && !S::is_better(bound, list.worst_distance()) {
            self.stats.prunes += node.count();
            return;
        }

        match node.children() {
            None => {
                for i in node.range() {
                    self.evaluate(q, i);
                }
            }
            Some([left, right]) => {
                let point = query.points().point(q);
                let left_bound = S::best_point_to_node(self.metric, point, reference.node(left).bound());
                let right_bound = S::best_point_to_node(self.metric, point, reference.node(right).bound());

                if S::is_better(right_bound, left_bound) {
                    self.single_recursion(q, right, right_bound);
                    self.single_recursion(q, left, left_bound);
                } else {
                    self.single_recursion(q, left, left_bound);
                    self.single_recursion(q, right, right_bound);
                }
            }
        }
    }

    /// Dual-tree search.
    fn dual_tree(&mut self) {
        let (q, r) = (self.query.root(), self.reference.root());
        let bound = self.node_to_node(q, r);
        self.dual_recursion(q, r, bound);
    }

    fn dual_recursion(&mut self, q: NodeId, r: NodeId, lower_bound: V) {
        let (query, reference) = (self.query, self.reference);
        let (query_node, reference_node) = (query.node(q), reference.node(r));

        if !S::is_better(lower_bound, self.bounds[q]) {
            self.stats.prunes += query_node.count() * reference_node.count();
            return;
        }

        match (query_node.children(), reference_node.children()) {
            (None, None) => self.base_case(q, r),
            (None, Some(children)) => self.visit_references(q, children),
            (Some([left, right]), None) => {
                let bound = self.node_to_node(left, r);
                self.dual_recursion(left, r, bound);
                let bound = self.node_to_node(right, r);
                self.dual_recursion(right, r, bound);
                self.update_bound(q, left, right);
            }
            (Some([left, right]), Some(children)) => {
                self.visit_references(left, children);
                self.visit_references(right, children);
                self.update_bound(q, left, right);
            }
        }
    }

    /// Recurse into both children of a reference node, the more promising one first.
    fn visit_references(&mut self, q: NodeId, [left, right]: [NodeId; 2]) {
        let left_bound = self.node_to_node(q, left);
        let right_bound = self.node_to_node(q, right);

        if S::is_better(right_bound, left_bound) {
            self.dual_recursion(q, right, right_bound);
            self.dual_recursion(q, left, left_bound);
        } else {
            self.dual_recursion(q, left, left_bound);
            self.dual_recursion(q, right, right_bound);
        }
    }

    /// Compare every point in a query leaf to every point in a reference leaf.
    fn base_case(&mut self, q: NodeId, r: NodeId) {
        let (query, reference) = (self.query, self.reference);

        let mut worst = S::best_distance();
        for i in query.node(q).range() {
            for j in reference.node(r).range() {
                self.evaluate(i, j);
            }
            worst = S::combine_worst(worst, self.lists[i].worst_distance());
        }

        // Candidate lists only improve, so this never loosens the bound
        self.bounds[q] = worst;
    }

    /// A query node's bound has to cover both of its children.
    fn update_bound(&mut self, q: NodeId, left: NodeId, right: NodeId) {
        self.bounds[q] = S::combine_worst(self.bounds[left], self.bounds[right]);
    }

    fn node_to_node(&self, q: NodeId, r: NodeId) -> V {
        S::best_node_to_node(
            self.metric,
            self.query.node(q).bound(),
            self.reference.node(r).bound(),
        )
    }

    /// Translate the candidate lists back to original indices.
    fn finish(self) -> Neighbors<V> {
        let n = self.query.len();
        let mut indices = Matrix::filled(self.k, n, 0);
        let mut distances = Matrix::filled(self.k, n, V::zero());

        let queries = self.query.permutation();
        let references = self.reference.permutation();

        for (q, list) in self.lists.iter().enumerate() {
            debug_assert!(list.is_full());

            let col = queries.to_old(q);
            for (rank, candidate) in list.iter().enumerate() {
                indices[(rank, col)] = references.to_old(candidate.index);
                distances[(rank, col)] = candidate.distance;
            }
        }

        Neighbors {
            indices,
            distances,
            stats: self.stats,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::chebyshev::Chebyshev;
    use crate::euclid::{SquaredEuclidean, WeightedEuclidean};
    use crate::lp::Lp;
    use crate::sort::FurthestNeighborSort;
    use crate::taxi::Taxicab;
    use crate::tests::{brute_force, grid_points, random_points};

    const LEAF_SIZES: [usize; 4] = [1, 5, 20, 50];

    fn all_options() -> Vec<SearchOptions> {
        let mut options = vec![SearchOptions::naive()];
        for leaf_size in LEAF_SIZES {
            options.push(SearchOptions::single_tree().with_leaf_size(leaf_size));
            options.push(SearchOptions::dual_tree().with_leaf_size(leaf_size));
        }
        options
    }

    /// Check a result against brute force.  Random points have no ties, so the order is exact.
    fn check_exact<M, S>(
        neighbors: &Neighbors<f64>,
        metric: &M,
        reference: &PointSet<f64>,
        query: Option<&PointSet<f64>>,
        k: usize,
    ) where
        M: Metric<f64>,
        S: SortPolicy,
    {
        let expected = brute_force::<_, S>(metric, reference, query, k);
        assert_eq!(neighbors.len(), expected.len());
        assert_eq!(neighbors.k(), k);

        for (q, expected) in expected.iter().enumerate() {
            let indices: Vec<_> = expected.iter().map(|&(i, _)| i).collect();
            let distances: Vec<_> = expected.iter().map(|&(_, d)| d).collect();
            assert_eq!(neighbors.neighbors(q), indices, "query {}", q);
            assert_eq!(neighbors.distances_of(q), distances, "query {}", q);
        }
    }

    fn check_same_set<M, S>(metric: M, seed: u64)
    where
        M: Metric<f64> + Clone,
        S: SortPolicy,
    {
        let points = random_points(300, 3, seed);

        for options in all_options() {
            let search =
                NeighborSearch::<_, _, S>::new(points.clone(), options, metric.clone()).unwrap();
            for k in [1, 7] {
                let neighbors = search.search(k).unwrap();
                check_exact::<_, S>(&neighbors, &metric, &points, None, k);
            }
        }
    }

    fn check_separate_sets<M, S>(metric: M, seed: u64)
    where
        M: Metric<f64> + Clone,
        S: SortPolicy,
    {
        let reference = random_points(250, 2, seed);
        let query = random_points(120, 2, seed + 1000);

        for options in all_options() {
            let search = NeighborSearch::<_, _, S>::with_queries(
                reference.clone(),
                query.clone(),
                options,
                metric.clone(),
            )
            .unwrap();

            for k in [1, 10] {
                let neighbors = search.search(k).unwrap();
                check_exact::<_, S>(&neighbors, &metric, &reference, Some(&query), k);
            }
        }
    }

    #[test]
    fn test_nearest_same_set() {
        check_same_set::<_, NearestNeighborSort>(Euclidean, 1);
    }

    #[test]
    fn test_furthest_same_set() {
        check_same_set::<_, FurthestNeighborSort>(Euclidean, 2);
    }

    #[test]
    fn test_nearest_separate_sets() {
        check_separate_sets::<_, NearestNeighborSort>(Euclidean, 3);
    }

    #[test]
    fn test_furthest_separate_sets() {
        check_separate_sets::<_, FurthestNeighborSort>(Euclidean, 4);
    }

    #[test]
    fn test_other_metrics() {
        check_same_set::<_, NearestNeighborSort>(SquaredEuclidean, 5);
        check_same_set::<_, NearestNeighborSort>(Taxicab, 6);
        check_separate_sets::<_, FurthestNeighborSort>(Chebyshev, 7);
        check_separate_sets::<_, NearestNeighborSort>(Lp::new(3.0).unwrap(), 8);
        check_separate_sets::<_, NearestNeighborSort>(WeightedEuclidean::new([0.5, 2.0]), 9);
    }

    /// Check every mode over points with many ties and duplicates.
    ///
    /// Equal distances may be reported in any order, so only the distance columns have to match.
    fn check_ties<S: SortPolicy>(reference: &PointSet<f64>, query: Option<&PointSet<f64>>, k: usize) {
        let expected = brute_force::<_, S>(&Euclidean, reference, query, k);

        for options in all_options() {
            let search = match query {
                Some(query) => NeighborSearch::<_, _, S>::with_queries(
                    reference.clone(),
                    query.clone(),
                    options,
                    Euclidean,
                ),
                None => NeighborSearch::<_, _, S>::new(reference.clone(), options, Euclidean),
            }
            .unwrap();
            let neighbors = search.search(k).unwrap();

            for (q, expected) in expected.iter().enumerate() {
                let distances: Vec<_> = expected.iter().map(|&(_, d)| d).collect();
                assert_eq!(neighbors.distances_of(q), distances, "{:?}, query {}", options, q);

                let mut indices = neighbors.neighbors(q).to_vec();
                indices.sort_unstable();
                indices.dedup();
                assert_eq!(indices.len(), k, "{:?}, query {}", options, q);

                if query.is_none() {
                    assert!(!neighbors.neighbors(q).contains(&q));
                }

                let point = query.unwrap_or(reference).point(q);
                for (&r, &d) in neighbors.neighbors(q).iter().zip(neighbors.distances_of(q)) {
                    assert_eq!(Euclidean.distance(point, reference.point(r)), d);
                }
            }
        }
    }

    #[test]
    fn test_ties() {
        for seed in 0..4 {
            let dims = 1 + (seed as usize) % 3;
            let reference = grid_points(60, dims, seed);
            let query = grid_points(25, dims, seed + 100);

            for k in [1, 2, 31, 59] {
                check_ties::<NearestNeighborSort>(&reference, None, k);
                check_ties::<FurthestNeighborSort>(&reference, None, k);
            }
            for k in [1, 5, 60] {
                check_ties::<NearestNeighborSort>(&reference, Some(&query), k);
                check_ties::<FurthestNeighborSort>(&reference, Some(&query), k);
            }
        }
    }

    #[test]
    fn test_never_self() {
        let points = random_points(200, 2, 10);

        for options in all_options() {
            let search: NeighborSearch<_> =
                NeighborSearch::new(points.clone(), options, Euclidean).unwrap();
            let neighbors = search.search(5).unwrap();

            for q in 0..neighbors.len() {
                assert!(!neighbors.neighbors(q).contains(&q));
                assert!(neighbors.distances_of(q).iter().all(|&d| d > 0.0));
            }
        }
    }

    #[test]
    fn test_all_neighbors() {
        let points = random_points(60, 2, 11);

        for options in all_options() {
            let search: NeighborSearch<_> =
                NeighborSearch::new(points.clone(), options, Euclidean).unwrap();
            let neighbors = search.search(59).unwrap();

            for q in 0..neighbors.len() {
                let mut found = neighbors.neighbors(q).to_vec();
                found.sort_unstable();
                let expected: Vec<_> = (0..60).filter(|&i| i != q).collect();
                assert_eq!(found, expected);

                let distances = neighbors.distances_of(q);
                assert!(distances.windows(2).all(|pair| pair[0] <= pair[1]));
            }
        }
    }

    #[test]
    fn test_small_scenario() {
        let points = PointSet::from_points([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [5.0, 5.0]]).unwrap();

        let mut options = all_options();
        options.push(SearchOptions::dual_tree().with_leaf_size(2));
        options.push(SearchOptions::single_tree().with_leaf_size(2));

        for options in options {
            let search: NeighborSearch<_> =
                NeighborSearch::new(points.clone(), options, Euclidean).unwrap();
            let neighbors = search.search(2).unwrap();

            let mut found = neighbors.neighbors(0).to_vec();
            found.sort_unstable();
            assert_eq!(found, vec![1, 2]);
            assert_eq!(neighbors.distances_of(0), &[1.0, 1.0]);

            assert_eq!(neighbors.neighbors(3).len(), 2);
            assert!(!neighbors.neighbors(3).contains(&3));
        }
    }

    #[test]
    fn test_naive_tie_order() {
        let points = PointSet::from_points([[0.0, 0.0], [1.0, 0.0], [0.0, 1.0], [5.0, 5.0]]).unwrap();
        let search: NeighborSearch<_> =
            NeighborSearch::new(points, SearchOptions::naive(), Euclidean).unwrap();

        // Ties keep the order in which candidates arrived
        let neighbors = search.search(2).unwrap();
        assert_eq!(neighbors.neighbors(0), &[1, 2]);
        assert_eq!(neighbors.neighbors(3), &[1, 2]);
    }

    #[test]
    fn test_invalid_k() {
        let points = random_points(10, 2, 12);
        let search: NeighborSearch<_> =
            NeighborSearch::new(points.clone(), SearchOptions::default(), Euclidean).unwrap();

        assert_eq!(search.search(0), Err(Error::ZeroNeighbors));
        assert_eq!(search.search(10), Err(Error::TooManyNeighbors { k: 10, available: 9 }));
        assert!(search.search(9).is_ok());

        let query = random_points(3, 2, 13);
        let search: NeighborSearch<_> =
            NeighborSearch::with_queries(points, query, SearchOptions::default(), Euclidean)
                .unwrap();
        assert!(search.search(10).is_ok());
        assert_eq!(search.search(11), Err(Error::TooManyNeighbors { k: 11, available: 10 }));
    }

    /// A metric that fails the test if it's ever evaluated.
    #[derive(Clone, Copy, Debug)]
    struct Untouchable;

    impl Metric<f64> for Untouchable {
        fn distance(&self, _: &[f64], _: &[f64]) -> f64 {
            panic!("distance evaluated");
        }
    }

    #[test]
    fn test_dimension_mismatch() {
        let reference = random_points(10, 2, 14);
        let query = random_points(10, 3, 15);

        let result = NeighborSearch::<_, _>::with_queries(
            reference.clone(),
            query.clone(),
            SearchOptions::default(),
            Untouchable,
        );
        assert_eq!(
            result.unwrap_err(),
            Error::DimensionMismatch { reference: 2, query: 3 },
        );

        let reference = SpaceTree::build(reference, 4).unwrap();
        let query = SpaceTree::build(query, 4).unwrap();
        let result = NeighborSearch::<_, _>::from_trees(
            &reference,
            &query,
            SearchOptions::default(),
            Untouchable,
        );
        assert_eq!(
            result.unwrap_err(),
            Error::DimensionMismatch { reference: 2, query: 3 },
        );
    }

    #[test]
    fn test_metric_dimensions() {
        let points = random_points(20, 3, 24);
        let metric = WeightedEuclidean::new([1.0, 2.0]);
        let expected = Error::MetricDimensionMismatch { metric: 2, points: 3 };

        let result =
            NeighborSearch::<_, _>::new(points.clone(), SearchOptions::default(), metric.clone());
        assert_eq!(result.unwrap_err(), expected);

        let tree = SpaceTree::build(points, 5).unwrap();
        let result = NeighborSearch::<_, _>::from_tree(&tree, SearchOptions::naive(), metric);
        assert_eq!(result.unwrap_err(), expected);

        let metric = WeightedEuclidean::new([1.0, 2.0, 0.5]);
        let search = NeighborSearch::<_, _>::from_tree(&tree, SearchOptions::default(), metric);
        assert!(search.unwrap().search(3).is_ok());
    }

    #[test]
    fn test_empty_sets() {
        let points = random_points(10, 2, 25);
        let empty = PointSet::<f64>::from_points(Vec::<[f64; 2]>::new()).unwrap();

        let result = NeighborSearch::<_, _>::with_queries(
            points.clone(),
            empty.clone(),
            SearchOptions::default(),
            Euclidean,
        );
        assert_eq!(result.unwrap_err(), Error::EmptySet);

        let result =
            NeighborSearch::<_, _>::with_queries(empty, points, SearchOptions::naive(), Euclidean);
        assert_eq!(result.unwrap_err(), Error::EmptySet);
    }

    #[test]
    fn test_borrowed_trees() {
        let reference = random_points(200, 3, 16);
        let query = random_points(50, 3, 17);
        let reference_tree = SpaceTree::build(reference.clone(), 8).unwrap();
        let query_tree = SpaceTree::build(query.clone(), 3).unwrap();

        for options in all_options() {
            let search: NeighborSearch<_> =
                NeighborSearch::from_trees(&reference_tree, &query_tree, options, Euclidean)
                    .unwrap();
            assert!(!search.reference_tree().is_owned());
            assert!(!search.is_same_set());

            let neighbors = search.search(4).unwrap();
            check_exact::<_, NearestNeighborSort>(&neighbors, &Euclidean, &reference, Some(&query), 4);

            let search: NeighborSearch<_> =
                NeighborSearch::from_tree(&reference_tree, options, Euclidean).unwrap();
            assert!(search.is_same_set());

            let neighbors = search.search(4).unwrap();
            check_exact::<_, NearestNeighborSort>(&neighbors, &Euclidean, &reference, None, 4);
        }
    }

    #[test]
    fn test_mixed_handles() {
        let reference = random_points(100, 2, 18);
        let query = random_points(30, 2, 19);
        let reference_tree = SpaceTree::build(reference.clone(), 10).unwrap();
        let query_tree = SpaceTree::build(query.clone(), 10).unwrap();

        let search: NeighborSearch<_> = NeighborSearch::from_handles(
            TreeHandle::Borrowed(&reference_tree),
            Some(TreeHandle::Owned(query_tree)),
            SearchOptions::default(),
            Euclidean,
        )
        .unwrap();
        assert!(!search.reference_tree().is_owned());
        assert!(search.query_tree().unwrap().is_owned());

        let neighbors = search.search(3).unwrap();
        check_exact::<_, NearestNeighborSort>(&neighbors, &Euclidean, &reference, Some(&query), 3);
    }

    #[test]
    fn test_repeated_searches() {
        let points = random_points(400, 2, 20);
        let search: NeighborSearch<_> =
            NeighborSearch::new(points, SearchOptions::default(), Euclidean).unwrap();

        let first = search.search(3).unwrap();
        let _ = search.search(12).unwrap();
        let again = search.search(3).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_stats() {
        let points = random_points(1000, 2, 21);

        let naive: NeighborSearch<_> =
            NeighborSearch::new(points.clone(), SearchOptions::naive(), Euclidean).unwrap();
        let stats = naive.search(1).unwrap().stats();
        assert_eq!(stats.base_cases, 1000 * 999);
        assert_eq!(stats.prunes, 0);

        for options in [SearchOptions::single_tree(), SearchOptions::dual_tree()] {
            let search: NeighborSearch<_> =
                NeighborSearch::new(points.clone(), options, Euclidean).unwrap();
            let stats = search.search(1).unwrap().stats();
            assert!(stats.prunes > 0);
            assert!(stats.base_cases < 1000 * 999);
        }
    }

    #[test]
    fn test_modes() {
        assert_eq!(SearchOptions::default().mode(), SearchMode::DualTree);
        assert_eq!(SearchOptions::single_tree().mode(), SearchMode::SingleTree);
        assert_eq!(SearchOptions::naive().mode(), SearchMode::Naive);

        let both = SearchOptions {
            naive: true,
            single_mode: true,
            leaf_size: 5,
        };
        assert_eq!(both.mode(), SearchMode::Naive);
    }

    #[test]
    fn test_owned_trees() {
        let points = random_points(100, 2, 22);

        let naive: NeighborSearch<_> =
            NeighborSearch::with_queries(points.clone(), points.clone(), SearchOptions::naive(), Euclidean)
                .unwrap();
        assert!(naive.reference_tree().is_owned());
        assert_eq!(naive.reference_tree().node_count(), 1);

        let single: NeighborSearch<_> = NeighborSearch::with_queries(
            points.clone(),
            points.clone(),
            SearchOptions::single_tree().with_leaf_size(5),
            Euclidean,
        )
        .unwrap();
        assert!(single.reference_tree().node_count() > 1);
        assert_eq!(single.query_tree().unwrap().node_count(), 1);

        let dual: NeighborSearch<_> = NeighborSearch::with_queries(
            points.clone(),
            points,
            SearchOptions::dual_tree().with_leaf_size(5),
            Euclidean,
        )
        .unwrap();
        assert!(dual.query_tree().unwrap().node_count() > 1);

        assert_eq!(
            NeighborSearch::<f64>::new(PointSet::new(2), SearchOptions::default(), Euclidean).unwrap_err(),
            Error::EmptySet,
        );
        assert_eq!(
            NeighborSearch::<f64>::new(
                random_points(10, 2, 23),
                SearchOptions::default().with_leaf_size(0),
                Euclidean,
            )
            .unwrap_err(),
            Error::ZeroLeafSize,
        );
    }

    #[test]
    fn test_f32() {
        let points: Vec<[f32; 2]> = (0..50)
            .map(|i| {
                let t = i as f32 * 0.37;
                [t.cos() * t, t.sin() * t]
            })
            .collect();
        let points = PointSet::from_points(points).unwrap();

        let naive: NeighborSearch<f32> =
            NeighborSearch::new(points.clone(), SearchOptions::naive(), Euclidean).unwrap();
        let dual: NeighborSearch<f32> =
            NeighborSearch::new(points, SearchOptions::dual_tree().with_leaf_size(4), Euclidean)
                .unwrap();

        let expected = naive.search(3).unwrap();
        let actual = dual.search(3).unwrap();
        assert_eq!(actual.distances(), expected.distances());
    }
}
