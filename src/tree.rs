//! Binary space partitioning trees.

use crate::bound::HRectBound;
use crate::distance::Value;
use crate::error::{Error, Result};
use crate::permutation::Permutation;
use crate::points::PointSet;
use crate::util::Ordered;

use tracing::debug;

use std::ops::Range;

/// Identifies a node within a [SpaceTree].
pub type NodeId = usize;

/// A node in a [SpaceTree].
#[derive(Clone, Debug)]
pub struct Node<V> {
    /// The bounding box of every point under this node.
    bound: HRectBound<V>,
    /// The index of this node's first point.
    begin: usize,
    /// The number of points under this node.
    count: usize,
    /// The left and right subtrees, if this isn't a leaf.
    children: Option<[NodeId; 2]>,
}

impl<V: Value> Node<V> {
    /// Get the bounding box of this node.
    pub fn bound(&self) -> &HRectBound<V> {
        &self.bound
    }

    /// Get the range of point indices under this node.
    pub fn range(&self) -> Range<usize> {
        self.begin..self.begin + self.count
    }

    /// Get the number of points under this node.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Check if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// Get the children of this node, if any.
    pub fn children(&self) -> Option<[NodeId; 2]> {
        self.children
    }
}

/// A [k-d tree](https://en.wikipedia.org/wiki/K-d_tree)-like binary space partitioning tree.
///
/// Each internal node splits its points at the median of its widest dimension.  The tree owns a
/// copy of its points, rearranged so that every node covers a contiguous range of them, along with
/// the [Permutation] relating the two orders.  Nodes are stored flat, in pre-order, so the root is
/// always node 0.
///
/// Trees are immutable once built.
#[derive(Clone, Debug)]
pub struct SpaceTree<V> {
    points: PointSet<V>,
    nodes: Vec<Node<V>>,
    permutation: Permutation,
}

impl<V: Value> SpaceTree<V> {
    /// Build a tree whose leaves hold at most `leaf_size` points.
    ///
    /// Leaves may hold more points than that if they are all identical.
    pub fn build(points: PointSet<V>, leaf_size: usize) -> Result<Self> {
        if leaf_size == 0 {
            return Err(Error::ZeroLeafSize);
        }
        if points.is_empty() {
            return Err(Error::EmptySet);
        }

        let mut order: Vec<_> = (0..points.len()).collect();
        let mut nodes = Vec::new();
        Self::build_recursive(&points, &mut order, 0, leaf_size, &mut nodes);

        let tree = Self {
            points: points.permuted(&order),
            nodes,
            permutation: Permutation::from_order(order),
        };

        debug!(
            points = tree.len(),
            dims = tree.dims(),
            nodes = tree.node_count(),
            depth = tree.depth(),
            leaf_size,
            "Built space tree"
        );

        Ok(tree)
    }

    /// Build a tree consisting of a single leaf holding every point, in their original order.
    pub fn single_node(points: PointSet<V>) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptySet);
        }

        let root = Node {
            bound: HRectBound::from_points(points.dims(), points.iter()),
            begin: 0,
            count: points.len(),
            children: None,
        };

        Ok(Self {
            permutation: Permutation::identity(points.len()),
            points,
            nodes: vec![root],
        })
    }

    /// Recursively build the subtree over `order`, whose first entry is point number `begin` in
    /// the final order.
    fn build_recursive(
        points: &PointSet<V>,
        order: &mut [usize],
        begin: usize,
        leaf_size: usize,
        nodes: &mut Vec<Node<V>>,
    ) -> NodeId {
        let bound = HRectBound::from_points(points.dims(), order.iter().map(|&i| points.point(i)));
        let split = match bound.widest_dim() {
            Some((dim, width)) if order.len() > leaf_size && width > V::zero() => Some(dim),
            _ => None,
        };

        let id = nodes.len();
        nodes.push(Node {
            bound,
            begin,
            count: order.len(),
            children: None,
        });

        if let Some(dim) = split {
            order.sort_by_cached_key(|&i| Ordered::new(points.point(i)[dim]));

            let mid = order.len() / 2;
            let (left, right) = order.split_at_mut(mid);
            let left = Self::build_recursive(points, left, begin, leaf_size, nodes);
            let right = Self::build_recursive(points, right, begin + mid, leaf_size, nodes);
            nodes[id].children = Some([left, right]);
        }

        id
    }

    /// Get the root node.
    pub fn root(&self) -> NodeId {
        0
    }

    /// Get a node by its ID.
    pub fn node(&self, id: NodeId) -> &Node<V> {
        &self.nodes[id]
    }

    /// Get the number of nodes in this tree.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Get the number of levels in this tree.
    pub fn depth(&self) -> usize {
        let mut depth = 0;
        let mut stack = vec![(self.root(), 1)];
        while let Some((id, level)) = stack.pop() {
            depth = depth.max(level);
            if let Some(children) = self.nodes[id].children {
                stack.extend(children.iter().map(|&child| (child, level + 1)));
            }
        }
        depth
    }

    /// Get the (rearranged) points held by this tree.
    pub fn points(&self) -> &PointSet<V> {
        &self.points
    }

    /// Get the map between original and rearranged point indices.
    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Get the number of points in this tree.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if this tree is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Get the dimensionality of the points in this tree.
    pub fn dims(&self) -> usize {
        self.points.dims()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::tests::random_points;

    fn check_invariants(tree: &SpaceTree<f64>, leaf_size: usize) {
        let root = tree.node(tree.root());
        assert_eq!(root.range(), 0..tree.len());

        for id in 0..tree.node_count() {
            let node = tree.node(id);
            for i in node.range() {
                assert!(node.bound().contains(tree.points().point(i)));
            }

            match node.children() {
                Some([left, right]) => {
                    let (left, right) = (tree.node(left), tree.node(right));
                    assert!(left.count() > 0 && right.count() > 0);
                    assert_eq!(left.range().start, node.range().start);
                    assert_eq!(left.range().end, right.range().start);
                    assert_eq!(right.range().end, node.range().end);
                }
                None => {
                    let first = tree.points().point(node.range().start);
                    let identical = node.range().all(|i| tree.points().point(i) == first);
                    assert!(node.count() <= leaf_size || identical);
                }
            }
        }
    }

    #[test]
    fn test_build() {
        let points = random_points(500, 3, 1);

        for leaf_size in [1, 5, 20, 50] {
            let tree = SpaceTree::build(points.clone(), leaf_size).unwrap();
            check_invariants(&tree, leaf_size);

            for old in 0..points.len() {
                let new = tree.permutation().to_new(old);
                assert_eq!(tree.points().point(new), points.point(old));
                assert_eq!(tree.permutation().to_old(new), old);
            }
        }
    }

    #[test]
    fn test_depth() {
        let points = random_points(1024, 2, 2);
        let tree = SpaceTree::build(points, 1).unwrap();
        assert_eq!(tree.depth(), 11);
        assert_eq!(tree.node_count(), 2047);
    }

    #[test]
    fn test_duplicates() {
        let points = PointSet::from_points(vec![[1.0, 1.0]; 10]).unwrap();
        let tree = SpaceTree::build(points, 2).unwrap();
        assert_eq!(tree.node_count(), 1);
        check_invariants(&tree, 2);
    }

    #[test]
    fn test_single_node() {
        let points = random_points(100, 4, 3);
        let tree = SpaceTree::single_node(points.clone()).unwrap();
        assert_eq!(tree.node_count(), 1);
        assert!(tree.node(tree.root()).is_leaf());
        assert!(tree.permutation().is_identity());
        assert_eq!(tree.points(), &points);
    }

    #[test]
    fn test_errors() {
        let empty = PointSet::<f64>::new(2);
        assert_eq!(SpaceTree::build(empty.clone(), 10).unwrap_err(), Error::EmptySet);
        assert_eq!(SpaceTree::single_node(empty).unwrap_err(), Error::EmptySet);

        let points = random_points(10, 2, 4);
        assert_eq!(SpaceTree::build(points, 0).unwrap_err(), Error::ZeroLeafSize);
    }
}
