//! Homoplasy score of a split on a tree.
//!
//! The score is the smallest number of state changes along the edges of a
//! tree (over all its bifurcating refinements) that is needed to realize a
//! bipartition `A | B` of the taxa as a two-state character.

use crate::model::{EdgeId, NodeId, PhyloTree, TaxonId};
use fixedbitset::FixedBitSet;
use thiserror::Error;

/// Score standing in for "impossible"; sums saturate below overflow
const INFINITE: usize = usize::MAX / 4;

/// Errors of the homoplasy scorer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HomoplasyError {
    #[error("Taxon {0} is on neither side of the split")]
    TaxonNotInSplit(TaxonId),
    #[error("No node with id {0} in tree")]
    InvalidRoot(NodeId),
}

/// Minimum state changes with the subtree root in state A resp. B.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Scores {
    a: usize,
    b: usize,
}

impl Scores {
    /// Scores of a node by its own taxa alone.
    ///
    /// A node carrying taxa of both sides gets 1 for both states. This is
    /// at least one change but not necessarily the minimum for the node.
    fn of_taxa(taxa: &[TaxonId], a: &FixedBitSet, b: &FixedBitSet) -> Self {
        let in_a = taxa.iter().any(|&t| a.contains(t));
        let in_b = taxa.iter().any(|&t| b.contains(t));
        match (in_a, in_b) {
            (true, false) => Scores { a: 0, b: INFINITE },
            (false, true) => Scores { a: INFINITE, b: 0 },
            (true, true) => Scores { a: 1, b: 1 },
            (false, false) => Scores { a: 0, b: 0 },
        }
    }

    /// Adds a child: it either has the same state, or costs one change.
    fn add_child(&mut self, child: Scores) {
        self.a = self.a.saturating_add(child.a.min(child.b.saturating_add(1))).min(INFINITE);
        self.b = self.b.saturating_add(child.b.min(child.a.saturating_add(1))).min(INFINITE);
    }
}

/// Computes the homoplasy score of split `a | b` on `tree`.
///
/// The tree is traversed as an undirected graph starting at `root`, or at
/// the first node if `root` is `None`; the score does not depend on that
/// choice. Taxa of a node with neighbors below it are treated as one more
/// child.
///
/// # Arguments
/// * `tree` - The tree, with taxa assigned to its nodes
/// * `a`, `b` - The two sides of the split as bit sets over taxon ids
/// * `root` - Node to start the traversal from
///
/// # Returns
/// The score, which is 0 if the tree has fewer than two nodes, if either
/// side has at most one taxon, or if at most one taxon of the tree is on
/// either side.
///
/// # Errors
/// * [HomoplasyError::TaxonNotInSplit] if a taxon of the tree is on neither side
/// * [HomoplasyError::InvalidRoot] if `root` is not a node of the tree
///
/// # Example
/// ```
/// use fixedbitset::FixedBitSet;
/// use phylograph::analysis::homoplasy_score;
/// use phylograph::newick;
///
/// let mut tree = newick::parse_str("((1,2),(3,4));", true).unwrap();
/// tree.assign_taxa_by_label(&["1", "2", "3", "4"]);
///
/// let a: FixedBitSet = [1, 2].into_iter().collect();
/// let b: FixedBitSet = [3, 4].into_iter().collect();
/// assert_eq!(homoplasy_score(&tree, &a, &b, None), Ok(0));
/// ```
pub fn homoplasy_score(
    tree: &PhyloTree,
    a: &FixedBitSet,
    b: &FixedBitSet,
    root: Option<NodeId>,
) -> Result<usize, HomoplasyError> {
    if tree.number_of_nodes() < 2 || a.count_ones(..) <= 1 || b.count_ones(..) <= 1 {
        return Ok(0);
    }

    let taxa = tree.all_taxa();
    let in_a = taxa.iter().filter(|&&t| a.contains(t)).count();
    let in_b = taxa.iter().filter(|&&t| b.contains(t)).count();
    if in_a <= 1 || in_b <= 1 {
        return Ok(0);
    }
    if let Some(&t) = taxa.iter().find(|&&t| !a.contains(t) && !b.contains(t)) {
        return Err(HomoplasyError::TaxonNotInSplit(t));
    }

    let root = match root {
        Some(root) if tree.contains_node(root) => root,
        Some(root) => return Err(HomoplasyError::InvalidRoot(root)),
        None => match tree.first_node() {
            Some(first) => first,
            None => return Ok(0),
        },
    };

    let mut scores: Vec<Option<Scores>> = vec![None; tree.node_capacity()];
    for (v, parent_edge) in undirected_post_order(tree, root) {
        let mut node_scores = Scores { a: 0, b: 0 };
        let mut has_children = false;
        for &f in tree.adjacent_edges(v) {
            if Some(f) == parent_edge {
                continue;
            }
            if let Some(child) = scores[tree.opposite(v, f)] {
                node_scores.add_child(child);
                has_children = true;
            }
        }

        let own = Scores::of_taxa(tree.taxa(v), a, b);
        if has_children {
            if tree.has_taxa(v) {
                node_scores.add_child(own);
            }
        } else {
            node_scores = own;
        }
        scores[v] = Some(node_scores);
    }

    let result = scores[root].map_or(0, |s| s.a.min(s.b));
    Ok(result.saturating_sub(1))
}

/// Nodes reachable from `root` ignoring edge directions, children before
/// parents, each with the edge leading to its parent.
fn undirected_post_order(tree: &PhyloTree, root: NodeId) -> Vec<(NodeId, Option<EdgeId>)> {
    let mut pre_order = Vec::with_capacity(tree.number_of_nodes());
    let mut visited = FixedBitSet::with_capacity(tree.node_capacity());
    let mut stack = vec![(root, None)];
    visited.insert(root);

    while let Some((v, parent_edge)) = stack.pop() {
        pre_order.push((v, parent_edge));
        for &f in tree.adjacent_edges(v) {
            let w = tree.opposite(v, f);
            if !visited.contains(w) {
                visited.insert(w);
                stack.push((w, Some(f)));
            }
        }
    }

    pre_order.reverse();
    pre_order
}
