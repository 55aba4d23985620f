//! Rooted phylogenetic trees and networks.
//!
//! Provides [PhyloTree], a [PhyloGraph] with a distinguished root, reticulate
//! ("special") edges, and guide-tree bookkeeping used to traverse rooted
//! networks as if they were trees:
//! * Ordinary descent follows out-edges, but of the special edges entering a
//!   reticulate node only the first one is followed.
//! * Once [`compute_lsa_children`](PhyloTree::compute_lsa_children) was
//!   called, traversals follow the LSA tree instead.

use crate::analysis::lsa;
use crate::model::attributes::{EdgeArray, NodeArray};
use crate::model::graph::{EdgeId, NodeId};
use crate::model::phylo_graph::PhyloGraph;
use crate::newick::{self, NewickStyle};
use std::collections::BTreeSet;
use std::ops::{Deref, DerefMut};

// =$========================================================================$=
// PHYLO TREE
// =$========================================================================$=
/// A rooted (or unrooted) phylogenetic tree or rooted network.
///
/// Uses the arena pattern of [PhyloGraph]; nodes and edges are referenced by
/// [NodeId] and [EdgeId].
///
/// # Structure
/// - The root is optional; an unrooted tree has none.
/// - Edges are directed away from the root as constructed.
/// - A node with in-degree greater than one is a reticulation. Edges into a
///   reticulation are usually marked special.
/// - Guide children (the LSA tree) are only present for networks and only
///   after they were computed; any structural change drops them.
#[derive(Debug, Clone)]
pub struct PhyloTree {
    graph: PhyloGraph,
    root: Option<NodeId>,
    special: EdgeArray<bool>,
    lsa_children: Option<NodeArray<Vec<NodeId>>>,
    has_weights: bool,
    has_multi_labels: bool,
}

impl Default for PhyloTree {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for PhyloTree {
    type Target = PhyloGraph;

    fn deref(&self) -> &Self::Target {
        &self.graph
    }
}

impl DerefMut for PhyloTree {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.graph
    }
}

// ============================================================================
// New, Structure (pub)
// ============================================================================
impl PhyloTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            graph: PhyloGraph::new(),
            root: None,
            special: EdgeArray::new(false),
            lsa_children: None,
            has_weights: false,
            has_multi_labels: false,
        }
    }

    /// Returns the underlying attributed graph.
    pub fn phylo_graph(&self) -> &PhyloGraph {
        &self.graph
    }

    /// Adds a new node.
    pub fn new_node(&mut self) -> NodeId {
        self.lsa_children = None;
        self.graph.new_node()
    }

    /// Adds a new node with the given label.
    pub fn new_labeled_node(&mut self, label: &str) -> NodeId {
        self.lsa_children = None;
        self.graph.new_labeled_node(label)
    }

    /// Adds a new (non-special) edge from `source` to `target`.
    pub fn new_edge(&mut self, source: NodeId, target: NodeId) -> EdgeId {
        self.lsa_children = None;
        self.graph.new_edge(source, target)
    }

    /// Adds a new edge copying all attributes of `template`,
    /// including whether it is special.
    pub fn new_edge_like(&mut self, source: NodeId, target: NodeId, template: EdgeId) -> EdgeId {
        self.lsa_children = None;
        let e = self.graph.new_edge_like(source, target, template);
        self.special.set(e, self.special[template]);
        e
    }

    /// Deletes an edge.
    pub fn delete_edge(&mut self, e: EdgeId) {
        self.lsa_children = None;
        self.special.reset(e);
        self.graph.delete_edge(e);
    }

    /// Deletes a node with its incident edges. Deleting the root unsets it.
    pub fn delete_node(&mut self, v: NodeId) {
        if !self.graph.contains_node(v) {
            return;
        }
        self.lsa_children = None;
        for &e in self.graph.adjacent_edges(v) {
            self.special.reset(e);
        }
        if self.root == Some(v) {
            self.root = None;
        }
        self.graph.delete_node(v);
    }

    /// Removes everything, including root, taxa and flags.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Returns the root, if set.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Sets (or unsets) the root.
    pub fn set_root(&mut self, root: Option<NodeId>) {
        self.lsa_children = None;
        self.root = root;
    }

    /// Returns whether the tree has a root.
    pub fn is_rooted(&self) -> bool {
        self.root.is_some()
    }

    /// Returns whether `e` is a reticulate (special) edge.
    pub fn is_special(&self, e: EdgeId) -> bool {
        self.special[e]
    }

    /// Marks or unmarks `e` as a reticulate (special) edge.
    pub fn set_special(&mut self, e: EdgeId, special: bool) {
        self.lsa_children = None;
        self.special.set(e, special);
    }

    /// Returns the number of special edges.
    pub fn number_of_special_edges(&self) -> usize {
        self.graph.edges().filter(|&e| self.special[e]).count()
    }

    /// Returns whether `v` is a reticulation, i.e. has in-degree above one.
    pub fn is_reticulate_node(&self, v: NodeId) -> bool {
        self.graph.in_degree(v) > 1
    }

    /// Returns all reticulations in node order.
    pub fn reticulate_nodes(&self) -> Vec<NodeId> {
        self.graph.nodes().filter(|&v| self.is_reticulate_node(v)).collect()
    }

    /// Returns whether `e` is the acceptor edge of a reticulation: a special
    /// edge with positive weight.
    pub fn is_acceptor_edge(&self, e: EdgeId) -> bool {
        self.special[e] && self.graph.weight(e) > 0.0
    }

    /// Returns whether the parsed input contained at least one edge weight.
    pub fn has_weights(&self) -> bool {
        self.has_weights
    }

    pub(crate) fn set_has_weights(&mut self, has_weights: bool) {
        self.has_weights = has_weights;
    }

    /// Returns whether the parsed input contained repeated node labels.
    pub fn has_multi_labels(&self) -> bool {
        self.has_multi_labels
    }

    pub(crate) fn set_has_multi_labels(&mut self, has_multi_labels: bool) {
        self.has_multi_labels = has_multi_labels;
    }

    /// Removes a node of degree two and joins its two edges into one whose
    /// weight is the sum of the two weights.
    ///
    /// The new edge keeps the direction of the path through `v` if there is
    /// one, and the label and split id of the first edge of `v`.
    ///
    /// # Returns
    /// The new edge, or `None` if `v` does not have degree two.
    pub fn contract_divertex(&mut self, v: NodeId) -> Option<EdgeId> {
        let &[e, f] = self.graph.adjacent_edges(v) else {
            return None;
        };
        let a = self.graph.opposite(v, e);
        let b = self.graph.opposite(v, f);
        let (source, target) = if self.graph.source(f) == v || self.graph.target(e) == v {
            (a, b)
        } else {
            (b, a)
        };

        let g = self.new_edge_like(source, target, e);
        self.graph.set_weight(g, self.graph.weight(e) + self.graph.weight(f));
        self.special.set(g, self.special[e] || self.special[f]);

        if self.root == Some(v) {
            self.root = None;
        }
        self.delete_node(v);
        Some(g)
    }
}

// ============================================================================
// Children & Guide Tree (pub)
// ============================================================================
impl PhyloTree {
    /// Returns the children of `v` for ordinary descent: targets of
    /// out-edges, skipping special edges that are not the first special edge
    /// entering their target.
    pub fn tree_children(&self, v: NodeId) -> Vec<NodeId> {
        self.graph
            .out_edges(v)
            .filter(|&e| !self.special[e] || self.first_special_in_edge(self.graph.target(e)) == Some(e))
            .map(|e| self.graph.target(e))
            .collect()
    }

    /// Returns the first special edge entering `v`, if any.
    pub fn first_special_in_edge(&self, v: NodeId) -> Option<EdgeId> {
        self.graph.in_edges(v).find(|&e| self.special[e])
    }

    /// Returns the guide (LSA tree) children of all nodes, if computed.
    pub fn lsa_children(&self) -> Option<&NodeArray<Vec<NodeId>>> {
        self.lsa_children.as_ref()
    }

    /// Computes and stores the LSA tree of this network.
    ///
    /// For a tree without reticulations nothing is stored.
    pub fn compute_lsa_children(&mut self) {
        self.lsa_children = lsa::compute_lsa_children(self);
    }

    /// Returns the children of `v` to use in traversals: guide children if
    /// the LSA tree was computed, otherwise [`tree_children`](Self::tree_children).
    pub fn children_for_traversal(&self, v: NodeId) -> Vec<NodeId> {
        match &self.lsa_children {
            Some(children) => children[v].clone(),
            None => self.tree_children(v),
        }
    }
}

// ============================================================================
// Derived Queries, Printing, Copy (pub)
// ============================================================================
impl PhyloTree {
    /// Returns the set of labels of nodes without out-edges.
    pub fn leaf_labels(&self) -> BTreeSet<String> {
        self.graph
            .nodes()
            .filter(|&v| self.graph.out_degree(v) == 0)
            .filter_map(|v| self.graph.label(v).map(str::to_string))
            .collect()
    }

    /// Returns whether every node below the root has zero or two children
    /// and the root (if set) has two. Unrooted trees are bifurcating if every
    /// node has degree one or three.
    pub fn is_bifurcating(&self) -> bool {
        match self.root {
            Some(root) => self.graph.nodes().all(|v| {
                let out = self.graph.out_degree(v);
                out == 0 && v != root || out == 2
            }),
            None => self.graph.nodes().all(|v| matches!(self.graph.degree(v), 1 | 3)),
        }
    }

    /// Returns the Newick representation of this tree or network.
    ///
    /// # Arguments
    /// * `write_weights` - Whether to write `:weight` after each node
    /// * `write_edge_labels` - Whether to write `[label]` after each node
    pub fn to_newick(&self, write_weights: bool, write_edge_labels: bool) -> String {
        newick::to_newick(
            self,
            &NewickStyle {
                weights: write_weights,
                edge_labels: write_edge_labels,
            },
        )
    }

    /// Deep-copies this tree into a fresh arena with dense ids.
    ///
    /// # Returns
    /// The copy together with the old-to-new node and edge tables.
    pub fn copy_compacted(&self) -> (PhyloTree, NodeArray<Option<NodeId>>, EdgeArray<Option<EdgeId>>) {
        let (graph, node_map, edge_map) = self.graph.copy_compacted();

        let mut copy = PhyloTree {
            graph,
            root: self.root.and_then(|r| node_map[r]),
            special: EdgeArray::new(false),
            lsa_children: None,
            has_weights: self.has_weights,
            has_multi_labels: self.has_multi_labels,
        };
        for e in self.graph.edges() {
            if let Some(f) = edge_map[e] {
                copy.special.set(f, self.special[e]);
            }
        }
        if let Some(children) = &self.lsa_children {
            let mut remapped = NodeArray::new(Vec::new());
            for v in self.graph.nodes() {
                if let Some(w) = node_map[v] {
                    remapped.set(w, children[v].iter().filter_map(|&c| node_map[c]).collect());
                }
            }
            copy.lsa_children = Some(remapped);
        }

        (copy, node_map, edge_map)
    }
}

// =$========================================================================$=
// ITERATORS
// =$========================================================================$=
impl PhyloTree {
    /// Returns an iterator over the nodes below the root in post-order
    /// (children before parents), following
    /// [`children_for_traversal`](Self::children_for_traversal).
    ///
    /// Yields nothing for an unrooted tree.
    pub fn post_order_iter(&self) -> PostOrderIter<'_> {
        PostOrderIter::new(self)
    }

    /// Returns an iterator over the nodes below the root in pre-order
    /// (parents before children), following
    /// [`children_for_traversal`](Self::children_for_traversal).
    ///
    /// Yields nothing for an unrooted tree.
    pub fn pre_order_iter(&self) -> PreOrderIter<'_> {
        PreOrderIter::new(self)
    }
}

/// Iterator for post-order traversal (children before parents).
///
/// This iterator uses a stack-based approach to traverse the tree without recursion.
pub struct PostOrderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<(NodeId, bool)>, // (node, children_visited)
}

impl<'a> PostOrderIter<'a> {
    fn new(tree: &'a PhyloTree) -> Self {
        let stack = tree.root.map(|r| (r, false)).into_iter().collect();
        PostOrderIter { tree, stack }
    }
}

impl Iterator for PostOrderIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((v, children_visited)) = self.stack.pop() {
            if children_visited {
                return Some(v);
            }
            self.stack.push((v, true));
            // Push in reverse, so first child is processed first
            for w in self.tree.children_for_traversal(v).into_iter().rev() {
                self.stack.push((w, false));
            }
        }
        None
    }
}

/// Iterator for pre-order traversal (parents before children).
pub struct PreOrderIter<'a> {
    tree: &'a PhyloTree,
    stack: Vec<NodeId>,
}

impl<'a> PreOrderIter<'a> {
    fn new(tree: &'a PhyloTree) -> Self {
        PreOrderIter {
            tree,
            stack: tree.root.into_iter().collect(),
        }
    }
}

impl Iterator for PreOrderIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let v = self.stack.pop()?;
        for w in self.tree.children_for_traversal(v).into_iter().rev() {
            self.stack.push(w);
        }
        Some(v)
    }
}
