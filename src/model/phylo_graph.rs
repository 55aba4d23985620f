//! Attributed phylogenetic graph.
//!
//! [PhyloGraph] wraps a [Graph] and attaches phylogenetic data to its nodes
//! and edges through [AttributeArray]s. It also owns the taxon registry: the
//! bijection between taxon ids and nodes, and between taxon ids and cyclic
//! positions.
//!
//! # Taxa
//! Taxa are identified by small positive integers ([TaxonId]), numbered
//! densely from 1. A node may carry any number of taxa (including none), but
//! a taxon is carried by at most one node.

use crate::model::attributes::{EdgeArray, NodeArray};
use crate::model::graph::{EdgeId, Graph, NodeId};
use std::ops::Deref;

/// Identifier of a taxon, 1-based.
pub type TaxonId = usize;

/// Default weight of a new edge
pub const DEFAULT_WEIGHT: f64 = 1.0;

/// Default confidence of a new edge
pub const DEFAULT_CONFIDENCE: f64 = 1.0;

// =#========================================================================#=
// PHYLO GRAPH
// =#========================================================================$=
/// A graph with node labels and taxa, and with edge weights, confidences,
/// labels, angles and split ids.
///
/// Read-only graph queries are available through [Deref] to [Graph].
/// Structural changes go through the methods of this type so that
/// attributes and the taxon registry stay consistent.
#[derive(Debug, Clone)]
pub struct PhyloGraph {
    graph: Graph,

    node_labels: NodeArray<Option<String>>,
    node_taxa: NodeArray<Vec<TaxonId>>,

    edge_weights: EdgeArray<f64>,
    edge_confidences: EdgeArray<f64>,
    edge_labels: EdgeArray<Option<String>>,
    edge_angles: EdgeArray<f64>,
    edge_splits: EdgeArray<i32>,
    has_confidences: bool,

    /// Taxon id to node; index 0 unused
    taxon_to_node: Vec<Option<NodeId>>,
    /// Taxon id to cyclic position; index 0 unused
    taxon_to_cycle: Vec<Option<usize>>,
}

impl Default for PhyloGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for PhyloGraph {
    type Target = Graph;

    fn deref(&self) -> &Self::Target {
        &self.graph
    }
}

// ============================================================================
// Construction, Structure (pub)
// ============================================================================
impl PhyloGraph {
    /// Creates an empty graph without taxa.
    pub fn new() -> Self {
        Self {
            graph: Graph::new(),
            node_labels: NodeArray::new(None),
            node_taxa: NodeArray::new(Vec::new()),
            edge_weights: EdgeArray::new(DEFAULT_WEIGHT),
            edge_confidences: EdgeArray::new(DEFAULT_CONFIDENCE),
            edge_labels: EdgeArray::new(None),
            edge_angles: EdgeArray::new(0.0),
            edge_splits: EdgeArray::new(0),
            has_confidences: false,
            taxon_to_node: vec![None],
            taxon_to_cycle: vec![None],
        }
    }

    /// Returns the underlying graph.
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Adds a new node and returns its id.
    pub fn new_node(&mut self) -> NodeId {
        self.graph.new_node()
    }

    /// Adds a new node with the given label.
    pub fn new_labeled_node(&mut self, label: &str) -> NodeId {
        let v = self.graph.new_node();
        self.set_label(v, Some(label.to_string()));
        v
    }

    /// Adds a new edge from `source` to `target` with default attributes.
    pub fn new_edge(&mut self, source: NodeId, target: NodeId) -> EdgeId {
        self.graph.new_edge(source, target)
    }

    /// Adds a new edge and copies all attributes of `template` onto it.
    pub fn new_edge_like(&mut self, source: NodeId, target: NodeId, template: EdgeId) -> EdgeId {
        let e = self.graph.new_edge(source, target);
        self.copy_edge_attributes(template, e);
        e
    }

    /// Deletes an edge and resets its attributes.
    pub fn delete_edge(&mut self, e: EdgeId) {
        self.graph.delete_edge(e);
        self.edge_weights.reset(e);
        self.edge_confidences.reset(e);
        self.edge_labels.reset(e);
        self.edge_angles.reset(e);
        self.edge_splits.reset(e);
    }

    /// Deletes a node with its incident edges. Taxa carried by the node are
    /// removed from the taxon registry (their cyclic positions are kept).
    pub fn delete_node(&mut self, v: NodeId) {
        if !self.graph.contains_node(v) {
            return;
        }
        for e in self.graph.adjacent_edges(v).to_vec() {
            self.delete_edge(e);
        }
        for t in std::mem::take(self.node_taxa.get_mut(v)) {
            self.taxon_to_node[t] = None;
        }
        self.node_labels.reset(v);
        self.graph.delete_node(v);
    }

    /// Removes all nodes, edges, attributes, taxa and cyclic positions.
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    /// Copies weight, confidence, label, angle and split id from `from` to `to`.
    pub fn copy_edge_attributes(&mut self, from: EdgeId, to: EdgeId) {
        self.edge_weights.set(to, self.edge_weights[from]);
        self.edge_confidences.set(to, self.edge_confidences[from]);
        self.edge_labels.set(to, self.edge_labels[from].clone());
        self.edge_angles.set(to, self.edge_angles[from]);
        self.edge_splits.set(to, self.edge_splits[from]);
    }
}

// ============================================================================
// Node & Edge Attributes (pub)
// ============================================================================
impl PhyloGraph {
    /// Returns the label of node `v`.
    pub fn label(&self, v: NodeId) -> Option<&str> {
        self.node_labels[v].as_deref()
    }

    /// Sets (or removes) the label of node `v`.
    pub fn set_label(&mut self, v: NodeId, label: Option<String>) {
        self.node_labels.set(v, label);
    }

    /// Returns the weight of edge `e` (default 1.0).
    pub fn weight(&self, e: EdgeId) -> f64 {
        self.edge_weights[e]
    }

    /// Sets the weight of edge `e`.
    pub fn set_weight(&mut self, e: EdgeId, weight: f64) {
        self.edge_weights.set(e, weight);
    }

    /// Returns the confidence of edge `e` (default 1.0).
    pub fn confidence(&self, e: EdgeId) -> f64 {
        self.edge_confidences[e]
    }

    /// Sets the confidence of edge `e`; marks the graph as having confidences.
    pub fn set_confidence(&mut self, e: EdgeId, confidence: f64) {
        self.edge_confidences.set(e, confidence);
        self.has_confidences = true;
    }

    /// Returns whether a confidence value was ever set on this graph.
    pub fn has_confidences(&self) -> bool {
        self.has_confidences
    }

    /// Returns the label of edge `e`.
    pub fn edge_label(&self, e: EdgeId) -> Option<&str> {
        self.edge_labels[e].as_deref()
    }

    /// Sets (or removes) the label of edge `e`.
    pub fn set_edge_label(&mut self, e: EdgeId, label: Option<String>) {
        self.edge_labels.set(e, label);
    }

    /// Returns the angle of edge `e` in radians (default 0.0).
    pub fn angle(&self, e: EdgeId) -> f64 {
        self.edge_angles[e]
    }

    /// Sets the angle of edge `e` in radians.
    pub fn set_angle(&mut self, e: EdgeId, angle: f64) {
        self.edge_angles.set(e, angle);
    }

    /// Returns the split id of edge `e` (0 = unassigned).
    pub fn split(&self, e: EdgeId) -> i32 {
        self.edge_splits[e]
    }

    /// Sets the split id of edge `e`.
    pub fn set_split(&mut self, e: EdgeId, split: i32) {
        self.edge_splits.set(e, split);
    }
}

// ============================================================================
// Taxon Registry (pub)
// ============================================================================
impl PhyloGraph {
    /// Returns the taxa carried by node `v`.
    pub fn taxa(&self, v: NodeId) -> &[TaxonId] {
        &self.node_taxa[v]
    }

    /// Returns whether node `v` carries at least one taxon.
    pub fn has_taxa(&self, v: NodeId) -> bool {
        !self.node_taxa[v].is_empty()
    }

    /// Assigns taxon `t` to node `v`.
    ///
    /// If `t` was carried by another node before, it is moved to `v`.
    /// Adding a taxon a node already carries has no effect.
    ///
    /// # Panics
    /// Panics if `t` is 0.
    pub fn add_taxon(&mut self, v: NodeId, t: TaxonId) {
        assert!(t > 0, "taxon ids are 1-based");
        if t >= self.taxon_to_node.len() {
            self.taxon_to_node.resize(t + 1, None);
        }
        match self.taxon_to_node[t] {
            Some(u) if u == v => return,
            Some(u) => self.node_taxa.get_mut(u).retain(|&s| s != t),
            None => {}
        }
        self.taxon_to_node[t] = Some(v);
        self.node_taxa.get_mut(v).push(t);
    }

    /// Removes all taxa from node `v` and returns them.
    pub fn take_taxa(&mut self, v: NodeId) -> Vec<TaxonId> {
        let taxa = std::mem::take(self.node_taxa.get_mut(v));
        for &t in &taxa {
            self.taxon_to_node[t] = None;
        }
        taxa
    }

    /// Returns the node carrying taxon `t`, if any.
    pub fn taxon_to_node(&self, t: TaxonId) -> Option<NodeId> {
        self.taxon_to_node.get(t).copied().flatten()
    }

    /// Returns the largest taxon id known to this graph.
    pub fn number_of_taxa(&self) -> usize {
        self.taxon_to_node.len().max(self.taxon_to_cycle.len()) - 1
    }

    /// Returns all taxa carried by some node, in increasing order.
    pub fn all_taxa(&self) -> Vec<TaxonId> {
        (1..self.taxon_to_node.len())
            .filter(|&t| self.taxon_to_node[t].is_some())
            .collect()
    }

    /// Removes all taxon assignments and cyclic positions.
    pub fn clear_taxa(&mut self) {
        self.node_taxa.clear();
        self.taxon_to_node = vec![None];
        self.taxon_to_cycle = vec![None];
    }

    /// Assigns taxon `i + 1` to every node labelled `taxon_labels[i]`.
    ///
    /// Labels with no matching node are skipped; if several nodes carry the
    /// same label, the last one in node order gets the taxon.
    ///
    /// # Returns
    /// Number of taxa that were assigned to a node.
    pub fn assign_taxa_by_label<S: AsRef<str>>(&mut self, taxon_labels: &[S]) -> usize {
        let nodes: Vec<NodeId> = self.graph.nodes().collect();
        let mut assigned = 0;
        for (i, taxon_label) in taxon_labels.iter().enumerate() {
            let found = nodes
                .iter()
                .copied()
                .filter(|&v| self.label(v) == Some(taxon_label.as_ref()))
                .last();
            if let Some(v) = found {
                self.add_taxon(v, i + 1);
                assigned += 1;
            }
        }
        assigned
    }

    /// Returns the cyclic position of taxon `t`, if assigned.
    pub fn taxon_cycle(&self, t: TaxonId) -> Option<usize> {
        self.taxon_to_cycle.get(t).copied().flatten()
    }

    /// Sets the cyclic position (1-based) of taxon `t`.
    pub fn set_taxon_cycle(&mut self, t: TaxonId, position: usize) {
        assert!(t > 0, "taxon ids are 1-based");
        if t >= self.taxon_to_cycle.len() {
            self.taxon_to_cycle.resize(t + 1, None);
        }
        self.taxon_to_cycle[t] = Some(position);
    }

    /// Stores a cyclic ordering given as `cycle[position] = taxon`
    /// (1-based, `cycle[0]` ignored). Positions holding 0 are skipped, so
    /// the output of [`cycle`](Self::cycle) can be stored again.
    pub fn set_cycle(&mut self, cycle: &[TaxonId]) {
        for (position, &t) in cycle.iter().enumerate().skip(1) {
            if t > 0 {
                self.set_taxon_cycle(t, position);
            }
        }
    }

    /// Returns the stored cyclic ordering as `cycle[position] = taxon`,
    /// with `cycle[0] = 0`. Positions without a taxon hold 0.
    pub fn cycle(&self) -> Vec<TaxonId> {
        let max_position = self.taxon_to_cycle.iter().flatten().copied().max().unwrap_or(0);
        let mut cycle = vec![0; max_position + 1];
        for (t, position) in self.taxon_to_cycle.iter().enumerate() {
            if let Some(position) = position {
                cycle[*position] = t;
            }
        }
        cycle
    }
}

// ============================================================================
// Derived queries, Copy (pub)
// ============================================================================
impl PhyloGraph {
    /// Returns all nodes of degree at most one, in node order.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.graph.nodes().filter(|&v| self.graph.degree(v) <= 1).collect()
    }

    /// Deep-copies this graph into a fresh arena with dense ids.
    ///
    /// # Returns
    /// The copy together with the old-to-new node and edge tables
    /// (`None` for ids that were not live).
    pub fn copy_compacted(&self) -> (PhyloGraph, NodeArray<Option<NodeId>>, EdgeArray<Option<EdgeId>>) {
        let mut copy = PhyloGraph::new();
        let mut old_to_new_node = NodeArray::with_capacity(self.node_capacity(), None);
        let mut old_to_new_edge = EdgeArray::with_capacity(self.edge_capacity(), None);

        for v in self.graph.nodes() {
            let w = copy.new_node();
            copy.set_label(w, self.node_labels[v].clone());
            for &t in self.taxa(v) {
                copy.add_taxon(w, t);
            }
            old_to_new_node.set(v, Some(w));
        }
        for e in self.graph.edges() {
            let (Some(s), Some(t)) = (
                old_to_new_node[self.source(e)],
                old_to_new_node[self.target(e)],
            ) else {
                continue;
            };
            let f = copy.graph.new_edge(s, t);
            copy.edge_weights.set(f, self.weight(e));
            copy.edge_confidences.set(f, self.confidence(e));
            copy.edge_labels.set(f, self.edge_labels[e].clone());
            copy.edge_angles.set(f, self.angle(e));
            copy.edge_splits.set(f, self.split(e));
            old_to_new_edge.set(e, Some(f));
        }
        copy.has_confidences = self.has_confidences;
        copy.taxon_to_cycle = self.taxon_to_cycle.clone();
        if copy.taxon_to_node.len() < self.taxon_to_node.len() {
            copy.taxon_to_node.resize(self.taxon_to_node.len(), None);
        }

        (copy, old_to_new_node, old_to_new_edge)
    }
}
