//! Splits graphs.
//!
//! A [PhyloSplitsGraph] is a [PhyloGraph] whose edges are grouped into
//! splits by their split id. Removing all edges of one split separates the
//! taxa into the two sides of a bipartition; this is assumed of every graph
//! handed to the operations here, not checked.

use crate::analysis::embedding::{self, EmbeddingOptions, Point};
use crate::model::attributes::{EdgeArray, NodeArray};
use crate::model::graph::{EdgeId, NodeId};
use crate::model::phylo_graph::{PhyloGraph, TaxonId};
use fixedbitset::FixedBitSet;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::ops::{Deref, DerefMut};

// =$========================================================================$=
// PHYLO SPLITS GRAPH
// =$========================================================================$=
/// A graph whose edges carry split ids, e.g. a splits network.
#[derive(Debug, Clone, Default)]
pub struct PhyloSplitsGraph {
    graph: PhyloGraph,
}

impl Deref for PhyloSplitsGraph {
    type Target = PhyloGraph;

    fn deref(&self) -> &Self::Target {
        &self.graph
    }
}

impl DerefMut for PhyloSplitsGraph {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.graph
    }
}

impl From<PhyloGraph> for PhyloSplitsGraph {
    fn from(graph: PhyloGraph) -> Self {
        Self { graph }
    }
}

// ============================================================================
// Split Queries (pub)
// ============================================================================
impl PhyloSplitsGraph {
    /// Creates an empty splits graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the underlying attributed graph.
    pub fn phylo_graph(&self) -> &PhyloGraph {
        &self.graph
    }

    /// Returns the distinct non-zero split ids in increasing order.
    pub fn split_ids(&self) -> Vec<i32> {
        self.edges()
            .map(|e| self.split(e))
            .filter(|&s| s != 0)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Returns the number of distinct non-zero split ids.
    pub fn number_of_splits(&self) -> usize {
        self.split_ids().len()
    }

    /// Returns all edges with split id `split`, in edge order.
    pub fn edges_of_split(&self, split: i32) -> Vec<EdgeId> {
        self.edges().filter(|&e| self.split(e) == split).collect()
    }

    /// Returns some edge with split id `split`.
    pub fn an_edge_of_split(&self, split: i32) -> Option<EdgeId> {
        self.edges().find(|&e| self.split(e) == split)
    }

    /// Deep-copies this graph into a fresh arena with dense ids.
    pub fn copy_compacted(&self) -> (PhyloSplitsGraph, NodeArray<Option<NodeId>>, EdgeArray<Option<EdgeId>>) {
        let (graph, node_map, edge_map) = self.graph.copy_compacted();
        (Self { graph }, node_map, edge_map)
    }
}

// ============================================================================
// Split Removal (pub)
// ============================================================================
impl PhyloSplitsGraph {
    /// Removes split `split` by contracting all of its edges.
    ///
    /// The target of each edge is merged into its source: the remaining
    /// edges of the target are re-attached to the source with all their
    /// attributes, its taxa move over and its label is appended to the
    /// source's label. Afterwards, edges that now join the same two nodes
    /// and belong to the same split are reduced to one.
    ///
    /// # Returns
    /// Number of edges contracted.
    pub fn remove_split(&mut self, split: i32) -> usize {
        let mut contracted = 0;

        for e in self.edges_of_split(split) {
            if !self.contains_edge(e) {
                continue;
            }
            let (u, v) = (self.source(e), self.target(e));
            self.graph.delete_edge(e);
            if u != v {
                self.merge_into(v, u);
            }
            contracted += 1;
        }

        self.remove_parallel_edges();
        contracted
    }

    /// Moves all edges, taxa and the label of `v` onto `u` and deletes `v`.
    fn merge_into(&mut self, v: NodeId, u: NodeId) {
        for f in self.adjacent_edges(v).to_vec() {
            let source = if self.source(f) == v { u } else { self.source(f) };
            let target = if self.target(f) == v { u } else { self.target(f) };
            if source != target {
                self.graph.new_edge_like(source, target, f);
            }
            self.graph.delete_edge(f);
        }

        for t in self.graph.take_taxa(v) {
            self.graph.add_taxon(u, t);
        }
        if let Some(label) = self.label(v).map(str::to_string) {
            let merged = match self.label(u) {
                Some(existing) => format!("{existing},{label}"),
                None => label,
            };
            self.graph.set_label(u, Some(merged));
        }
        self.graph.delete_node(v);
    }

    /// Deletes all but the first of the edges with the same split id
    /// joining the same pair of nodes.
    fn remove_parallel_edges(&mut self) {
        let mut seen = HashSet::new();
        let parallel: Vec<EdgeId> = self
            .edges()
            .filter(|&e| {
                let (s, t) = (self.source(e), self.target(e));
                !seen.insert((s.min(t), s.max(t), self.split(e)))
            })
            .collect();
        for e in parallel {
            self.graph.delete_edge(e);
        }
    }
}

// ============================================================================
// Split Sides, Embedding (pub)
// ============================================================================
impl PhyloSplitsGraph {
    /// Determines, for every split, the taxa on the side that does not
    /// contain `start_taxon`.
    ///
    /// Runs a depth-first search from the node carrying `start_taxon` that
    /// crosses each split at most once along a path and visits every node
    /// once; the taxa of a visited node are added to every split crossed on
    /// the way there.
    ///
    /// # Returns
    /// Map from split id to a bit set over taxon ids. Every split id of the
    /// graph is present; all sets are empty if no node carries `start_taxon`.
    pub fn split_sides(&self, start_taxon: TaxonId) -> BTreeMap<i32, FixedBitSet> {
        let num_taxa = self.number_of_taxa() + 1;
        let split_ids = self.split_ids();
        let mut sides: BTreeMap<i32, FixedBitSet> = split_ids
            .iter()
            .map(|&s| (s, FixedBitSet::with_capacity(num_taxa)))
            .collect();

        let Some(start) = self.taxon_to_node(start_taxon) else {
            return sides;
        };

        let max_split = split_ids.iter().copied().max().unwrap_or(0).max(0) as usize;
        let mut crossed = FixedBitSet::with_capacity(max_split + 1);
        let mut visited = FixedBitSet::with_capacity(self.node_capacity());

        // (node, edge it was entered by, index of next adjacent edge)
        let mut stack: Vec<(NodeId, Option<EdgeId>, usize)> = vec![(start, None, 0)];
        visited.insert(start);

        while let Some(frame) = stack.last_mut() {
            let (v, entering, next) = *frame;

            if next == 0 {
                for &t in self.taxa(v) {
                    for s in crossed.ones() {
                        if let Some(side) = sides.get_mut(&(s as i32)) {
                            side.insert(t);
                        }
                    }
                }
            }

            match self.adjacent_edges(v).get(next) {
                Some(&f) => {
                    frame.2 += 1;
                    let s = self.split(f);
                    let w = self.opposite(v, f);
                    if Some(f) == entering || visited.contains(w) || s > 0 && crossed.contains(s as usize) {
                        continue;
                    }
                    if s > 0 {
                        crossed.insert(s as usize);
                    }
                    visited.insert(w);
                    stack.push((w, Some(f), 0));
                }
                None => {
                    if let Some(f) = entering
                        && self.split(f) > 0
                    {
                        crossed.set(self.split(f) as usize, false);
                    }
                    stack.pop();
                }
            }
        }

        sides
    }

    /// Computes node coordinates with the equal angle algorithm for the
    /// given cyclic ordering, see [embedding::embed].
    pub fn embed(&mut self, cycle: &[TaxonId], options: &EmbeddingOptions) -> NodeArray<Option<Point>> {
        embedding::embed(self, cycle, options)
    }

    /// Like [`embed`](Self::embed), using the cyclic ordering stored in the
    /// graph.
    pub fn embed_with_stored_cycle(&mut self, options: &EmbeddingOptions) -> NodeArray<Option<Point>> {
        let cycle = self.cycle();
        embedding::embed(self, &cycle, options)
    }
}
