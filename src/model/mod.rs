//! Graph model for phylogenetic trees, networks and splits graphs.
//!
//! All types use the arena pattern: nodes and edges are referenced by
//! [NodeId] and [EdgeId] only, and data attached to them lives in
//! [AttributeArray]s owned by the graph.
//!
//! * [Graph] - directed multigraph substrate
//! * [PhyloGraph] - adds labels, taxa, weights, confidences, angles and
//!   split ids
//! * [PhyloTree] - rooted trees and networks, read and written as Newick
//! * [PhyloSplitsGraph] - splits graphs, embedded with the equal angle
//!   algorithm

/// Attribute arrays keyed by node or edge id
pub mod attributes;
/// Directed multigraph substrate
pub mod graph;
/// Graph with phylogenetic attributes and taxon registry
pub mod phylo_graph;
/// Splits graphs
pub mod splits_graph;
/// Rooted trees and networks
pub mod tree;

pub use attributes::{AttributeArray, EdgeArray, NodeArray};
pub use graph::{EdgeId, Graph, NodeId};
pub use phylo_graph::{DEFAULT_CONFIDENCE, DEFAULT_WEIGHT, PhyloGraph, TaxonId};
pub use splits_graph::PhyloSplitsGraph;
pub use tree::{PhyloTree, PostOrderIter, PreOrderIter};
