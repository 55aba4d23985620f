//! Phylograph is a library for phylogenetic trees, rooted networks and
//! splits graphs.
//!
//! Core functionality provided:
//! - Model: attributed graphs using the arena pattern, with node labels and
//!   taxa, and edge weights, confidences, labels, angles and split ids.
//!   See [crate::model] for more details.
//!   - [PhyloTree]: rooted (or unrooted) trees and rooted networks with
//!     reticulate edges.
//!   - [PhyloSplitsGraph]: splits graphs, with split removal.
//! - Newick: parse and write trees and networks, including the `#H1`/`##H1`
//!   notation for reticulate nodes. See [crate::newick].
//! - Analysis: see [crate::analysis]
//!   - LSA tree: lowest stable ancestors of reticulations, to traverse
//!     networks like trees.
//!   - Equal angle embedding of splits graphs for a cyclic ordering of taxa.
//!   - Homoplasy score of a split on a tree.
//!
//! Non-fatal problems (such as conflicting acceptor edges in a network) are
//! reported through the [log] crate; install a logger to see them.
//!
//! # Usage patterns
//! 1. Several functions provide quick access with default settings:
//!    [parse_newick_str], [parse_newick_file] and [to_newick].
//! 2. Configure a [NewickParser](crate::newick::NewickParser) and
//!    [NewickStyle](crate::newick::NewickStyle) for full control.
//!
//! ## Example
//! ```
//! use phylograph::parse_newick_str;
//!
//! let mut network = parse_newick_str("((A:1,B#H1:1):1,(C:1,##H1:2):1);", true).unwrap();
//! assert_eq!(network.reticulate_nodes().len(), 1);
//!
//! network.compute_lsa_children();
//! let reticulation = network.reticulate_nodes()[0];
//! let root = network.root().unwrap();
//! assert!(network.lsa_children().unwrap()[root].contains(&reticulation));
//! ```

pub mod analysis;
pub mod model;
pub mod newick;
pub mod parser;

pub use crate::model::{PhyloGraph, PhyloSplitsGraph, PhyloTree};
pub use crate::parser::parsing_error::ParseError;

use crate::newick::NewickStyle;
use std::path::Path;

// ============================================================================
// Quick Newick API
// ============================================================================
/// Parse a Newick string using default settings, returning a [PhyloTree].
///
/// See [`newick::parse_str`] for full documentation of this convenience function.
pub fn parse_newick_str<S: AsRef<str>>(newick: S, rooted: bool) -> Result<PhyloTree, ParseError> {
    newick::parse_str(newick, rooted)
}

/// Parse a file containing a semicolon-separated list of Newick strings
/// using default settings.
///
/// See [`newick::parse_file`] for full documentation of this convenience function.
pub fn parse_newick_file<P: AsRef<Path>>(path: P, rooted: bool) -> Result<Vec<PhyloTree>, ParseError> {
    newick::parse_file(path, rooted)
}

/// Returns the Newick string of a tree or network, with weights and
/// without edge labels.
pub fn to_newick(tree: &PhyloTree) -> String {
    newick::to_newick(tree, &NewickStyle::default())
}
