//! Newick format parser and writer for phylogenetic trees and rooted
//! networks.
//!
//! # Quick API
//! For simple use cases with default settings:
//! * [`parse_str`] - parses a single string into a [`PhyloTree`]
//! * [`parse_file`] - parses all trees of a file
//! * [`to_newick`] - writes a tree
//!
//! # Full API
//! For more control, configure a [`NewickParser`] and a [`NewickStyle`].
//!
//! # Format
//! The grammar is:
//! * `tree ::= node ';'`
//! * `node ::= '(' node (',' node)* ')' [label] edge | [label] edge`
//! * `edge ::= [':' number] ['[' edge_label ']']`
//!
//! Furthermore:
//! * Whitespace can occur between elements
//! * Unquoted labels end at `( ) , : ; [`; surrounding whitespace is dropped
//! * Labels can be single-quoted (`''` is a quote), and quoted and unquoted
//!   parts can be concatenated: `'Swamp hen'_NZ`
//! * Weights are clamped to be non-negative
//! * Weight and edge label of the top node are read but dropped
//!
//! # Reticulate networks
//! A label ending in `#H<n>`, `#L<n>` or `#R<n>` (any case) marks an
//! occurrence of a reticulate node; all occurrences with the same tag are
//! merged into one node whose in-edges are special. A doubled `##` marks the
//! edge into that occurrence as acceptor edge; it keeps a positive weight
//! while the weights of the other special in-edges are set to 0.
//!
//! ```
//! use phylograph::newick;
//!
//! let network = newick::parse_str("((A,B#H1),(C,##H1));", true).unwrap();
//! assert_eq!(network.reticulate_nodes().len(), 1);
//! assert_eq!(network.number_of_special_edges(), 2);
//! ```

mod defs;
mod parser;
mod reticulate;
pub mod writer;

pub use self::parser::NewickParser;
pub use self::writer::{NewickStyle, to_newick, write_newick_file};

use crate::model::PhyloTree;
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::InMemoryByteSource;
use crate::parser::parsing_error::ParseError;
use std::path::Path;

// ============================================================================
// QUICK PARSING API (pub)
// ============================================================================
/// Parses a single Newick string.
///
/// # Arguments
/// * `newick` - The Newick string, terminated by `;`
/// * `rooted` - Whether the top node becomes the root
///
/// # Returns
/// * [`PhyloTree`] - Tree or network parsed from the string
/// * [`ParseError`] - If the string is not valid Newick format
///
/// # Example
/// ```
/// use phylograph::newick;
///
/// let tree = newick::parse_str("(A:1,(B:2,C:3):4);", true).unwrap();
/// assert_eq!(tree.to_newick(true, false), "(A:1,(B:2,C:3):4);");
/// ```
pub fn parse_str<S: AsRef<str>>(newick: S, rooted: bool) -> Result<PhyloTree, ParseError> {
    NewickParser::new().with_rooted(rooted).parse_str(newick.as_ref())
}

/// Parses a file of `;`-terminated Newick strings eagerly.
///
/// # Arguments
/// * `path` - Path to the file (accepting `&str`, `String`, `Path`, or `PathBuf`)
/// * `rooted` - Whether the top nodes become roots
///
/// # Returns
/// * `Vec<PhyloTree>` - All parsed trees
/// * [`ParseError`] - If file reading fails or Newick format is invalid
pub fn parse_file<P: AsRef<Path>>(path: P, rooted: bool) -> Result<Vec<PhyloTree>, ParseError> {
    let source = InMemoryByteSource::from_file(path)?;
    NewickParser::new()
        .with_rooted(rooted)
        .parse_all(ByteParser::new(source))
}
