//! Structs and logic to parse Newick strings.
//!
//! This module provides the [NewickParser] struct, which offers methods
//! to parse a single tree or all trees of an input.

use crate::model::{NodeId, PhyloTree};
use crate::newick::defs::{
    DEFAULT_ROOT_EDGE_WEIGHT, EDGE_LABEL_DELIMITERS, NEWICK_LABEL_DELIMITERS, NEWICK_WEIGHT_DELIMITERS,
};
use crate::newick::reticulate::{self, ReticulateOccurrence};
use crate::parser::byte_parser::ByteParser;
use crate::parser::byte_source::ByteSource;
use crate::parser::parsing_error::{ParseError, ParseErrorKind};
use std::collections::{HashMap, HashSet};

// =#========================================================================#=
// NEWICK PARSER
// =#========================================================================$=
/// Parser (configuration) for Newick trees and rooted networks.
///
/// # Configuration
/// * [`with_rooted(rooted)`](Self::with_rooted)
///     - Whether the top node becomes the root (default `true`).
///       For an unrooted tree an unlabeled top node of degree two is
///       removed and its two edges are joined.
/// * [`with_multi_labeled_nodes()`](Self::with_multi_labeled_nodes)
///     - Keeps repeated node labels as they are. By default the first
///       occurrence of a repeated label `x` is renamed `x.1` and later ones
///       `x.2`, `x.3`, ...
///
/// # Parsing
/// * [`parse_str`](Self::parse_str) - Parse a single tree from a string
/// * [`parse_tree`](Self::parse_tree) - Parse the next tree of a [ByteParser]
/// * [`parse_all`](Self::parse_all) - Parse all trees until EOF
///
/// # Example
/// ```
/// use phylograph::newick::NewickParser;
///
/// let tree = NewickParser::new()
///     .with_rooted(true)
///     .parse_str("((Kiwi:1,Emu:1):0.5,Moa:1.5);")
///     .unwrap();
/// assert_eq!(tree.number_of_nodes(), 5);
/// assert!(tree.has_weights());
/// ```
#[derive(Debug, Clone)]
pub struct NewickParser {
    rooted: bool,
    multi_labeled_nodes: bool,
}

impl Default for NewickParser {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Construction & Configuration (pub)
// ============================================================================
impl NewickParser {
    /// Creates a new [NewickParser] for rooted trees that renames repeated
    /// labels.
    pub fn new() -> Self {
        Self {
            rooted: true,
            multi_labeled_nodes: false,
        }
    }

    /// Sets whether parsed trees are rooted at their top node.
    pub fn with_rooted(mut self, rooted: bool) -> Self {
        self.rooted = rooted;
        self
    }

    /// Keeps repeated node labels instead of renaming them.
    pub fn with_multi_labeled_nodes(mut self) -> Self {
        self.multi_labeled_nodes = true;
        self
    }
}

// ============================================================================
// API Parsing (pub)
// ============================================================================
impl NewickParser {
    /// Parses a string holding exactly one tree.
    ///
    /// # Errors
    /// Any syntax error, including [ParseErrorKind::TrailingGarbage] if
    /// anything but whitespace follows the terminating `;`.
    pub fn parse_str(&self, newick: &str) -> Result<PhyloTree, ParseError> {
        let mut parser = ByteParser::for_str(newick);
        let tree = self.parse_tree(&mut parser)?;
        parser.skip_whitespace();
        if !parser.is_eof() {
            return Err(ParseError::from_parser(ParseErrorKind::TrailingGarbage, &parser));
        }
        Ok(tree)
    }

    /// Parses all trees from the byte source until EOF.
    ///
    /// # Arguments
    /// * `parser` - A byte parser with underlying source containing only
    ///   `;`-terminated Newick strings and whitespace.
    pub fn parse_all<B: ByteSource>(&self, mut parser: ByteParser<B>) -> Result<Vec<PhyloTree>, ParseError> {
        let mut trees = Vec::new();
        loop {
            parser.skip_whitespace();
            if parser.is_eof() {
                break;
            }
            trees.push(self.parse_tree(&mut parser)?);
        }
        Ok(trees)
    }

    /// Parses a single `;`-terminated tree from the given [ByteParser],
    /// leaving the parser right after the `;`.
    pub fn parse_tree<B: ByteSource>(&self, parser: &mut ByteParser<B>) -> Result<PhyloTree, ParseError> {
        let mut state = TreeState::new(self.multi_labeled_nodes);

        parser.skip_whitespace();
        match parser.peek() {
            None => return Err(ParseError::unexpected_eof(parser)),
            Some(b')') => return Err(ParseError::from_parser(ParseErrorKind::UnmatchedClose, parser)),
            Some(b';') => return Err(ParseError::from_parser(ParseErrorKind::MissingLabel, parser)),
            _ => {}
        }

        let top = state.parse_node(parser)?;

        // Weight and edge label of the top node have no edge to go on
        state.parse_weight(parser)?;
        state.parse_edge_label(parser)?;

        parser.skip_whitespace();
        match parser.peek() {
            Some(b';') => {
                parser.next_byte();
            }
            Some(b')') => return Err(ParseError::from_parser(ParseErrorKind::UnmatchedClose, parser)),
            _ => return Err(ParseError::unexpected_character(parser)),
        }

        Ok(state.finish(top, self.rooted))
    }
}

// =#========================================================================#=
// TREE STATE
// =#========================================================================$=
/// Tree under construction plus bookkeeping for a single parse.
struct TreeState {
    tree: PhyloTree,
    multi_labeled_nodes: bool,
    has_weights: bool,
    has_repeated_labels: bool,
    /// Plain label to (occurrence count, node of first occurrence)
    seen_labels: HashMap<String, (usize, NodeId)>,
    /// All plain labels assigned so far, including renamed ones
    used_labels: HashSet<String>,
    occurrences: Vec<ReticulateOccurrence>,
}

// ============================================================================
// Parsing
// ============================================================================
impl TreeState {
    fn new(multi_labeled_nodes: bool) -> Self {
        Self {
            tree: PhyloTree::new(),
            multi_labeled_nodes,
            has_weights: false,
            has_repeated_labels: false,
            seen_labels: HashMap::new(),
            used_labels: HashSet::new(),
            occurrences: Vec::new(),
        }
    }

    /// Parses a node with its subtree: `'(' node (',' node)* ')' label?` or
    /// `label?`. Returns the new node; edges to its children carry their
    /// parsed weights and edge labels.
    fn parse_node<B: ByteSource>(&mut self, parser: &mut ByteParser<B>) -> Result<NodeId, ParseError> {
        parser.skip_whitespace();
        let v = self.tree.new_node();

        if parser.consume_if(b'(') {
            loop {
                let w = self.parse_node(parser)?;
                let e = self.tree.new_edge(v, w);
                if let Some(weight) = self.parse_weight(parser)? {
                    self.tree.set_weight(e, weight);
                    if let Some(occurrence) = self.occurrences.last_mut()
                        && occurrence.node == w
                    {
                        occurrence.weighted = true;
                    }
                }
                if let Some(edge_label) = self.parse_edge_label(parser)? {
                    self.tree.set_edge_label(e, Some(edge_label));
                }

                parser.skip_whitespace();
                match parser.next_byte() {
                    Some(b',') => continue,
                    Some(b')') => break,
                    Some(b) => {
                        let position = parser.position() - 1;
                        return Err(ParseError::at(ParseErrorKind::UnexpectedCharacter(b as char), position, parser));
                    }
                    None => return Err(ParseError::unexpected_eof(parser)),
                }
            }
        }

        let label = parser.parse_label(NEWICK_LABEL_DELIMITERS)?;
        self.assign_label(v, label);
        Ok(v)
    }

    /// Parses optional `:weight`, clamped to be non-negative.
    fn parse_weight<B: ByteSource>(&mut self, parser: &mut ByteParser<B>) -> Result<Option<f64>, ParseError> {
        parser.skip_whitespace();
        if !parser.consume_if(b':') {
            return Ok(None);
        }
        parser.skip_whitespace();

        let start = parser.position();
        let token = parser.parse_token(NEWICK_WEIGHT_DELIMITERS);
        match token.parse::<f64>() {
            Ok(weight) if weight.is_finite() => {
                self.has_weights = true;
                Ok(Some(weight.max(0.0)))
            }
            _ => Err(ParseError::at(ParseErrorKind::InvalidWeight(token), start, parser)),
        }
    }

    /// Parses optional `[edge label]`. The label may be quoted like a node
    /// label, which allows `]` inside it.
    fn parse_edge_label<B: ByteSource>(&mut self, parser: &mut ByteParser<B>) -> Result<Option<String>, ParseError> {
        parser.skip_whitespace();
        let start = parser.position();
        if !parser.consume_if(b'[') {
            return Ok(None);
        }

        let label = parser.parse_label(EDGE_LABEL_DELIMITERS)?;
        if !parser.consume_if(b']') {
            return Err(ParseError::at(ParseErrorKind::UnterminatedEdgeLabel, start, parser));
        }
        Ok((!label.is_empty()).then_some(label))
    }

    /// Assigns a parsed label to `v`, recording reticulate tags and
    /// renaming repeated labels as configured.
    fn assign_label(&mut self, v: NodeId, label: String) {
        if label.is_empty() {
            return;
        }

        if let Some(tag) = reticulate::parse_tag(&label) {
            self.tree.set_label(v, tag.label);
            self.occurrences.push(ReticulateOccurrence {
                node: v,
                key: tag.key,
                acceptor: tag.acceptor,
                weighted: false,
            });
            return;
        }

        let Some((count, first)) = self.seen_labels.get(&label).copied() else {
            self.seen_labels.insert(label.clone(), (1, v));
            self.used_labels.insert(label.clone());
            self.tree.set_label(v, Some(label));
            return;
        };

        self.has_repeated_labels = true;
        if self.multi_labeled_nodes {
            self.tree.set_label(v, Some(label));
            return;
        }

        if count == 1 {
            let renamed = format!("{label}.1");
            self.used_labels.insert(renamed.clone());
            self.tree.set_label(first, Some(renamed));
        }
        let mut count = count + 1;
        let mut renamed = format!("{label}.{count}");
        while self.used_labels.contains(&renamed) {
            count += 1;
            renamed = format!("{label}.{count}");
        }
        self.seen_labels.insert(label, (count, first));
        self.used_labels.insert(renamed.clone());
        self.tree.set_label(v, Some(renamed));
    }
}

// ============================================================================
// Post-processing
// ============================================================================
impl TreeState {
    /// Applies the rooting heuristics, merges reticulate occurrences, and
    /// sets the document flags.
    fn finish(mut self, top: NodeId, rooted: bool) -> PhyloTree {
        let tree = &mut self.tree;
        let plain_top = tree.label(top).is_none() && tree.degree(top) == 2;

        if rooted {
            tree.set_root(Some(top));
            if plain_top && !self.has_weights {
                for e in tree.adjacent_edges(top).to_vec() {
                    tree.set_weight(e, DEFAULT_ROOT_EDGE_WEIGHT);
                }
            }
        } else if plain_top && !self.occurrences.iter().any(|o| o.node == top) {
            tree.contract_divertex(top);
        }

        if !self.occurrences.is_empty() {
            let merged = reticulate::merge_occurrences(tree, &self.occurrences);
            log::debug!("Merged {} reticulate occurrences into {merged} nodes", self.occurrences.len());
        }

        if self.has_repeated_labels {
            if self.multi_labeled_nodes {
                log::debug!("Tree has multiple nodes with the same label");
            } else {
                log::warn!("Tree has multiple nodes with the same label, renamed them with numeric suffixes");
            }
        }

        tree.set_has_weights(self.has_weights);
        tree.set_has_multi_labels(self.has_repeated_labels);
        self.tree
    }
}
