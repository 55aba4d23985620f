//! Newick writing for trees and rooted networks.

use crate::model::{EdgeId, NodeId, PhyloTree};
use crate::newick::defs::UNLABELED_LEAF;
use crate::parser::utils::{quote_edge_label, quote_label};
use std::collections::HashMap;
use std::fs::File;
use std::io::{self, BufWriter, Write};

/// Characters per node in a Newick string capacity estimate
const CHARS_PER_NODE: usize = 8;

/// Extra buffer in Newick string length/capacity estimate
const BUFFER_CHARS: usize = 10;

/// Options for serializing a tree to Newick format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewickStyle {
    /// Write `:weight` after each node that has an edge above it
    pub weights: bool,
    /// Write `[label]` after each node whose edge above it has a label
    pub edge_labels: bool,
}

impl Default for NewickStyle {
    fn default() -> Self {
        Self {
            weights: true,
            edge_labels: false,
        }
    }
}

/// Writes given list of trees to a file in Newick format, one tree per line.
///
/// # Errors
/// Returns an I/O error if writing fails.
pub fn write_newick_file(file: File, trees: &[PhyloTree], style: &NewickStyle) -> io::Result<()> {
    let mut writer = BufWriter::new(file);
    for tree in trees {
        writer.write_all(to_newick(tree, style).as_bytes())?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Returns the Newick representation of a tree or rooted network with
/// closing semicolon.
///
/// Writing starts at the root. Without root it starts at the first node
/// without in-edges for a network, and at the first node of maximum degree
/// otherwise. Rooted trees and networks descend along out-edges; unrooted
/// trees along all edges but the one entering a node.
///
/// A reticulation is written in full on its first visit and as a back
/// reference `#H<n>` (or `##H<n>` when entered via its acceptor edge) on
/// later visits, numbering reticulations by first visit.
///
/// # Example
/// ```
/// use phylograph::model::PhyloTree;
/// use phylograph::newick::{to_newick, NewickStyle};
///
/// let mut tree = PhyloTree::new();
/// let root = tree.new_node();
/// let a = tree.new_labeled_node("A");
/// let b = tree.new_labeled_node("Swamp hen");
/// tree.new_edge(root, a);
/// let e = tree.new_edge(root, b);
/// tree.set_weight(e, 2.5);
/// tree.set_root(Some(root));
///
/// assert_eq!(to_newick(&tree, &NewickStyle::default()), "(A:1,'Swamp hen':2.5);");
/// ```
pub fn to_newick(tree: &PhyloTree, style: &NewickStyle) -> String {
    let mut newick = String::with_capacity(tree.number_of_nodes() * CHARS_PER_NODE + BUFFER_CHARS);

    if let Some(start) = start_node(tree) {
        let mut writer = NewickWriter {
            tree,
            style,
            directed: tree.is_rooted() || tree.number_of_special_edges() > 0,
            reticulation_numbers: HashMap::new(),
        };
        writer.write_node(&mut newick, start, None);
    }
    newick.push(';');

    newick
}

fn start_node(tree: &PhyloTree) -> Option<NodeId> {
    if let Some(root) = tree.root() {
        return Some(root);
    }
    if tree.number_of_special_edges() > 0
        && let Some(top) = tree.nodes().find(|&v| tree.in_degree(v) == 0)
    {
        return Some(top);
    }
    // First node of maximum degree
    tree.nodes()
        .fold(None, |best: Option<NodeId>, v| match best {
            Some(b) if tree.degree(b) >= tree.degree(v) => Some(b),
            _ => Some(v),
        })
}

struct NewickWriter<'a> {
    tree: &'a PhyloTree,
    style: &'a NewickStyle,
    directed: bool,
    reticulation_numbers: HashMap<NodeId, usize>,
}

impl NewickWriter<'_> {
    fn write_node(&mut self, newick: &mut String, v: NodeId, entering: Option<EdgeId>) {
        let tree = self.tree;
        let reticulate = self.directed && tree.is_reticulate_node(v);

        let number = if reticulate {
            if let Some(&number) = self.reticulation_numbers.get(&v) {
                self.push_reticulation_tag(newick, number, entering);
                self.push_edge(newick, entering);
                return;
            }
            let number = self.reticulation_numbers.len() + 1;
            self.reticulation_numbers.insert(v, number);
            Some(number)
        } else {
            None
        };

        let children: Vec<EdgeId> = if self.directed {
            tree.out_edges(v).collect()
        } else {
            tree.adjacent_edges(v).iter().copied().filter(|&e| Some(e) != entering).collect()
        };

        if !children.is_empty() {
            newick.push('(');
            for (i, &e) in children.iter().enumerate() {
                if i > 0 {
                    newick.push(',');
                }
                self.write_node(newick, tree.opposite(v, e), Some(e));
            }
            newick.push(')');
        }

        match tree.label(v) {
            Some(label) => newick.push_str(&quote_label(label)),
            None if children.is_empty() && !reticulate => newick.push_str(UNLABELED_LEAF),
            None => {}
        }

        if let Some(number) = number {
            self.push_reticulation_tag(newick, number, entering);
        }

        self.push_edge(newick, entering);
    }

    fn push_reticulation_tag(&self, newick: &mut String, number: usize, entering: Option<EdgeId>) {
        if entering.is_some_and(|e| self.tree.is_acceptor_edge(e)) {
            newick.push_str("##H");
        } else {
            newick.push_str("#H");
        }
        newick.push_str(&number.to_string());
    }

    fn push_edge(&self, newick: &mut String, entering: Option<EdgeId>) {
        let Some(e) = entering else {
            return;
        };
        let weight = self.tree.weight(e);
        if self.style.weights && weight >= 0.0 {
            newick.push(':');
            // Shortest representation that parses back to the same value,
            // where %g would round to six significant digits
            newick.push_str(&weight.to_string());
        }
        if self.style.edge_labels
            && let Some(label) = self.tree.edge_label(e)
        {
            newick.push('[');
            newick.push_str(&quote_edge_label(label));
            newick.push(']');
        }
    }
}
