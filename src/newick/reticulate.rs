//! Reticulate node tags (`#H1`, `##H1`, `#L2`, `#R3`) and the merging of
//! tagged occurrences into one reticulation.

use crate::model::{EdgeId, NodeId, PhyloTree};
use crate::newick::defs::MIN_ACCEPTOR_WEIGHT;
use std::collections::HashMap;

/// Tag parsed from the end of a node label.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ReticulateTag {
    /// Label text in front of the tag, if any
    pub(crate) label: Option<String>,
    /// Normalized tag, e.g. `H1` (kind in upper case followed by the number)
    pub(crate) key: String,
    /// Whether the tag was written `##`, marking the edge into this
    /// occurrence as acceptor
    pub(crate) acceptor: bool,
}

/// A tagged node occurrence recorded during parsing.
#[derive(Debug, Clone)]
pub(crate) struct ReticulateOccurrence {
    pub(crate) node: NodeId,
    pub(crate) key: String,
    pub(crate) acceptor: bool,
    /// Whether a weight was read for the edge into this occurrence
    pub(crate) weighted: bool,
}

/// Splits a trailing reticulate tag off `label`.
///
/// A tag is `#` followed by one of `H`, `L`, `R` (any case) and at least one
/// digit, up to the end of the label. `##` instead of `#` marks an acceptor.
///
/// # Returns
/// The tag, or `None` if `label` does not end with one.
pub(crate) fn parse_tag(label: &str) -> Option<ReticulateTag> {
    let hash = label.rfind('#')?;
    let tag = &label[hash + 1..];

    let mut chars = tag.chars();
    let kind = chars.next()?.to_ascii_uppercase();
    let number = chars.as_str();
    if !matches!(kind, 'H' | 'L' | 'R') || number.is_empty() || !number.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let (prefix, acceptor) = match label[..hash].strip_suffix('#') {
        Some(prefix) => (prefix, true),
        None => (&label[..hash], false),
    };
    let prefix = prefix.trim();

    Some(ReticulateTag {
        label: (!prefix.is_empty()).then(|| prefix.to_string()),
        key: format!("{kind}{number}"),
        acceptor,
    })
}

/// Merges all occurrences sharing a tag into a single new node.
///
/// For each occurrence (in parse order) every in-edge is redirected to the
/// merged node and marked special, and every out-edge is redirected to leave
/// the merged node. Weights, labels and split ids of the edges are kept, except
/// that the in-edge of a `##` occurrence is forced positive and an in-edge
/// without a weight in the input gets 0. Node labels are unioned and
/// comma-joined.
///
/// At most one in-edge keeps a positive weight. If the group has `##`
/// occurrences, the first of them is the acceptor, otherwise the first
/// in-edge (in parse order) with positive weight. All other in-edges are set
/// to 0, with a warning if more than one acceptor was given.
///
/// # Returns
/// Number of reticulations created.
pub(crate) fn merge_occurrences(tree: &mut PhyloTree, occurrences: &[ReticulateOccurrence]) -> usize {
    let mut groups: Vec<(&str, Vec<&ReticulateOccurrence>)> = Vec::new();
    let mut group_of_key: HashMap<&str, usize> = HashMap::new();
    for occurrence in occurrences {
        let index = *group_of_key.entry(&occurrence.key).or_insert_with(|| {
            groups.push((&occurrence.key, Vec::new()));
            groups.len() - 1
        });
        groups[index].1.push(occurrence);
    }

    for (key, group) in &groups {
        let merged = tree.new_node();
        let mut labels: Vec<String> = Vec::new();
        let mut in_edges: Vec<EdgeId> = Vec::new();
        // In-edges of `##` occurrences
        let mut marked: Vec<EdgeId> = Vec::new();

        for occurrence in group {
            let v = occurrence.node;
            if let Some(label) = tree.label(v)
                && !labels.iter().any(|l| l == label)
            {
                labels.push(label.to_string());
            }

            for e in tree.adjacent_edges(v).to_vec() {
                let (source, target) = (tree.source(e), tree.target(e));
                if target == v && source != v {
                    let f = tree.new_edge_like(source, merged, e);
                    tree.set_special(f, true);
                    if occurrence.acceptor {
                        if tree.weight(f) <= 0.0 {
                            tree.set_weight(f, MIN_ACCEPTOR_WEIGHT);
                        }
                        marked.push(f);
                    } else if !occurrence.weighted {
                        tree.set_weight(f, 0.0);
                    }
                    in_edges.push(f);
                } else if source == v && target != v {
                    tree.new_edge_like(merged, target, e);
                }
            }

            for t in tree.take_taxa(v) {
                tree.add_taxon(merged, t);
            }
            if tree.root() == Some(v) {
                tree.set_root(Some(merged));
            }
            tree.delete_node(v);
        }

        if !labels.is_empty() {
            tree.set_label(merged, Some(labels.join(",")));
        }

        let candidates: Vec<EdgeId> = if marked.is_empty() {
            in_edges.iter().copied().filter(|&e| tree.weight(e) > 0.0).collect()
        } else {
            marked
        };
        if candidates.len() > 1 {
            log::warn!(
                "Reticulate node #{key} has {} acceptor edges, keeping only the first",
                candidates.len()
            );
        }
        if let Some(&acceptor) = candidates.first() {
            for e in in_edges {
                if e != acceptor {
                    tree.set_weight(e, 0.0);
                }
            }
        }
    }

    groups.len()
}
