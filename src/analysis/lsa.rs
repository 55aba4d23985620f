//! Lowest stable ancestors (LSA) of reticulations in rooted networks.
//!
//! The LSA of a reticulation `r` is the deepest node that lies on every path
//! from the root to `r`. Making every reticulation an extra child of its LSA,
//! and dropping the edges into reticulations, turns a network into a tree:
//! the LSA tree, used to traverse networks like trees.
//!
//! # Preconditions
//! The network must be a rooted DAG in which every node is reachable from the
//! root. This is not checked; for other graphs the LSA mapping is undefined
//! and some reticulations may be missing from it.

use crate::model::{EdgeId, NodeArray, NodeId, PhyloTree};
use fixedbitset::FixedBitSet;
use std::collections::{HashMap, VecDeque};

/// Computes the LSA of every reticulation (node with in-degree above one)
/// below the root.
///
/// Works in a single post-order pass. Every reticulation opens one path id
/// per in-edge. Path ids are pulled up the first in-edge of each node, and a
/// node with several in-edges opens a fresh path id on each further in-edge
/// for every reticulation below it. A node at which the out-edges carry all
/// path ids ever opened for `r` is the LSA of `r`.
///
/// # Returns
/// Map from reticulation to its LSA; empty for a tree or without root.
pub fn compute_reticulation_to_lsa(tree: &PhyloTree) -> HashMap<NodeId, NodeId> {
    let mut reticulation_to_lsa = HashMap::new();
    let Some(root) = tree.root() else {
        return reticulation_to_lsa;
    };
    if tree.reticulate_nodes().is_empty() {
        return reticulation_to_lsa;
    }

    // All path ids opened so far, per reticulation
    let mut alive: HashMap<NodeId, FixedBitSet> = HashMap::new();
    // Path ids of a reticulation flowing through an edge
    let mut edge_paths: HashMap<(EdgeId, NodeId), FixedBitSet> = HashMap::new();
    // Reticulations below a node whose LSA is not found yet
    let mut below: NodeArray<Vec<NodeId>> = NodeArray::new(Vec::new());

    for v in post_order_dag(tree, root) {
        let in_edges: Vec<EdgeId> = tree.in_edges(v).collect();

        if in_edges.len() > 1 {
            let mut paths = FixedBitSet::with_capacity(in_edges.len());
            for (id, &e) in in_edges.iter().enumerate() {
                paths.insert(id);
                let mut through = FixedBitSet::with_capacity(in_edges.len());
                through.insert(id);
                edge_paths.insert((e, v), through);
            }
            alive.insert(v, paths);
        }

        let mut reticulations: Vec<NodeId> = Vec::new();
        for w in tree.children(v) {
            for &r in below[w].iter() {
                if !reticulations.contains(&r) {
                    reticulations.push(r);
                }
            }
            if tree.in_degree(w) > 1 && !reticulations.contains(&w) {
                reticulations.push(w);
            }
        }

        let mut unresolved = Vec::with_capacity(reticulations.len());
        for r in reticulations {
            let mut paths = FixedBitSet::new();
            for f in tree.out_edges(v) {
                if let Some(through) = edge_paths.get(&(f, r)) {
                    paths.union_with(through);
                }
            }

            if alive.get(&r).is_some_and(|all| paths.ones().eq(all.ones())) {
                reticulation_to_lsa.insert(r, v);
                continue;
            }

            if let Some((&first, others)) = in_edges.split_first() {
                for &f in others {
                    if let Some(all) = alive.get_mut(&r) {
                        let id = all.len();
                        all.grow(id + 1);
                        all.insert(id);
                        let mut through = FixedBitSet::with_capacity(id + 1);
                        through.insert(id);
                        edge_paths.insert((f, r), through);
                    }
                }
                edge_paths.insert((first, r), paths);
            }
            unresolved.push(r);
        }
        below.set(v, unresolved);
    }

    reticulation_to_lsa
}

/// Computes the LSA tree: the children of each node are the targets of its
/// out-edges that are not reticulations, followed by the reticulations it
/// is the LSA of.
///
/// # Returns
/// `None` if the network has no reticulations (or no root); then ordinary
/// tree traversal applies.
pub fn compute_lsa_children(tree: &PhyloTree) -> Option<NodeArray<Vec<NodeId>>> {
    tree.root()?;
    let reticulations = tree.reticulate_nodes();
    if reticulations.is_empty() {
        return None;
    }

    let reticulation_to_lsa = compute_reticulation_to_lsa(tree);
    let mut children = NodeArray::with_capacity(tree.node_capacity(), Vec::new());
    for v in tree.nodes() {
        let tree_children: Vec<NodeId> = tree.children(v).filter(|&w| !tree.is_reticulate_node(w)).collect();
        children.set(v, tree_children);
    }
    for r in reticulations {
        match reticulation_to_lsa.get(&r) {
            Some(&lsa) => children.get_mut(lsa).push(r),
            None => log::warn!("No LSA found for reticulation {r}"),
        }
    }

    log::debug!("Computed LSA tree for {} reticulations", reticulation_to_lsa.len());
    Some(children)
}

/// Post-order of all nodes reachable from `root` along out-edges, each node
/// once, children before parents.
fn post_order_dag(tree: &PhyloTree, root: NodeId) -> Vec<NodeId> {
    let mut order = Vec::with_capacity(tree.number_of_nodes());
    let mut visited = FixedBitSet::with_capacity(tree.node_capacity());
    let mut stack: Vec<(NodeId, bool)> = vec![(root, false)];

    while let Some((v, children_visited)) = stack.pop() {
        if children_visited {
            order.push(v);
            continue;
        }
        if visited.contains(v) {
            continue;
        }
        visited.insert(v);
        stack.push((v, true));
        let children: Vec<NodeId> = tree.children(v).collect();
        for w in children.into_iter().rev() {
            if !visited.contains(w) {
                stack.push((w, false));
            }
        }
    }
    order
}

// =#========================================================================#=
// TRAVERSALS
// =#========================================================================$=
/// Pre-order over the nodes of a tree or network, following
/// [`children_for_traversal`](PhyloTree::children_for_traversal).
///
/// A node is only emitted once all its parents in the network are emitted;
/// a node that is not ready yet is moved to the back of the queue. If a full
/// round over the queue makes no progress, the remaining nodes are emitted
/// as they are, with a warning.
pub fn pre_order_lsa(tree: &PhyloTree) -> Vec<NodeId> {
    let mut order = Vec::with_capacity(tree.number_of_nodes());
    let Some(root) = tree.root() else {
        return order;
    };
    let mut emitted = FixedBitSet::with_capacity(tree.node_capacity());
    let mut queue = VecDeque::from([root]);
    let mut postponed = 0;

    while let Some(v) = queue.pop_front() {
        let ready = v == root || tree.in_edges(v).all(|e| emitted.contains(tree.source(e)));
        if !ready && postponed <= queue.len() {
            queue.push_back(v);
            postponed += 1;
            continue;
        }
        if !ready {
            log::warn!("Pre-order traversal stuck with {} nodes waiting for parents", queue.len() + 1);
        }
        postponed = 0;

        emitted.insert(v);
        order.push(v);
        queue.extend(tree.children_for_traversal(v));
    }
    order
}

/// Post-order over the nodes of a tree or network, following
/// [`children_for_traversal`](PhyloTree::children_for_traversal).
pub fn post_order_lsa(tree: &PhyloTree) -> Vec<NodeId> {
    tree.post_order_iter().collect()
}

/// Breadth-first order over the nodes of a tree or network, following
/// [`children_for_traversal`](PhyloTree::children_for_traversal).
pub fn breadth_first_lsa(tree: &PhyloTree) -> Vec<NodeId> {
    let mut order = Vec::with_capacity(tree.number_of_nodes());
    let mut queue: VecDeque<NodeId> = tree.root().into_iter().collect();
    while let Some(v) = queue.pop_front() {
        order.push(v);
        queue.extend(tree.children_for_traversal(v));
    }
    order
}
