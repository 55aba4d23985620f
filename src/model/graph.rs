//! Generic mutable graph substrate.
//!
//! [Graph] is a directed multigraph stored with the arena pattern: nodes and
//! edges live in slot vectors and are referenced by [NodeId] and [EdgeId].
//! Deleted slots are never reused, so an id stays valid (and unique) for the
//! whole lifetime of a graph instance. Phylogenetic data is not stored here
//! but in [AttributeArray](crate::model::AttributeArray)s keyed by these ids.

/// Index of a node in a graph (arena).
pub type NodeId = usize;

/// Index of an edge in a graph (arena).
pub type EdgeId = usize;

#[derive(Debug, Clone, Default)]
struct NodeSlot {
    /// Incident edges in insertion order
    adjacent: Vec<EdgeId>,
}

#[derive(Debug, Clone, Copy)]
struct EdgeSlot {
    source: NodeId,
    target: NodeId,
}

// =#========================================================================#=
// GRAPH
// =#========================================================================$=
/// A directed multigraph using the arena pattern.
///
/// # Invariants
/// - A live edge always has two live end nodes.
/// - Each live node lists each of its incident edges exactly once
///   (a loop is listed once).
/// - Iteration over nodes, edges and adjacencies follows insertion order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Option<NodeSlot>>,
    edges: Vec<Option<EdgeSlot>>,
    num_nodes: usize,
    num_edges: usize,
}

// ============================================================================
// Construction & Deletion (pub)
// ============================================================================
impl Graph {
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new isolated node and returns its id.
    pub fn new_node(&mut self) -> NodeId {
        let id = self.nodes.len();
        self.nodes.push(Some(NodeSlot::default()));
        self.num_nodes += 1;
        id
    }

    /// Adds a new edge from `source` to `target` and returns its id.
    ///
    /// # Panics
    /// Panics if either end node does not exist.
    pub fn new_edge(&mut self, source: NodeId, target: NodeId) -> EdgeId {
        assert!(self.contains_node(source), "no node with id {source}");
        assert!(self.contains_node(target), "no node with id {target}");

        let id = self.edges.len();
        self.edges.push(Some(EdgeSlot { source, target }));
        self.slot_mut(source).adjacent.push(id);
        if source != target {
            self.slot_mut(target).adjacent.push(id);
        }
        self.num_edges += 1;
        id
    }

    /// Deletes an edge. Deleting an edge that does not exist is a no-op.
    pub fn delete_edge(&mut self, e: EdgeId) {
        let Some(edge) = self.edges.get_mut(e).and_then(Option::take) else {
            return;
        };
        self.slot_mut(edge.source).adjacent.retain(|&f| f != e);
        if edge.source != edge.target {
            self.slot_mut(edge.target).adjacent.retain(|&f| f != e);
        }
        self.num_edges -= 1;
    }

    /// Deletes a node together with all its incident edges.
    /// Deleting a node that does not exist is a no-op.
    pub fn delete_node(&mut self, v: NodeId) {
        if !self.contains_node(v) {
            return;
        }
        for e in self.adjacent_edges(v).to_vec() {
            self.delete_edge(e);
        }
        self.nodes[v] = None;
        self.num_nodes -= 1;
    }

    /// Removes all nodes and edges. Ids handed out before are invalidated
    /// and numbering restarts at zero.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.num_nodes = 0;
        self.num_edges = 0;
    }

    fn slot(&self, v: NodeId) -> &NodeSlot {
        self.nodes[v]
            .as_ref()
            .unwrap_or_else(|| panic!("no node with id {v}"))
    }

    fn slot_mut(&mut self, v: NodeId) -> &mut NodeSlot {
        self.nodes[v]
            .as_mut()
            .unwrap_or_else(|| panic!("no node with id {v}"))
    }

    fn edge(&self, e: EdgeId) -> &EdgeSlot {
        self.edges[e]
            .as_ref()
            .unwrap_or_else(|| panic!("no edge with id {e}"))
    }
}

// ============================================================================
// Queries (pub)
// ============================================================================
impl Graph {
    /// Returns the number of live nodes.
    pub fn number_of_nodes(&self) -> usize {
        self.num_nodes
    }

    /// Returns the number of live edges.
    pub fn number_of_edges(&self) -> usize {
        self.num_edges
    }

    /// Returns one more than the largest node id ever handed out,
    /// i.e. the size an attribute array needs to cover all nodes.
    pub fn node_capacity(&self) -> usize {
        self.nodes.len()
    }

    /// Returns one more than the largest edge id ever handed out.
    pub fn edge_capacity(&self) -> usize {
        self.edges.len()
    }

    /// Returns whether `v` refers to a live node.
    pub fn contains_node(&self, v: NodeId) -> bool {
        matches!(self.nodes.get(v), Some(Some(_)))
    }

    /// Returns whether `e` refers to a live edge.
    pub fn contains_edge(&self, e: EdgeId) -> bool {
        matches!(self.edges.get(e), Some(Some(_)))
    }

    /// Returns the first live node in creation order, if any.
    pub fn first_node(&self) -> Option<NodeId> {
        self.nodes().next()
    }

    /// Iterates over live nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|_| id))
    }

    /// Iterates over live edges in creation order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|_| id))
    }

    /// Returns the source node of edge `e`.
    ///
    /// # Panics
    /// Panics if `e` is not a live edge.
    pub fn source(&self, e: EdgeId) -> NodeId {
        self.edge(e).source
    }

    /// Returns the target node of edge `e`.
    ///
    /// # Panics
    /// Panics if `e` is not a live edge.
    pub fn target(&self, e: EdgeId) -> NodeId {
        self.edge(e).target
    }

    /// Returns the end of `e` that is not `v`.
    pub fn opposite(&self, v: NodeId, e: EdgeId) -> NodeId {
        let edge = self.edge(e);
        if edge.source == v { edge.target } else { edge.source }
    }

    /// Returns all edges incident to `v` in insertion order.
    pub fn adjacent_edges(&self, v: NodeId) -> &[EdgeId] {
        &self.slot(v).adjacent
    }

    /// Iterates over the edges entering `v`.
    pub fn in_edges(&self, v: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.adjacent_edges(v)
            .iter()
            .copied()
            .filter(move |&e| self.target(e) == v)
    }

    /// Iterates over the edges leaving `v`.
    pub fn out_edges(&self, v: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        self.adjacent_edges(v)
            .iter()
            .copied()
            .filter(move |&e| self.source(e) == v)
    }

    /// Iterates over the targets of the edges leaving `v`.
    pub fn children(&self, v: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.out_edges(v).map(|e| self.target(e))
    }

    /// Returns the first edge entering `v`, if any.
    pub fn first_in_edge(&self, v: NodeId) -> Option<EdgeId> {
        self.in_edges(v).next()
    }

    /// Returns the number of edges incident to `v`.
    pub fn degree(&self, v: NodeId) -> usize {
        self.adjacent_edges(v).len()
    }

    /// Returns the number of edges entering `v`.
    pub fn in_degree(&self, v: NodeId) -> usize {
        self.in_edges(v).count()
    }

    /// Returns the number of edges leaving `v`.
    pub fn out_degree(&self, v: NodeId) -> usize {
        self.out_edges(v).count()
    }

    /// Returns a live edge between `u` and `v` (either direction), if any.
    pub fn find_edge(&self, u: NodeId, v: NodeId) -> Option<EdgeId> {
        self.adjacent_edges(u)
            .iter()
            .copied()
            .find(|&e| self.opposite(u, e) == v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deleted_ids_are_not_reused() {
        let mut graph = Graph::new();
        let a = graph.new_node();
        let b = graph.new_node();
        let e = graph.new_edge(a, b);
        graph.delete_node(b);

        assert!(!graph.contains_edge(e));
        assert_eq!(graph.degree(a), 0);

        let c = graph.new_node();
        assert_ne!(c, b);
        assert_eq!(graph.number_of_nodes(), 2);
        assert_eq!(graph.nodes().collect::<Vec<_>>(), vec![a, c]);
    }

    #[test]
    fn adjacency_keeps_insertion_order() {
        let mut graph = Graph::new();
        let v = graph.new_node();
        let w: Vec<_> = (0..3).map(|_| graph.new_node()).collect();
        let e0 = graph.new_edge(v, w[0]);
        let e1 = graph.new_edge(w[1], v);
        let e2 = graph.new_edge(v, w[2]);

        assert_eq!(graph.adjacent_edges(v), &[e0, e1, e2]);
        assert_eq!(graph.out_edges(v).collect::<Vec<_>>(), vec![e0, e2]);
        assert_eq!(graph.in_edges(v).collect::<Vec<_>>(), vec![e1]);
        assert_eq!(graph.opposite(v, e1), w[1]);
        assert_eq!(graph.find_edge(w[2], v), Some(e2));
    }
}
