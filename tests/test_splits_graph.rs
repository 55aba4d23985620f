use fixedbitset::FixedBitSet;
use phylograph::analysis::{EmbeddingOptions, Point, embed};
use phylograph::model::{EdgeId, NodeId, PhyloSplitsGraph};
use std::f64::consts::PI;

const EPSILON: f64 = 1e-9;

/// Splits network on taxa 1..=4 with trivial splits 1-4 and the two
/// compatible-with-the-cycle splits 5 = {1,2}|{3,4} and 6 = {1,4}|{2,3}.
///
/// ```text
/// L1 --1-- p --5-- q --4-- L4
///          |       |
///          6       6
///          |       |
/// L2 --2-- t --5-- r --3-- L3
/// ```
struct BoxNetwork {
    graph: PhyloSplitsGraph,
    leaves: [NodeId; 4],
    p: NodeId,
    q: NodeId,
    r: NodeId,
    t: NodeId,
    edges: Vec<EdgeId>,
}

fn box_graph() -> BoxNetwork {
    let mut graph = PhyloSplitsGraph::new();
    let leaves = [
        graph.new_labeled_node("L1"),
        graph.new_labeled_node("L2"),
        graph.new_labeled_node("L3"),
        graph.new_labeled_node("L4"),
    ];
    for (i, &v) in leaves.iter().enumerate() {
        graph.add_taxon(v, i + 1);
    }
    let p = graph.new_labeled_node("p");
    let q = graph.new_node();
    let r = graph.new_node();
    let t = graph.new_labeled_node("t");

    let mut edges = Vec::new();
    for (source, target, split) in [
        (leaves[0], p, 1),
        (p, q, 5),
        (t, r, 5),
        (p, t, 6),
        (q, r, 6),
        (t, leaves[1], 2),
        (r, leaves[2], 3),
        (q, leaves[3], 4),
    ] {
        let e = graph.new_edge(source, target);
        graph.set_split(e, split);
        edges.push(e);
    }

    BoxNetwork {
        graph,
        leaves,
        p,
        q,
        r,
        t,
        edges,
    }
}

fn bits(taxa: &[usize]) -> Vec<usize> {
    let mut taxa = taxa.to_vec();
    taxa.sort();
    taxa
}

fn ones(set: &FixedBitSet) -> Vec<usize> {
    set.ones().collect()
}

fn assert_close(actual: Point, expected: Point) {
    assert!(
        (actual.x - expected.x).abs() < EPSILON && (actual.y - expected.y).abs() < EPSILON,
        "expected {expected:?}, got {actual:?}"
    );
}

// --- TESTS SPLIT QUERIES ---
#[test]
fn test_split_ids() {
    let b = box_graph();
    assert_eq!(b.graph.split_ids(), vec![1, 2, 3, 4, 5, 6]);
    assert_eq!(b.graph.number_of_splits(), 6);
    assert_eq!(b.graph.edges_of_split(5), vec![b.edges[1], b.edges[2]]);
    assert_eq!(b.graph.an_edge_of_split(6), Some(b.edges[3]));
    assert_eq!(b.graph.an_edge_of_split(9), None);
}

#[test]
fn test_split_sides() {
    let b = box_graph();
    let sides = b.graph.split_sides(1);

    assert_eq!(sides.len(), 6);
    assert_eq!(ones(&sides[&1]), bits(&[2, 3, 4]));
    assert_eq!(ones(&sides[&2]), bits(&[2]));
    assert_eq!(ones(&sides[&3]), bits(&[3]));
    assert_eq!(ones(&sides[&4]), bits(&[4]));
    assert_eq!(ones(&sides[&5]), bits(&[3, 4]));
    assert_eq!(ones(&sides[&6]), bits(&[2, 3]));
}

#[test]
fn test_split_sides_from_other_taxon() {
    let b = box_graph();
    let sides = b.graph.split_sides(3);

    assert_eq!(ones(&sides[&3]), bits(&[1, 2, 4]));
    assert_eq!(ones(&sides[&5]), bits(&[1, 2]));
    assert_eq!(ones(&sides[&6]), bits(&[1, 4]));
}

#[test]
fn test_split_sides_unknown_taxon() {
    let b = box_graph();
    let sides = b.graph.split_sides(9);
    assert_eq!(sides.len(), 6);
    assert!(sides.values().all(|side| side.count_ones(..) == 0));
}

// --- TESTS SPLIT REMOVAL ---
#[test]
fn test_remove_split() {
    let mut b = box_graph();
    let contracted = b.graph.remove_split(6);

    assert_eq!(contracted, 2);
    assert_eq!(b.graph.number_of_nodes(), 6);
    assert_eq!(b.graph.number_of_edges(), 5);
    assert_eq!(b.graph.split_ids(), vec![1, 2, 3, 4, 5]);
    assert_eq!(b.graph.edges_of_split(5).len(), 1);

    // t merged into p, r merged into q
    assert!(!b.graph.contains_node(b.t));
    assert!(!b.graph.contains_node(b.r));
    assert_eq!(b.graph.label(b.p), Some("p,t"));
    assert_eq!(b.graph.degree(b.p), 3);
    assert_eq!(b.graph.degree(b.q), 3);
    assert!(b.graph.find_edge(b.p, b.leaves[1]).is_some());
    assert!(b.graph.find_edge(b.q, b.leaves[2]).is_some());

    // Taxa still sit on their leaves, and the sides still agree
    assert_eq!(b.graph.taxon_to_node(2), Some(b.leaves[1]));
    let sides = b.graph.split_sides(1);
    assert_eq!(ones(&sides[&5]), bits(&[3, 4]));
}

#[test]
fn test_remove_split_moves_taxa() {
    let mut b = box_graph();
    b.graph.remove_split(2);

    assert!(!b.graph.contains_node(b.leaves[1]));
    assert_eq!(b.graph.taxon_to_node(2), Some(b.t));
    assert_eq!(b.graph.label(b.t), Some("t,L2"));
    assert_eq!(b.graph.number_of_splits(), 5);
}

#[test]
fn test_remove_missing_split() {
    let mut b = box_graph();
    assert_eq!(b.graph.remove_split(42), 0);
    assert_eq!(b.graph.number_of_edges(), 8);
}

#[test]
fn test_copy_compacted_after_removal() {
    let mut b = box_graph();
    b.graph.remove_split(6);
    let (copy, node_map, _) = b.graph.copy_compacted();

    assert_eq!(copy.number_of_nodes(), 6);
    assert_eq!(copy.node_capacity(), 6);
    assert_eq!(copy.number_of_splits(), 5);
    let p = node_map[b.p].unwrap();
    assert_eq!(copy.label(p), Some("p,t"));
    assert_eq!(copy.taxon_to_node(1), node_map[b.leaves[0]]);
}

// --- TESTS EMBEDDING ---
#[test]
fn test_embed_box() {
    let mut b = box_graph();
    let options = EmbeddingOptions {
        use_weights: false,
        noise: false,
    };
    let coordinates = b.graph.embed(&[0, 1, 2, 3, 4], &options);

    // Split angles are PI * (first + last) / 4 over cyclic positions
    let expected_angles = [(1, 1.5 * PI), (2, PI), (3, 1.5 * PI), (4, 2.0 * PI), (5, 1.75 * PI), (6, 1.25 * PI)];
    for (split, angle) in expected_angles {
        for e in b.graph.edges_of_split(split) {
            assert!((b.graph.angle(e) - angle).abs() < EPSILON, "split {split}");
        }
    }

    let origin = Point::new(0.0, 0.0);
    let p = origin.translate_by_angle(1.5 * PI, 1.0);
    let q = p.translate_by_angle(1.75 * PI, 1.0);
    let t = p.translate_by_angle(1.25 * PI, 1.0);
    let r = q.translate_by_angle(1.25 * PI, 1.0);

    assert_close(coordinates[b.leaves[0]].unwrap(), origin);
    assert_close(coordinates[b.p].unwrap(), p);
    assert_close(coordinates[b.q].unwrap(), q);
    assert_close(coordinates[b.t].unwrap(), t);
    assert_close(coordinates[b.r].unwrap(), r);
    assert_close(coordinates[b.leaves[1]].unwrap(), t.translate_by_angle(PI, 1.0));
    assert_close(coordinates[b.leaves[2]].unwrap(), r.translate_by_angle(1.5 * PI, 1.0));
    assert_close(coordinates[b.leaves[3]].unwrap(), q.translate_by_angle(2.0 * PI, 1.0));

    // Parallel edges of a split have the same length and direction
    let r = coordinates[b.r].unwrap();
    let t = coordinates[b.t].unwrap();
    let q = coordinates[b.q].unwrap();
    let p = coordinates[b.p].unwrap();
    assert!((r.x - t.x - (q.x - p.x)).abs() < EPSILON);
    assert!((r.y - t.y - (q.y - p.y)).abs() < EPSILON);

    assert_eq!(b.graph.cycle(), vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_embed_uses_weights() {
    let mut b = box_graph();
    b.graph.set_weight(b.edges[0], 2.0);
    let coordinates = b.graph.embed(&[0, 1, 2, 3, 4], &EmbeddingOptions::default());

    assert_close(coordinates[b.p].unwrap(), Point::new(0.0, 0.0).translate_by_angle(1.5 * PI, 2.0));
}

#[test]
fn test_embed_keeps_existing_angles() {
    let mut b = box_graph();
    b.graph.set_angle(b.edges[5], 0.75);
    let options = EmbeddingOptions {
        use_weights: false,
        noise: false,
    };
    let coordinates = b.graph.embed(&[0, 1, 2, 3, 4], &options);

    assert_eq!(b.graph.angle(b.edges[5]), 0.75);
    let t = coordinates[b.t].unwrap();
    assert_close(coordinates[b.leaves[1]].unwrap(), t.translate_by_angle(0.75, 1.0));
}

#[test]
fn test_embed_noise_is_reproducible() {
    let options = EmbeddingOptions {
        use_weights: false,
        noise: true,
    };
    let mut first = box_graph();
    let mut second = box_graph();
    let mut plain = box_graph();

    let a = first.graph.embed(&[0, 1, 2, 3, 4], &options);
    let b = second.graph.embed(&[0, 1, 2, 3, 4], &options);
    let c = plain.graph.embed(
        &[0, 1, 2, 3, 4],
        &EmbeddingOptions {
            use_weights: false,
            noise: false,
        },
    );

    for v in first.graph.nodes() {
        assert_eq!(a[v], b[v]);
    }
    // Only splits with more than one taxon on a side are perturbed
    assert_ne!(a[first.p], c[plain.p]);
    assert_eq!(first.graph.angle(first.edges[5]), plain.graph.angle(plain.edges[5]));
}

#[test]
fn test_repeated_embedding_is_identical() {
    for noise in [false, true] {
        let options = EmbeddingOptions {
            use_weights: true,
            noise,
        };
        let mut b = box_graph();
        let first = b.graph.embed(&[0, 1, 2, 3, 4], &options);
        let angles: Vec<f64> = b.edges.iter().map(|&e| b.graph.angle(e)).collect();
        let second = b.graph.embed(&[0, 1, 2, 3, 4], &options);

        for v in b.graph.nodes() {
            assert!(first[v].is_some());
            assert_eq!(first[v], second[v], "node {v}, noise {noise}");
        }
        let angles_again: Vec<f64> = b.edges.iter().map(|&e| b.graph.angle(e)).collect();
        assert_eq!(angles, angles_again);
    }
}

#[test]
fn test_embed_with_stored_cycle() {
    let mut stored = box_graph();
    stored.graph.set_cycle(&[0, 1, 2, 3, 4]);
    let options = EmbeddingOptions::default();
    let a = stored.graph.embed_with_stored_cycle(&options);

    let mut given = box_graph();
    let b = embed(&mut given.graph, &[0, 1, 2, 3, 4], &options);

    for v in stored.graph.nodes() {
        assert_eq!(a[v], b[v]);
    }
}

#[test]
fn test_embed_merges_labels_of_coincident_nodes() {
    let mut graph = PhyloSplitsGraph::new();
    let a = graph.new_labeled_node("A");
    let b = graph.new_labeled_node("B");
    graph.add_taxon(a, 1);
    graph.add_taxon(b, 2);
    let e = graph.new_edge(a, b);
    graph.set_split(e, 1);
    graph.set_weight(e, 0.0);

    let coordinates = graph.embed(&[0, 1, 2], &EmbeddingOptions::default());
    assert_eq!(coordinates[a], coordinates[b]);
    assert_eq!(graph.label(a), Some("A,B"));
    assert_eq!(graph.label(b), None);
}

#[test]
fn test_embed_merges_labels_in_placement_order() {
    // The node placed first is not the first node of the graph
    let mut graph = PhyloSplitsGraph::new();
    let b = graph.new_labeled_node("B");
    let a = graph.new_labeled_node("A");
    graph.add_taxon(a, 1);
    graph.add_taxon(b, 2);
    let e = graph.new_edge(b, a);
    graph.set_split(e, 1);
    graph.set_weight(e, 0.0);

    graph.embed(&[0, 1, 2], &EmbeddingOptions::default());
    assert_eq!(graph.label(a), Some("A,B"));
    assert_eq!(graph.label(b), None);
}

#[test]
fn test_embed_degenerate_inputs() {
    let options = EmbeddingOptions::default();

    let mut empty = PhyloSplitsGraph::new();
    let coordinates = empty.embed(&[0, 1], &options);
    assert_eq!(coordinates[0], None);

    let mut b = box_graph();
    let coordinates = b.graph.embed(&[0], &options);
    assert!(b.graph.nodes().all(|v| coordinates[v].is_none()));

    // No node carries the first taxon of the ordering
    let coordinates = b.graph.embed(&[0, 9, 1, 2], &options);
    assert!(b.graph.nodes().all(|v| coordinates[v].is_none()));
    assert_eq!(b.graph.taxon_cycle(9), None);
    assert_eq!(b.graph.cycle(), vec![0]);
}

#[test]
fn test_embed_with_stored_cycle_with_gaps() {
    let mut b = box_graph();
    b.graph.set_taxon_cycle(1, 1);
    b.graph.set_taxon_cycle(2, 3);

    let coordinates = b.graph.embed_with_stored_cycle(&EmbeddingOptions::default());
    assert!(b.graph.nodes().all(|v| coordinates[v].is_none()));
    assert_eq!(b.graph.cycle(), vec![0, 1, 0, 2]);

    let coordinates = b.graph.embed(&[0, 1, 0, 2], &EmbeddingOptions::default());
    assert!(b.graph.nodes().all(|v| coordinates[v].is_none()));
}
