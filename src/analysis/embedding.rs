//! Equal angle embedding of splits graphs.
//!
//! Given a cyclic ordering of the taxa, every split gets a direction that
//! depends only on where its taxa sit in the ordering. Each node is then
//! placed at the sum of the direction vectors (scaled by edge weight) of the
//! splits separating it from the node of the first taxon in the ordering.

use crate::model::{EdgeId, NodeArray, NodeId, PhyloSplitsGraph, TaxonId};
use fixedbitset::FixedBitSet;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::f64::consts::PI;

/// Seed of the angle noise generator; fixed so that embeddings are reproducible
const NOISE_SEED: u64 = 666;

/// Largest absolute angle noise in radians
const MAX_NOISE: f64 = 0.02;

/// Edge angles above this value are kept as they are
const ANGLE_EPSILON: f64 = 1e-11;

/// Coordinates are compared after rounding to this many parts per unit
const COINCIDENCE_SCALE: f64 = 1e8;

/// A point in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Returns this point moved `distance` into direction `angle`.
    pub fn translate_by_angle(self, angle: f64, distance: f64) -> Self {
        Self {
            x: self.x + angle.cos() * distance,
            y: self.y + angle.sin() * distance,
        }
    }
}

/// Options of the equal angle algorithm.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmbeddingOptions {
    /// Scale each edge by its weight instead of by 1
    pub use_weights: bool,
    /// Perturb split angles by a small reproducible amount, so that
    /// collinear edges do not overlap
    pub noise: bool,
}

impl Default for EmbeddingOptions {
    fn default() -> Self {
        Self {
            use_weights: true,
            noise: false,
        }
    }
}

/// Computes node coordinates of a splits graph with the equal angle
/// algorithm.
///
/// # Arguments
/// * `graph` - The splits graph; its cyclic ordering is replaced by `cycle`
///   and edges without angle get the angle of their split
/// * `cycle` - Cyclic ordering, `cycle[position] = taxon` with positions
///   `1..cycle.len()`; `cycle[0]` is ignored
/// * `options` - Weight scaling and noise
///
/// # Returns
/// The coordinates of all nodes reachable from the node carrying
/// `cycle[1]`, which is placed at the origin. Empty for an empty graph or
/// ordering, if the ordering has a position without taxon (0), or if no node
/// carries `cycle[1]`. The stored ordering is only replaced if coordinates
/// are computed.
///
/// Nodes that end up at the same coordinates are merged label-wise: the
/// label of the node placed later is appended to the one placed first and
/// then removed.
pub fn embed(graph: &mut PhyloSplitsGraph, cycle: &[TaxonId], options: &EmbeddingOptions) -> NodeArray<Option<Point>> {
    let mut coordinates = NodeArray::new(None);
    let num_taxa = cycle.len().saturating_sub(1);
    if graph.number_of_nodes() == 0 || num_taxa == 0 {
        return coordinates;
    }

    if let Some(position) = cycle.iter().skip(1).position(|&t| t == 0) {
        log::warn!("Cyclic ordering has no taxon at position {}, nothing to embed", position + 1);
        return coordinates;
    }
    let Some(start) = graph.taxon_to_node(cycle[1]) else {
        log::warn!("No node carries taxon {} at cyclic position 1, nothing to embed", cycle[1]);
        return coordinates;
    };
    graph.set_cycle(cycle);

    assign_angles_to_edges(graph, cycle, options);
    let placed = assign_coordinates_to_nodes(graph, start, options, &mut coordinates);
    merge_coincident_labels(graph, &placed, &coordinates);

    let placed_taxa: usize = graph
        .nodes()
        .filter(|&v| coordinates[v].is_some())
        .map(|v| graph.taxa(v).len())
        .sum();
    if placed_taxa != num_taxa {
        log::warn!("Embedded {placed_taxa} taxa, but cyclic ordering has {num_taxa}");
    }

    coordinates
}

/// Sets the angle of every edge that has none yet to the angle of its split.
fn assign_angles_to_edges(graph: &mut PhyloSplitsGraph, cycle: &[TaxonId], options: &EmbeddingOptions) {
    let num_taxa = cycle.len() - 1;
    let sides = graph.split_sides(cycle[1]);
    let mut rng = Pcg64Mcg::seed_from_u64(NOISE_SEED);

    for (&split, side) in &sides {
        let size = side.count_ones(..);
        if size == 0 {
            log::warn!("Split {split} has no taxa on the side away from taxon {}", cycle[1]);
            continue;
        }

        let (first, last) = run_in_cycle(side, cycle, size);
        let mut angle = PI * (first + last) as f64 / num_taxa as f64;
        if options.noise && size > 1 {
            angle += rng.random_range(-MAX_NOISE..MAX_NOISE);
        }

        for e in graph.edges_of_split(split) {
            if graph.angle(e) <= ANGLE_EPSILON {
                graph.set_angle(e, angle);
            }
        }
    }
}

/// Finds the cyclic positions of the first and last taxon of the run of
/// `size` consecutive taxa that form `side`. Warns if `side` is not
/// contiguous in the ordering.
fn run_in_cycle(side: &FixedBitSet, cycle: &[TaxonId], size: usize) -> (usize, usize) {
    let num_taxa = cycle.len() - 1;
    let contains = |position: usize| side.contains(cycle[position]);

    let first = (1..=num_taxa)
        .find(|&p| contains(p) && !contains(if p == 1 { num_taxa } else { p - 1 }))
        .unwrap_or(1);
    let last = first + size - 1;

    if last > num_taxa || !(first..=last).all(contains) {
        log::warn!("Split side is not contiguous in cyclic ordering, starting at position {first}");
    }
    (first, last)
}

/// Places all nodes reachable from `start` by a depth-first search that
/// crosses each split at most once along a path.
///
/// # Returns
/// The placed nodes in the order they were placed.
fn assign_coordinates_to_nodes(
    graph: &PhyloSplitsGraph,
    start: NodeId,
    options: &EmbeddingOptions,
    coordinates: &mut NodeArray<Option<Point>>,
) -> Vec<NodeId> {
    let max_split = graph.split_ids().last().copied().unwrap_or(0).max(0) as usize;
    let mut crossed = FixedBitSet::with_capacity(max_split + 1);

    let mut point = Point::default();
    coordinates.set(start, Some(point));
    let mut placed = vec![start];

    // (node, edge it was entered by, index of next adjacent edge)
    let mut stack: Vec<(NodeId, Option<EdgeId>, usize)> = vec![(start, None, 0)];
    while let Some(frame) = stack.last_mut() {
        let (v, entering, next) = *frame;

        match graph.adjacent_edges(v).get(next) {
            Some(&f) => {
                frame.2 += 1;
                let split = graph.split(f).max(0) as usize;
                let w = graph.opposite(v, f);
                if Some(f) == entering || coordinates[w].is_some() || split > 0 && crossed.contains(split) {
                    continue;
                }
                if split > 0 {
                    crossed.insert(split);
                }
                point = point.translate_by_angle(graph.angle(f), edge_length(graph, f, options));
                coordinates.set(w, Some(point));
                placed.push(w);
                stack.push((w, Some(f), 0));
            }
            None => {
                if let Some(f) = entering {
                    crossed.set(graph.split(f).max(0) as usize, false);
                    point = point.translate_by_angle(graph.angle(f), -edge_length(graph, f, options));
                }
                stack.pop();
            }
        }
    }
    placed
}

fn edge_length(graph: &PhyloSplitsGraph, e: EdgeId, options: &EmbeddingOptions) -> f64 {
    if options.use_weights { graph.weight(e) } else { 1.0 }
}

/// Appends the label of every placed node to the label of the node placed
/// first at the same coordinates, and clears it.
fn merge_coincident_labels(graph: &mut PhyloSplitsGraph, placed: &[NodeId], coordinates: &NodeArray<Option<Point>>) {
    let mut first_at: HashMap<(i64, i64), NodeId> = HashMap::new();

    for &v in placed {
        let Some(point) = coordinates[v] else {
            continue;
        };
        let key = (
            (point.x * COINCIDENCE_SCALE).round() as i64,
            (point.y * COINCIDENCE_SCALE).round() as i64,
        );
        match first_at.entry(key) {
            Entry::Vacant(entry) => {
                entry.insert(v);
            }
            Entry::Occupied(entry) => {
                let u = *entry.get();
                if let Some(label) = graph.label(v).map(str::to_string) {
                    let merged = match graph.label(u) {
                        Some(existing) => format!("{existing},{label}"),
                        None => label,
                    };
                    graph.set_label(u, Some(merged));
                    graph.set_label(v, None);
                }
            }
        }
    }
}
