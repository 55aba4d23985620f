//! Algorithms on phylogenetic graphs.
//!
//! * [lsa] - lowest stable ancestors and the LSA tree of rooted networks
//! * [embedding] - equal angle embedding of splits graphs
//! * [homoplasy] - homoplasy score of a split on a tree

pub mod embedding;
pub mod homoplasy;
pub mod lsa;

pub use embedding::{EmbeddingOptions, Point, embed};
pub use homoplasy::{HomoplasyError, homoplasy_score};
pub use lsa::{
    breadth_first_lsa, compute_lsa_children, compute_reticulation_to_lsa, post_order_lsa, pre_order_lsa,
};
