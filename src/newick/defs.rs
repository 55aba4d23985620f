//! Constants for Newick parsing and writing.

/// Bytes ending an unquoted node label: parentheses, comma, colon,
/// semicolon, and `[` (start of an edge label)
pub(crate) const NEWICK_LABEL_DELIMITERS: &[u8] = b"(),:;[";

/// Bytes ending an unquoted edge label
pub(crate) const EDGE_LABEL_DELIMITERS: &[u8] = b"]";

/// Bytes ending an edge weight (besides whitespace)
pub(crate) const NEWICK_WEIGHT_DELIMITERS: &[u8] = b"(),:;[]";

/// Weight given to both edges of an unlabeled bifurcating root when the
/// input carries no weights at all
pub(crate) const DEFAULT_ROOT_EDGE_WEIGHT: f64 = 0.5;

/// Smallest weight an acceptor edge is given so that it stays positive
pub(crate) const MIN_ACCEPTOR_WEIGHT: f64 = 1e-6;

/// Written for a leaf without label
pub(crate) const UNLABELED_LEAF: &str = "?";
