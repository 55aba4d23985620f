//! Label quoting for Newick output.

use std::borrow::Cow;

/// Checks if a label can be written without quotes.
///
/// # Returns
/// `false` if the label is empty or contains punctuation that ends an
/// unquoted label (`( ) [ ] , ; :`), a single quote, or whitespace
///
/// # Examples
/// ```
/// # use phylograph::parser::utils::is_plain_label;
/// assert!(is_plain_label("Pukeko"));
/// assert!(!is_plain_label("Swamp hen"));
/// assert!(!is_plain_label("Pu[ke]ko"));
/// ```
pub fn is_plain_label(label: &str) -> bool {
    !label.is_empty()
        && !label
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '(' | ')' | '[' | ']' | ',' | ';' | ':' | '\''))
}

/// Quotes a label for Newick output if necessary.
///
/// Labels that are not [plain](is_plain_label) are wrapped in single quotes,
/// with internal single quotes doubled.
///
/// # Examples
/// ```
/// # use phylograph::parser::utils::quote_label;
/// assert_eq!(quote_label("Pukeko"), "Pukeko");
/// assert_eq!(quote_label("Australasian Swamphen"), "'Australasian Swamphen'");
/// assert_eq!(quote_label("Baillon's crake"), "'Baillon''s crake'");
/// ```
pub fn quote_label(label: &str) -> Cow<'_, str> {
    if is_plain_label(label) {
        Cow::Borrowed(label)
    } else {
        Cow::Owned(format!("'{}'", label.replace('\'', "''")))
    }
}

/// Quotes an edge label for Newick output if necessary.
///
/// Edge labels are written in brackets and end at the first unquoted `]`,
/// so they are quoted if they contain `]` or a single quote, or if they
/// start or end with whitespace.
///
/// # Examples
/// ```
/// # use phylograph::parser::utils::quote_edge_label;
/// assert_eq!(quote_edge_label("bootstrap 95"), "bootstrap 95");
/// assert_eq!(quote_edge_label("[95]"), "'[95]'");
/// ```
pub fn quote_edge_label(label: &str) -> Cow<'_, str> {
    if label.contains([']', '\'']) || label.trim() != label {
        Cow::Owned(format!("'{}'", label.replace('\'', "''")))
    } else {
        Cow::Borrowed(label)
    }
}
