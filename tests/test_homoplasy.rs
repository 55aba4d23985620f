use fixedbitset::FixedBitSet;
use phylograph::analysis::{HomoplasyError, homoplasy_score};
use phylograph::model::PhyloTree;
use phylograph::newick::parse_str;

fn tree_with_taxa(newick: &str, rooted: bool) -> PhyloTree {
    let mut tree = parse_str(newick, rooted).unwrap();
    tree.assign_taxa_by_label(&["1", "2", "3", "4", "5", "6"]);
    tree
}

fn set(taxa: &[usize]) -> FixedBitSet {
    taxa.iter().copied().collect()
}

// --- TESTS SCORES ---
#[test]
fn test_compatible_split_scores_zero() {
    let tree = tree_with_taxa("((1,2),(3,4));", true);
    assert_eq!(homoplasy_score(&tree, &set(&[1, 2]), &set(&[3, 4]), None), Ok(0));
}

#[test]
fn test_star_tree_scores_one() {
    let tree = tree_with_taxa("(1,2,3,4);", true);
    assert_eq!(homoplasy_score(&tree, &set(&[1, 2]), &set(&[3, 4]), None), Ok(1));
}

#[test]
fn test_incompatible_split() {
    let tree = tree_with_taxa("(((1,2),3),4);", true);
    assert_eq!(homoplasy_score(&tree, &set(&[1, 3]), &set(&[2, 4]), None), Ok(1));
    assert_eq!(homoplasy_score(&tree, &set(&[1, 2]), &set(&[3, 4]), None), Ok(0));

    let tree = tree_with_taxa("((((1,2),3),4),(5,6));", true);
    assert_eq!(homoplasy_score(&tree, &set(&[1, 3, 5]), &set(&[2, 4, 6]), None), Ok(2));
}

#[test]
fn test_score_does_not_depend_on_start_node() {
    let tree = tree_with_taxa("((((1,2),3),4),(5,6));", true);
    let a = set(&[1, 4, 5]);
    let b = set(&[2, 3, 6]);
    let expected = homoplasy_score(&tree, &a, &b, None).unwrap();

    for v in tree.nodes() {
        assert_eq!(homoplasy_score(&tree, &a, &b, Some(v)), Ok(expected), "start at {v}");
    }
}

#[test]
fn test_unrooted_tree() {
    let tree = tree_with_taxa("((1,2),(3,4));", false);
    assert_eq!(homoplasy_score(&tree, &set(&[1, 3]), &set(&[2, 4]), None), Ok(1));
    assert_eq!(homoplasy_score(&tree, &set(&[1, 2]), &set(&[3, 4]), None), Ok(0));
}

#[test]
fn test_taxa_on_inner_node() {
    // Taxon 3 sits on the inner node joining 1 and 2
    let tree = tree_with_taxa("((1,2)3,(4,5));", true);
    assert_eq!(homoplasy_score(&tree, &set(&[1, 2, 3]), &set(&[4, 5]), None), Ok(0));
    assert_eq!(homoplasy_score(&tree, &set(&[1, 2, 4]), &set(&[3, 5]), None), Ok(1));
}

#[test]
fn test_node_with_taxa_of_both_sides() {
    // Leaf X carries taxon 1 of side A and taxon 3 of side B
    let mut tree = parse_str("((X,2),4);", true).unwrap();
    let node = |label: &str| tree.nodes().find(|&v| tree.label(v) == Some(label)).unwrap();
    let (x, two, four) = (node("X"), node("2"), node("4"));
    tree.add_taxon(x, 1);
    tree.add_taxon(x, 3);
    tree.add_taxon(two, 2);
    tree.add_taxon(four, 4);

    let a = set(&[1, 2]);
    let b = set(&[3, 4]);
    assert_eq!(homoplasy_score(&tree, &a, &b, None), Ok(1));
    assert_eq!(homoplasy_score(&tree, &a, &b, Some(x)), Ok(1));
}

// --- TESTS DEGENERATE INPUTS ---
#[test]
fn test_degenerate_inputs_score_zero() {
    let tree = tree_with_taxa("(((1,2),3),4);", true);

    // A side with at most one taxon
    assert_eq!(homoplasy_score(&tree, &set(&[1]), &set(&[2, 3, 4]), None), Ok(0));
    assert_eq!(homoplasy_score(&tree, &set(&[]), &set(&[1, 2, 3, 4]), None), Ok(0));

    // At most one taxon of the tree on a side
    assert_eq!(homoplasy_score(&tree, &set(&[1, 5]), &set(&[2, 3, 4]), None), Ok(0));

    // Fewer than two nodes
    let mut single = PhyloTree::new();
    let v = single.new_labeled_node("1");
    single.add_taxon(v, 1);
    assert_eq!(homoplasy_score(&single, &set(&[1, 2]), &set(&[3, 4]), None), Ok(0));
}

// --- TESTS ERRORS ---
#[test]
fn test_taxon_not_in_split() {
    let tree = tree_with_taxa("((1,2),(3,(4,5)));", true);
    assert_eq!(
        homoplasy_score(&tree, &set(&[1, 2]), &set(&[3, 4]), None),
        Err(HomoplasyError::TaxonNotInSplit(5))
    );
}

#[test]
fn test_invalid_root() {
    let tree = tree_with_taxa("((1,2),(3,4));", true);
    let err = homoplasy_score(&tree, &set(&[1, 2]), &set(&[3, 4]), Some(99)).unwrap_err();
    assert_eq!(err, HomoplasyError::InvalidRoot(99));
    assert_eq!(err.to_string(), "No node with id 99 in tree");
}
