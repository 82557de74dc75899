use super::arena::NodeTree;

/// Compute aggregated weights for all internal nodes (bottom-up).
/// After this, each internal node's `weight` equals the sum of its children's weights.
pub fn aggregate_weights(tree: &mut NodeTree) {
    // Children always have higher indices than their parents in the arena
    // (add_child pushes after the parent exists), so a reverse sweep sees
    // every child before its parent.
    let len = tree.nodes.len();
    for i in (0..len).rev() {
        let node = &tree.nodes[i];
        if node.is_leaf {
            continue;
        }

        let mut total = 0.0;
        let mut child = node.first_child;
        while let Some(child_id) = child {
            total += tree.nodes[child_id.index()].weight;
            child = tree.nodes[child_id.index()].next_sibling;
        }
        tree.nodes[i].weight = total;
    }
}

/// Sum of all leaf weights, computed independently of the aggregated root.
pub fn leaf_total(tree: &NodeTree) -> f64 {
    tree.nodes
        .iter()
        .filter(|n| n.is_leaf)
        .map(|n| n.weight)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::arena::TreeNode;

    #[test]
    fn internal_weight_is_sum_of_children() {
        let mut tree = NodeTree::new("root");
        let cat = tree.intern_category("c");
        let g = tree.add_child(tree.root, TreeNode::group("g"));
        tree.add_child(g, TreeNode::leaf("a", cat, Some(2.5)));
        tree.add_child(g, TreeNode::leaf("b", cat, Some(7.5)));
        tree.add_child(tree.root, TreeNode::leaf("c", cat, Some(5.0)));
        tree.add_child(tree.root, TreeNode::group("empty"));

        aggregate_weights(&mut tree);

        assert_eq!(tree.get(g).weight, 10.0);
        assert_eq!(tree.get(tree.root).weight, 15.0);
        assert_eq!(leaf_total(&tree), 15.0);
    }
}
