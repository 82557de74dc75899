pub mod aggregate;
pub mod arena;
pub mod raw;

use self::arena::{NodeId, NodeTree, TreeNode};
use self::raw::RawNode;
use crate::error::{Result, TreemapError};

/// Build a weighted NodeTree from a raw dataset tree.
///
/// The root is always an internal node. Below it, a record is a leaf iff it
/// has no `children` key. Leaf values are validated here and nowhere else;
/// the first bad value aborts the build, so no partial tree escapes.
pub fn build_tree(raw: &RawNode) -> Result<NodeTree> {
    let mut tree = NodeTree::new(&raw.name);

    if raw.value.is_some() {
        tracing::debug!("Ignoring value declared on root '{}'", raw.name);
    }

    // Iterative walk (parent id, parent name, record) so deep datasets
    // cannot overflow the stack. Children are pushed in reverse to keep
    // input order when popping.
    let mut stack: Vec<(NodeId, &str, &RawNode)> = Vec::new();
    if let Some(children) = &raw.children {
        for child in children.iter().rev() {
            stack.push((tree.root, raw.name.as_str(), child));
        }
    }

    while let Some((parent, parent_name, record)) = stack.pop() {
        match &record.children {
            None => {
                let at = format!("{}/{}", tree.path(parent), record.name);
                let value = match &record.value {
                    Some(v) => Some(v.to_weight(&at)?),
                    None => {
                        tracing::debug!("Leaf '{}' has no value, weight 0", at);
                        None
                    }
                };
                let label = record.category.as_deref().unwrap_or(parent_name);
                if tree.categories.len() >= u16::MAX as usize
                    && !tree.categories.iter().any(|c| c.as_str() == label)
                {
                    return Err(TreemapError::invalid_data(at, "too many distinct categories"));
                }
                let category = tree.intern_category(label);
                tree.add_child(parent, TreeNode::leaf(&record.name, category, value));
            }
            Some(children) => {
                if record.value.is_some() {
                    tracing::debug!(
                        "Ignoring value declared on group '{}'; weight comes from its children",
                        record.name
                    );
                }
                let id = tree.add_child(parent, TreeNode::group(&record.name));
                for child in children.iter().rev() {
                    stack.push((id, record.name.as_str(), child));
                }
            }
        }
    }

    // Pre-order insertion already guarantees children follow parents,
    // which is all aggregate_weights needs.
    aggregate::aggregate_weights(&mut tree);

    // Finite leaves can still sum past f64::MAX. Parents never outweigh
    // the root, so checking the root covers every group.
    let total = tree.get(tree.root).weight;
    if !total.is_finite() {
        return Err(TreemapError::invalid_data(
            raw.name.as_str(),
            format!("total weight {total} is not finite"),
        ));
    }

    let leaf_count = tree.nodes.iter().filter(|n| n.is_leaf).count();
    tracing::info!(
        "Tree built: '{}' with {} nodes, {} leaves, {} categories, total weight {}",
        raw.name,
        tree.len(),
        leaf_count,
        tree.categories.len(),
        tree.get(tree.root).weight
    );

    Ok(tree)
}
