use compact_str::CompactString;

/// Index into the arena `Vec<TreeNode>`. u32 keeps nodes compact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single record in the weighted tree, stored in a flat arena.
/// Uses sibling-list representation: each node has `first_child` and `next_sibling`.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Record name as given in the dataset
    pub name: CompactString,
    /// Index into the category table (leaves only)
    pub category_id: Option<u16>,
    /// Declared value (leaves only)
    pub value: Option<f64>,
    /// For leaves: the value (0 when undeclared). For internal nodes: sum of children.
    pub weight: f64,
    /// Whether this node is a leaf record
    pub is_leaf: bool,
    /// Parent node index (None for root)
    pub parent: Option<NodeId>,
    /// First child node index (None for leaves / empty groups)
    pub first_child: Option<NodeId>,
    /// Last child, kept so appends preserve input order in O(1)
    pub last_child: Option<NodeId>,
    /// Next sibling node index (None if last child)
    pub next_sibling: Option<NodeId>,
    /// Depth in the tree (root = 0)
    pub depth: u16,
}

impl TreeNode {
    pub fn group(name: &str) -> Self {
        Self {
            name: CompactString::new(name),
            category_id: None,
            value: None,
            weight: 0.0,
            is_leaf: false,
            parent: None,
            first_child: None,
            last_child: None,
            next_sibling: None,
            depth: 0,
        }
    }

    pub fn leaf(name: &str, category_id: u16, value: Option<f64>) -> Self {
        Self {
            category_id: Some(category_id),
            value,
            weight: value.unwrap_or(0.0),
            is_leaf: true,
            ..Self::group(name)
        }
    }
}

/// The weighted record tree stored as a flat arena of nodes.
#[derive(Debug, Clone)]
pub struct NodeTree {
    /// All nodes in contiguous memory; children always follow their parent
    pub nodes: Vec<TreeNode>,
    /// Root node index
    pub root: NodeId,
    /// Deduplicated category table in first-encountered order
    pub categories: Vec<CompactString>,
}

impl NodeTree {
    /// Create a tree holding only an (internal) root node.
    pub fn new(root_name: &str) -> Self {
        NodeTree {
            nodes: vec![TreeNode::group(root_name)],
            root: NodeId(0),
            categories: Vec::new(),
        }
    }

    /// Append a child under the given parent, after its existing children.
    pub fn add_child(&mut self, parent: NodeId, mut node: TreeNode) -> NodeId {
        let new_id = NodeId(self.nodes.len() as u32);
        node.parent = Some(parent);
        node.depth = self.nodes[parent.index()].depth + 1;
        node.next_sibling = None;

        match self.nodes[parent.index()].last_child {
            Some(last) => self.nodes[last.index()].next_sibling = Some(new_id),
            None => self.nodes[parent.index()].first_child = Some(new_id),
        }
        self.nodes[parent.index()].last_child = Some(new_id);

        self.nodes.push(node);
        new_id
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.index()]
    }

    /// Total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree holds nothing but its root.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Iterate over children of a node, in input order.
    pub fn children(&self, parent: NodeId) -> ChildIter<'_> {
        ChildIter {
            tree: self,
            current: self.nodes[parent.index()].first_child,
        }
    }

    /// Leaves in pre-order (the order they appear in the dataset).
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.get(id);
            if node.is_leaf {
                out.push(id);
                continue;
            }
            let children: Vec<NodeId> = self.children(id).collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Get or create a category ID for the given label.
    pub fn intern_category(&mut self, label: &str) -> u16 {
        if let Some(pos) = self.categories.iter().position(|c| c.as_str() == label) {
            pos as u16
        } else {
            let id = self.categories.len() as u16;
            self.categories.push(CompactString::new(label));
            id
        }
    }

    /// Category label of a leaf.
    pub fn category(&self, id: NodeId) -> Option<&str> {
        self.get(id)
            .category_id
            .and_then(|c| self.categories.get(c as usize))
            .map(|c| c.as_str())
    }

    /// Slash-separated path from the root, used in error messages and logs.
    pub fn path(&self, id: NodeId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = self.get(node_id);
            parts.push(node.name.as_str());
            current = node.parent;
        }
        parts.reverse();
        parts.join("/")
    }
}

/// Iterator over the children of a node.
pub struct ChildIter<'a> {
    tree: &'a NodeTree,
    current: Option<NodeId>,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.current?;
        self.current = self.tree.nodes[id.index()].next_sibling;
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn children_keep_insertion_order() {
        let mut tree = NodeTree::new("root");
        let cat = tree.intern_category("Games");
        let a = tree.add_child(tree.root, TreeNode::leaf("a", cat, Some(1.0)));
        let b = tree.add_child(tree.root, TreeNode::leaf("b", cat, Some(2.0)));
        let c = tree.add_child(tree.root, TreeNode::leaf("c", cat, Some(3.0)));

        let order: Vec<NodeId> = tree.children(tree.root).collect();
        assert_eq!(order, vec![a, b, c]);
        assert_eq!(tree.get(c).depth, 1);
    }

    #[test]
    fn leaves_are_pre_order() {
        let mut tree = NodeTree::new("root");
        let x = tree.intern_category("x");
        let g1 = tree.add_child(tree.root, TreeNode::group("g1"));
        let g2 = tree.add_child(tree.root, TreeNode::group("g2"));
        let l3 = tree.add_child(g2, TreeNode::leaf("l3", x, None));
        let l1 = tree.add_child(g1, TreeNode::leaf("l1", x, None));
        let l2 = tree.add_child(g1, TreeNode::leaf("l2", x, None));

        assert_eq!(tree.leaves(), vec![l1, l2, l3]);
        assert_eq!(tree.path(l3), "root/g2/l3");
    }

    #[test]
    fn categories_are_interned_once() {
        let mut tree = NodeTree::new("root");
        assert_eq!(tree.intern_category("Action"), 0);
        assert_eq!(tree.intern_category("Drama"), 1);
        assert_eq!(tree.intern_category("Action"), 0);
        assert_eq!(tree.categories.len(), 2);
    }
}
