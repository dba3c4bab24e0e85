//! Declaration tree
//!
//! One [`Tree`] per extracted declaration. Nodes live in an arena and are addressed by
//! [`NodeId`]; a parent owns its children through their ids, and the child's `parent` link is
//! a plain index used only to walk upwards.
//!
//! Nodes are pushed in the order their opening lines are met, which is pre-order, and the tree
//! is never mutated once the builder hands it out.

use crate::unnest::line::Line;

/// Index of a node inside its [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

/// One declaration or nested block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<'src> {
    /// Quoted label of the opening line.
    pub name: String,
    /// Lines inside this node's braces and outside every child's braces, in source order.
    /// Starts with the opening line and ends with the node's own closing line.
    pub owned_lines: Vec<Line<'src>>,
    /// Column of the nested-block marker on the opening line; 0 for the root.
    pub indent: usize,
    /// How many leading owned lines are structural: the opening line, plus a lone opening
    /// brace on the next line for brace-on-its-own-line blocks.
    pub header_len: usize,
    pub children: Vec<NodeId>,
    pub parent: Option<NodeId>,
}

impl<'src> Node<'src> {
    pub(crate) fn new(name: String, indent: usize, parent: Option<NodeId>) -> Self {
        Node {
            name,
            owned_lines: Vec::new(),
            indent,
            header_len: 1,
            children: Vec::new(),
            parent,
        }
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The line that opened this node.
    pub fn opening_line(&self) -> Option<&Line<'src>> {
        self.owned_lines.first()
    }

    /// The node's own closing line.
    pub fn closing_line(&self) -> Option<&Line<'src>> {
        self.owned_lines.last()
    }

    /// Owned lines minus the structural header and the closing line.
    pub fn body(&self) -> &[Line<'src>] {
        let end = self.owned_lines.len().saturating_sub(1);
        let start = self.header_len.min(end);
        &self.owned_lines[start..end]
    }
}

/// A declaration and its nested blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree<'src> {
    nodes: Vec<Node<'src>>,
}

impl<'src> Tree<'src> {
    pub(crate) fn with_root(root: Node<'src>) -> Self {
        Tree { nodes: vec![root] }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node<'src> {
        &mut self.nodes[id.0]
    }

    /// Push `node` and register it as the last child of its parent.
    pub(crate) fn attach(&mut self, node: Node<'src>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let parent = node.parent;
        self.nodes.push(node);
        if let Some(parent) = parent {
            self.nodes[parent.0].children.push(id);
        }
        id
    }

    pub fn root_id(&self) -> NodeId {
        NodeId(0)
    }

    pub fn root(&self) -> &Node<'src> {
        &self.nodes[0]
    }

    pub fn node(&self, id: NodeId) -> &Node<'src> {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Depth-first, pre-order walk from the root.
    pub fn preorder(&self) -> Preorder<'_, 'src> {
        Preorder {
            tree: self,
            stack: vec![self.root_id()],
        }
    }

    /// Leaves in pre-order, i.e. in the order their paths first appear in the source.
    pub fn leaves(&self) -> Vec<NodeId> {
        self.preorder()
            .filter(|id| self.node(*id).is_leaf())
            .collect()
    }

    /// Chain from the root down to `id`, both included.
    pub fn ancestry(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = vec![id];
        let mut current = self.node(id).parent;
        while let Some(parent) = current {
            chain.push(parent);
            current = self.node(parent).parent;
        }
        chain.reverse();
        chain
    }

    /// Number of edges between the root and `id`.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestry(id).len() - 1
    }
}

/// Iterator returned by [`Tree::preorder`].
pub struct Preorder<'t, 'src> {
    tree: &'t Tree<'src>,
    stack: Vec<NodeId>,
}

impl<'t, 'src> Iterator for Preorder<'t, 'src> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.node(id).children.iter().rev().copied());
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> Tree<'static> {
        // root
        // ├── a
        // │   ├── a1
        // │   └── a2
        // └── b
        let mut tree = Tree::with_root(Node::new("root".into(), 0, None));
        let root = tree.root_id();
        let a = tree.attach(Node::new("a".into(), 2, Some(root)));
        tree.attach(Node::new("a1".into(), 4, Some(a)));
        tree.attach(Node::new("a2".into(), 4, Some(a)));
        tree.attach(Node::new("b".into(), 2, Some(root)));
        tree
    }

    fn names(tree: &Tree, ids: impl Iterator<Item = NodeId>) -> Vec<String> {
        ids.map(|id| tree.node(id).name.clone()).collect()
    }

    #[test]
    fn test_preorder() {
        let tree = sample_tree();
        assert_eq!(
            names(&tree, tree.preorder()),
            vec!["root", "a", "a1", "a2", "b"]
        );
    }

    #[test]
    fn test_leaves() {
        let tree = sample_tree();
        assert_eq!(names(&tree, tree.leaves().into_iter()), vec!["a1", "a2", "b"]);
    }

    #[test]
    fn test_ancestry_and_depth() {
        let tree = sample_tree();
        let a2 = NodeId(3);
        assert_eq!(
            names(&tree, tree.ancestry(a2).into_iter()),
            vec!["root", "a", "a2"]
        );
        assert_eq!(tree.depth(a2), 2);
        assert_eq!(tree.depth(tree.root_id()), 0);
    }

    #[test]
    fn test_body_skips_header_and_close() {
        let mut node = Node::new("n".into(), 2, None);
        node.owned_lines = vec![
            Line::new(0, "  SUBCASE(\"n\")\n"),
            Line::new(1, "  {\n"),
            Line::new(2, "    x();\n"),
            Line::new(3, "  }\n"),
        ];
        node.header_len = 2;
        assert_eq!(node.body(), &[Line::new(2, "    x();\n")]);
    }
}
