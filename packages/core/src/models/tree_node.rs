//! Nested tree views
//!
//! `TreeNode` is the transient, read-only shape produced by the tree
//! assembler. It owns copies of the node attributes plus the derived
//! `children` list and holds no reference back to the store or to its parent.

use serde::Serialize;

use super::node::{Node, NodeId};

/// A node together with its assembled children.
///
/// Serializes flat: the node's attributes followed by a `children` array,
/// which is always present (empty for leaves).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreeNode {
    #[serde(flatten)]
    pub node: Node,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub fn new(node: Node) -> Self {
        Self {
            node,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.node.id
    }

    /// Iterate this subtree in pre-order (node before its children, children
    /// in assembled order). Uses an explicit stack, so depth is unbounded.
    pub fn iter_preorder(&self) -> PreorderIter<'_> {
        PreorderIter { stack: vec![self] }
    }

    /// Number of nodes in this subtree, including self
    pub fn subtree_len(&self) -> usize {
        self.iter_preorder().count()
    }
}

impl Drop for TreeNode {
    // Flatten before dropping; the derived drop would recurse once per level
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut child) = pending.pop() {
            pending.append(&mut child.children);
        }
    }
}

/// Pre-order iterator over a [`TreeNode`] subtree
pub struct PreorderIter<'a> {
    stack: Vec<&'a TreeNode>,
}

impl<'a> Iterator for PreorderIter<'a> {
    type Item = &'a TreeNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        self.stack.extend(current.children.iter().rev());
        Some(current)
    }
}
