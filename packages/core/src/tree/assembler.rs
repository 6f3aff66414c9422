//! Tree assembly from a flat adjacency list
//!
//! Converts a snapshot of nodes into nested [`TreeNode`] views. Assembly runs
//! in linear passes over an index arena (id → snapshot position, position →
//! child positions) and materializes the nested output bottom-up from an
//! explicit pre-order, so no step recurses on tree depth.
//!
//! # Root Semantics
//!
//! A node is a display root when its `parent_id` is `None` or points at an id
//! that is not in the snapshot (a dangling link). Children keep the relative
//! order they have in the snapshot.

use std::collections::HashMap;

use crate::models::{Node, NodeId, TreeNode};

/// Index over a snapshot: position of each id plus child positions per node
struct Arena<'a> {
    nodes: &'a [Node],
    index: HashMap<NodeId, usize>,
    children: Vec<Vec<usize>>,
}

impl<'a> Arena<'a> {
    fn build(nodes: &'a [Node]) -> Self {
        let mut index = HashMap::with_capacity(nodes.len());
        for (pos, node) in nodes.iter().enumerate() {
            // First occurrence wins if a snapshot ever carries a duplicate id
            index.entry(node.id).or_insert(pos);
        }

        let mut children = vec![Vec::new(); nodes.len()];
        for (pos, node) in nodes.iter().enumerate() {
            if index.get(&node.id) != Some(&pos) {
                continue;
            }
            if let Some(&parent_pos) = node.parent_id.and_then(|p| index.get(&p)) {
                if parent_pos != pos {
                    children[parent_pos].push(pos);
                }
            }
        }

        Self {
            nodes,
            index,
            children,
        }
    }

    fn position(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    fn is_display_root(&self, pos: usize) -> bool {
        if self.index.get(&self.nodes[pos].id) != Some(&pos) {
            return false;
        }
        match self.nodes[pos].parent_id {
            None => true,
            Some(parent_id) => !self.index.contains_key(&parent_id),
        }
    }

    /// Build owned nested views for the given root positions.
    ///
    /// A pre-order is computed with an explicit stack; walking it in reverse
    /// guarantees every child is materialized before its parent takes it.
    fn materialize(&self, roots: &[usize]) -> Vec<TreeNode> {
        let mut visited = vec![false; self.nodes.len()];
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<usize> = roots.iter().rev().copied().collect();

        while let Some(pos) = stack.pop() {
            if visited[pos] {
                continue;
            }
            visited[pos] = true;
            order.push(pos);
            stack.extend(self.children[pos].iter().rev().copied());
        }

        let mut built: Vec<Option<TreeNode>> = (0..self.nodes.len()).map(|_| None).collect();
        for &pos in order.iter().rev() {
            let children = self.children[pos]
                .iter()
                .filter_map(|&child| built[child].take())
                .collect();
            built[pos] = Some(TreeNode {
                node: self.nodes[pos].clone(),
                children,
            });
        }

        roots.iter().filter_map(|&pos| built[pos].take()).collect()
    }
}

/// Assemble the subtree rooted at `root_id`.
///
/// Returns `None` when `root_id` is not part of the snapshot.
pub fn assemble_one(nodes: &[Node], root_id: NodeId) -> Option<TreeNode> {
    let arena = Arena::build(nodes);
    let root = arena.position(root_id)?;
    arena.materialize(&[root]).pop()
}

/// Assemble every tree of the forest, one per display root, in snapshot order.
pub fn assemble_forest(nodes: &[Node]) -> Vec<TreeNode> {
    let arena = Arena::build(nodes);
    let roots: Vec<usize> = (0..nodes.len())
        .filter(|&pos| arena.is_display_root(pos))
        .collect();
    arena.materialize(&roots)
}
