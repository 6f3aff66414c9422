//! Subtree collection for cascading deletes
//!
//! Computes the inclusive descendant id set of a node with an explicit
//! breadth-first queue. The children index is built once per call, so the
//! traversal is linear in snapshot size.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::models::{Node, NodeId};

/// Collect `root_id` and every node reachable from it through parent links.
///
/// Ids are distinct and returned in breadth-first order (root first). When
/// `root_id` is not in the snapshot the result is empty; callers must treat
/// that as not-found instead of issuing an empty delete.
pub fn collect_subtree(nodes: &[Node], root_id: NodeId) -> Vec<NodeId> {
    if !nodes.iter().any(|node| node.id == root_id) {
        return Vec::new();
    }

    let mut children_by_parent: HashMap<NodeId, Vec<NodeId>> = HashMap::new();
    for node in nodes {
        if let Some(parent_id) = node.parent_id {
            children_by_parent.entry(parent_id).or_default().push(node.id);
        }
    }

    let mut seen = HashSet::new();
    let mut collected = Vec::new();
    let mut queue = VecDeque::from([root_id]);

    while let Some(current) = queue.pop_front() {
        if !seen.insert(current) {
            continue;
        }
        collected.push(current);

        if let Some(children) = children_by_parent.get(&current) {
            queue.extend(children.iter().copied());
        }
    }

    collected
}
