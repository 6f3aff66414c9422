//! Upward parent-chain walks over a snapshot
//!
//! Used by the move validator to reject re-parenting a node underneath one of
//! its own descendants. The walk is bounded by the snapshot size: a forest of
//! N nodes never has a chain longer than N, so exceeding it means the stored
//! links already contain a cycle.

use std::collections::HashMap;

use thiserror::Error;

use crate::models::{Node, NodeId};

/// The parent chain starting at `start` never reached a root
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("Parent chain starting at node {start} does not terminate within {limit} steps")]
pub struct UnterminatedChain {
    pub start: NodeId,
    pub limit: usize,
}

/// Ids on the parent chain of `start`, beginning with `start` itself.
///
/// Stops at a null parent or at a parent id missing from the snapshot.
/// Returns an empty chain when `start` is not in the snapshot.
pub fn ancestor_chain(nodes: &[Node], start: NodeId) -> Result<Vec<NodeId>, UnterminatedChain> {
    let parents: HashMap<NodeId, Option<NodeId>> =
        nodes.iter().map(|node| (node.id, node.parent_id)).collect();
    let limit = parents.len();

    let mut chain = Vec::new();
    let mut current = parents.contains_key(&start).then_some(start);

    while let Some(id) = current {
        if chain.len() == limit {
            return Err(UnterminatedChain { start, limit });
        }
        chain.push(id);
        current = parents
            .get(&id)
            .copied()
            .flatten()
            .filter(|parent_id| parents.contains_key(parent_id));
    }

    Ok(chain)
}

/// Whether `ancestor_id` is `node_id` itself or appears on its parent chain.
pub fn is_self_or_ancestor(
    nodes: &[Node],
    ancestor_id: NodeId,
    node_id: NodeId,
) -> Result<bool, UnterminatedChain> {
    Ok(ancestor_chain(nodes, node_id)?.contains(&ancestor_id))
}
