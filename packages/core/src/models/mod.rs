//! Data Models
//!
//! This module contains the core data structures used throughout Arbor:
//!
//! - `Node` - The persisted adjacency-list row (id, parentId, title, rank, content)
//! - `NewNode` / `NodeUpdate` - Create and partial-update payloads
//! - `TreeNode` - Transient nested view produced by tree assembly

mod node;
mod tree_node;

pub use node::{
    deserialize_optional_field, validate_rank, validate_title, NewNode, Node, NodeId, NodeUpdate,
    ValidationError, TITLE_MAX_CHARS,
};
pub use tree_node::{PreorderIter, TreeNode};
