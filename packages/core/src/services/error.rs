//! Service Layer Error Types
//!
//! This module defines error types for tree operations. Every variant maps to
//! one [`ErrorKind`], which is what transports (HTTP, CLI) switch on.

use crate::models::{NodeId, ValidationError};
use crate::tree::UnterminatedChain;
use thiserror::Error;

/// Coarse classification of a [`TreeServiceError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced node (target, parent, or move target) is missing
    NotFound,
    /// Malformed input or a field constraint failure
    InvalidArgument,
    /// A move would make a node its own ancestor
    CyclicMove,
    /// Stored parent links already contain a cycle
    CorruptHierarchy,
    /// The backing store failed
    StoreFailure,
}

/// Tree service operation errors
#[derive(Error, Debug)]
pub enum TreeServiceError {
    /// Node not found by ID
    #[error("Node not found: {id}")]
    NodeNotFound { id: NodeId },

    /// Referenced parent does not exist
    #[error("Parent node not found: {parent_id}")]
    ParentNotFound { parent_id: NodeId },

    /// Validation failed for node fields
    #[error("Node validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Malformed request input
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Move would create a cycle
    #[error("Cannot move node {node_id} under {target_parent_id}: target is the node itself or one of its descendants")]
    CyclicMove {
        node_id: NodeId,
        target_parent_id: NodeId,
    },

    /// Parent chain does not reach a root
    #[error("Hierarchy is corrupt: parent chain of node {node_id} exceeds {limit} steps")]
    CorruptHierarchy { node_id: NodeId, limit: usize },

    /// Store operation failed
    #[error("Store operation failed: {0:#}")]
    StoreFailure(anyhow::Error),
}

impl TreeServiceError {
    /// Create a node not found error
    pub fn node_not_found(id: NodeId) -> Self {
        Self::NodeNotFound { id }
    }

    /// Create a parent not found error
    pub fn parent_not_found(parent_id: NodeId) -> Self {
        Self::ParentNotFound { parent_id }
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Create a cyclic move error
    pub fn cyclic_move(node_id: NodeId, target_parent_id: NodeId) -> Self {
        Self::CyclicMove {
            node_id,
            target_parent_id,
        }
    }

    /// Create a corrupt hierarchy error
    pub fn corrupt_hierarchy(node_id: NodeId, limit: usize) -> Self {
        Self::CorruptHierarchy { node_id, limit }
    }

    /// Wrap a store failure
    pub fn store_failure(source: anyhow::Error) -> Self {
        Self::StoreFailure(source)
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NodeNotFound { .. } | Self::ParentNotFound { .. } => ErrorKind::NotFound,
            Self::ValidationFailed(_) | Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::CyclicMove { .. } => ErrorKind::CyclicMove,
            Self::CorruptHierarchy { .. } => ErrorKind::CorruptHierarchy,
            Self::StoreFailure(_) => ErrorKind::StoreFailure,
        }
    }
}

impl From<UnterminatedChain> for TreeServiceError {
    fn from(err: UnterminatedChain) -> Self {
        Self::corrupt_hierarchy(err.start, err.limit)
    }
}
