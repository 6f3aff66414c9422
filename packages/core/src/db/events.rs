//! Domain Events for the Tree Engine
//!
//! `TreeService` publishes these events after each successful mutation so
//! that other parts of the system (cache invalidation, search mirrors, the
//! server's event log) can react to changes without coupling to the store.
//!
//! # Event Flow
//!
//! 1. `TreeService` completes a store write
//! 2. A `TreeEvent` is sent on the broadcast channel
//! 3. Every subscriber receives its own clone asynchronously
//!
//! Sending with no subscribers is not an error.

use crate::models::{Node, NodeId};
use serde::Serialize;

/// Domain events emitted by `TreeService`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TreeEvent {
    /// A new node was created
    #[serde(rename = "node:created")]
    NodeCreated(Node),

    /// Title, rank or content of a node changed
    #[serde(rename = "node:updated")]
    NodeUpdated(Node),

    /// A node was re-parented; its children moved with it
    #[serde(rename = "node:moved", rename_all = "camelCase")]
    NodeMoved {
        id: NodeId,
        from_parent_id: Option<NodeId>,
        to_parent_id: Option<NodeId>,
    },

    /// A node and all of its descendants were removed
    #[serde(rename = "subtree:deleted", rename_all = "camelCase")]
    SubtreeDeleted { root_id: NodeId, ids: Vec<NodeId> },
}

impl TreeEvent {
    /// Get a string representation of the event type
    pub fn event_type(&self) -> &'static str {
        match self {
            TreeEvent::NodeCreated(_) => "node:created",
            TreeEvent::NodeUpdated(_) => "node:updated",
            TreeEvent::NodeMoved { .. } => "node:moved",
            TreeEvent::SubtreeDeleted { .. } => "subtree:deleted",
        }
    }

    /// Id of the node the event is about
    pub fn node_id(&self) -> NodeId {
        match self {
            TreeEvent::NodeCreated(node) | TreeEvent::NodeUpdated(node) => node.id,
            TreeEvent::NodeMoved { id, .. } => *id,
            TreeEvent::SubtreeDeleted { root_id, .. } => *root_id,
        }
    }
}
