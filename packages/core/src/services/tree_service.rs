//! Tree Service - Hierarchy Operations
//!
//! This module provides the business logic layer over a [`NodeStore`]:
//!
//! - Read views: forest, single subtree, root path, siblings
//! - Mutations: create, update, cascading delete, move (re-parent)
//! - Domain events after each successful mutation
//!
//! # Snapshots
//!
//! Operations that need the whole relation (assembly, cascade planning, cycle
//! checks) load one snapshot with `load_all` and run the pure algorithms from
//! [`crate::tree`] over it. Nothing is cached between calls, so concurrent
//! writers are observed on the next operation.
//!
//! # Moves
//!
//! Only the moved node's `parent_id` changes. Its descendants keep pointing
//! at it and therefore move along. A move under the node itself or under any
//! of its descendants is rejected as [`TreeServiceError::CyclicMove`].

use crate::db::{NodeStore, TreeEvent};
use crate::models::{NewNode, Node, NodeId, NodeUpdate, TreeNode};
use crate::services::error::TreeServiceError;
use crate::tree::{assemble_forest, assemble_one, collect_subtree, is_self_or_ancestor};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Default bound on parent hops when resolving a root path
pub const DEFAULT_MAX_PATH_DEPTH: usize = 10_000;

/// Default capacity of the domain event channel
pub const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

/// Tunables for [`TreeService`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeServiceConfig {
    /// Maximum number of parent hops `get_path` follows before reporting a
    /// corrupt hierarchy
    pub max_path_depth: usize,

    /// Buffered events per subscriber before slow receivers start lagging
    pub event_channel_capacity: usize,
}

impl Default for TreeServiceConfig {
    fn default() -> Self {
        Self {
            max_path_depth: DEFAULT_MAX_PATH_DEPTH,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

/// Demo forest inserted by [`TreeService::seed_demo_forest`]
///
/// Entries are `(parent index, title, rank)`; the parent index points at an
/// earlier entry.
const DEMO_FOREST: [(Option<usize>, &str, i64); 6] = [
    (None, "Heading 1", 1),
    (Some(0), "Heading 1.1", 1),
    (Some(0), "Heading 1.2", 2),
    (Some(1), "Heading 1.1.1", 1),
    (Some(1), "Heading 1.1.2", 2),
    (None, "Heading 2", 2),
];

/// Hierarchy operations over a shared [`NodeStore`]
///
/// Cloning is cheap; clones share the store and the event channel.
///
/// # Examples
///
/// ```rust
/// use arbor_core::db::MemoryStore;
/// use arbor_core::models::NewNode;
/// use arbor_core::services::TreeService;
/// use std::sync::Arc;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let service = TreeService::new(Arc::new(MemoryStore::new()));
///
///     let root = service.create_node(NewNode::new("Root")).await?;
///     let child = service
///         .create_node(NewNode::new("Child").with_parent(root.id))
///         .await?;
///
///     let path = service.get_path(child.id).await?;
///     assert_eq!(path.len(), 2);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct TreeService {
    store: Arc<dyn NodeStore>,
    config: TreeServiceConfig,
    event_tx: broadcast::Sender<TreeEvent>,
}

impl TreeService {
    /// Create a service with default configuration
    pub fn new(store: Arc<dyn NodeStore>) -> Self {
        Self::with_config(store, TreeServiceConfig::default())
    }

    pub fn with_config(store: Arc<dyn NodeStore>, config: TreeServiceConfig) -> Self {
        let (event_tx, _) = broadcast::channel(config.event_channel_capacity.max(1));
        Self {
            store,
            config,
            event_tx,
        }
    }

    /// Get access to the underlying store
    pub fn store(&self) -> &Arc<dyn NodeStore> {
        &self.store
    }

    pub fn config(&self) -> &TreeServiceConfig {
        &self.config
    }

    /// Subscribe to domain events
    ///
    /// Each receiver sees every event sent after it subscribed.
    pub fn subscribe_to_events(&self) -> broadcast::Receiver<TreeEvent> {
        self.event_tx.subscribe()
    }

    /// Emit a domain event to all subscribers
    ///
    /// Ignores errors if no subscribers.
    fn emit_event(&self, event: TreeEvent) {
        if self.event_tx.send(event).is_err() {
            tracing::trace!("No subscribers for tree event");
        }
    }

    async fn snapshot(&self) -> Result<Vec<Node>, TreeServiceError> {
        self.store
            .load_all()
            .await
            .map_err(TreeServiceError::store_failure)
    }

    async fn find_node(&self, id: NodeId) -> Result<Option<Node>, TreeServiceError> {
        self.store
            .load_one(id)
            .await
            .map_err(TreeServiceError::store_failure)
    }

    async fn require_node(&self, id: NodeId) -> Result<Node, TreeServiceError> {
        self.find_node(id)
            .await?
            .ok_or_else(|| TreeServiceError::node_not_found(id))
    }

    /// Get a single node by id
    pub async fn get_node(&self, id: NodeId) -> Result<Node, TreeServiceError> {
        self.require_node(id).await
    }

    /// Every tree of the forest, nested
    ///
    /// Roots are nodes whose parent is null or missing from the store, in
    /// store order (rank, then id).
    pub async fn get_forest(&self) -> Result<Vec<TreeNode>, TreeServiceError> {
        let nodes = self.snapshot().await?;
        let forest = assemble_forest(&nodes);
        tracing::debug!(
            "Assembled forest of {} trees from {} nodes",
            forest.len(),
            nodes.len()
        );
        Ok(forest)
    }

    /// The subtree rooted at `id`, nested
    pub async fn get_tree(&self, id: NodeId) -> Result<TreeNode, TreeServiceError> {
        let nodes = self.snapshot().await?;
        assemble_one(&nodes, id).ok_or_else(|| TreeServiceError::node_not_found(id))
    }

    /// Nodes from the forest root down to `id`, inclusive
    ///
    /// Follows parent links with one point lookup per step and stops at a
    /// null or dangling parent. A chain longer than `max_path_depth` is
    /// reported as a corrupt hierarchy.
    pub async fn get_path(&self, id: NodeId) -> Result<Vec<Node>, TreeServiceError> {
        let target = self.require_node(id).await?;
        let mut next_parent = target.parent_id;
        let mut path = vec![target];

        while let Some(parent_id) = next_parent {
            if path.len() > self.config.max_path_depth {
                return Err(TreeServiceError::corrupt_hierarchy(
                    id,
                    self.config.max_path_depth,
                ));
            }

            match self.find_node(parent_id).await? {
                Some(parent) => {
                    next_parent = parent.parent_id;
                    path.push(parent);
                }
                None => {
                    tracing::debug!("Path of node {} ends at dangling parent {}", id, parent_id);
                    break;
                }
            }
        }

        path.reverse();
        Ok(path)
    }

    /// Nodes sharing the parent of `id`, excluding `id` itself
    ///
    /// For a root, the other roots are returned.
    pub async fn get_siblings(&self, id: NodeId) -> Result<Vec<Node>, TreeServiceError> {
        let target = self.require_node(id).await?;
        let siblings = self
            .store
            .load_children(target.parent_id)
            .await
            .map_err(TreeServiceError::store_failure)?;

        Ok(siblings.into_iter().filter(|node| node.id != id).collect())
    }

    /// Create a node
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` when title or rank violate their constraints
    /// - `ParentNotFound` when `parent_id` references a missing node
    pub async fn create_node(&self, node: NewNode) -> Result<Node, TreeServiceError> {
        node.validate()?;

        if let Some(parent_id) = node.parent_id {
            if self.find_node(parent_id).await?.is_none() {
                return Err(TreeServiceError::parent_not_found(parent_id));
            }
        }

        let created = self
            .store
            .create(node)
            .await
            .map_err(TreeServiceError::store_failure)?;

        tracing::info!("Created node {} (parent: {:?})", created.id, created.parent_id);
        self.emit_event(TreeEvent::NodeCreated(created.clone()));
        Ok(created)
    }

    /// Update title, rank or content of a node
    ///
    /// The parent link is never changed here; use [`TreeService::move_node`].
    /// An empty update returns the node unchanged.
    pub async fn update_node(
        &self,
        id: NodeId,
        update: NodeUpdate,
    ) -> Result<Node, TreeServiceError> {
        let update = NodeUpdate {
            parent_id: None,
            ..update
        };
        update.validate()?;

        if update.is_empty() {
            return self.require_node(id).await;
        }

        let updated = self
            .store
            .update(id, update)
            .await
            .map_err(TreeServiceError::store_failure)?
            .ok_or_else(|| TreeServiceError::node_not_found(id))?;

        tracing::info!("Updated node {}", id);
        self.emit_event(TreeEvent::NodeUpdated(updated.clone()));
        Ok(updated)
    }

    /// Delete `id` and all of its descendants in one batch
    ///
    /// Returns the removed ids in breadth-first order, starting with `id`.
    pub async fn delete_subtree(&self, id: NodeId) -> Result<Vec<NodeId>, TreeServiceError> {
        let nodes = self.snapshot().await?;
        let ids = collect_subtree(&nodes, id);
        if ids.is_empty() {
            return Err(TreeServiceError::node_not_found(id));
        }

        let removed = self
            .store
            .delete_many(&ids)
            .await
            .map_err(TreeServiceError::store_failure)?;

        if removed != ids.len() as u64 {
            tracing::warn!(
                "Subtree of node {} planned {} deletions but removed {}",
                id,
                ids.len(),
                removed
            );
        }

        tracing::info!("Deleted subtree of node {} ({} nodes)", id, ids.len());
        self.emit_event(TreeEvent::SubtreeDeleted {
            root_id: id,
            ids: ids.clone(),
        });
        Ok(ids)
    }

    /// Re-parent `id` under `new_parent` (or make it a root with `None`)
    ///
    /// # Errors
    ///
    /// - `NodeNotFound` when `id` doesn't exist
    /// - `ParentNotFound` when `new_parent` doesn't exist
    /// - `CyclicMove` when `new_parent` is `id` or one of its descendants
    /// - `CorruptHierarchy` when the stored parent links already loop
    pub async fn move_node(
        &self,
        id: NodeId,
        new_parent: Option<NodeId>,
    ) -> Result<Node, TreeServiceError> {
        let nodes = self.snapshot().await?;
        let from_parent_id = nodes
            .iter()
            .find(|node| node.id == id)
            .map(|node| node.parent_id)
            .ok_or_else(|| TreeServiceError::node_not_found(id))?;

        if let Some(target_id) = new_parent {
            if target_id == id {
                return Err(TreeServiceError::cyclic_move(id, target_id));
            }

            if !nodes.iter().any(|node| node.id == target_id) {
                return Err(TreeServiceError::parent_not_found(target_id));
            }

            if is_self_or_ancestor(&nodes, id, target_id)? {
                return Err(TreeServiceError::cyclic_move(id, target_id));
            }
        }

        let moved = self
            .store
            .update(id, NodeUpdate::reparent(new_parent))
            .await
            .map_err(TreeServiceError::store_failure)?
            .ok_or_else(|| TreeServiceError::node_not_found(id))?;

        tracing::info!(
            "Moved node {} from {:?} to {:?}",
            id,
            from_parent_id,
            new_parent
        );
        self.emit_event(TreeEvent::NodeMoved {
            id,
            from_parent_id,
            to_parent_id: new_parent,
        });
        Ok(moved)
    }

    /// Insert the demo forest when the store holds no nodes
    ///
    /// Returns the inserted nodes, or an empty list when the store already
    /// had data.
    pub async fn seed_demo_forest(&self) -> Result<Vec<Node>, TreeServiceError> {
        if !self.snapshot().await?.is_empty() {
            tracing::debug!("Store not empty, skipping demo seed");
            return Ok(Vec::new());
        }

        let mut created: Vec<Node> = Vec::with_capacity(DEMO_FOREST.len());
        for (parent_index, title, rank) in DEMO_FOREST {
            let mut node = NewNode::new(title).with_rank(rank);
            if let Some(index) = parent_index {
                node = node.with_parent(created[index].id);
            }
            created.push(self.create_node(node).await?);
        }

        tracing::info!("Seeded demo forest with {} nodes", created.len());
        Ok(created)
    }
}
