//! NodeStore Trait - Persistence Contract
//!
//! This module defines the `NodeStore` trait, the only seam between the tree
//! engine and durable storage. `TreeService` depends on `Arc<dyn NodeStore>`
//! so the libsql backend and the in-memory backend are interchangeable.
//!
//! # Design Decisions
//!
//! 1. **Async-First**: Every method is a potential suspension point; the
//!    algorithms that consume the results never are
//! 2. **Ownership Semantics**: Methods take ownership of payloads to avoid
//!    unnecessary cloning
//! 3. **Error Handling**: Uses `anyhow::Result` so backends can attach context;
//!    the service layer wraps failures as `StoreFailure`
//! 4. **Missing Rows Are Not Errors**: Point reads and updates report absence
//!    with `None`
//! 5. **Referential Integrity**: Backends reject a `parent_id` that references
//!    a missing node and null out children of deleted nodes
//!
//! # Examples
//!
//! ```rust,no_run
//! use arbor_core::db::{DatabaseService, NodeStore, TursoStore};
//! use arbor_core::models::NewNode;
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("./data/arbor.db")).await?);
//!     let store: Arc<dyn NodeStore> = Arc::new(TursoStore::new(db));
//!
//!     let root = store.create(NewNode::new("Root")).await?;
//!     store.create(NewNode::new("Child").with_parent(root.id)).await?;
//!
//!     Ok(())
//! }
//! ```

use crate::models::{NewNode, Node, NodeId, NodeUpdate};
use anyhow::Result;
use async_trait::async_trait;

/// Abstraction layer for node persistence operations
///
/// Implementations must be `Send + Sync` so a single store can be shared
/// across request handlers.
#[async_trait]
pub trait NodeStore: Send + Sync {
    /// Load every node, ordered by `rank` then `id`
    async fn load_all(&self) -> Result<Vec<Node>>;

    /// Load one node by id
    ///
    /// - `Ok(Some(node))` if the node exists
    /// - `Ok(None)` if it doesn't (not an error)
    async fn load_one(&self, id: NodeId) -> Result<Option<Node>>;

    /// Load the nodes whose parent is `parent_id` (roots when `None`),
    /// ordered by `rank` then `id`
    async fn load_children(&self, parent_id: Option<NodeId>) -> Result<Vec<Node>>;

    /// Insert a node; the store assigns id and timestamps
    ///
    /// # Errors
    ///
    /// Returns error if `parent_id` references a node that doesn't exist.
    async fn create(&self, node: NewNode) -> Result<Node>;

    /// Apply a partial update
    ///
    /// Returns the full updated node, or `None` if `id` doesn't exist.
    async fn update(&self, id: NodeId, update: NodeUpdate) -> Result<Option<Node>>;

    /// Delete every listed id in one batch
    ///
    /// Backends with transactions apply the batch atomically. Unknown ids are
    /// ignored; returns the number of nodes removed.
    async fn delete_many(&self, ids: &[NodeId]) -> Result<u64>;
}
