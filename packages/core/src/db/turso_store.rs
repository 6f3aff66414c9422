//! TursoStore - NodeStore Implementation for the libsql Backend
//!
//! TursoStore wraps [`DatabaseService`] and converts its raw rows into
//! [`Node`] models. It carries no business logic: validation, cycle checks
//! and cascade planning live in `TreeService`.
//!
//! # Examples
//!
//! ```rust,no_run
//! use arbor_core::db::{DatabaseService, NodeStore, TursoStore};
//! use std::path::PathBuf;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let db = Arc::new(DatabaseService::new(PathBuf::from("./data/arbor.db")).await?);
//!     let store: Arc<dyn NodeStore> = Arc::new(TursoStore::new(db));
//!
//!     let node = store.load_one(1).await?;
//!     Ok(())
//! }
//! ```

use crate::db::node_store::NodeStore;
use crate::db::{DatabaseService, DbCreateNodeParams, DbUpdateNodeParams};
use crate::models::{NewNode, Node, NodeId, NodeUpdate};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime, Utc};
use libsql::Row;
use std::sync::Arc;

/// TursoStore implements NodeStore for the embedded libsql database
pub struct TursoStore {
    db: Arc<DatabaseService>,
}

impl TursoStore {
    pub fn new(db: Arc<DatabaseService>) -> Self {
        Self { db }
    }

    /// Underlying database service
    pub fn database(&self) -> &Arc<DatabaseService> {
        &self.db
    }

    /// Parse timestamp from database - handles both SQLite and RFC3339 formats
    ///
    /// SQLite CURRENT_TIMESTAMP returns: "YYYY-MM-DD HH:MM:SS"
    /// Imported data might use RFC3339: "YYYY-MM-DDTHH:MM:SSZ"
    fn parse_timestamp(s: &str) -> Result<DateTime<Utc>> {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
            return Ok(naive.and_utc());
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.with_timezone(&Utc));
        }

        Err(anyhow::anyhow!(
            "Unable to parse timestamp '{}' as SQLite or RFC3339 format",
            s
        ))
    }

    /// Convert libsql::Row to Node model
    ///
    /// Expected columns (in order), see `NODE_COLUMNS`:
    /// id, parent_id, title, rank, content, created_at, updated_at
    fn row_to_node(row: &Row) -> Result<Node> {
        let id: i64 = row.get(0).context("Failed to get id")?;
        let parent_id: Option<i64> = row.get(1).context("Failed to get parent_id")?;
        let title: String = row.get(2).context("Failed to get title")?;
        let rank: i64 = row.get(3).context("Failed to get rank")?;
        let content: Option<String> = row.get(4).context("Failed to get content")?;
        let created_at_str: String = row.get(5).context("Failed to get created_at")?;
        let updated_at_str: String = row.get(6).context("Failed to get updated_at")?;

        let created_at =
            Self::parse_timestamp(&created_at_str).context("Failed to parse created_at")?;
        let updated_at =
            Self::parse_timestamp(&updated_at_str).context("Failed to parse updated_at")?;

        Ok(Node {
            id,
            parent_id,
            title,
            rank,
            content,
            created_at,
            updated_at,
        })
    }

    fn rows_to_nodes(rows: &[Row]) -> Result<Vec<Node>> {
        rows.iter().map(Self::row_to_node).collect()
    }
}

#[async_trait]
impl NodeStore for TursoStore {
    async fn load_all(&self) -> Result<Vec<Node>> {
        let rows = self
            .db
            .db_list_nodes()
            .await
            .context("Failed to load nodes")?;
        Self::rows_to_nodes(&rows)
    }

    async fn load_one(&self, id: NodeId) -> Result<Option<Node>> {
        let row = self
            .db
            .db_get_node(id)
            .await
            .with_context(|| format!("Failed to load node {}", id))?;

        row.as_ref().map(Self::row_to_node).transpose()
    }

    async fn load_children(&self, parent_id: Option<NodeId>) -> Result<Vec<Node>> {
        let rows = self
            .db
            .db_list_children(parent_id)
            .await
            .context("Failed to load children")?;
        Self::rows_to_nodes(&rows)
    }

    async fn create(&self, node: NewNode) -> Result<Node> {
        let params = DbCreateNodeParams {
            parent_id: node.parent_id,
            title: &node.title,
            rank: node.rank,
            content: node.content.as_deref(),
        };

        let id = self
            .db
            .db_create_node(params)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to create node: {}", e))?;

        self.load_one(id)
            .await?
            .ok_or_else(|| anyhow::anyhow!("Node {} not found after creation", id))
    }

    async fn update(&self, id: NodeId, update: NodeUpdate) -> Result<Option<Node>> {
        let Some(mut node) = self.load_one(id).await? else {
            return Ok(None);
        };

        if update.is_empty() {
            return Ok(Some(node));
        }

        node.apply(&update);
        let params = DbUpdateNodeParams {
            id,
            parent_id: node.parent_id,
            title: &node.title,
            rank: node.rank,
            content: node.content.as_deref(),
        };

        let affected = self
            .db
            .db_update_node(params)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to update node {}: {}", id, e))?;

        if affected == 0 {
            // Deleted between the read and the write
            return Ok(None);
        }

        self.load_one(id).await
    }

    async fn delete_many(&self, ids: &[NodeId]) -> Result<u64> {
        self.db
            .db_delete_nodes(ids)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to delete nodes: {}", e))
    }
}
