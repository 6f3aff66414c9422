//! MemoryStore - In-Process NodeStore
//!
//! Keeps the node relation in a mutex-guarded map. It honours the same
//! contract as the libsql backend (sequential ids, parent foreign key,
//! set-null on parent delete, rank/id ordering), which makes it suitable for
//! tests and for embedding the engine without a database file.

use crate::db::node_store::NodeStore;
use crate::models::{NewNode, Node, NodeId, NodeUpdate};
use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use std::sync::{Mutex, MutexGuard};

#[derive(Default)]
struct MemoryState {
    nodes: BTreeMap<NodeId, Node>,
    last_id: NodeId,
}

/// In-memory implementation of [`NodeStore`]
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<MemoryState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot, keeping the given ids.
    ///
    /// Later inserts continue after the highest id present.
    pub fn with_nodes(nodes: Vec<Node>) -> Self {
        let last_id = nodes.iter().map(|node| node.id).max().unwrap_or(0);
        let nodes = nodes.into_iter().map(|node| (node.id, node)).collect();
        Self {
            state: Mutex::new(MemoryState { nodes, last_id }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|_| anyhow!("Failed to acquire memory store lock"))
    }

    fn sorted(mut nodes: Vec<Node>) -> Vec<Node> {
        nodes.sort_by_key(|node| (node.rank, node.id));
        nodes
    }
}

#[async_trait]
impl NodeStore for MemoryStore {
    async fn load_all(&self) -> Result<Vec<Node>> {
        let state = self.lock()?;
        Ok(Self::sorted(state.nodes.values().cloned().collect()))
    }

    async fn load_one(&self, id: NodeId) -> Result<Option<Node>> {
        let state = self.lock()?;
        Ok(state.nodes.get(&id).cloned())
    }

    async fn load_children(&self, parent_id: Option<NodeId>) -> Result<Vec<Node>> {
        let state = self.lock()?;
        Ok(Self::sorted(
            state
                .nodes
                .values()
                .filter(|node| node.parent_id == parent_id)
                .cloned()
                .collect(),
        ))
    }

    async fn create(&self, node: NewNode) -> Result<Node> {
        let mut state = self.lock()?;

        if let Some(parent_id) = node.parent_id {
            if !state.nodes.contains_key(&parent_id) {
                bail!("Foreign key violation: parent {} does not exist", parent_id);
            }
        }

        state.last_id += 1;
        let now = Utc::now();
        let created = Node {
            id: state.last_id,
            parent_id: node.parent_id,
            title: node.title,
            rank: node.rank,
            content: node.content,
            created_at: now,
            updated_at: now,
        };
        state.nodes.insert(created.id, created.clone());
        Ok(created)
    }

    async fn update(&self, id: NodeId, update: NodeUpdate) -> Result<Option<Node>> {
        let mut state = self.lock()?;

        if let Some(Some(parent_id)) = update.parent_id {
            if !state.nodes.contains_key(&parent_id) {
                bail!("Foreign key violation: parent {} does not exist", parent_id);
            }
        }

        Ok(state.nodes.get_mut(&id).map(|node| {
            node.apply(&update);
            node.clone()
        }))
    }

    async fn delete_many(&self, ids: &[NodeId]) -> Result<u64> {
        let mut state = self.lock()?;

        let mut removed: HashSet<NodeId> = HashSet::with_capacity(ids.len());
        for id in ids {
            if state.nodes.remove(id).is_some() {
                removed.insert(*id);
            }
        }

        for node in state.nodes.values_mut() {
            if node.parent_id.is_some_and(|parent_id| removed.contains(&parent_id)) {
                node.parent_id = None;
            }
        }

        Ok(removed.len() as u64)
    }
}
