//! Arbor Core - Hierarchical Node Tree Engine
//!
//! This crate manages a forest of nodes stored as an adjacency list (each
//! node points at its parent) and assembles nested views on demand.
//!
//! # Architecture
//!
//! - **Adjacency List**: Only `parent_id` is persisted; children are derived
//! - **Pure Algorithms**: Assembly, subtree collection and ancestry walks run
//!   synchronously over an in-memory snapshot, without recursion
//! - **libsql/Turso**: Embedded SQLite-compatible database behind the
//!   `NodeStore` trait, with an in-memory store for tests
//!
//! # Modules
//!
//! - [`models`] - Data structures (Node, NewNode, NodeUpdate, TreeNode)
//! - [`tree`] - Tree assembly, subtree collection, ancestry checks
//! - [`services`] - `TreeService` hierarchy operations and errors
//! - [`db`] - Store trait, libsql and in-memory backends, domain events

pub mod db;
pub mod models;
pub mod services;
pub mod tree;

// Re-export commonly used types
pub use db::{MemoryStore, NodeStore, TreeEvent, TursoStore};
pub use models::*;
pub use services::*;
