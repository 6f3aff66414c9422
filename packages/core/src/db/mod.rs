//! Database Layer
//!
//! This module handles persistence of the node relation:
//!
//! - `NodeStore` trait, the contract the service layer depends on
//! - libsql connection management and schema setup (`DatabaseService`)
//! - `TursoStore`, the libsql-backed store
//! - `MemoryStore`, the in-process store for tests and embedders
//! - Domain events published after mutations
//!
//! # Architecture
//!
//! Arbor keeps its forest in a single `trees` table (adjacency list) inside
//! an embedded libsql/SQLite file. Referential integrity (parent foreign key,
//! set null on delete) is enforced by the database itself.

mod database;
mod error;
pub mod events;
mod memory_store;
mod node_store;
mod turso_store;

pub use database::{DatabaseService, DbCreateNodeParams, DbUpdateNodeParams};
pub use error::DatabaseError;
pub use events::TreeEvent;
pub use memory_store::MemoryStore;
pub use node_store::NodeStore;
pub use turso_store::TursoStore;
