//! Business Services
//!
//! This module contains the tree engine's business logic:
//!
//! - `TreeService` - forest reads, path and sibling resolution, create,
//!   update, cascading delete, and cycle-checked moves
//!
//! Services coordinate between the store layer and the pure algorithms in
//! [`crate::tree`], enforcing business rules and publishing domain events.

pub mod error;
pub mod tree_service;

pub use error::{ErrorKind, TreeServiceError};
pub use tree_service::{
    TreeService, TreeServiceConfig, DEFAULT_EVENT_CHANNEL_CAPACITY, DEFAULT_MAX_PATH_DEPTH,
};
