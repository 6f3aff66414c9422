//! Node Data Structures
//!
//! This module defines the `Node` struct, the single entity of the Arbor
//! adjacency-list tree, together with the create/update payloads used by the
//! store and service layers.
//!
//! # Architecture
//!
//! - **Adjacency List**: Each node stores only its `parent_id`; children are
//!   always derived by querying for nodes that point at a given id
//! - **Store-Assigned IDs**: Integer ids are allocated by the store on insert
//!   and never change afterwards
//! - **No Materialized Paths**: Depth and ancestry are computed at query time
//!
//! # Examples
//!
//! ```rust
//! use arbor_core::models::NewNode;
//!
//! // A root node
//! let root = NewNode::new("Chapter 1");
//!
//! // A child node with explicit rank and content
//! let child = NewNode::new("Section 1.1")
//!     .with_parent(1)
//!     .with_rank(2)
//!     .with_content("Body text");
//!
//! assert!(root.validate().is_ok());
//! assert!(child.validate().is_ok());
//! ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Identifier type for tree nodes (SQLite rowid)
pub type NodeId = i64;

/// Maximum title length, counted in characters
pub const TITLE_MAX_CHARS: usize = 50;

/// Validation errors for Node operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Title must be between 1 and {max} characters, got {actual}")]
    TitleLength { max: usize, actual: usize },

    #[error("Rank must be a non-negative integer, got {0}")]
    NegativeRank(i64),
}

/// A single node of the forest as persisted by the store.
///
/// # Fields
///
/// - `id`: Store-assigned identifier, immutable after creation
/// - `parent_id`: Parent reference (`None` means the node is a root)
/// - `title`: Display title, 1 to 50 characters
/// - `rank`: Sibling ordering hint (never renumbered by the engine)
/// - `content`: Optional free text body
/// - `created_at` / `updated_at`: Maintained by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Unique identifier assigned by the store
    pub id: NodeId,

    /// Parent node id (`None` for roots)
    pub parent_id: Option<NodeId>,

    /// Display title
    pub title: String,

    /// Sibling ordering hint
    #[serde(default)]
    pub rank: i64,

    /// Optional body text
    #[serde(default)]
    pub content: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp
    pub updated_at: DateTime<Utc>,
}

impl Node {
    /// Build an in-memory node with a known id.
    ///
    /// Stores allocate ids themselves; this constructor exists for snapshots
    /// assembled outside a store (fixtures, benchmarks, imports).
    ///
    /// ```rust
    /// # use arbor_core::models::Node;
    /// let node = Node::new_with_id(4, Some(2), "D");
    /// assert_eq!(node.parent_id, Some(2));
    /// assert!(!node.is_root());
    /// ```
    pub fn new_with_id(id: NodeId, parent_id: Option<NodeId>, title: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id,
            parent_id,
            title: title.into(),
            rank: 0,
            content: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Set rank (builder style)
    pub fn with_rank(mut self, rank: i64) -> Self {
        self.rank = rank;
        self
    }

    /// Whether this node has no parent
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Apply a partial update in place, bumping `updated_at` when anything changed.
    pub fn apply(&mut self, update: &NodeUpdate) {
        if update.is_empty() {
            return;
        }
        if let Some(title) = &update.title {
            self.title = title.clone();
        }
        if let Some(rank) = update.rank {
            self.rank = rank;
        }
        if let Some(content) = &update.content {
            self.content = content.clone();
        }
        if let Some(parent_id) = update.parent_id {
            self.parent_id = parent_id;
        }
        self.updated_at = Utc::now();
    }
}

/// Check the title constraint shared by create and update.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::MissingField("title".to_string()));
    }

    let actual = title.chars().count();
    if actual > TITLE_MAX_CHARS {
        return Err(ValidationError::TitleLength {
            max: TITLE_MAX_CHARS,
            actual,
        });
    }

    Ok(())
}

/// Check the rank constraint shared by create and update.
pub fn validate_rank(rank: i64) -> Result<(), ValidationError> {
    if rank < 0 {
        return Err(ValidationError::NegativeRank(rank));
    }
    Ok(())
}

/// Attributes for inserting a node; the store assigns id and timestamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNode {
    #[serde(default)]
    pub parent_id: Option<NodeId>,
    pub title: String,
    #[serde(default)]
    pub rank: i64,
    #[serde(default)]
    pub content: Option<String>,
}

impl NewNode {
    /// Create a root-level node payload with rank 0 and no content
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            parent_id: None,
            title: title.into(),
            rank: 0,
            content: None,
        }
    }

    pub fn with_parent(mut self, parent_id: NodeId) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    pub fn with_rank(mut self, rank: i64) -> Self {
        self.rank = rank;
        self
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Field-level validation. Parent existence is checked by the service.
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)?;
        validate_rank(self.rank)?;
        Ok(())
    }
}

/// Custom deserializer for optional fields that accepts both plain values and nested Options
///
/// Maps three input formats to the double-Option pattern:
/// - Missing field → None (don't update)
/// - null → Some(None) (set to NULL)
/// - value → Some(Some(value)) (set to value)
pub fn deserialize_optional_field<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Some(Option::<T>::deserialize(deserializer)?))
}

/// Partial node update
///
/// Only provided fields are written. `content` and `parent_id` use the
/// double-Option pattern:
///
/// - `None`: Don't change this field
/// - `Some(None)`: Set the field to NULL
/// - `Some(Some(value))`: Set the field to the specified value
///
/// # Examples
///
/// ```rust
/// # use arbor_core::models::NodeUpdate;
/// // Rename only
/// let update = NodeUpdate::new().with_title("Renamed");
/// assert!(!update.is_empty());
///
/// // Detach to root (what a move to `null` issues)
/// let update = NodeUpdate::reparent(None);
/// assert_eq!(update.parent_id, Some(None));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub rank: Option<i64>,

    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub content: Option<Option<String>>,

    /// Only set by moves; plain updates never touch the parent link
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_optional_field"
    )]
    pub parent_id: Option<Option<NodeId>>,
}

impl NodeUpdate {
    /// Create a new empty NodeUpdate
    pub fn new() -> Self {
        Self::default()
    }

    /// Update that only rewrites the parent link
    pub fn reparent(parent_id: Option<NodeId>) -> Self {
        Self {
            parent_id: Some(parent_id),
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_rank(mut self, rank: i64) -> Self {
        self.rank = Some(rank);
        self
    }

    pub fn with_content(mut self, content: Option<String>) -> Self {
        self.content = Some(content);
        self
    }

    /// Check if update contains any changes
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.rank.is_none()
            && self.content.is_none()
            && self.parent_id.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.title {
            validate_title(title)?;
        }
        if let Some(rank) = self.rank {
            validate_rank(rank)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_title_bounds() {
        assert!(validate_title("A").is_ok());
        assert!(validate_title(&"x".repeat(50)).is_ok());
        assert_eq!(
            validate_title(&"x".repeat(51)),
            Err(ValidationError::TitleLength {
                max: 50,
                actual: 51
            })
        );
        assert!(matches!(
            validate_title("   "),
            Err(ValidationError::MissingField(_))
        ));
    }

    #[test]
    fn test_title_length_counts_characters() {
        // 50 multi-byte characters are still within bounds
        let title = "树".repeat(50);
        assert!(title.len() > 50);
        assert!(validate_title(&title).is_ok());
    }

    #[test]
    fn test_negative_rank_rejected() {
        let node = NewNode::new("A").with_rank(-1);
        assert_eq!(node.validate(), Err(ValidationError::NegativeRank(-1)));
    }

    #[test]
    fn test_update_double_option_deserialization() {
        let update: NodeUpdate = serde_json::from_value(json!({"title": "B"})).unwrap();
        assert_eq!(update.content, None);

        let update: NodeUpdate = serde_json::from_value(json!({"content": null})).unwrap();
        assert_eq!(update.content, Some(None));

        let update: NodeUpdate = serde_json::from_value(json!({"content": "text"})).unwrap();
        assert_eq!(update.content, Some(Some("text".to_string())));
    }

    #[test]
    fn test_apply_update() {
        let mut node = Node::new_with_id(1, None, "A");
        let before = node.updated_at;

        node.apply(&NodeUpdate::new().with_title("B").with_rank(3));
        assert_eq!(node.title, "B");
        assert_eq!(node.rank, 3);
        assert_eq!(node.parent_id, None);
        assert!(node.updated_at >= before);

        node.apply(&NodeUpdate::reparent(Some(7)));
        assert_eq!(node.parent_id, Some(7));
    }

    #[test]
    fn test_node_serializes_camel_case() {
        let node = Node::new_with_id(2, Some(1), "B");
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["parentId"], json!(1));
        assert!(value.get("createdAt").is_some());
        assert!(value.get("updatedAt").is_some());
    }
}
