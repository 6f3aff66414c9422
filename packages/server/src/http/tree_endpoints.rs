//! Tree endpoints, mounted under `/api/trees`
//!
//! # Endpoints
//!
//! - `GET /api/trees` - Whole forest, nested
//! - `GET /api/trees/:id` - Subtree rooted at `id`
//! - `GET /api/trees/:id/path` - Nodes from the root down to `id`
//! - `GET /api/trees/:id/siblings` - Other children of `id`'s parent
//! - `POST /api/trees` - Create a node
//! - `PUT /api/trees/:id` - Update title, rank or content
//! - `DELETE /api/trees/:id` - Delete `id` and its whole subtree
//! - `PUT /api/trees/:id/move` - Re-parent `id` under `targetParentId` (`null` for root)

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};

use crate::http::envelope::{success, ApiResponse};
use crate::http::{AppState, HttpError};
use arbor_core::models::{deserialize_optional_field, NewNode, Node, NodeId, NodeUpdate, TreeNode};

type ApiResult<T> = Result<Json<ApiResponse<T>>, HttpError>;

/// Body of `PUT /:id/move`
///
/// `targetParentId` is required: `null` moves the node to the root, a missing
/// field is rejected. `parentId` is accepted as an alias.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct MoveNodeRequest {
    #[serde(
        default,
        alias = "parentId",
        deserialize_with = "deserialize_optional_field"
    )]
    pub target_parent_id: Option<Option<NodeId>>,
}

impl MoveNodeRequest {
    fn target(&self) -> Result<Option<NodeId>, HttpError> {
        self.target_parent_id.ok_or_else(|| {
            HttpError::with_details(
                "Missing targetParentId",
                "INVALID_INPUT",
                "send null to move the node to the root",
            )
        })
    }
}

/// Result of a cascading delete
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedSubtree {
    pub deleted_ids: Vec<NodeId>,
}

fn parse_id(raw: &str) -> Result<NodeId, HttpError> {
    raw.trim()
        .parse::<NodeId>()
        .map_err(|_| HttpError::invalid_id(raw))
}

/// Get the whole forest
///
/// ```bash
/// curl http://localhost:3001/api/trees
/// ```
async fn get_forest(State(state): State<AppState>) -> ApiResult<Vec<TreeNode>> {
    let forest = state.tree_service.get_forest().await?;
    Ok(success("Query succeeded", forest))
}

/// Get one subtree
///
/// ```bash
/// curl http://localhost:3001/api/trees/1
/// ```
async fn get_tree(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<TreeNode> {
    let id = parse_id(&id)?;
    let tree = state.tree_service.get_tree(id).await?;
    Ok(success("Query succeeded", tree))
}

async fn get_path(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Vec<Node>> {
    let id = parse_id(&id)?;
    let path = state.tree_service.get_path(id).await?;
    Ok(success("Query succeeded", path))
}

async fn get_siblings(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<Node>> {
    let id = parse_id(&id)?;
    let siblings = state.tree_service.get_siblings(id).await?;
    Ok(success("Query succeeded", siblings))
}

/// Create a node
///
/// ```bash
/// curl -X POST http://localhost:3001/api/trees \
///   -H "Content-Type: application/json" \
///   -d '{"title": "Chapter 1", "parentId": null, "rank": 1}'
/// ```
async fn create_node(
    State(state): State<AppState>,
    payload: Result<Json<NewNode>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<Node>>), HttpError> {
    let Json(node) = payload?;
    let created = state.tree_service.create_node(node).await?;
    tracing::debug!("Created node {} via HTTP", created.id);
    Ok((StatusCode::CREATED, success("Created", created)))
}

/// Update title, rank or content; `parentId` in the body is ignored
///
/// ```bash
/// curl -X PUT http://localhost:3001/api/trees/2 \
///   -H "Content-Type: application/json" \
///   -d '{"title": "Renamed"}'
/// ```
async fn update_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<NodeUpdate>, JsonRejection>,
) -> ApiResult<Node> {
    let id = parse_id(&id)?;
    let Json(update) = payload?;
    let updated = state.tree_service.update_node(id, update).await?;
    Ok(success("Updated", updated))
}

/// Delete a node and everything below it
async fn delete_subtree(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<DeletedSubtree> {
    let id = parse_id(&id)?;
    let deleted_ids = state.tree_service.delete_subtree(id).await?;
    Ok(success("Deleted", DeletedSubtree { deleted_ids }))
}

/// Re-parent a node
///
/// ```bash
/// curl -X PUT http://localhost:3001/api/trees/3/move \
///   -H "Content-Type: application/json" \
///   -d '{"targetParentId": 2}'
/// ```
async fn move_node(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<MoveNodeRequest>, JsonRejection>,
) -> ApiResult<Node> {
    let id = parse_id(&id)?;
    let Json(request) = payload?;
    let target = request.target()?;
    let moved = state.tree_service.move_node(id, target).await?;
    Ok(success("Moved", moved))
}

/// Create tree routes, relative to the `/api/trees` mount point
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_forest).post(create_node))
        .route(
            "/:id",
            get(get_tree).put(update_node).delete(delete_subtree),
        )
        .route("/:id/path", get(get_path))
        .route("/:id/siblings", get(get_siblings))
        .route("/:id/move", put(move_node))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert_eq!(parse_id("abc").unwrap_err().code, "INVALID_INPUT");
        assert_eq!(parse_id("1.5").unwrap_err().code, "INVALID_INPUT");
    }

    #[test]
    fn test_move_request_requires_target() {
        let request: MoveNodeRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request.target().unwrap_err().code, "INVALID_INPUT");

        let request: MoveNodeRequest =
            serde_json::from_str(r#"{"targetParentId": null}"#).unwrap();
        assert_eq!(request.target().unwrap(), None);

        let request: MoveNodeRequest =
            serde_json::from_str(r#"{"targetParentId": 7}"#).unwrap();
        assert_eq!(request.target().unwrap(), Some(7));

        let request: MoveNodeRequest = serde_json::from_str(r#"{"parentId": 7}"#).unwrap();
        assert_eq!(request.target().unwrap(), Some(7));
    }

    #[test]
    fn test_move_request_rejects_unknown_fields() {
        assert!(serde_json::from_str::<MoveNodeRequest>(r#"{"bogus": 1}"#).is_err());
        assert!(
            serde_json::from_str::<MoveNodeRequest>(r#"{"targetParentId": 2, "extra": true}"#)
                .is_err()
        );
    }
}
