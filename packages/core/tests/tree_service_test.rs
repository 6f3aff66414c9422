//! Tree Service Integration Tests
//!
//! Runs the hierarchy operations end to end against both store backends:
//! the libsql `TursoStore` (on a temporary database file) and the in-process
//! `MemoryStore`. Both must produce identical results.
//!
//! ## Test Coverage
//! - Forest and subtree assembly from stored rows
//! - Root path and sibling resolution
//! - Cascading delete (every descendant removed, unrelated nodes untouched)
//! - Move validation (self, descendant, missing target) and re-parenting
//! - Event emission after mutations

#[cfg(test)]
mod tree_service_tests {
    use anyhow::Result;
    use arbor_core::db::{DatabaseService, MemoryStore, NodeStore, TreeEvent, TursoStore};
    use arbor_core::models::{NewNode, Node, NodeId, NodeUpdate, TreeNode};
    use arbor_core::services::{ErrorKind, TreeService};
    use std::sync::Arc;
    use tempfile::TempDir;
    use tokio::time::{timeout, Duration};

    /// Helper to create a libsql-backed service on a fresh database
    async fn create_libsql_service() -> Result<(TreeService, TempDir)> {
        let temp_dir = TempDir::new()?;
        let db_path = temp_dir.path().join("test.db");
        let db = Arc::new(DatabaseService::new(db_path).await?);
        let store: Arc<dyn NodeStore> = Arc::new(TursoStore::new(db));
        Ok((TreeService::new(store), temp_dir))
    }

    fn create_memory_service() -> TreeService {
        TreeService::new(Arc::new(MemoryStore::new()))
    }

    /// Seed the scenario forest: A -> [B -> [D], C]
    async fn seed_scenario(service: &TreeService) -> Result<[NodeId; 4]> {
        let a = service.create_node(NewNode::new("A")).await?;
        let b = service
            .create_node(NewNode::new("B").with_parent(a.id).with_rank(1))
            .await?;
        let c = service
            .create_node(NewNode::new("C").with_parent(a.id).with_rank(2))
            .await?;
        let d = service
            .create_node(NewNode::new("D").with_parent(b.id))
            .await?;
        Ok([a.id, b.id, c.id, d.id])
    }

    fn ids(nodes: &[Node]) -> Vec<NodeId> {
        nodes.iter().map(|node| node.id).collect()
    }

    fn child_ids(tree: &TreeNode) -> Vec<NodeId> {
        tree.children.iter().map(TreeNode::id).collect()
    }

    async fn check_scenario(service: &TreeService) -> Result<()> {
        let [a, b, c, d] = seed_scenario(service).await?;

        // Forest: one root with children [B, C]; B has [D]
        let forest = service.get_forest().await?;
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].id(), a);
        assert_eq!(child_ids(&forest[0]), vec![b, c]);
        assert_eq!(child_ids(&forest[0].children[0]), vec![d]);

        // Every child's parent id matches its parent in the nested view
        for tree in forest[0].iter_preorder() {
            for child in &tree.children {
                assert_eq!(child.node.parent_id, Some(tree.id()));
            }
        }

        assert_eq!(ids(&service.get_path(d).await?), vec![a, b, d]);
        assert_eq!(ids(&service.get_siblings(b).await?), vec![c]);

        // Move C under B, then reject moving A under D
        let moved = service.move_node(c, Some(b)).await?;
        assert_eq!(moved.parent_id, Some(b));
        let err = service.move_node(a, Some(d)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CyclicMove);

        let subtree = service.get_tree(b).await?;
        assert_eq!(child_ids(&subtree), vec![d, c]);

        // Cascading delete from the root removes everything
        let mut removed = service.delete_subtree(a).await?;
        removed.sort_unstable();
        assert_eq!(removed, vec![a, b, c, d]);
        for id in [a, b, c, d] {
            let err = service.get_node(id).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::NotFound);
        }
        assert!(service.get_forest().await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn test_scenario_libsql() -> Result<()> {
        let (service, _temp_dir) = create_libsql_service().await?;
        check_scenario(&service).await
    }

    #[tokio::test]
    async fn test_scenario_memory() -> Result<()> {
        check_scenario(&create_memory_service()).await
    }

    #[tokio::test]
    async fn test_libsql_assigns_ids_and_defaults() -> Result<()> {
        let (service, _temp_dir) = create_libsql_service().await?;

        let node = service
            .create_node(NewNode::new("Chapter").with_content("Body"))
            .await?;
        assert_eq!(node.id, 1);
        assert_eq!(node.rank, 0);
        assert_eq!(node.parent_id, None);
        assert_eq!(node.content.as_deref(), Some("Body"));

        let next = service.create_node(NewNode::new("Next")).await?;
        assert_eq!(next.id, 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_libsql_update_fields() -> Result<()> {
        let (service, _temp_dir) = create_libsql_service().await?;
        let [_, b, _, _] = seed_scenario(&service).await?;

        let updated = service
            .update_node(
                b,
                NodeUpdate::new()
                    .with_title("Renamed")
                    .with_rank(7)
                    .with_content(Some("notes".to_string())),
            )
            .await?;
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.rank, 7);
        assert_eq!(updated.content.as_deref(), Some("notes"));

        let cleared = service
            .update_node(b, NodeUpdate::new().with_content(None))
            .await?;
        assert_eq!(cleared.content, None);
        assert_eq!(cleared.title, "Renamed");

        let err = service
            .update_node(999, NodeUpdate::new().with_title("x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        Ok(())
    }

    #[tokio::test]
    async fn test_libsql_partial_delete_keeps_other_branches() -> Result<()> {
        let (service, _temp_dir) = create_libsql_service().await?;
        let [a, b, c, d] = seed_scenario(&service).await?;

        let removed = service.delete_subtree(b).await?;
        assert_eq!(removed, vec![b, d]);

        let forest = service.get_forest().await?;
        assert_eq!(forest.len(), 1);
        assert_eq!(child_ids(&forest[0]), vec![c]);
        assert_eq!(service.get_node(a).await?.id, a);
        Ok(())
    }

    #[tokio::test]
    async fn test_libsql_siblings_of_root() -> Result<()> {
        let (service, _temp_dir) = create_libsql_service().await?;
        let first = service.create_node(NewNode::new("First").with_rank(1)).await?;
        let second = service.create_node(NewNode::new("Second").with_rank(2)).await?;
        service
            .create_node(NewNode::new("Child").with_parent(first.id))
            .await?;

        assert_eq!(ids(&service.get_siblings(first.id).await?), vec![second.id]);
        Ok(())
    }

    #[tokio::test]
    async fn test_libsql_move_to_root_and_rejections() -> Result<()> {
        let (service, _temp_dir) = create_libsql_service().await?;
        let [a, b, _, d] = seed_scenario(&service).await?;

        let err = service.move_node(b, Some(b)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CyclicMove);

        let err = service.move_node(b, Some(404)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let err = service.move_node(404, None).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        // Detach B; D stays attached to B
        service.move_node(b, None).await?;
        assert_eq!(ids(&service.get_path(d).await?), vec![b, d]);
        assert_eq!(service.get_forest().await?.len(), 2);
        assert_eq!(service.get_node(a).await?.parent_id, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_libsql_rejects_missing_parent_on_create() -> Result<()> {
        let (service, _temp_dir) = create_libsql_service().await?;
        let err = service
            .create_node(NewNode::new("Orphan").with_parent(12))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert!(service.get_forest().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_libsql_emits_events_after_mutations() -> Result<()> {
        let (service, _temp_dir) = create_libsql_service().await?;
        let mut rx = service.subscribe_to_events();

        let root = service.create_node(NewNode::new("Root")).await?;
        let event = timeout(Duration::from_secs(1), rx.recv()).await??;
        assert_eq!(event.event_type(), "node:created");
        assert_eq!(event.node_id(), root.id);

        service.delete_subtree(root.id).await?;
        let event = timeout(Duration::from_secs(1), rx.recv()).await??;
        assert_eq!(
            event,
            TreeEvent::SubtreeDeleted {
                root_id: root.id,
                ids: vec![root.id],
            }
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_libsql_seed_demo_forest() -> Result<()> {
        let (service, _temp_dir) = create_libsql_service().await?;

        let seeded = service.seed_demo_forest().await?;
        assert_eq!(seeded.len(), 6);

        let forest = service.get_forest().await?;
        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].node.title, "Heading 1");
        assert_eq!(forest[0].subtree_len(), 5);
        assert_eq!(forest[1].node.title, "Heading 2");

        let leaf = seeded[4].id;
        let path = service.get_path(leaf).await?;
        assert_eq!(path.len(), 3);
        assert_eq!(path[0].title, "Heading 1");
        Ok(())
    }
}
