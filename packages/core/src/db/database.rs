//! Database Service - libsql Connection and Schema Management
//!
//! This module owns the embedded libsql database: opening the file, applying
//! SQLite settings, creating the `trees` table, and the raw SQL statements
//! that the [`TursoStore`](crate::db::TursoStore) wraps.
//!
//! # Schema
//!
//! ```sql
//! CREATE TABLE trees (
//!     id INTEGER PRIMARY KEY AUTOINCREMENT,
//!     parent_id INTEGER REFERENCES trees(id) ON UPDATE CASCADE ON DELETE SET NULL,
//!     title TEXT NOT NULL,
//!     rank INTEGER NOT NULL DEFAULT 0,
//!     content TEXT,
//!     created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
//!     updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP
//! )
//! ```
//!
//! # Connections
//!
//! Every statement runs on a fresh connection from [`DatabaseService::connect_with_timeout`],
//! which sets a busy timeout so concurrent writers wait instead of failing
//! immediately with "database is locked".

use crate::db::error::DatabaseError;
use libsql::{Builder, Database, Row};
use std::path::PathBuf;
use std::sync::Arc;

/// Column list shared by every node query (order matters for row conversion)
pub(crate) const NODE_COLUMNS: &str = "id, parent_id, title, rank, content, created_at, updated_at";

/// Busy timeout applied to every connection, in milliseconds
const BUSY_TIMEOUT_MS: u32 = 5000;

/// Database service for managing libsql connection and schema
///
/// # Examples
///
/// ```no_run
/// use arbor_core::db::DatabaseService;
/// use std::path::PathBuf;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let db_path = PathBuf::from("/path/to/arbor.db");
///     let db_service = DatabaseService::new(db_path).await?;
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseService {
    /// libsql database handle (wrapped in Arc for sharing)
    pub db: Arc<Database>,

    /// Path to the database file
    pub db_path: PathBuf,
}

/// Parameters for node insertion
pub struct DbCreateNodeParams<'a> {
    pub parent_id: Option<i64>,
    pub title: &'a str,
    pub rank: i64,
    pub content: Option<&'a str>,
}

/// Parameters for a full-row node update
pub struct DbUpdateNodeParams<'a> {
    pub id: i64,
    pub parent_id: Option<i64>,
    pub title: &'a str,
    pub rank: i64,
    pub content: Option<&'a str>,
}

impl DatabaseService {
    /// Create a new DatabaseService with the specified database path
    ///
    /// This will:
    /// 1. Ensure the parent directory exists (create if needed)
    /// 2. Open/create the database file
    /// 3. Initialize the schema (CREATE TABLE IF NOT EXISTS)
    /// 4. Enable SQLite features (WAL mode, foreign keys)
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if:
    /// - Parent directory cannot be created
    /// - Database connection fails
    /// - Schema initialization fails
    pub async fn new(db_path: PathBuf) -> Result<Self, DatabaseError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    if e.kind() == std::io::ErrorKind::PermissionDenied {
                        DatabaseError::permission_denied(db_path.clone())
                    } else {
                        DatabaseError::create_directory(parent.to_path_buf(), e)
                    }
                })?;
            }
        }

        let db = Builder::new_local(&db_path)
            .build()
            .await
            .map_err(|e| DatabaseError::open(db_path.clone(), e))?;

        let service = Self {
            db: Arc::new(db),
            db_path,
        };

        service.initialize_schema().await?;

        tracing::debug!("Opened tree database at {}", service.db_path.display());
        Ok(service)
    }

    /// Execute a PRAGMA statement
    ///
    /// PRAGMA statements return rows, so we must use query() instead of execute().
    async fn execute_pragma(
        &self,
        conn: &libsql::Connection,
        pragma: &str,
    ) -> Result<(), DatabaseError> {
        let mut stmt = conn.prepare(pragma).await.map_err(|e| {
            DatabaseError::statement(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        let _ = stmt.query(()).await.map_err(|e| {
            DatabaseError::statement(format!("Failed to execute '{}': {}", pragma, e))
        })?;
        Ok(())
    }

    /// Initialize database schema and configuration
    ///
    /// Idempotent: tables and indexes use IF NOT EXISTS.
    async fn initialize_schema(&self) -> Result<(), DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        self.execute_pragma(&conn, "PRAGMA journal_mode = WAL")
            .await?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS trees (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                parent_id INTEGER DEFAULT NULL,
                title TEXT NOT NULL,
                rank INTEGER NOT NULL DEFAULT 0,
                content TEXT,
                created_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at DATETIME NOT NULL DEFAULT CURRENT_TIMESTAMP,
                -- Parent deletion detaches children; cascades are driven by the service
                FOREIGN KEY (parent_id) REFERENCES trees(id) ON UPDATE CASCADE ON DELETE SET NULL
            )",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::schema(format!("Failed to create trees table: {}", e))
        })?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_trees_parent_id ON trees(parent_id)",
            (),
        )
        .await
        .map_err(|e| {
            DatabaseError::schema(format!("Failed to create parent index: {}", e))
        })?;

        Ok(())
    }

    /// Get a synchronous connection handle without pragmas applied
    pub fn connect(&self) -> Result<libsql::Connection, DatabaseError> {
        self.db.connect().map_err(DatabaseError::Libsql)
    }

    /// Get an async connection with busy timeout and foreign keys configured
    ///
    /// Use this for every statement issued from async code. Foreign key
    /// enforcement is per-connection in SQLite, so it is applied here rather
    /// than once at schema creation.
    pub async fn connect_with_timeout(&self) -> Result<libsql::Connection, DatabaseError> {
        let conn = self.connect()?;

        self.execute_pragma(&conn, &format!("PRAGMA busy_timeout = {}", BUSY_TIMEOUT_MS))
            .await?;
        self.execute_pragma(&conn, "PRAGMA foreign_keys = ON")
            .await?;

        Ok(conn)
    }

    //
    // NODE STORE OPERATIONS
    // Raw SQL wrapped by TursoStore. Rows are returned unconverted.
    //

    /// Insert a node and return its assigned id
    ///
    /// Fails with a foreign key violation if `parent_id` references a missing row.
    pub async fn db_create_node(&self, params: DbCreateNodeParams<'_>) -> Result<i64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        conn.execute(
            "INSERT INTO trees (parent_id, title, rank, content) VALUES (?, ?, ?, ?)",
            (params.parent_id, params.title, params.rank, params.content),
        )
        .await
        .map_err(|e| DatabaseError::statement(format!("Failed to insert node: {}", e)))?;

        Ok(conn.last_insert_rowid())
    }

    /// Retrieve a single node row by id
    pub async fn db_get_node(&self, id: i64) -> Result<Option<Row>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut rows = conn
            .query(
                &format!("SELECT {} FROM trees WHERE id = ?", NODE_COLUMNS),
                [id],
            )
            .await
            .map_err(|e| {
                DatabaseError::statement(format!("Failed to execute get_node query: {}", e))
            })?;

        rows.next()
            .await
            .map_err(|e| DatabaseError::statement(e.to_string()))
    }

    /// Retrieve every node row, ordered by rank then id
    pub async fn db_list_nodes(&self) -> Result<Vec<Row>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut rows = conn
            .query(
                &format!("SELECT {} FROM trees ORDER BY rank, id", NODE_COLUMNS),
                (),
            )
            .await
            .map_err(|e| {
                DatabaseError::statement(format!("Failed to execute list_nodes query: {}", e))
            })?;

        let mut collected = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::statement(e.to_string()))?
        {
            collected.push(row);
        }
        Ok(collected)
    }

    /// Retrieve rows whose parent is `parent_id` (roots when `None`)
    ///
    /// `IS` compares NULL as a value, so one statement serves both cases.
    pub async fn db_list_children(&self, parent_id: Option<i64>) -> Result<Vec<Row>, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let mut rows = conn
            .query(
                &format!(
                    "SELECT {} FROM trees WHERE parent_id IS ? ORDER BY rank, id",
                    NODE_COLUMNS
                ),
                [parent_id],
            )
            .await
            .map_err(|e| {
                DatabaseError::statement(format!(
                    "Failed to execute list_children query: {}",
                    e
                ))
            })?;

        let mut collected = Vec::new();
        while let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::statement(e.to_string()))?
        {
            collected.push(row);
        }
        Ok(collected)
    }

    /// Overwrite a node's mutable columns and bump `updated_at`
    ///
    /// Returns the number of rows affected (0 = node didn't exist).
    pub async fn db_update_node(&self, params: DbUpdateNodeParams<'_>) -> Result<u64, DatabaseError> {
        let conn = self.connect_with_timeout().await?;

        let rows_affected = conn
            .execute(
                "UPDATE trees SET parent_id = ?, title = ?, rank = ?, content = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?",
                (
                    params.parent_id,
                    params.title,
                    params.rank,
                    params.content,
                    params.id,
                ),
            )
            .await
            .map_err(|e| DatabaseError::statement(format!("Failed to update node: {}", e)))?;

        Ok(rows_affected)
    }

    /// Delete a batch of nodes inside one transaction
    ///
    /// Either every id is removed or none is. Ids that don't exist are
    /// skipped; the returned count only includes rows actually deleted.
    pub async fn db_delete_nodes(&self, ids: &[i64]) -> Result<u64, DatabaseError> {
        if ids.is_empty() {
            return Ok(0);
        }

        let conn = self.connect_with_timeout().await?;
        let tx = conn.transaction().await.map_err(|e| {
            DatabaseError::statement(format!("Failed to begin delete transaction: {}", e))
        })?;

        let mut deleted = 0;
        // Leaves first, so no intermediate SET NULL rewrites are needed
        for id in ids.iter().rev() {
            deleted += tx
                .execute("DELETE FROM trees WHERE id = ?", [*id])
                .await
                .map_err(|e| {
                    DatabaseError::statement(format!("Failed to delete node {}: {}", id, e))
                })?;
        }

        tx.commit().await.map_err(|e| {
            DatabaseError::statement(format!("Failed to commit delete transaction: {}", e))
        })?;

        Ok(deleted)
    }
}
