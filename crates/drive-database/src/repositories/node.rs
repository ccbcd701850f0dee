//! PostgreSQL node store.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;

use drive_core::error::{AppError, ErrorKind};
use drive_core::result::AppResult;
use drive_core::types::{NodeId, OwnerId};
use drive_entity::node::{CreateNode, Node, NodeKind, NodePatch};

use crate::store::NodeStore;

const COLUMNS: &str = "id, name, kind, parent_id, owner_id, mime_type, size_bytes, \
                       content_url, storage_key, created_at, updated_at, trashed, trashed_at";

/// [`NodeStore`] over the `nodes` table.
#[derive(Debug, Clone)]
pub struct PgNodeStore {
    pool: PgPool,
}

impl PgNodeStore {
    /// Create a store over an open pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NodeStore for PgNodeStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }

    async fn get(&self, id: NodeId) -> AppResult<Option<Node>> {
        sqlx::query_as::<_, Node>(&format!("SELECT {COLUMNS} FROM nodes WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find node", e))
    }

    async fn insert(&self, data: CreateNode) -> AppResult<Node> {
        let node = data.into_node(NodeId::new(), Utc::now());
        sqlx::query_as::<_, Node>(&format!(
            "INSERT INTO nodes (id, name, kind, parent_id, owner_id, mime_type, size_bytes, \
             content_url, storage_key, created_at, updated_at, trashed, trashed_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13) \
             RETURNING {COLUMNS}"
        ))
        .bind(node.id)
        .bind(&node.name)
        .bind(node.kind)
        .bind(node.parent_id)
        .bind(&node.owner_id)
        .bind(&node.mime_type)
        .bind(node.size_bytes)
        .bind(&node.content_url)
        .bind(&node.storage_key)
        .bind(node.created_at)
        .bind(node.updated_at)
        .bind(node.trashed)
        .bind(node.trashed_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to insert node", e))
    }

    async fn patch(&self, id: NodeId, patch: NodePatch) -> AppResult<Option<Node>> {
        if patch.is_empty() {
            return self.get(id).await;
        }
        sqlx::query_as::<_, Node>(&format!(
            "UPDATE nodes SET \
                name = COALESCE($2, name), \
                parent_id = CASE WHEN $3 THEN $4 ELSE parent_id END, \
                trashed = COALESCE($5, trashed), \
                trashed_at = CASE WHEN $6 THEN $7 ELSE trashed_at END, \
                updated_at = COALESCE($8, updated_at) \
             WHERE id = $1 RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(patch.name)
        .bind(patch.parent_id.is_some())
        .bind(patch.parent_id.flatten())
        .bind(patch.trashed)
        .bind(patch.trashed_at.is_some())
        .bind(patch.trashed_at.flatten())
        .bind(patch.updated_at)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to update node", e))
    }

    async fn delete(&self, id: NodeId) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM nodes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to delete node", e))?;
        Ok(result.rows_affected() > 0)
    }

    async fn find_by_owner(&self, owner: &OwnerId) -> AppResult<Vec<Node>> {
        sqlx::query_as::<_, Node>(&format!(
            "SELECT {COLUMNS} FROM nodes WHERE owner_id = $1 ORDER BY seq"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list owner nodes", e))
    }

    async fn find_children_of_kind(
        &self,
        parent: Option<NodeId>,
        owner: &OwnerId,
        kind: NodeKind,
    ) -> AppResult<Vec<Node>> {
        sqlx::query_as::<_, Node>(&format!(
            "SELECT {COLUMNS} FROM nodes \
             WHERE parent_id IS NOT DISTINCT FROM $1 AND owner_id = $2 AND kind = $3 \
             ORDER BY seq"
        ))
        .bind(parent)
        .bind(owner)
        .bind(kind)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list children", e))
    }

    async fn find_child_nodes(&self, parent: NodeId) -> AppResult<Vec<Node>> {
        sqlx::query_as::<_, Node>(&format!(
            "SELECT {COLUMNS} FROM nodes WHERE parent_id = $1 ORDER BY seq"
        ))
        .bind(parent)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list child nodes", e))
    }

    async fn find_trashed(&self, owner: &OwnerId) -> AppResult<Vec<Node>> {
        sqlx::query_as::<_, Node>(&format!(
            "SELECT {COLUMNS} FROM nodes WHERE owner_id = $1 AND trashed = TRUE ORDER BY seq"
        ))
        .bind(owner)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list trash", e))
    }

    async fn find_folder_by_name(
        &self,
        parent: Option<NodeId>,
        owner: &OwnerId,
        name: &str,
    ) -> AppResult<Option<Node>> {
        sqlx::query_as::<_, Node>(&format!(
            "SELECT {COLUMNS} FROM nodes \
             WHERE parent_id IS NOT DISTINCT FROM $1 AND owner_id = $2 \
               AND kind = 'folder' AND trashed = FALSE AND lower(name) = lower($3) \
             ORDER BY seq LIMIT 1"
        ))
        .bind(parent)
        .bind(owner)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find folder by name", e)
        })
    }
}
