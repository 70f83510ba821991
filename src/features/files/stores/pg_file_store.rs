use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use super::{content_store, metadata_store, FileStore};
use crate::core::error::Result;
use crate::features::files::models::{FileContent, FileInfo, FilePatch, FileSummary, NewFile};

/// PostgreSQL-backed [`FileStore`] sharing one connection pool.
pub struct PgFileStore {
    pool: PgPool,
}

impl PgFileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl std::fmt::Debug for PgFileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgFileStore")
            .field("pool", &"<PgPool>")
            .finish()
    }
}

#[async_trait]
impl FileStore for PgFileStore {
    async fn list_all(&self) -> Result<Vec<FileSummary>> {
        Ok(metadata_store::list_all(&self.pool).await?)
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<FileInfo>> {
        Ok(metadata_store::find_by_id(&self.pool, id).await?)
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        Ok(metadata_store::count_by_id(&self.pool, id).await? > 0)
    }

    async fn create(&self, file: NewFile) -> Result<i64> {
        // Dropping `tx` on any early return rolls back the metadata insert
        let mut tx = self.pool.begin().await?;

        let id = metadata_store::insert(
            &mut *tx,
            &file.name,
            file.create_date,
            &file.extension,
            &file.size,
        )
        .await?;
        let content_id = content_store::insert(&mut *tx, &file.content, id).await?;

        tx.commit().await?;

        debug!("Inserted file_info id={} with file_content id={}", id, content_id);
        Ok(id)
    }

    async fn update(&self, id: i64, patch: &FilePatch) -> Result<u64> {
        Ok(metadata_store::update(&self.pool, id, patch).await?)
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let content_rows = content_store::delete_by_file_info_id(&mut *tx, id).await?;
        let info_rows = metadata_store::delete(&mut *tx, id).await?;

        tx.commit().await?;

        debug!(
            "Deleted file_info id={} ({} row), {} file_content rows",
            id, info_rows, content_rows
        );
        Ok(info_rows > 0)
    }

    async fn get_content(&self, file_info_id: i64) -> Result<Option<FileContent>> {
        Ok(content_store::find_by_file_info_id(&self.pool, file_info_id).await?)
    }
}
