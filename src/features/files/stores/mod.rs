pub mod content_store;
pub mod metadata_store;
mod pg_file_store;

use async_trait::async_trait;

use crate::core::error::Result;
use crate::features::files::models::{FileContent, FileInfo, FilePatch, FileSummary, NewFile};

pub use pg_file_store::PgFileStore;

/// Persistence for file metadata and content.
///
/// Implementations must make `create` and `delete` atomic: either both
/// tables change or neither does.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// All metadata rows as `{id, name}`, in insertion order.
    async fn list_all(&self) -> Result<Vec<FileSummary>>;

    async fn get_by_id(&self, id: i64) -> Result<Option<FileInfo>>;

    /// `COUNT(1)` existence probe.
    async fn exists(&self, id: i64) -> Result<bool>;

    /// Insert the metadata row, then its content row. Returns the new metadata id.
    async fn create(&self, file: NewFile) -> Result<i64>;

    /// Returns the number of metadata rows changed.
    async fn update(&self, id: i64, patch: &FilePatch) -> Result<u64>;

    /// Remove content rows and the metadata row. Returns false when no metadata row existed.
    async fn delete(&self, id: i64) -> Result<bool>;

    async fn get_content(&self, file_info_id: i64) -> Result<Option<FileContent>>;
}
