use base64::prelude::*;
use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, info};

use crate::core::error::{AppError, Result};
use crate::features::files::dtos::{FileResponseDto, FileSummaryDto, UploadFileResponseDto};
use crate::features::files::models::{FilePatch, NewFile};
use crate::features::files::stores::FileStore;

/// Decoded payload ready to be sent back to a client
#[derive(Debug)]
pub struct DownloadedFile {
    pub name: String,
    pub data: Vec<u8>,
}

/// Extension of `file_name` including the leading dot, or "" when there is none.
///
/// Looks only at the last path segment: `report.pdf` -> `.pdf`,
/// `archive.tar.gz` -> `.gz`, `dir.d/README` -> "".
pub fn file_extension(file_name: &str) -> String {
    let base = file_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(file_name);

    match base.rfind('.') {
        Some(idx) => base[idx..].to_string(),
        None => String::new(),
    }
}

fn not_found(id: i64) -> AppError {
    AppError::NotFound(format!("File with id {} not found", id))
}

/// Service for file operations
pub struct FileService {
    store: Arc<dyn FileStore>,
}

impl FileService {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }

    pub async fn list_files(&self) -> Result<Vec<FileSummaryDto>> {
        let files = self.store.list_all().await?;
        Ok(files.into_iter().map(FileSummaryDto::from).collect())
    }

    /// Non-positive ids are never valid row ids and resolve to NotFound.
    pub async fn get_file(&self, id: i64) -> Result<FileResponseDto> {
        if id <= 0 {
            return Err(not_found(id));
        }

        self.store
            .get_by_id(id)
            .await?
            .map(FileResponseDto::from)
            .ok_or_else(|| not_found(id))
    }

    /// Store an uploaded file: metadata derived from the name and bytes,
    /// content as standard base64 text.
    pub async fn upload_file(&self, file_name: &str, data: &[u8]) -> Result<UploadFileResponseDto> {
        let new_file = NewFile {
            name: file_name.to_string(),
            create_date: Utc::now(),
            extension: file_extension(file_name),
            size: data.len().to_string(),
            content: BASE64_STANDARD.encode(data),
        };

        let id = self.store.create(new_file).await?;

        info!(
            "File stored: id={}, name={}, size={}",
            id,
            file_name,
            data.len()
        );

        Ok(UploadFileResponseDto {
            message: "File uploaded successfully".to_string(),
            id,
        })
    }

    pub async fn update_file(&self, id: i64, patch: FilePatch) -> Result<()> {
        self.ensure_exists(id).await?;

        let rows = self.store.update(id, &patch).await?;
        debug!("Updated file_info id={} ({} rows)", id, rows);

        Ok(())
    }

    /// Delete metadata and content. A second delete of the same id is NotFound.
    pub async fn delete_file(&self, id: i64) -> Result<()> {
        self.ensure_exists(id).await?;

        // The row may vanish between the probe and the delete
        if !self.store.delete(id).await? {
            return Err(not_found(id));
        }

        info!("File deleted: id={}", id);
        Ok(())
    }

    pub async fn download_file(&self, id: i64) -> Result<DownloadedFile> {
        let info = self.get_file(id).await?;

        let content = self
            .store
            .get_content(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("File with id {} has no content", id)))?;

        let data = BASE64_STANDARD.decode(content.content.as_bytes()).map_err(|e| {
            AppError::Internal(format!(
                "Stored content of file {} is not valid base64: {}",
                id, e
            ))
        })?;

        Ok(DownloadedFile {
            name: info.name,
            data,
        })
    }

    async fn ensure_exists(&self, id: i64) -> Result<()> {
        if id <= 0 || !self.store.exists(id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::files::models::FileContent;
    use crate::shared::test_helpers::MemoryFileStore;

    fn service_with(store: Arc<MemoryFileStore>) -> FileService {
        FileService::new(store)
    }

    fn patch(name: &str) -> FilePatch {
        FilePatch {
            name: name.to_string(),
            extension: ".txt".to_string(),
            size: "5".to_string(),
            create_date: None,
        }
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("report.pdf"), ".pdf");
        assert_eq!(file_extension("archive.tar.gz"), ".gz");
        assert_eq!(file_extension("README"), "");
        assert_eq!(file_extension("dir.d/README"), "");
        assert_eq!(file_extension("C:\\tmp\\photo.JPG"), ".JPG");
        assert_eq!(file_extension(".env"), ".env");
    }

    #[tokio::test]
    async fn test_upload_derives_metadata_and_encodes_content() {
        let store = Arc::new(MemoryFileStore::new());
        let service = service_with(store.clone());
        let data = vec![7u8; 1024];

        let created = service.upload_file("report.pdf", &data).await.unwrap();
        let info = service.get_file(created.id).await.unwrap();

        assert_eq!(info.name, "report.pdf");
        assert_eq!(info.extension, ".pdf");
        assert_eq!(info.size, "1024");

        let content = store.get_content(created.id).await.unwrap().unwrap();
        assert_eq!(content.content, BASE64_STANDARD.encode(&data));
        assert_eq!(content.file_info_id, created.id);
    }

    #[tokio::test]
    async fn test_download_round_trip() {
        let service = service_with(Arc::new(MemoryFileStore::new()));
        let data = b"\x00\x01binary\xffpayload".to_vec();

        let created = service.upload_file("blob.bin", &data).await.unwrap();
        let downloaded = service.download_file(created.id).await.unwrap();

        assert_eq!(downloaded.name, "blob.bin");
        assert_eq!(downloaded.data, data);
    }

    #[tokio::test]
    async fn test_download_rejects_corrupt_content() {
        let store = Arc::new(MemoryFileStore::new());
        let service = service_with(store.clone());
        let created = service.upload_file("a.txt", b"hello").await.unwrap();

        store.replace_content(FileContent {
            id: 1,
            content: "%%% not base64 %%%".to_string(),
            file_info_id: created.id,
        });

        let err = service.download_file(created.id).await.unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[tokio::test]
    async fn test_get_non_positive_id_is_not_found() {
        let service = service_with(Arc::new(MemoryFileStore::new()));
        assert!(matches!(
            service.get_file(0).await,
            Err(AppError::NotFound(_))
        ));
        assert!(matches!(
            service.get_file(-1).await,
            Err(AppError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_update_missing_file_is_not_found() {
        let service = service_with(Arc::new(MemoryFileStore::new()));
        let err = service.update_file(42, patch("x.txt")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_keeps_create_date_when_absent() {
        let service = service_with(Arc::new(MemoryFileStore::new()));
        let created = service.upload_file("a.txt", b"hello").await.unwrap();
        let before = service.get_file(created.id).await.unwrap();

        service
            .update_file(created.id, patch("b.txt"))
            .await
            .unwrap();

        let after = service.get_file(created.id).await.unwrap();
        assert_eq!(after.name, "b.txt");
        assert_eq!(after.create_date, before.create_date);
    }

    #[tokio::test]
    async fn test_delete_twice() {
        let store = Arc::new(MemoryFileStore::new());
        let service = service_with(store.clone());
        let created = service.upload_file("a.txt", b"hello").await.unwrap();

        service.delete_file(created.id).await.unwrap();
        assert!(store.get_content(created.id).await.unwrap().is_none());

        let err = service.delete_file(created.id).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_failed_create_leaves_no_rows() {
        let store = Arc::new(MemoryFileStore::new());
        store.fail_content_inserts(true);
        let service = service_with(store.clone());

        let err = service.upload_file("a.txt", b"hello").await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
        assert!(service.list_files().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_is_ordered_and_stable() {
        let service = service_with(Arc::new(MemoryFileStore::new()));
        for name in ["one.txt", "two.txt", "three.txt"] {
            service.upload_file(name, b"x").await.unwrap();
        }

        let first: Vec<_> = service
            .list_files()
            .await
            .unwrap()
            .into_iter()
            .map(|f| (f.id, f.name))
            .collect();
        let second: Vec<_> = service
            .list_files()
            .await
            .unwrap()
            .into_iter()
            .map(|f| (f.id, f.name))
            .collect();

        assert_eq!(first, second);
        assert_eq!(
            first.iter().map(|(_, n)| n.as_str()).collect::<Vec<_>>(),
            vec!["one.txt", "two.txt", "three.txt"]
        );
    }
}
