#![cfg(test)]

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::core::error::{AppError, Result};
use crate::features::files::models::{FileContent, FileInfo, FilePatch, FileSummary, NewFile};
use crate::features::files::stores::FileStore;
use crate::features::files::FileService;

#[derive(Default, Clone)]
struct Tables {
    file_info: Vec<FileInfo>,
    file_content: Vec<FileContent>,
    next_info_id: i64,
    next_content_id: i64,
}

/// In-memory [`FileStore`] with switches for simulating database failures.
#[derive(Default)]
pub struct MemoryFileStore {
    tables: Mutex<Tables>,
    fail_all: AtomicBool,
    fail_content_inserts: AtomicBool,
}

fn simulated_failure() -> AppError {
    AppError::Database(sqlx::Error::PoolTimedOut)
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every operation fails with a database error.
    pub fn fail_all(&self, fail: bool) {
        self.fail_all.store(fail, Ordering::SeqCst);
    }

    /// `create` fails after the metadata insert, exercising rollback.
    pub fn fail_content_inserts(&self, fail: bool) {
        self.fail_content_inserts.store(fail, Ordering::SeqCst);
    }

    /// Overwrite the content rows of a file with a single given row.
    pub fn replace_content(&self, content: FileContent) {
        let mut tables = self.tables.lock().unwrap();
        tables
            .file_content
            .retain(|c| c.file_info_id != content.file_info_id);
        tables.file_content.push(content);
    }

    pub fn content_rows(&self) -> usize {
        self.tables.lock().unwrap().file_content.len()
    }

    fn check(&self) -> Result<()> {
        if self.fail_all.load(Ordering::SeqCst) {
            return Err(simulated_failure());
        }
        Ok(())
    }
}

#[async_trait]
impl FileStore for MemoryFileStore {
    async fn list_all(&self) -> Result<Vec<FileSummary>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .file_info
            .iter()
            .map(|f| FileSummary {
                id: f.id,
                name: f.name.clone(),
            })
            .collect())
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<FileInfo>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.file_info.iter().find(|f| f.id == id).cloned())
    }

    async fn exists(&self, id: i64) -> Result<bool> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables.file_info.iter().any(|f| f.id == id))
    }

    async fn create(&self, file: NewFile) -> Result<i64> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();

        // Work on a copy so a failure leaves the tables untouched
        let mut next = tables.clone();

        next.next_info_id += 1;
        let id = next.next_info_id;
        next.file_info.push(FileInfo {
            id,
            name: file.name,
            create_date: file.create_date,
            extension: file.extension,
            size: file.size,
        });

        if self.fail_content_inserts.load(Ordering::SeqCst) {
            return Err(simulated_failure());
        }

        next.next_content_id += 1;
        next.file_content.push(FileContent {
            id: next.next_content_id,
            content: file.content,
            file_info_id: id,
        });

        *tables = next;
        Ok(id)
    }

    async fn update(&self, id: i64, patch: &FilePatch) -> Result<u64> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        match tables.file_info.iter_mut().find(|f| f.id == id) {
            Some(info) => {
                info.name = patch.name.clone();
                info.extension = patch.extension.clone();
                info.size = patch.size.clone();
                if let Some(create_date) = patch.create_date {
                    info.create_date = create_date;
                }
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete(&self, id: i64) -> Result<bool> {
        self.check()?;
        let mut tables = self.tables.lock().unwrap();
        tables.file_content.retain(|c| c.file_info_id != id);
        let before = tables.file_info.len();
        tables.file_info.retain(|f| f.id != id);
        Ok(tables.file_info.len() < before)
    }

    async fn get_content(&self, file_info_id: i64) -> Result<Option<FileContent>> {
        self.check()?;
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .file_content
            .iter()
            .find(|c| c.file_info_id == file_info_id)
            .cloned())
    }
}

pub fn memory_file_service() -> (Arc<MemoryFileStore>, Arc<FileService>) {
    let store = Arc::new(MemoryFileStore::new());
    let service = Arc::new(FileService::new(store.clone()));
    (store, service)
}
