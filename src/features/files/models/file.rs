use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// A `file_info` row
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FileInfo {
    pub id: i64,
    pub name: String,
    pub create_date: DateTime<Utc>,
    pub extension: String,
    pub size: String,
}

/// The `{id, name}` projection used for listings
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FileSummary {
    pub id: i64,
    pub name: String,
}

/// A `file_content` row; `content` is base64 text
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct FileContent {
    pub id: i64,
    pub content: String,
    pub file_info_id: i64,
}

/// Everything needed to create a metadata row and its content row together
#[derive(Debug, Clone)]
pub struct NewFile {
    pub name: String,
    pub create_date: DateTime<Utc>,
    pub extension: String,
    pub size: String,
    pub content: String,
}

/// Mutable metadata fields. `create_date: None` keeps the stored timestamp.
#[derive(Debug, Clone)]
pub struct FilePatch {
    pub name: String,
    pub extension: String,
    pub size: String,
    pub create_date: Option<DateTime<Utc>>,
}
