use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use utoipa::ToSchema;
use validator::Validate;

use crate::features::files::models::{FileInfo, FilePatch, FileSummary};

/// A decimal byte count such as "1024"
static SIZE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// Entry of `GET /files`
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FileSummaryDto {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "report.pdf")]
    pub name: String,
}

impl From<FileSummary> for FileSummaryDto {
    fn from(summary: FileSummary) -> Self {
        Self {
            id: summary.id,
            name: summary.name,
        }
    }
}

/// Full metadata record
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileResponseDto {
    #[schema(example = 1)]
    pub id: i64,
    #[schema(example = "report.pdf")]
    pub name: String,
    pub create_date: DateTime<Utc>,
    #[schema(example = ".pdf")]
    pub extension: String,
    /// Byte count as text
    #[schema(example = "1024")]
    pub size: String,
}

impl From<FileInfo> for FileResponseDto {
    fn from(info: FileInfo) -> Self {
        Self {
            id: info.id,
            name: info.name,
            create_date: info.create_date,
            extension: info.extension,
            size: info.size,
        }
    }
}

/// Upload form for OpenAPI documentation only.
/// The handler reads axum's Multipart directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadFileDto {
    /// The file to store
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub file: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadFileResponseDto {
    #[schema(example = "File uploaded successfully")]
    pub message: String,
    /// Id of the new metadata row, usable with `GET /files/{id}`
    #[schema(example = 1)]
    pub id: i64,
}

/// Body of `PUT /files/{id}`. Unknown keys such as `id` are ignored.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateFileDto {
    #[validate(length(min = 1, max = 255))]
    #[schema(example = "report-final.pdf")]
    pub name: String,

    #[validate(length(max = 32))]
    #[schema(example = ".pdf")]
    pub extension: String,

    #[validate(regex(path = *SIZE_REGEX, message = "size must be a non-negative decimal byte count"))]
    #[schema(example = "1024")]
    pub size: String,

    /// Replaces the stored creation date when present
    pub create_date: Option<DateTime<Utc>>,
}

impl From<UpdateFileDto> for FilePatch {
    fn from(dto: UpdateFileDto) -> Self {
        Self {
            name: dto.name,
            extension: dto.extension,
            size: dto.size,
            create_date: dto.create_date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn update_dto(value: serde_json::Value) -> UpdateFileDto {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_response_uses_camel_case() {
        let dto = FileResponseDto::from(FileInfo {
            id: 3,
            name: "a.txt".to_string(),
            create_date: Utc::now(),
            extension: ".txt".to_string(),
            size: "2".to_string(),
        });
        let value = serde_json::to_value(&dto).unwrap();
        assert!(value.get("createDate").is_some());
        assert!(value.get("create_date").is_none());
        assert_eq!(value["size"], "2");
    }

    #[test]
    fn test_update_valid() {
        let dto = update_dto(json!({
            "id": 9,
            "name": "notes.md",
            "extension": ".md",
            "size": "120"
        }));
        assert!(dto.validate().is_ok());
        assert!(dto.create_date.is_none());
    }

    #[test]
    fn test_update_rejects_bad_size() {
        let dto = update_dto(json!({ "name": "a", "extension": "", "size": "12kb" }));
        assert!(dto.validate().is_err());

        let dto = update_dto(json!({ "name": "a", "extension": "", "size": "-1" }));
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_rejects_empty_name() {
        let dto = update_dto(json!({ "name": "", "extension": ".md", "size": "1" }));
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_update_parses_create_date() {
        let dto = update_dto(json!({
            "name": "a",
            "extension": "",
            "size": "1",
            "createDate": "2024-05-01T10:00:00Z"
        }));
        let patch = FilePatch::from(dto);
        assert_eq!(
            patch.create_date.unwrap().to_rfc3339(),
            "2024-05-01T10:00:00+00:00"
        );
    }
}
