use axum::{
    extract::{multipart::{MultipartError, MultipartRejection}, Multipart, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppPath};
use crate::features::files::dtos::{
    FileResponseDto, FileSummaryDto, UpdateFileDto, UploadFileDto, UploadFileResponseDto,
};
use crate::features::files::services::FileService;
use crate::shared::types::{ErrorResponse, MessageResponse};

fn multipart_error(context: &str, e: MultipartError) -> AppError {
    debug!("{}: {}", context, e);
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!("{}: {}", context, e.body_text()))
    } else {
        AppError::BadRequest(format!("{}: {}", context, e.body_text()))
    }
}

/// Name safe to place inside a quoted Content-Disposition value
fn disposition_file_name(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii_graphic() || c == ' ' => c,
            _ => '_',
        })
        .collect()
}

/// List all files
///
/// Returns `{id, name}` for every stored file, oldest first. Empty when nothing is stored.
#[utoipa::path(
    get,
    path = "/files",
    tag = "files",
    responses(
        (status = 200, description = "Files listed", body = Vec<FileSummaryDto>),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn list_files(
    State(service): State<Arc<FileService>>,
) -> Result<Json<Vec<FileSummaryDto>>> {
    let files = service.list_files().await?;
    Ok(Json(files))
}

/// Get file metadata by id
#[utoipa::path(
    get,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File id")
    ),
    responses(
        (status = 200, description = "File found", body = FileResponseDto),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn get_file(
    State(service): State<Arc<FileService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<FileResponseDto>> {
    let file = service.get_file(id).await?;
    Ok(Json(file))
}

/// Upload a file
///
/// Accepts multipart/form-data with a `file` part. Name, extension and size are
/// taken from the part; the bytes are stored base64-encoded.
#[utoipa::path(
    post,
    path = "/file",
    tag = "files",
    request_body(
        content = UploadFileDto,
        content_type = "multipart/form-data",
        description = "Form with a single `file` part",
    ),
    responses(
        (status = 200, description = "File stored", body = UploadFileResponseDto),
        (status = 400, description = "Malformed multipart body or missing file", body = ErrorResponse),
        (status = 413, description = "File too large", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn upload_file(
    State(service): State<Arc<FileService>>,
    multipart: std::result::Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadFileResponseDto>> {
    let mut multipart = multipart.map_err(|e| {
        debug!("Rejected multipart request: {}", e);
        AppError::BadRequest(format!("Expected multipart/form-data: {}", e.body_text()))
    })?;

    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error("Failed to read multipart data", e))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        if field_name != "file" {
            debug!("Ignoring unknown field: {}", field_name);
            continue;
        }

        let file_name = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(|name| name.to_string())
            .ok_or_else(|| AppError::BadRequest("Uploaded file has no filename".to_string()))?;

        let data = field
            .bytes()
            .await
            .map_err(|e| multipart_error("Failed to read file data", e))?;

        upload = Some((file_name, data.to_vec()));
    }

    let (file_name, data) =
        upload.ok_or_else(|| AppError::BadRequest("File is required".to_string()))?;

    let response = service.upload_file(&file_name, &data).await?;
    Ok(Json(response))
}

/// Update file metadata
///
/// Only `name`, `extension`, `size` and optionally `createDate` change; content is untouched.
#[utoipa::path(
    put,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File id")
    ),
    request_body = UpdateFileDto,
    responses(
        (status = 200, description = "File updated", body = MessageResponse),
        (status = 400, description = "Bad id, malformed JSON or validation error", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn update_file(
    State(service): State<Arc<FileService>>,
    AppPath(id): AppPath<i64>,
    AppJson(dto): AppJson<UpdateFileDto>,
) -> Result<Json<MessageResponse>> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.update_file(id, dto.into()).await?;
    Ok(Json(MessageResponse::new("File updated successfully")))
}

/// Delete a file and its content
#[utoipa::path(
    delete,
    path = "/files/{id}",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File id")
    ),
    responses(
        (status = 200, description = "File deleted", body = MessageResponse),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "File not found", body = ErrorResponse),
        (status = 500, description = "Store error", body = ErrorResponse)
    )
)]
pub async fn delete_file(
    State(service): State<Arc<FileService>>,
    AppPath(id): AppPath<i64>,
) -> Result<Json<MessageResponse>> {
    service.delete_file(id).await?;
    Ok(Json(MessageResponse::new("File deleted successfully")))
}

/// Download the original bytes of a file
#[utoipa::path(
    get,
    path = "/files/{id}/content",
    tag = "files",
    params(
        ("id" = i64, Path, description = "File id")
    ),
    responses(
        (status = 200, description = "Decoded file bytes as application/octet-stream"),
        (status = 400, description = "Id is not an integer", body = ErrorResponse),
        (status = 404, description = "File or content not found", body = ErrorResponse),
        (status = 500, description = "Store error or corrupt content", body = ErrorResponse)
    )
)]
pub async fn download_file(
    State(service): State<Arc<FileService>>,
    AppPath(id): AppPath<i64>,
) -> Result<impl IntoResponse> {
    let file = service.download_file(id).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        disposition_file_name(&file.name)
    );

    Ok((
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.data,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disposition_file_name() {
        assert_eq!(disposition_file_name("report.pdf"), "report.pdf");
        assert_eq!(disposition_file_name("my \"quoted\".txt"), "my _quoted_.txt");
        assert_eq!(disposition_file_name("naïve.txt"), "na_ve.txt");
    }
}
