use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::features::files::handlers::{
    delete_file, download_file, get_file, list_files, update_file, upload_file,
};
use crate::features::files::services::FileService;

/// Multipart framing overhead allowed on top of the file itself
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Create routes for the files feature
pub fn routes(file_service: Arc<FileService>, max_file_size: usize) -> Router {
    Router::new()
        .route("/files", get(list_files))
        .route(
            "/files/{id}",
            get(get_file).put(update_file).delete(delete_file),
        )
        .route("/files/{id}/content", get(download_file))
        .route(
            "/file",
            post(upload_file).layer(DefaultBodyLimit::max(max_file_size + MULTIPART_OVERHEAD)),
        )
        .with_state(file_service)
}
