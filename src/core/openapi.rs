use utoipa::{Modify, OpenApi};

use crate::features::files::{dtos as files_dtos, handlers as files_handlers};
use crate::shared::types::{ErrorResponse, MessageResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        files_handlers::list_files,
        files_handlers::get_file,
        files_handlers::upload_file,
        files_handlers::update_file,
        files_handlers::delete_file,
        files_handlers::download_file,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            MessageResponse,
            // Files
            files_dtos::FileSummaryDto,
            files_dtos::FileResponseDto,
            files_dtos::UploadFileDto,
            files_dtos::UploadFileResponseDto,
            files_dtos::UpdateFileDto,
        )
    ),
    tags(
        (name = "files", description = "File metadata and content stored in PostgreSQL"),
    ),
    info(
        title = "Filebox API",
        version = "0.1.0",
        description = "Store and retrieve files kept in PostgreSQL",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_file_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/files", "/files/{id}", "/files/{id}/content", "/file"] {
            assert!(doc.paths.paths.contains_key(path), "missing {}", path);
        }
    }

    #[test]
    fn test_info_modifier() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "T".to_string(),
            version: "9".to_string(),
            description: "D".to_string(),
        }
        .modify(&mut doc);
        assert_eq!(doc.info.title, "T");
        assert_eq!(doc.info.version, "9");
    }
}
