use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of every non-2xx response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable kind: bad_request, validation_error, not_found, internal_error
    #[schema(example = "not_found")]
    pub error: String,
    /// Human-readable detail
    #[schema(example = "File with id 42 not found")]
    pub message: String,
}

/// Plain confirmation body for successful mutations.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    #[schema(example = "File updated successfully")]
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
