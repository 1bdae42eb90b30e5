use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::cms::StoreError;
use crate::web_ui::render_error;

#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Post not found: {0}")]
    PostNotFound(String),

    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Content store error: {0}")]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ServerError::PostNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::ClassNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::PageNotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            ServerError::Store(e) => {
                tracing::error!("Content store unavailable: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Content storage is unavailable, try again shortly.".to_string(),
                )
            }
            ServerError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error".to_string())
            }
        };

        render_error(status, &message)
    }
}

pub type Result<T> = std::result::Result<T, ServerError>;
