use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("invalid or missing field: {0}")]
    InvalidField(&'static str),
    #[error("malformed multipart payload: {0}")]
    Multipart(#[from] axum::extract::multipart::MultipartError),
    #[error("media upload failed: {0}")]
    Upload(#[from] reqwest::Error),
    #[error(transparent)]
    Db(#[from] sea_orm::DbErr),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::InvalidField(_) | AppError::Multipart(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            AppError::Upload(_) | AppError::Db(_) | AppError::Other(_) => {
                // Raw cause stays server-side, the caller gets a generic message.
                tracing::error!(error = %self, "request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
