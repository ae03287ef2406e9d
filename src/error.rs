use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thirtyfour::error::WebDriverError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("scrape failed: {0}")]
    Scrape(String),
    #[error("word \"{0}\" is already cached")]
    DuplicateWord(String),
    #[error("Word not found")]
    WordNotFound,
    #[error("database request failed: {0}")]
    Database(#[from] sqlx::Error),
    #[error("{0}")]
    Internal(&'static str),
}

impl From<WebDriverError> for AppError {
    fn from(error: WebDriverError) -> Self {
        Self::Scrape(error.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            Self::WordNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            Self::DuplicateWord(_) => (StatusCode::CONFLICT, self.to_string()),
            Self::Scrape(e) => {
                tracing::error!("!!! scrape failed: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to fetch word data".to_string(),
                )
            }
            Self::Database(e) => {
                tracing::error!("!!! database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
            Self::Internal(msg) => {
                tracing::error!("!!! {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
