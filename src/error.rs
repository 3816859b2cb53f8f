use axum::{http::StatusCode, response::IntoResponse};
use thiserror::Error;

/// Snapshot download failures. No retry is attempted at this level;
/// the cache surfaces the error and a later call retries.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("snapshot download timed out")]
    Timeout,

    #[error("snapshot endpoint returned HTTP {0}")]
    HttpStatus(u16),

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),
}

/// Failures opening or querying a persisted snapshot file.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("snapshot file is corrupt: {0}")]
    Corrupt(String),

    #[error("snapshot schema mismatch: {0}")]
    SchemaMismatch(String),
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("query error: {0}")]
    Query(#[from] QueryError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("snapshot contained no rows")]
    EmptyResult,

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::Fetch(_) => StatusCode::BAD_GATEWAY,
            AppError::EmptyResult => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, self.to_string()).into_response()
    }
}
