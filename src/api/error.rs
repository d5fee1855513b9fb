use axum::extract::multipart::MultipartError;
use axum::extract::multipart::MultipartRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// Every way `/search-file` can fail, each mapped to one status code.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Rate limit exceeded: {max_requests} requests per {window_secs} seconds per IP.")]
    RateLimited {
        max_requests: usize,
        window_secs: u64,
    },

    #[error("File too large (max {max_bytes} bytes).")]
    PayloadTooLarge { max_bytes: usize },

    #[error("Prompt too long (max {max_bytes} bytes).")]
    PromptTooLarge { max_bytes: usize },

    #[error("Invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("JSON must be a list of file entries or an object with key 'files'.")]
    InvalidShape,

    #[error("Prompt must be valid UTF-8 text.")]
    InvalidPrompt,

    #[error("Missing form field '{0}'.")]
    MissingField(&'static str),

    #[error("{}", .0.body_text())]
    NotMultipart(#[from] MultipartRejection),

    #[error("Malformed multipart body: {}", .0.body_text())]
    Multipart(#[from] MultipartError),

    #[error("LLM selection failed: {0:#}")]
    Selection(anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::PayloadTooLarge { .. } | ApiError::PromptTooLarge { .. } => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            ApiError::InvalidJson(_)
            | ApiError::InvalidShape
            | ApiError::InvalidPrompt
            | ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::NotMultipart(e) => e.status(),
            ApiError::Multipart(e) => e.status(),
            ApiError::Selection(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), self.to_string()).into_response()
    }
}
