use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

/// Errors surfaced by the REST handlers.
///
/// Decode, evaluation and encode failures map to distinct status classes.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("error decoding query: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("error evaluating query: {0}")]
    Evaluate(#[from] wordvec_core::Error),

    #[error("error encoding response to JSON: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Decode(_) => StatusCode::BAD_REQUEST,
            ApiError::Evaluate(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Encode(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        self.status()
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status()).json(serde_json::json!({
            "error": self.to_string()
        }))
    }
}
