use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::dataset::DatasetError;
use crate::models::ErrorBody;
use crate::validation::ValidationError;

pub const RATE_LIMITED_MESSAGE: &str = "Too many requests. Please try again later.";
pub const INTERNAL_MESSAGE: &str = "Internal server error";

#[derive(Error, Debug)]
pub enum SearchError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("rate limit exceeded")]
    RateLimited,

    #[error("internal error: {0}")]
    Internal(String),
}

// Failures that stop the server before or while it is listening
#[derive(Error, Debug)]
pub enum StartupError {
    #[error(transparent)]
    Dataset(#[from] DatasetError),

    #[error("server io error: {0}")]
    Io(#[from] std::io::Error),
}

impl SearchError {
    pub fn status(&self) -> StatusCode {
        match self {
            SearchError::Validation(_) => StatusCode::BAD_REQUEST,
            SearchError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            SearchError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            SearchError::Validation(e) => ErrorBody::new(e.to_string()),
            SearchError::RateLimited => ErrorBody::new(RATE_LIMITED_MESSAGE),
            SearchError::Internal(detail) => {
                // never echo the detail back to the caller
                tracing::error!(%detail, "search failed");
                ErrorBody::new(INTERNAL_MESSAGE)
            }
        };

        (status, Json(body)).into_response()
    }
}
