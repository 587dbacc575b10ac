use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::error::SinkError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Search engine error: {0}")]
    Engine(#[from] SinkError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Engine(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::BadRequest(message) => ErrorResponse {
                error: "bad_request",
                message: message.clone(),
            },
            Self::Engine(e) => {
                tracing::error!(error = %e, "Search engine request failed");
                ErrorResponse {
                    error: "engine_error",
                    message: e.to_string(),
                }
            }
        };

        (status, Json(body)).into_response()
    }
}

#[derive(Serialize, Debug)]
struct ErrorResponse {
    error: &'static str,
    message: String,
}
