use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use service::errors::ServiceError;
use thiserror::Error;
use tracing::error;

pub const INTERNAL_ERROR: &str = "Internal server error";

/// `{ "message": ... }` body shared by every JSON error and by plain acknowledgements.
#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub message: String,
}

/// Error returned by the JSON handlers.
#[derive(Debug, Error)]
#[error("{status}: {message}")]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR)
    }

    /// Map a service error, logging storage failures with what the handler was doing.
    /// The cause never reaches the client.
    pub fn during(action: &'static str) -> impl Fn(ServiceError) -> Self {
        move |e| match e {
            ServiceError::BadRequest(msg) => Self::bad_request(msg),
            ServiceError::NotFound(msg) => Self::new(StatusCode::NOT_FOUND, msg),
            ServiceError::Model(e) => Self::bad_request(e.to_string()),
            ServiceError::Storage(cause) => {
                error!(action, error = %cause, "request failed");
                Self::internal()
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(MessageBody { message: self.message })).into_response()
    }
}
