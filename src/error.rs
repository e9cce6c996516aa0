use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::store::StoreError;

/// A single violated field rule, reported alongside every other violation of
/// the same request.
#[derive(Debug, Clone, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

/// The application's error type. Validation and auth failures are terminal at
/// the middleware/extractor layer; handlers only ever raise the rest.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<Violation>),

    /// Duplicate email on registration.
    #[error("email already registered")]
    Conflict,

    /// Unknown email and wrong password map to this same variant, so the two
    /// causes are indistinguishable to the caller.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("missing Authorization header")]
    MissingToken,

    #[error("Authorization header must be 'Bearer <token>'")]
    MalformedHeader,

    #[error("token expired, please log in again")]
    TokenExpired,

    #[error("invalid token")]
    InvalidToken,

    #[error("not found")]
    NotFound,

    #[error("too many requests")]
    RateLimited { retry_after: u64 },

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::DuplicateEmail => ApiError::Conflict,
            StoreError::Other(e) => ApiError::Internal(e),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<Violation>>,
    #[serde(rename = "retryAfter", skip_serializing_if = "Option::is_none")]
    retry_after: Option<u64>,
}

impl ErrorBody {
    fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: message.into(),
            details: None,
            retry_after: None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Validation(violations) => {
                tracing::debug!(count = violations.len(), "request validation failed");
                let mut body = ErrorBody::new("Validation failed");
                body.details = Some(violations);
                (StatusCode::BAD_REQUEST, body)
            }
            // Duplicate email is reported as a plain 400, matching the rest of
            // the client-error surface.
            ApiError::Conflict => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("Email already registered"),
            ),
            ApiError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("Invalid credentials"),
            ),
            ApiError::MissingToken => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("Missing Authorization header"),
            ),
            ApiError::MalformedHeader => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("Authorization header must be 'Bearer <token>'"),
            ),
            ApiError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorBody::new("Token expired, please log in again"),
            ),
            ApiError::InvalidToken => (StatusCode::FORBIDDEN, ErrorBody::new("Invalid token")),
            ApiError::NotFound => (StatusCode::NOT_FOUND, ErrorBody::new("Not found")),
            ApiError::RateLimited { retry_after } => {
                tracing::warn!(retry_after, "rate limit exceeded");
                let mut body =
                    ErrorBody::new(format!("Too many requests, retry in {retry_after}s"));
                body.retry_after = Some(retry_after);
                let mut res =
                    (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
                if let Ok(value) = retry_after.to_string().parse() {
                    res.headers_mut().insert(header::RETRY_AFTER, value);
                }
                return res;
            }
            ApiError::Internal(e) => {
                // Detail goes to the log only, never to the client.
                tracing::error!(error = %e, "internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("Internal server error"),
                )
            }
        };
        (status, Json(body)).into_response()
    }
}
