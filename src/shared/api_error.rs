// src/shared/api_error.rs

use actix_web::error::{JsonPayloadError, PathError};
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, HttpResponse, ResponseError};
use thiserror::Error;

use crate::shared::shared_structs::ErrorResponse;

/// Error taxonomy for the service. Every variant maps onto exactly one HTTP
/// status code and is rendered as the structured
/// `{status_code, error, message}` body.
///
/// Failures are terminal for their request: nothing here retries, because
/// each operation touches at most one row or one customer's row set.
#[derive(Debug, Error)]
pub enum AppError {
    /// Malformed or missing fields in a request body, or an unparsable
    /// filter value.
    #[error("{0}")]
    Validation(String),

    /// The addressed row (or row set) does not exist, or the URL addresses
    /// no route.
    #[error("{0}")]
    NotFound(String),

    /// An item with the same composite key already exists. Surfaced as 400,
    /// not 409.
    #[error("{0}")]
    Conflict(String),

    /// The path exists but the verb is not mapped.
    #[error("{0}")]
    MethodNotAllowed(String),

    /// A POST or PUT arrived without `Content-Type: application/json`.
    #[error("{0}")]
    UnsupportedMediaType(String),

    /// The backing store cannot be reached.
    #[error("{0}")]
    ServiceUnavailable(String),

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Startup-time configuration problems; never produced by a request.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                AppError::Conflict("An item with this key already exists".to_string())
            }
            sqlx::Error::Io(e) => AppError::ServiceUnavailable(e.to_string()),
            sqlx::Error::Tls(e) => AppError::ServiceUnavailable(e.to_string()),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => AppError::ServiceUnavailable(
                "The database connection pool is unavailable".to_string(),
            ),
            other => AppError::Database(other),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::UnsupportedMediaType(_) => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Database(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Responding with {}", status);
        } else {
            tracing::warn!(error = %self, "Responding with {}", status);
        }

        HttpResponse::build(status).json(ErrorResponse {
            status_code: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            message: self.to_string(),
        })
    }
}

/// Maps body-extraction failures onto the taxonomy: a wrong or missing
/// `Content-Type` is 415, anything else about the payload is 400. Runs
/// before any handler code, so bad bodies never reach the store.
fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    match err {
        JsonPayloadError::ContentType => {
            AppError::UnsupportedMediaType("Content-Type must be application/json".to_string())
                .into()
        }
        other => AppError::Validation(format!("Invalid ShopCartItem: {}", other)).into(),
    }
}

/// A path whose id segments are not integers addresses no resource, so it
/// gets the same structured 404 an unknown path does.
fn path_error_handler(_err: PathError, req: &HttpRequest) -> actix_web::Error {
    AppError::NotFound(format!(
        "The requested URL {} was not found on the server",
        req.path()
    ))
    .into()
}

/// `web::Json` configuration shared by the server and the tests.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

/// `web::Path` configuration shared by the server and the tests.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(path_error_handler)
}
