use crate::errors::{error::ErrorResponse, repository::RepositoryError, service::ServiceError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::error;

#[derive(Debug)]
pub enum HttpError {
    BadRequest(&'static str, String),
    Unauthorized(&'static str, String),
    Forbidden(&'static str, String),
    NotFound(&'static str, String),
    Conflict(&'static str, String),
    UnprocessableEntity(&'static str, String),
    ServiceUnavailable(&'static str, String),
    Internal(&'static str, String),
}

impl From<ServiceError> for HttpError {
    fn from(err: ServiceError) -> Self {
        let code = err.code();

        match err {
            ServiceError::Validation(errors) => {
                HttpError::BadRequest(code, format!("Validation failed: {errors:?}"))
            }
            ServiceError::InvalidQuantity(_) => HttpError::BadRequest(code, err.to_string()),

            ServiceError::Jwt(_) | ServiceError::TokenExpired | ServiceError::InvalidTokenType => {
                HttpError::Unauthorized(code, err.to_string())
            }

            ServiceError::ItemNotFound(_)
            | ServiceError::ProductNotFound(_)
            | ServiceError::CouponNotFound(_) => HttpError::NotFound(code, err.to_string()),

            ServiceError::CouponExhausted(_) | ServiceError::ConcurrentModification => {
                HttpError::Conflict(code, err.to_string())
            }

            ServiceError::CouponExpired(_)
            | ServiceError::MinimumSpendNotMet { .. }
            | ServiceError::EmptyCart => HttpError::UnprocessableEntity(code, err.to_string()),

            ServiceError::CatalogUnavailable(_) => {
                HttpError::ServiceUnavailable(code, err.to_string())
            }

            ServiceError::Repo(repo_err) => match repo_err {
                RepositoryError::NotFound => HttpError::NotFound(code, "Not found".into()),
                RepositoryError::Conflict(msg) => HttpError::Conflict(code, msg),
                RepositoryError::AlreadyExists(msg) => {
                    HttpError::Conflict(code, format!("Already exists: {msg}"))
                }
                other => {
                    error!("❌ Repository error: {other}");
                    HttpError::Internal(code, "Repository error".into())
                }
            },

            ServiceError::Internal(msg) => {
                error!("❌ Internal error: {msg}");
                HttpError::Internal(code, "Internal server error".into())
            }
        }
    }
}

impl HttpError {
    fn parts(self) -> (StatusCode, &'static str, String) {
        match self {
            HttpError::BadRequest(code, msg) => (StatusCode::BAD_REQUEST, code, msg),
            HttpError::Unauthorized(code, msg) => (StatusCode::UNAUTHORIZED, code, msg),
            HttpError::Forbidden(code, msg) => (StatusCode::FORBIDDEN, code, msg),
            HttpError::NotFound(code, msg) => (StatusCode::NOT_FOUND, code, msg),
            HttpError::Conflict(code, msg) => (StatusCode::CONFLICT, code, msg),
            HttpError::UnprocessableEntity(code, msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, code, msg)
            }
            HttpError::ServiceUnavailable(code, msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, code, msg)
            }
            HttpError::Internal(code, msg) => (StatusCode::INTERNAL_SERVER_ERROR, code, msg),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(ErrorResponse {
            status: "error".into(),
            code: code.into(),
            message,
        });

        (status, body).into_response()
    }
}
