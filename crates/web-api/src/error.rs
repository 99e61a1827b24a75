use application::ApplicationError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use domain::{DomainError, RepositoryError};
use serde::Serialize;
use validator::ValidationErrors;

pub const UNAUTHORIZED_MESSAGE: &str = "No autorizado";
const INTERNAL_MESSAGE: &str = "Error interno del servidor";

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorBody {
                code,
                message: message.into(),
            },
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.body.code
    }
}

impl From<ApplicationError> for ApiError {
    fn from(error: ApplicationError) -> Self {
        match error {
            ApplicationError::Domain(err) => {
                let (status, code) = match &err {
                    DomainError::InvalidArgument { .. } => {
                        (StatusCode::BAD_REQUEST, "INVALID_ARGUMENT")
                    }
                    DomainError::UserNotFound => (StatusCode::NOT_FOUND, "USER_NOT_FOUND"),
                    DomainError::PostNotFound => (StatusCode::NOT_FOUND, "POST_NOT_FOUND"),
                    DomainError::LikeNotFound => (StatusCode::NOT_FOUND, "LIKE_NOT_FOUND"),
                    DomainError::UserAlreadyExists => (StatusCode::CONFLICT, "USER_EXISTS"),
                    DomainError::AlreadyLiked => (StatusCode::CONFLICT, "ALREADY_LIKED"),
                };
                ApiError::new(status, code, err.to_string())
            }
            ApplicationError::Repository(RepositoryError::NotFound) => ApiError::new(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                "Recurso no encontrado",
            ),
            ApplicationError::Repository(RepositoryError::Conflict) => ApiError::new(
                StatusCode::CONFLICT,
                "CONFLICT",
                "El recurso ya existe",
            ),
            ApplicationError::Repository(RepositoryError::Storage { message }) => {
                tracing::error!(error = %message, "storage failure");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    INTERNAL_MESSAGE,
                )
            }
            ApplicationError::Password(err) => {
                tracing::error!(error = %err, "password hashing failure");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "PASSWORD_ERROR",
                    INTERNAL_MESSAGE,
                )
            }
            ApplicationError::Broadcast(err) => {
                tracing::error!(error = %err, "realtime notification failure");
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "BROADCAST_ERROR",
                    INTERNAL_MESSAGE,
                )
            }
            ApplicationError::Authentication => ApiError::new(
                StatusCode::UNAUTHORIZED,
                "AUTHENTICATION_FAILED",
                ApplicationError::Authentication.to_string(),
            ),
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages: Vec<String> = errors
            .field_errors()
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |err| match &err.message {
                    Some(message) => message.to_string(),
                    None => format!("{field}: {}", err.code),
                })
            })
            .collect();
        messages.sort();
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            messages.join(", "),
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}
