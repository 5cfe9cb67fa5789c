use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum HandlerErrorKind {
    NotFound,
    Validation,
    Internal,
    Unauthorized,
    Forbidden,
    Conflict,
    BadRequest,
}

impl std::fmt::Display for HandlerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HandlerErrorKind::NotFound => "NotFound",
            HandlerErrorKind::Validation => "Validation",
            HandlerErrorKind::Internal => "Internal",
            HandlerErrorKind::Unauthorized => "Unauthorized",
            HandlerErrorKind::Forbidden => "Forbidden",
            HandlerErrorKind::Conflict => "Conflict",
            HandlerErrorKind::BadRequest => "BadRequest",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Serialize)]
pub struct HandlerError {
    pub error: HandlerErrorKind,
    pub message: String,
    pub details: Option<String>,
}

impl HandlerError {
    pub fn new<T: Into<String>>(error: HandlerErrorKind, message: T) -> Self {
        HandlerError {
            error,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::NotFound, message)
    }

    pub fn bad_request<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::BadRequest, message)
    }

    pub fn unauthorized<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::Unauthorized, message)
    }

    pub fn forbidden<T: Into<String>>(message: T) -> Self {
        Self::new(HandlerErrorKind::Forbidden, message)
    }

    /// Map a service failure to a response. Internal detail reaches the
    /// body only outside production.
    pub fn from_service(err: ServiceError, expose_internal: bool) -> Self {
        match err {
            ServiceError::NotFound(msg) => Self::new(HandlerErrorKind::NotFound, msg),
            ServiceError::InvalidInput(msg) => Self::new(HandlerErrorKind::BadRequest, msg),
            ServiceError::Unauthorized(msg) => Self::new(HandlerErrorKind::Unauthorized, msg),
            ServiceError::Forbidden(msg) => Self::new(HandlerErrorKind::Forbidden, msg),
            ServiceError::Conflict(msg) => Self::new(HandlerErrorKind::Conflict, msg),
            ServiceError::InternalError(msg) => {
                if expose_internal {
                    HandlerError {
                        error: HandlerErrorKind::Internal,
                        message: "Something went wrong!".to_string(),
                        details: Some(msg),
                    }
                } else {
                    Self::new(HandlerErrorKind::Internal, "Something went wrong!")
                }
            }
        }
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match self.error {
            HandlerErrorKind::NotFound => StatusCode::NOT_FOUND,
            HandlerErrorKind::Validation | HandlerErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            HandlerErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            HandlerErrorKind::Forbidden => StatusCode::FORBIDDEN,
            HandlerErrorKind::Conflict => StatusCode::CONFLICT,
            HandlerErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let body = axum::Json(self);
        (status, body).into_response()
    }
}

#[derive(Debug, Clone)]
pub enum ServiceError {
    NotFound(String),
    InvalidInput(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    InternalError(String),
}

impl std::fmt::Display for ServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            ServiceError::InvalidInput(msg) => write!(f, "Invalid Input: {}", msg),
            ServiceError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ServiceError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ServiceError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ServiceError::InternalError(msg) => write!(f, "Internal Error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

// Allow conversion from RepositoryError to ServiceError
impl From<crate::repository::repository_error::RepositoryError> for ServiceError {
    fn from(err: crate::repository::repository_error::RepositoryError) -> Self {
        use crate::repository::repository_error::RepositoryError;
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::ValidationError(msg) => ServiceError::InvalidInput(msg),
            RepositoryError::AlreadyExists(msg) => ServiceError::Conflict(msg),
            RepositoryError::DatabaseError(msg) => ServiceError::InternalError(msg),
            RepositoryError::ConnectionError(msg) => ServiceError::InternalError(msg),
            RepositoryError::SerializationError(msg) => ServiceError::InternalError(msg),
            RepositoryError::Generic(e) => ServiceError::InternalError(e.to_string()),
        }
    }
}

impl From<crate::util::storage::StorageError> for ServiceError {
    fn from(err: crate::util::storage::StorageError) -> Self {
        use crate::util::storage::StorageError;
        match &err {
            StorageError::UnsupportedMediaType(_) | StorageError::FileTooLarge { .. } => {
                ServiceError::InvalidInput(err.to_string())
            }
            StorageError::Io(_) | StorageError::ConfigError(_) => {
                ServiceError::InternalError(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_internal_detail_suppressed_in_production() {
        let err = ServiceError::InternalError("cursor exhausted".to_string());
        let handler_err = HandlerError::from_service(err, false);
        assert_eq!(handler_err.message, "Something went wrong!");
        assert!(handler_err.details.is_none());
    }

    #[test]
    fn test_internal_detail_exposed_in_development() {
        let err = ServiceError::InternalError("cursor exhausted".to_string());
        let handler_err = HandlerError::from_service(err, true);
        assert_eq!(handler_err.details.as_deref(), Some("cursor exhausted"));
    }

    #[test]
    fn test_not_found_maps_through() {
        let err = ServiceError::NotFound("Project not found".to_string());
        let handler_err = HandlerError::from_service(err, false);
        assert_eq!(handler_err.message, "Project not found");
        assert!(matches!(handler_err.error, HandlerErrorKind::NotFound));
    }
}
