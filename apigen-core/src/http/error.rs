use hyper::StatusCode;
use serde_json::json;

use super::response::ApiResponse;
use crate::repository::RepositoryError;

pub const WRONG_ARGS: &str = "Wrong Arguments";
pub const UNAUTHORIZED: &str = "Unauthorized";
pub const FORBIDDEN: &str = "Forbidden";
pub const NOT_FOUND: &str = "Resource Not Found";
pub const METHOD_NOT_ALLOWED: &str = "Method Not Allowed";
pub const INTERNAL_ERROR: &str = "Internal Error";
pub const NOT_IMPLEMENTED: &str = "Not implemented";

pub type ApiResult = Result<ApiResponse, ApiError>;

/// Failures surfaced to API clients as
/// `{"error": {"http_code": N, "message": "..."}}`
#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    WrongArgs(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("method not allowed, expected one of {allow}")]
    MethodNotAllowed { allow: String },

    #[error("{0}")]
    Internal(String),

    #[error("{0}")]
    NotImplemented(String),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ApiError {
    pub fn wrong_args() -> Self {
        ApiError::WrongArgs(WRONG_ARGS.to_string())
    }

    pub fn unauthorized() -> Self {
        ApiError::Unauthorized(UNAUTHORIZED.to_string())
    }

    pub fn forbidden() -> Self {
        ApiError::Forbidden(FORBIDDEN.to_string())
    }

    pub fn not_found() -> Self {
        ApiError::NotFound(NOT_FOUND.to_string())
    }

    pub fn internal() -> Self {
        ApiError::Internal(INTERNAL_ERROR.to_string())
    }

    pub fn not_implemented() -> Self {
        ApiError::NotImplemented(NOT_IMPLEMENTED.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::WrongArgs(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::Internal(_) | ApiError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }

    /// Client-facing message; storage details are never exposed
    pub fn message(&self) -> &str {
        match self {
            ApiError::WrongArgs(m)
            | ApiError::Unauthorized(m)
            | ApiError::Forbidden(m)
            | ApiError::NotFound(m)
            | ApiError::Internal(m)
            | ApiError::NotImplemented(m) => m,
            ApiError::MethodNotAllowed { .. } => METHOD_NOT_ALLOWED,
            ApiError::Repository(_) => INTERNAL_ERROR,
        }
    }

    pub fn into_response(self) -> ApiResponse {
        let status = self.status();
        let body = json!({
            "error": {
                "http_code": status.as_u16(),
                "message": self.message(),
            }
        });
        let response = ApiResponse::new(status, body);
        match self {
            ApiError::MethodNotAllowed { allow } => response.with_header("allow", allow),
            _ => response,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape() {
        let response = ApiError::not_found().into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.body(),
            &json!({"error": {"http_code": 404, "message": "Resource Not Found"}})
        );
    }

    #[test]
    fn default_messages() {
        assert_eq!(ApiError::wrong_args().message(), "Wrong Arguments");
        assert_eq!(ApiError::unauthorized().status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ApiError::forbidden().status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::internal().message(), "Internal Error");
        assert_eq!(ApiError::not_implemented().status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(ApiError::not_implemented().message(), "Not implemented");
    }

    #[test]
    fn repository_errors_are_masked() {
        let err = ApiError::from(RepositoryError::Backend("disk on fire".into()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Internal Error");
    }

    #[test]
    fn method_not_allowed_carries_allow_header() {
        let response = ApiError::MethodNotAllowed { allow: "GET, POST".into() }.into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.header("allow"), Some("GET, POST"));
    }
}
