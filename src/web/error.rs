//! HTTP mapping for [`Error`]

use crate::core::error::Error;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

impl Error {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::AlreadyExists { .. } => StatusCode::CONFLICT,
            Error::Validation { .. } => StatusCode::BAD_REQUEST,
            Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::AdminDisabled => StatusCode::FORBIDDEN,
            Error::ReadOnly => StatusCode::METHOD_NOT_ALLOWED,
            Error::Remote { .. } | Error::Http(_) => StatusCode::BAD_GATEWAY,
            Error::ConfigError { .. } | Error::Io(_) | Error::Json(_) | Error::TomlParse(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self, status = status.as_u16(), "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(Error::unit_not_found("X").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(Error::validation("bad").status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(Error::Unauthorized.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(Error::AdminDisabled.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            Error::Remote {
                status: 500,
                message: "x".to_string()
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_into_response_status() {
        let response = Error::building_not_found("nowhere").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
