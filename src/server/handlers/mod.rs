//! HTTP handlers for the server.

pub mod moments;
pub mod session;

use axum::http::StatusCode;

use crate::error::{ComposeError, PolaroidError};

pub type ApiResult<T> = Result<T, (StatusCode, String)>;

/// Map a studio error onto a status code and message.
pub fn api_error(err: impl Into<PolaroidError>) -> (StatusCode, String) {
    let err = err.into();
    let status = match &err {
        PolaroidError::Style(_) => StatusCode::UNPROCESSABLE_ENTITY,
        PolaroidError::Decode(_) | PolaroidError::Compose(ComposeError::Decode(_)) => {
            StatusCode::BAD_REQUEST
        }
        PolaroidError::NoCapture => StatusCode::CONFLICT,
        PolaroidError::MomentNotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        tracing::error!(error = %err, "request failed");
    }
    (status, err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StyleError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(api_error(PolaroidError::NoCapture).0, StatusCode::CONFLICT);
        assert_eq!(api_error(PolaroidError::MomentNotFound(3)).0, StatusCode::NOT_FOUND);
        assert_eq!(
            api_error(StyleError::TooManyLines { lines: 3 }).0,
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            api_error(PolaroidError::Task("x".into())).0,
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
