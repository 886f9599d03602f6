use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use geocast_core::errors::{DatabaseError, Error as CoreError};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
pub(crate) struct ErrorBody {
    pub code: u16,
    pub message: String,
}

const INTERNAL_MESSAGE: &str = "Internal server error";

impl ApiError {
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Core(e) => match e {
                CoreError::NotFound(_) | CoreError::Database(DatabaseError::NotFound(_)) => {
                    (StatusCode::NOT_FOUND, e.to_string())
                }
                CoreError::PermissionDenied(_) => (StatusCode::FORBIDDEN, e.to_string()),
                CoreError::InvalidState(_) => (StatusCode::CONFLICT, e.to_string()),
                CoreError::InsufficientFunds { .. } => {
                    (StatusCode::PAYMENT_REQUIRED, e.to_string())
                }
                CoreError::Validation(_) => (StatusCode::BAD_REQUEST, e.to_string()),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string()),
            },
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
            ApiError::Unauthorized(reason) => (StatusCode::UNAUTHORIZED, reason.clone()),
            ApiError::Anyhow(_) => (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_MESSAGE.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn status(err: CoreError) -> StatusCode {
        ApiError::from(err).status_and_message().0
    }

    #[test]
    fn core_errors_map_to_statuses() {
        assert_eq!(status(CoreError::NotFound("x".into())), StatusCode::NOT_FOUND);
        assert_eq!(
            status(CoreError::PermissionDenied("x".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(status(CoreError::InvalidState("x".into())), StatusCode::CONFLICT);
        assert_eq!(
            status(CoreError::InsufficientFunds {
                required: 10,
                available: 1
            }),
            StatusCode::PAYMENT_REQUIRED
        );
        assert_eq!(status(CoreError::invalid_input("x")), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let err = ApiError::from(CoreError::Database(DatabaseError::QueryFailed(
            "no such table: secrets".into(),
        )));
        let (status, message) = err.status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, INTERNAL_MESSAGE);
    }
}
