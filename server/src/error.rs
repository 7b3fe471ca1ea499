use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

/// API-level error taxonomy, separate from the sdk crate's `SdkError` --
/// mirrors the teacher's split between library errors and bot-level
/// errors. `Fatal` configuration errors never reach this type; they abort
/// startup before the HTTP layer exists (see `config.rs`).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    ClientValidation(String),
    #[error("not ready")]
    NotReady,
    #[error("internal error")]
    Internal(#[from] dlob_sdk::types::SdkError),
}

pub type ApiResult<T> = Result<T, ApiError>;

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::ClientValidation(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::NotReady => (StatusCode::INTERNAL_SERVER_ERROR, "Not ready").into_response(),
            ApiError::Internal(err) => {
                log::error!("internal error: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_validation_maps_to_400() {
        let response = ApiError::ClientValidation("bad marketIndex".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn not_ready_maps_to_500() {
        let response = ApiError::NotReady.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
