//! Translation of domain errors into HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::{error, warn};
use shared::{ErrorKind, ErrorResponse};

use crate::domain::RoscaError;

pub fn status_for(err: &RoscaError) -> StatusCode {
    match err {
        RoscaError::Validation(_) | RoscaError::InvalidUser(_) => StatusCode::BAD_REQUEST,
        RoscaError::NotAuthenticated | RoscaError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        RoscaError::AdminRequired => StatusCode::FORBIDDEN,
        _ => match err.kind() {
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::PreconditionViolated => StatusCode::CONFLICT,
            ErrorKind::Unexpected => StatusCode::INTERNAL_SERVER_ERROR,
        },
    }
}

/// Log the failure under `action` and render it as an [`ErrorResponse`].
/// Storage failures are logged in full but reported generically.
pub fn error_response(action: &str, err: RoscaError) -> Response {
    let status = status_for(&err);
    let message = match &err {
        RoscaError::Unexpected(source) => {
            error!("{} failed: {:?}", action, source);
            "Something went wrong, please try again".to_string()
        }
        _ => {
            warn!("{} rejected: {}", action, err);
            err.to_string()
        }
    };
    (
        status,
        Json(ErrorResponse {
            error: message,
            kind: err.kind(),
        }),
    )
        .into_response()
}
