//! Maps a [`ServerError`] onto the wire error shape of §6/§7.
//!
//! The protocol uses HTTP 500 uniformly for every failure kind — the JSON
//! body's `code` field carries the same `500`, `error: true`, and a
//! human-readable `message`. Keeping [`ServerError::kind`] around lets the
//! server log failures with the right severity even though callers only
//! ever see a flat 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::{error, warn};
use serde::Serialize;

use crate::errors::{ErrorKind, ServerError};

/// The JSON body of every non-200 `/render` response.
#[derive(Serialize)]
struct ErrorBody {
    error: bool,
    code: u16,
    message: String,
}

/// Newtype so [`ServerError`] can implement axum's `IntoResponse` without
/// this crate needing to own the trait or the type.
pub struct ApiError(pub ServerError);

impl From<ServerError> for ApiError {
    fn from(err: ServerError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let kind = self.0.kind();
        let message = format!("Internal server error: {}", self.0);

        match kind {
            ErrorKind::BadRequest => warn!("bad request: {message}"),
            ErrorKind::RenderFailed | ErrorKind::InternalError => error!("request failed: {message}"),
        }

        let body = ErrorBody {
            error: true,
            code: 500,
            message,
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
