//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use innkeep_core::ErrorKind;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler. Wraps the core taxonomy so every
/// handler can use `?` on front-desk calls.
#[derive(Debug, Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub innkeep_core::Error);

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let status = match self.0.kind() {
      ErrorKind::Validation => StatusCode::BAD_REQUEST,
      ErrorKind::NotFound => StatusCode::NOT_FOUND,
      ErrorKind::Conflict => StatusCode::CONFLICT,
      ErrorKind::Storage => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "error": self.0.to_string() }))).into_response()
  }
}
