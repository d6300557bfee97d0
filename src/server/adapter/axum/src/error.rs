/* src/server/adapter/axum/src/error.rs */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use localeroute::MissingParameterError;

/// Extractor and helper failures, rendered as a JSON error body.
#[derive(Debug, thiserror::Error)]
pub enum AxumError {
  #[error("request did not pass through the locale routing middleware")]
  MissingContext,
  #[error(transparent)]
  MissingParameter(#[from] MissingParameterError),
}

impl AxumError {
  pub fn code(&self) -> &'static str {
    match self {
      Self::MissingContext => "MISSING_LOCALE_CONTEXT",
      Self::MissingParameter(_) => "MISSING_PARAMETER",
    }
  }

  pub fn status(&self) -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
  }
}

impl IntoResponse for AxumError {
  fn into_response(self) -> Response {
    tracing::error!(code = self.code(), "{self}");
    let body = serde_json::json!({
      "ok": false,
      "error": {
        "code": self.code(),
        "message": self.to_string(),
        "transient": false,
      }
    });
    (self.status(), axum::Json(body)).into_response()
  }
}
