//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::{HeaderValue, StatusCode, header},
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
///
/// Domain errors keep their message; the status code is derived from where
/// in the lifecycle the request failed.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("unauthorized")]
  Unauthorized,

  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  /// A lifecycle or allocation guard rejected the request. The state the
  /// operator saw is stale; they should refresh and retry.
  #[error("conflict: {0}")]
  Conflict(String),

  #[error("store unavailable: {0}")]
  Unavailable(String),
}

impl From<porteria_core::Error> for ApiError {
  fn from(e: porteria_core::Error) -> Self {
    use porteria_core::Error as E;
    match e {
      E::InvalidArgument(_)
      | E::MissingField(_)
      | E::InvalidNationalId(_)
      | E::MissingRetrieverName => ApiError::BadRequest(e.to_string()),

      E::VisitorNotFound(_) | E::DeliveryNotFound(_) | E::SpotNotFound(_) => {
        ApiError::NotFound(e.to_string())
      }

      E::AlreadyInBuilding(_)
      | E::AlreadyExited(_)
      | E::AlreadyPickedUp(_)
      | E::SpotAlreadyTaken(_) => ApiError::Conflict(e.to_string()),

      E::StoreUnavailable(_) => ApiError::Unavailable(e.to_string()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match self {
      ApiError::Unauthorized => {
        let mut res = (
          StatusCode::UNAUTHORIZED,
          Json(json!({ "error": "unauthorized" })),
        )
          .into_response();
        res.headers_mut().insert(
          header::WWW_AUTHENTICATE,
          HeaderValue::from_static("Basic realm=\"porteria\""),
        );
        return res;
      }
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
      ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
      ApiError::Unavailable(m) => (StatusCode::SERVICE_UNAVAILABLE, m),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}
