//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  extract::rejection::{JsonRejection, PathRejection},
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::validate::FieldError;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("no token, authorization denied")]
  Unauthenticated,

  #[error("token is not valid")]
  InvalidCredential,

  #[error("{0}")]
  Forbidden(String),

  #[error("{0}")]
  NotFound(String),

  #[error("{0}")]
  BadRequest(String),

  #[error("validation failed")]
  Validation(Vec<FieldError>),

  #[error("{0}")]
  Conflict(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),

  #[error("internal error: {0}")]
  Internal(String),
}

impl ApiError {
  pub fn store<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    ApiError::Store(Box::new(e))
  }

  pub fn not_found(what: &str) -> Self { ApiError::NotFound(format!("{what} not found")) }

  /// A single-field validation failure.
  pub fn invalid(param: &str, msg: &str) -> Self {
    ApiError::Validation(vec![FieldError::new(param, msg)])
  }
}

impl From<devlink_core::Error> for ApiError {
  fn from(e: devlink_core::Error) -> Self {
    use devlink_core::Error as E;
    match e {
      E::Unauthenticated => ApiError::Unauthenticated,
      E::InvalidCredential => ApiError::InvalidCredential,
      E::Forbidden(_) => ApiError::Forbidden("user not authorized".into()),
      E::NotFound(what) => ApiError::not_found(what),
      E::DuplicateAction(_) | E::NotLiked => ApiError::BadRequest(e.to_string()),
      E::Conflict(_) => ApiError::Conflict(e.to_string()),
      E::Credential(msg) => ApiError::Internal(msg),
    }
  }
}

impl From<JsonRejection> for ApiError {
  fn from(e: JsonRejection) -> Self { ApiError::BadRequest(e.body_text()) }
}

impl From<PathRejection> for ApiError {
  fn from(e: PathRejection) -> Self {
    match e {
      PathRejection::FailedToDeserializePathParams(_) => {
        ApiError::BadRequest("invalid id in path".into())
      }
      PathRejection::MissingPathParams(_) => ApiError::Internal(e.body_text()),
      _ => ApiError::BadRequest(e.body_text()),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match &self {
      ApiError::Unauthenticated | ApiError::InvalidCredential => {
        (StatusCode::UNAUTHORIZED, json!({ "msg": self.to_string() }))
      }
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, json!({ "msg": m })),
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, json!({ "msg": m })),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, json!({ "msg": m })),
      ApiError::Validation(errors) => {
        (StatusCode::BAD_REQUEST, json!({ "errors": errors }))
      }
      ApiError::Conflict(m) => (StatusCode::CONFLICT, json!({ "msg": m })),
      ApiError::Store(e) => {
        tracing::error!(error = %e, "storage failure");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "msg": "server error" }))
      }
      ApiError::Internal(m) => {
        tracing::error!(error = %m, "internal failure");
        (StatusCode::INTERNAL_SERVER_ERROR, json!({ "msg": "server error" }))
      }
    };
    (status, Json(body)).into_response()
  }
}
