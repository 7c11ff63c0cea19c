//! Request identity: verifies the `x-auth-token` credential and makes the
//! resulting [`IdentityClaim`] available to a single handler invocation.
//!
//! Handlers opt in by taking an [`Identity`] argument. A rejection
//! short-circuits the request before the handler body runs.

use axum::{extract::FromRequestParts, http::request::Parts};
use devlink_core::{
  store::NetworkStore,
  token::{IdentityClaim, TOKEN_HEADER},
};

use crate::{AppState, error::ApiError};

/// The verified caller of a protected route.
#[derive(Debug, Clone, Copy)]
pub struct Identity(pub IdentityClaim);

impl<S> FromRequestParts<AppState<S>> for Identity
where
  S: NetworkStore + Clone + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    // A header that is present but not visible ASCII cannot be a valid JWT.
    let raw = match parts.headers.get(TOKEN_HEADER) {
      None => None,
      Some(v) => Some(v.to_str().map_err(|_| ApiError::InvalidCredential)?),
    };

    match state.tokens.verify(raw) {
      Ok(claim) => Ok(Identity(claim)),
      Err(e) => {
        tracing::debug!(path = %parts.uri.path(), reason = %e, "rejected credential");
        Err(e.into())
      }
    }
  }
}
