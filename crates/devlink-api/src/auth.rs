//! Handlers for `/auth`: login and "who am I".
//!
//! | Method | Path    | Notes |
//! |--------|---------|-------|
//! | `GET`  | `/auth` | Protected; the acting user without password hash |
//! | `POST` | `/auth` | Body: `{"email","password"}`; returns a token |

use axum::{Json, extract::State};
use devlink_core::{store::NetworkStore, token::IdentityClaim, user::User};
use serde::Deserialize;

use crate::{
  AppState,
  error::ApiError,
  extract::ApiJson,
  identity::Identity,
  password::{DUMMY_PHC, verify_password},
  users::TokenBody,
  validate::Validator,
};

const BAD_LOGIN: &str = "Invalid credentials";

/// `GET /auth`
pub async fn me<S>(
  State(state): State<AppState<S>>,
  Identity(identity): Identity,
) -> Result<Json<User>, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let user = state
    .store
    .get_user(identity.subject_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("user"))?;
  Ok(Json(user))
}

#[derive(Debug, Deserialize)]
pub struct LoginBody {
  pub email:    Option<String>,
  pub password: Option<String>,
}

/// `POST /auth`. Unknown email and wrong password are indistinguishable.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<LoginBody>,
) -> Result<Json<TokenBody>, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let mut v = Validator::default();
  let email = v.email("email", body.email, "Please include a valid email");
  let password = v.min_len("password", body.password, 1, "Password is required");
  v.finish()?;

  let found = state
    .store
    .find_user_by_email(&email)
    .await
    .map_err(ApiError::store)?;
  let Some(user) = found else {
    verify_password(password, DUMMY_PHC.to_owned()).await?;
    return Err(ApiError::invalid("credentials", BAD_LOGIN));
  };

  if !verify_password(password, user.password_hash).await? {
    return Err(ApiError::invalid("credentials", BAD_LOGIN));
  }

  let token = state.tokens.issue(IdentityClaim::new(user.user_id))?;
  Ok(Json(TokenBody { token }))
}
