//! Handler for `POST /users` (account registration).

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use devlink_core::{
  store::{Created, NetworkStore},
  token::IdentityClaim,
  user::NewUser,
};
use serde::{Deserialize, Serialize};

use crate::{
  AppState,
  error::ApiError,
  extract::ApiJson,
  password::hash_password,
  validate::Validator,
};

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 6;

const USER_EXISTS: &str = "User already exists";

#[derive(Debug, Deserialize)]
pub struct RegisterBody {
  pub name:     Option<String>,
  pub email:    Option<String>,
  pub password: Option<String>,
}

/// Returned by registration and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenBody {
  pub token: String,
}

/// `POST /users` with body `{"name","email","password"}`; returns 201 + token.
pub async fn register<S>(
  State(state): State<AppState<S>>,
  ApiJson(body): ApiJson<RegisterBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let mut v = Validator::default();
  let name = v.required("name", body.name, "Name is required");
  let email = v.email("email", body.email, "Please include a valid email");
  let password = v.min_len(
    "password",
    body.password,
    MIN_PASSWORD_LEN,
    "Please enter a password with 6 or more characters",
  );
  v.finish()?;

  let existing = state
    .store
    .find_user_by_email(&email)
    .await
    .map_err(ApiError::store)?;
  if existing.is_some() {
    return Err(ApiError::invalid("email", USER_EXISTS));
  }

  let password_hash = hash_password(password).await?;
  let created = state
    .store
    .create_user(NewUser::new(name, email, password_hash))
    .await
    .map_err(ApiError::store)?;
  let Created::New(user) = created else {
    return Err(ApiError::invalid("email", USER_EXISTS));
  };

  tracing::info!(user_id = %user.user_id, "registered account");

  let token = state.tokens.issue(IdentityClaim::new(user.user_id))?;
  Ok((StatusCode::CREATED, Json(TokenBody { token })))
}
