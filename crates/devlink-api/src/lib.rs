//! JSON REST API for devlink.
//!
//! Exposes an axum [`Router`] backed by any [`devlink_core::store::NetworkStore`].
//! TLS, request tracing and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", devlink_api::api_router(state))
//! ```

pub mod auth;
pub mod error;
pub mod extract;
pub mod identity;
pub mod password;
pub mod posts;
pub mod profiles;
pub mod users;
pub mod validate;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use devlink_core::{store::NetworkStore, token::TokenService};

pub use error::ApiError;
pub use identity::Identity;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
#[derive(Clone)]
pub struct AppState<S> {
  pub store:  Arc<S>,
  pub tokens: Arc<TokenService>,
}

impl<S> AppState<S> {
  pub fn new(store: Arc<S>, tokens: TokenService) -> Self {
    Self { store, tokens: Arc::new(tokens) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: NetworkStore + Clone + 'static,
{
  Router::new()
    // Accounts
    .route("/users", post(users::register::<S>))
    .route("/auth", get(auth::me::<S>).post(auth::login::<S>))
    // Profiles
    .route(
      "/profile",
      get(profiles::list::<S>)
        .post(profiles::upsert::<S>)
        .delete(profiles::delete_account::<S>),
    )
    .route("/profile/me", get(profiles::me::<S>))
    .route("/profile/user/{user_id}", get(profiles::by_user::<S>))
    .route("/profile/experience", put(profiles::add_experience::<S>))
    .route(
      "/profile/experience/{exp_id}",
      delete(profiles::remove_experience::<S>),
    )
    .route("/profile/education", put(profiles::add_education::<S>))
    .route(
      "/profile/education/{edu_id}",
      delete(profiles::remove_education::<S>),
    )
    // Posts
    .route("/posts", get(posts::list::<S>).post(posts::create::<S>))
    .route("/posts/{id}", get(posts::get_one::<S>).delete(posts::delete_one::<S>))
    .route("/posts/like/{id}", put(posts::like::<S>))
    .route("/posts/unlike/{id}", put(posts::unlike::<S>))
    .route("/posts/comment/{id}", post(posts::add_comment::<S>))
    .route(
      "/posts/comment/{id}/{comment_id}",
      delete(posts::remove_comment::<S>),
    )
    .with_state(state)
}
