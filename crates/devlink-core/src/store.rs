//! The `NetworkStore` trait, the storage collaborator.
//!
//! The trait is implemented by storage backends (e.g. `devlink-store-sqlite`).
//! Higher layers (`devlink-api`, `devlink-server`) depend on this abstraction,
//! not on any concrete backend.
//!
//! The application holds no authoritative in-memory copy of any document.
//! Handlers re-fetch before mutating and then re-save the whole parent
//! document. Saves are conditional on the `version` that was read; a
//! concurrent writer in between turns the save into [`Saved::Stale`].

use std::future::Future;

use uuid::Uuid;

use crate::{
  post::{NewPost, Post},
  profile::{Profile, ProfileFields, ProfileView},
  user::{NewUser, User},
};

/// Result of a conditional re-save of a parent document.
#[derive(Debug, Clone)]
pub enum Saved<T> {
  /// Written; carries the document with its bumped version.
  Written(T),
  /// The stored version no longer matches the one that was read (or the
  /// document is gone). Nothing was written.
  Stale,
}

/// Result of inserting a document that is unique on some key (a user's
/// email, a profile's owner).
#[derive(Debug, Clone)]
pub enum Created<T> {
  New(T),
  /// A document with the same unique key already exists. Nothing was written.
  Duplicate,
}

/// Abstraction over a devlink storage backend.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait NetworkStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Users ─────────────────────────────────────────────────────────────

  /// Persist a new account. The store assigns the id and `created_at`.
  /// An email already in use yields [`Created::Duplicate`].
  fn create_user(
    &self,
    input: NewUser,
  ) -> impl Future<Output = Result<Created<User>, Self::Error>> + Send + '_;

  fn get_user(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + '_;

  /// Look an account up by its (normalised) email address.
  fn find_user_by_email<'a>(
    &'a self,
    email: &'a str,
  ) -> impl Future<Output = Result<Option<User>, Self::Error>> + Send + 'a;

  /// Delete the account together with its profile and every post it authored.
  /// Returns `false` if the account did not exist.
  fn delete_account(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Create the profile for `user_id`; [`Created::Duplicate`] if one already
  /// exists.
  fn create_profile(
    &self,
    user_id: Uuid,
    fields: ProfileFields,
  ) -> impl Future<Output = Result<Created<Profile>, Self::Error>> + Send + '_;

  /// The profile owned by `user_id`, if any.
  fn get_profile(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// The profile owned by `user_id` joined with its owner's public details.
  fn profile_view(
    &self,
    user_id: Uuid,
  ) -> impl Future<Output = Result<Option<ProfileView>, Self::Error>> + Send + '_;

  fn list_profile_views(
    &self,
  ) -> impl Future<Output = Result<Vec<ProfileView>, Self::Error>> + Send + '_;

  /// Rewrite the whole profile, conditional on `profile.version`.
  fn save_profile(
    &self,
    profile: Profile,
  ) -> impl Future<Output = Result<Saved<Profile>, Self::Error>> + Send + '_;

  // ── Posts ─────────────────────────────────────────────────────────────

  fn create_post(
    &self,
    input: NewPost,
  ) -> impl Future<Output = Result<Post, Self::Error>> + Send + '_;

  fn get_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Post>, Self::Error>> + Send + '_;

  /// All posts, newest first.
  fn list_posts(
    &self,
  ) -> impl Future<Output = Result<Vec<Post>, Self::Error>> + Send + '_;

  /// Rewrite the whole post, conditional on `post.version`.
  fn save_post(
    &self,
    post: Post,
  ) -> impl Future<Output = Result<Saved<Post>, Self::Error>> + Send + '_;

  /// Returns `false` if the post did not exist.
  fn delete_post(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;
}
