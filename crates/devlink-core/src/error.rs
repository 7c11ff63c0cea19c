//! Error types for `devlink-core`.

use thiserror::Error;

use crate::guard::Action;

#[derive(Debug, Error)]
pub enum Error {
  /// No credential was attached to the request.
  #[error("no credential supplied")]
  Unauthenticated,

  /// A credential was supplied but its signature, structure or expiry is bad.
  #[error("credential is not valid")]
  InvalidCredential,

  #[error("not authorized to {0}")]
  Forbidden(Action),

  #[error("{0} not found")]
  NotFound(&'static str),

  #[error("{0}")]
  DuplicateAction(&'static str),

  #[error("post has not yet been liked")]
  NotLiked,

  /// The parent document changed between read and write.
  #[error("{0} was modified concurrently")]
  Conflict(&'static str),

  #[error("could not issue credential: {0}")]
  Credential(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
