//! User accounts.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::guard::Owned;

/// A registered account.
///
/// The password hash is never serialised; it only travels between the store
/// and the login handler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
  pub user_id:       Uuid,
  pub name:          String,
  pub email:         String,
  pub avatar:        String,
  #[serde(skip_serializing, default)]
  pub password_hash: String,
  pub created_at:    DateTime<Utc>,
}

impl User {
  pub fn summary(&self) -> UserSummary {
    UserSummary {
      user_id: self.user_id,
      name:    self.name.clone(),
      avatar:  self.avatar.clone(),
    }
  }
}

impl Owned for User {
  fn owner_id(&self) -> Uuid { self.user_id }
}

/// The public face of a user attached to profiles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
  pub user_id: Uuid,
  pub name:    String,
  pub avatar:  String,
}

/// Input to [`crate::store::NetworkStore::create_user`]. The id and
/// `created_at` are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
  pub name:          String,
  pub email:         String,
  pub avatar:        String,
  pub password_hash: String,
}

impl NewUser {
  /// Build a new account, deriving the avatar from the email address.
  pub fn new(name: String, email: String, password_hash: String) -> Self {
    let email = normalize_email(&email);
    Self {
      avatar: gravatar_url(&email),
      name,
      email,
      password_hash,
    }
  }
}

/// Emails are matched case-insensitively and without surrounding whitespace.
pub fn normalize_email(email: &str) -> String { email.trim().to_lowercase() }

/// Gravatar URL for `email`: 200px, PG-rated, mystery-person fallback.
pub fn gravatar_url(email: &str) -> String {
  let digest = Sha256::digest(normalize_email(email).as_bytes());
  format!(
    "https://www.gravatar.com/avatar/{}?s=200&r=pg&d=mm",
    hex::encode(digest)
  )
}
