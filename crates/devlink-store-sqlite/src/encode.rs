//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are fixed-width RFC 3339 strings (microseconds, `Z`) so that
//! lexical order is chronological order. Embedded sequences and the social
//! link set are stored as compact JSON. UUIDs are hyphenated lowercase.

use chrono::{DateTime, SecondsFormat, Utc};
use devlink_core::{
  post::Post,
  profile::{Profile, ProfileView},
  user::{User, UserSummary},
};
use serde::{Serialize, de::DeserializeOwned};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_version(v: u64) -> i64 { i64::try_from(v).unwrap_or(i64::MAX) }

fn decode_version(v: i64) -> u64 { u64::try_from(v).unwrap_or(0) }

// ─── JSON columns ────────────────────────────────────────────────────────────

pub fn encode_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
  Ok(serde_json::to_string(value)?)
}

pub fn decode_json<T: DeserializeOwned>(s: &str) -> Result<T> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from a `users` row.
pub struct RawUser {
  pub user_id:       String,
  pub name:          String,
  pub email:         String,
  pub avatar:        String,
  pub password_hash: String,
  pub created_at:    String,
}

impl RawUser {
  pub fn into_user(self) -> Result<User> {
    Ok(User {
      user_id:       decode_uuid(&self.user_id)?,
      name:          self.name,
      email:         self.email,
      avatar:        self.avatar,
      password_hash: self.password_hash,
      created_at:    decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read from a `profiles` row, optionally joined with the owner's
/// name and avatar.
pub struct RawProfile {
  pub profile_id:      String,
  pub user_id:         String,
  pub company:         Option<String>,
  pub website:         Option<String>,
  pub location:        Option<String>,
  pub status:          String,
  pub skills:          String,
  pub bio:             Option<String>,
  pub github_username: Option<String>,
  pub social:          String,
  pub experience:      String,
  pub education:       String,
  pub created_at:      String,
  pub version:         i64,
  // users join
  pub owner_name:      Option<String>,
  pub owner_avatar:    Option<String>,
}

impl RawProfile {
  /// Column list matching [`RawProfile::from_row`]; `p` is the profiles
  /// alias and `u` the users alias.
  pub const COLUMNS: &'static str = "
    p.profile_id, p.user_id, p.company, p.website, p.location, p.status,
    p.skills, p.bio, p.github_username, p.social, p.experience, p.education,
    p.created_at, p.version, u.name, u.avatar";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawProfile {
      profile_id:      row.get(0)?,
      user_id:         row.get(1)?,
      company:         row.get(2)?,
      website:         row.get(3)?,
      location:        row.get(4)?,
      status:          row.get(5)?,
      skills:          row.get(6)?,
      bio:             row.get(7)?,
      github_username: row.get(8)?,
      social:          row.get(9)?,
      experience:      row.get(10)?,
      education:       row.get(11)?,
      created_at:      row.get(12)?,
      version:         row.get(13)?,
      owner_name:      row.get(14)?,
      owner_avatar:    row.get(15)?,
    })
  }

  pub fn into_profile(self) -> Result<Profile> {
    Ok(self.into_view()?.profile)
  }

  pub fn into_view(self) -> Result<ProfileView> {
    let profile = Profile {
      profile_id:      decode_uuid(&self.profile_id)?,
      user_id:         decode_uuid(&self.user_id)?,
      company:         self.company,
      website:         self.website,
      location:        self.location,
      status:          self.status,
      skills:          decode_json(&self.skills)?,
      bio:             self.bio,
      github_username: self.github_username,
      social:          decode_json(&self.social)?,
      experience:      decode_json(&self.experience)?,
      education:       decode_json(&self.education)?,
      created_at:      decode_dt(&self.created_at)?,
      version:         decode_version(self.version),
    };

    let user = UserSummary {
      user_id: profile.user_id,
      name:    self.owner_name.unwrap_or_default(),
      avatar:  self.owner_avatar.unwrap_or_default(),
    };

    Ok(ProfileView { profile, user })
  }
}

/// Raw strings read directly from a `posts` row.
pub struct RawPost {
  pub post_id:    String,
  pub user_id:    String,
  pub text:       String,
  pub name:       String,
  pub avatar:     String,
  pub likes:      String,
  pub comments:   String,
  pub created_at: String,
  pub version:    i64,
}

impl RawPost {
  pub const COLUMNS: &'static str =
    "post_id, user_id, text, name, avatar, likes, comments, created_at, version";

  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawPost {
      post_id:    row.get(0)?,
      user_id:    row.get(1)?,
      text:       row.get(2)?,
      name:       row.get(3)?,
      avatar:     row.get(4)?,
      likes:      row.get(5)?,
      comments:   row.get(6)?,
      created_at: row.get(7)?,
      version:    row.get(8)?,
    })
  }

  pub fn into_post(self) -> Result<Post> {
    Ok(Post {
      post_id:    decode_uuid(&self.post_id)?,
      user_id:    decode_uuid(&self.user_id)?,
      text:       self.text,
      name:       self.name,
      avatar:     self.avatar,
      likes:      decode_json(&self.likes)?,
      comments:   decode_json(&self.comments)?,
      created_at: decode_dt(&self.created_at)?,
      version:    decode_version(self.version),
    })
  }
}
