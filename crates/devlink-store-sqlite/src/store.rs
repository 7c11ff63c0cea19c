//! [`SqliteStore`], the SQLite implementation of [`NetworkStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use devlink_core::{
  post::{NewPost, Post},
  profile::{Profile, ProfileFields, ProfileView},
  store::{Created, NetworkStore, Saved},
  user::{NewUser, User, normalize_email},
};

use crate::{
  Error, Result,
  encode::{
    RawPost, RawProfile, RawUser, encode_dt, encode_json, encode_uuid,
    encode_version,
  },
  schema::SCHEMA,
};

const USER_COLUMNS: &str =
  "user_id, name, email, avatar, password_hash, created_at";

fn raw_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawUser> {
  Ok(RawUser {
    user_id:       row.get(0)?,
    name:          row.get(1)?,
    email:         row.get(2)?,
    avatar:        row.get(3)?,
    password_hash: row.get(4)?,
    created_at:    row.get(5)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A devlink store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  async fn query_user(
    &self,
    column: &'static str,
    value: String,
  ) -> Result<Option<User>> {
    let raw: Option<RawUser> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = ?1");
        Ok(
          conn
            .query_row(&sql, rusqlite::params![value], raw_user)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawUser::into_user).transpose()
  }
}

// ─── NetworkStore impl ───────────────────────────────────────────────────────

impl NetworkStore for SqliteStore {
  type Error = Error;

  // ── Users ─────────────────────────────────────────────────────────────────

  async fn create_user(&self, input: NewUser) -> Result<Created<User>> {
    let user = User {
      user_id:       Uuid::new_v4(),
      name:          input.name,
      email:         normalize_email(&input.email),
      avatar:        input.avatar,
      password_hash: input.password_hash,
      created_at:    Utc::now(),
    };

    let id_str = encode_uuid(user.user_id);
    let at_str = encode_dt(user.created_at);
    let name   = user.name.clone();
    let email  = user.email.clone();
    let avatar = user.avatar.clone();
    let hash   = user.password_hash.clone();

    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO users (user_id, name, email, avatar, password_hash, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT(email) DO NOTHING",
          rusqlite::params![id_str, name, email, avatar, hash, at_str],
        )?)
      })
      .await?;

    if inserted == 0 {
      return Ok(Created::Duplicate);
    }
    Ok(Created::New(user))
  }

  async fn get_user(&self, id: Uuid) -> Result<Option<User>> {
    self.query_user("user_id", encode_uuid(id)).await
  }

  async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
    self.query_user("email", normalize_email(email)).await
  }

  async fn delete_account(&self, user_id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(user_id);

    let removed = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM posts WHERE user_id = ?1", rusqlite::params![id_str])?;
        tx.execute("DELETE FROM profiles WHERE user_id = ?1", rusqlite::params![id_str])?;
        let n = tx.execute("DELETE FROM users WHERE user_id = ?1", rusqlite::params![id_str])?;
        tx.commit()?;
        Ok(n > 0)
      })
      .await?;

    Ok(removed)
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn create_profile(
    &self,
    user_id: Uuid,
    fields:  ProfileFields,
  ) -> Result<Created<Profile>> {
    let mut profile = Profile {
      profile_id:      Uuid::new_v4(),
      user_id,
      company:         None,
      website:         None,
      location:        None,
      status:          String::new(),
      skills:          Vec::new(),
      bio:             None,
      github_username: None,
      social:          Default::default(),
      experience:      Default::default(),
      education:       Default::default(),
      created_at:      Utc::now(),
      version:         0,
    };
    fields.apply_to(&mut profile);

    let profile_id_str = encode_uuid(profile.profile_id);
    let user_id_str    = encode_uuid(user_id);
    let company        = profile.company.clone();
    let website        = profile.website.clone();
    let location       = profile.location.clone();
    let status         = profile.status.clone();
    let skills_str     = encode_json(&profile.skills)?;
    let bio            = profile.bio.clone();
    let github         = profile.github_username.clone();
    let social_str     = encode_json(&profile.social)?;
    let at_str         = encode_dt(profile.created_at);

    let inserted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "INSERT INTO profiles (
             profile_id, user_id, company, website, location, status,
             skills, bio, github_username, social, created_at, version
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, 0)
           ON CONFLICT(user_id) DO NOTHING",
          rusqlite::params![
            profile_id_str,
            user_id_str,
            company,
            website,
            location,
            status,
            skills_str,
            bio,
            github,
            social_str,
            at_str,
          ],
        )?)
      })
      .await?;

    if inserted == 0 {
      return Ok(Created::Duplicate);
    }
    Ok(Created::New(profile))
  }

  async fn get_profile(&self, user_id: Uuid) -> Result<Option<Profile>> {
    self
      .profile_view(user_id)
      .await
      .map(|view| view.map(|v| v.profile))
  }

  async fn profile_view(&self, user_id: Uuid) -> Result<Option<ProfileView>> {
    let user_id_str = encode_uuid(user_id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        let sql = format!(
          "SELECT {} FROM profiles p
           LEFT JOIN users u ON u.user_id = p.user_id
           WHERE p.user_id = ?1",
          RawProfile::COLUMNS
        );
        Ok(
          conn
            .query_row(&sql, rusqlite::params![user_id_str], RawProfile::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_view).transpose()
  }

  async fn list_profile_views(&self) -> Result<Vec<ProfileView>> {
    let raws: Vec<RawProfile> = self
      .conn
      .call(|conn| {
        let sql = format!(
          "SELECT {} FROM profiles p
           LEFT JOIN users u ON u.user_id = p.user_id
           ORDER BY p.created_at",
          RawProfile::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawProfile::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawProfile::into_view).collect()
  }

  async fn save_profile(&self, mut profile: Profile) -> Result<Saved<Profile>> {
    let profile_id_str = encode_uuid(profile.profile_id);
    let expected       = encode_version(profile.version);
    let company        = profile.company.clone();
    let website        = profile.website.clone();
    let location       = profile.location.clone();
    let status         = profile.status.clone();
    let skills_str     = encode_json(&profile.skills)?;
    let bio            = profile.bio.clone();
    let github         = profile.github_username.clone();
    let social_str     = encode_json(&profile.social)?;
    let experience_str = encode_json(&profile.experience)?;
    let education_str  = encode_json(&profile.education)?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE profiles SET
             company = ?3, website = ?4, location = ?5, status = ?6,
             skills = ?7, bio = ?8, github_username = ?9, social = ?10,
             experience = ?11, education = ?12, version = version + 1
           WHERE profile_id = ?1 AND version = ?2",
          rusqlite::params![
            profile_id_str,
            expected,
            company,
            website,
            location,
            status,
            skills_str,
            bio,
            github,
            social_str,
            experience_str,
            education_str,
          ],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(Saved::Stale);
    }
    profile.version += 1;
    Ok(Saved::Written(profile))
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  async fn create_post(&self, input: NewPost) -> Result<Post> {
    let post = Post {
      post_id:    Uuid::new_v4(),
      user_id:    input.user_id,
      text:       input.text,
      name:       input.name,
      avatar:     input.avatar,
      likes:      Default::default(),
      comments:   Default::default(),
      created_at: Utc::now(),
      version:    0,
    };

    let post_id_str = encode_uuid(post.post_id);
    let user_id_str = encode_uuid(post.user_id);
    let text        = post.text.clone();
    let name        = post.name.clone();
    let avatar      = post.avatar.clone();
    let at_str      = encode_dt(post.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO posts (post_id, user_id, text, name, avatar, created_at, version)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0)",
          rusqlite::params![post_id_str, user_id_str, text, name, avatar, at_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(post)
  }

  async fn get_post(&self, id: Uuid) -> Result<Option<Post>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawPost> = self
      .conn
      .call(move |conn| {
        let sql = format!("SELECT {} FROM posts WHERE post_id = ?1", RawPost::COLUMNS);
        Ok(
          conn
            .query_row(&sql, rusqlite::params![id_str], RawPost::from_row)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawPost::into_post).transpose()
  }

  async fn list_posts(&self) -> Result<Vec<Post>> {
    let raws: Vec<RawPost> = self
      .conn
      .call(|conn| {
        let sql = format!(
          "SELECT {} FROM posts ORDER BY created_at DESC, rowid DESC",
          RawPost::COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map([], RawPost::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawPost::into_post).collect()
  }

  async fn save_post(&self, mut post: Post) -> Result<Saved<Post>> {
    let post_id_str  = encode_uuid(post.post_id);
    let expected     = encode_version(post.version);
    let text         = post.text.clone();
    let likes_str    = encode_json(&post.likes)?;
    let comments_str = encode_json(&post.comments)?;

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE posts SET
             text = ?3, likes = ?4, comments = ?5, version = version + 1
           WHERE post_id = ?1 AND version = ?2",
          rusqlite::params![post_id_str, expected, text, likes_str, comments_str],
        )?)
      })
      .await?;

    if changed == 0 {
      return Ok(Saved::Stale);
    }
    post.version += 1;
    Ok(Saved::Written(post))
  }

  async fn delete_post(&self, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);

    let n = self
      .conn
      .call(move |conn| {
        Ok(conn.execute("DELETE FROM posts WHERE post_id = ?1", rusqlite::params![id_str])?)
      })
      .await?;

    Ok(n > 0)
  }
}
