//! Posts, likes and comments.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  collection::{self, Keyed},
  guard::Owned,
  user::User,
};

// ─── Likes ───────────────────────────────────────────────────────────────────

/// A subject may like a given post at most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
  pub user_id: Uuid,
}

impl Keyed for Like {
  fn key(&self) -> Uuid { self.user_id }
}

// ─── Comments ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
  pub comment_id: Uuid,
  pub user_id:    Uuid,
  pub text:       String,
  /// Author name at the time of writing.
  pub name:       String,
  pub avatar:     String,
  pub created_at: DateTime<Utc>,
}

impl Comment {
  pub fn new(author: &User, text: String) -> Self {
    Self {
      comment_id: Uuid::new_v4(),
      user_id:    author.user_id,
      text,
      name:       author.name.clone(),
      avatar:     author.avatar.clone(),
      created_at: Utc::now(),
    }
  }
}

impl Keyed for Comment {
  fn key(&self) -> Uuid { self.comment_id }
}

impl Owned for Comment {
  fn owner_id(&self) -> Uuid { self.user_id }
}

// ─── Post ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
  pub post_id:    Uuid,
  /// The author; only they may delete the post.
  pub user_id:    Uuid,
  pub text:       String,
  pub name:       String,
  pub avatar:     String,
  pub likes:      VecDeque<Like>,
  pub comments:   VecDeque<Comment>,
  pub created_at: DateTime<Utc>,
  pub version:    u64,
}

impl Owned for Post {
  fn owner_id(&self) -> Uuid { self.user_id }
}

impl Post {
  pub fn is_liked_by(&self, user_id: Uuid) -> bool {
    collection::contains(&self.likes, user_id)
  }

  /// Front-insert a like by `user_id`; a second like is
  /// [`Error::DuplicateAction`].
  pub fn like(&mut self, user_id: Uuid) -> Result<()> {
    if collection::insert_front_unique(&mut self.likes, Like { user_id }) {
      Ok(())
    } else {
      Err(Error::DuplicateAction("post already liked"))
    }
  }

  /// Remove the like by `user_id`; [`Error::NotLiked`] if there is none.
  pub fn unlike(&mut self, user_id: Uuid) -> Result<()> {
    collection::remove_by_key(&mut self.likes, user_id)
      .map(|_| ())
      .ok_or(Error::NotLiked)
  }

  pub fn comment(&self, comment_id: Uuid) -> Option<&Comment> {
    collection::find(&self.comments, comment_id)
  }

  pub fn add_comment(&mut self, comment: Comment) {
    collection::insert_front(&mut self.comments, comment);
  }

  pub fn remove_comment(&mut self, comment_id: Uuid) -> Result<Comment> {
    collection::remove_by_key(&mut self.comments, comment_id)
      .ok_or(Error::NotFound("comment"))
  }
}

/// Input to [`crate::store::NetworkStore::create_post`].
#[derive(Debug, Clone)]
pub struct NewPost {
  pub user_id: Uuid,
  pub text:    String,
  pub name:    String,
  pub avatar:  String,
}

impl NewPost {
  /// Snapshot the author's name and avatar alongside the text.
  pub fn new(author: &User, text: String) -> Self {
    Self {
      user_id: author.user_id,
      text,
      name: author.name.clone(),
      avatar: author.avatar.clone(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::user::gravatar_url;

  fn user(name: &str) -> User {
    let email = format!("{}@example.com", name.to_lowercase());
    User {
      user_id:       Uuid::new_v4(),
      name:          name.into(),
      avatar:        gravatar_url(&email),
      email,
      password_hash: String::new(),
      created_at:    Utc::now(),
    }
  }

  fn post_by(author: &User) -> Post {
    Post {
      post_id:    Uuid::new_v4(),
      user_id:    author.user_id,
      text:       "hello".into(),
      name:       author.name.clone(),
      avatar:     author.avatar.clone(),
      likes:      VecDeque::new(),
      comments:   VecDeque::new(),
      created_at: Utc::now(),
      version:    0,
    }
  }

  #[test]
  fn double_like_is_rejected_and_length_unchanged() {
    let alice = user("Alice");
    let mut post = post_by(&alice);

    post.like(alice.user_id).unwrap();
    assert_eq!(post.likes.len(), 1);

    let err = post.like(alice.user_id).unwrap_err();
    assert!(matches!(err, Error::DuplicateAction(_)));
    assert_eq!(post.likes.len(), 1);
  }

  #[test]
  fn likes_are_most_recent_first() {
    let alice = user("Alice");
    let bob = user("Bob");
    let mut post = post_by(&alice);
    post.like(alice.user_id).unwrap();
    post.like(bob.user_id).unwrap();
    assert_eq!(post.likes[0].user_id, bob.user_id);
    assert_eq!(post.likes[1].user_id, alice.user_id);
  }

  #[test]
  fn unlike_without_like_fails() {
    let alice = user("Alice");
    let bob = user("Bob");
    let mut post = post_by(&alice);
    post.like(bob.user_id).unwrap();

    assert!(matches!(post.unlike(alice.user_id), Err(Error::NotLiked)));
    assert_eq!(post.likes.len(), 1);

    post.unlike(bob.user_id).unwrap();
    assert!(post.likes.is_empty());
    assert!(!post.is_liked_by(bob.user_id));
  }

  #[test]
  fn comments_snapshot_author_and_are_removable() {
    let alice = user("Alice");
    let bob = user("Bob");
    let mut post = post_by(&alice);

    let c = Comment::new(&bob, "nice".into());
    let id = c.comment_id;
    post.add_comment(c);
    assert_eq!(post.comment(id).unwrap().name, "Bob");

    post.remove_comment(id).unwrap();
    assert!(post.comment(id).is_none());
    assert!(matches!(post.remove_comment(id), Err(Error::NotFound(_))));
  }
}
