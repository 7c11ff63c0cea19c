//! Integration tests for `SqliteStore` against an in-memory database.

use chrono::NaiveDate;
use devlink_core::{
  post::{Comment, NewPost},
  profile::{NewExperience, Profile, ProfileFields, Social, parse_skills},
  store::{Created, NetworkStore, Saved},
  user::{NewUser, User},
};
use uuid::Uuid;

use crate::SqliteStore;

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

async fn user(s: &SqliteStore, name: &str) -> User {
  let created = s
    .create_user(NewUser::new(
      name.into(),
      format!("{}@example.com", name.to_lowercase()),
      "$argon2id$placeholder".into(),
    ))
    .await
    .unwrap();
  match created {
    Created::New(u) => u,
    Created::Duplicate => panic!("{name} already registered"),
  }
}

async fn new_profile(s: &SqliteStore, user_id: Uuid, f: ProfileFields) -> Profile {
  match s.create_profile(user_id, f).await.unwrap() {
    Created::New(p) => p,
    Created::Duplicate => panic!("profile for {user_id} already exists"),
  }
}

fn fields(status: &str, skills: &str) -> ProfileFields {
  ProfileFields {
    status: status.into(),
    skills: parse_skills(skills),
    ..ProfileFields::default()
  }
}

fn job(title: &str, from: &str) -> NewExperience {
  NewExperience {
    title:       title.into(),
    company:     "Acme".into(),
    location:    None,
    from:        from.parse::<NaiveDate>().unwrap(),
    to:          None,
    current:     false,
    description: None,
  }
}

// ─── Users ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_user() {
  let s = store().await;
  let alice = user(&s, "Alice").await;

  let fetched = s.get_user(alice.user_id).await.unwrap().unwrap();
  assert_eq!(fetched.name, "Alice");
  assert_eq!(fetched.email, "alice@example.com");
  assert_eq!(fetched.password_hash, "$argon2id$placeholder");
}

#[tokio::test]
async fn find_user_by_email_is_case_insensitive() {
  let s = store().await;
  let alice = user(&s, "Alice").await;

  let found = s
    .find_user_by_email("  ALICE@example.com")
    .await
    .unwrap()
    .unwrap();
  assert_eq!(found.user_id, alice.user_id);
  assert!(s.find_user_by_email("bob@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_email_is_reported_as_duplicate() {
  let s = store().await;
  user(&s, "Alice").await;
  let again = s
    .create_user(NewUser::new("Alice 2".into(), " ALICE@example.com".into(), "x".into()))
    .await
    .unwrap();
  assert!(matches!(again, Created::Duplicate));

  let stored = s.find_user_by_email("alice@example.com").await.unwrap().unwrap();
  assert_eq!(stored.name, "Alice");
}

#[tokio::test]
async fn get_user_missing_returns_none() {
  let s = store().await;
  assert!(s.get_user(Uuid::new_v4()).await.unwrap().is_none());
}

// ─── Profiles ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_profile_and_view_with_owner() {
  let s = store().await;
  let alice = user(&s, "Alice").await;

  let profile = new_profile(&s, alice.user_id, fields("Developer", "js, go")).await;
  assert_eq!(profile.skills, vec!["js", "go"]);
  assert_eq!(profile.version, 0);

  let view = s.profile_view(alice.user_id).await.unwrap().unwrap();
  assert_eq!(view.profile.profile_id, profile.profile_id);
  assert_eq!(view.user.name, "Alice");
  assert_eq!(view.user.avatar, alice.avatar);
}

#[tokio::test]
async fn second_profile_for_same_user_is_rejected() {
  let s = store().await;
  let alice = user(&s, "Alice").await;
  let first = new_profile(&s, alice.user_id, fields("Developer", "js")).await;

  let again = s
    .create_profile(alice.user_id, fields("Manager", "go"))
    .await
    .unwrap();
  assert!(matches!(again, Created::Duplicate));

  let stored = s.get_profile(alice.user_id).await.unwrap().unwrap();
  assert_eq!(stored.profile_id, first.profile_id);
  assert_eq!(stored.status, "Developer");
}

#[tokio::test]
async fn save_profile_persists_sequences_and_bumps_version() {
  let s = store().await;
  let alice = user(&s, "Alice").await;
  let mut profile = new_profile(&s, alice.user_id, fields("Developer", "js")).await;

  let e1 = profile.add_experience(job("Engineer", "2020-01-01"));
  let e2 = profile.add_experience(job("Lead", "2021-01-01"));
  profile.social = Social {
    twitter: Some("@alice".into()),
    ..Social::default()
  };

  let saved = match s.save_profile(profile).await.unwrap() {
    Saved::Written(p) => p,
    Saved::Stale => panic!("unexpected stale write"),
  };
  assert_eq!(saved.version, 1);

  let stored = s.get_profile(alice.user_id).await.unwrap().unwrap();
  assert_eq!(stored.version, 1);
  let ids: Vec<_> = stored.experience.iter().map(|e| e.experience_id).collect();
  assert_eq!(ids, vec![e2, e1]);
  assert_eq!(stored.social.twitter.as_deref(), Some("@alice"));
}

#[tokio::test]
async fn stale_profile_save_is_not_written() {
  let s = store().await;
  let alice = user(&s, "Alice").await;
  let original = new_profile(&s, alice.user_id, fields("Developer", "js")).await;

  let mut first = original.clone();
  first.add_experience(job("Engineer", "2020-01-01"));
  let mut second = original;
  second.status = "Manager".into();

  assert!(matches!(s.save_profile(first).await.unwrap(), Saved::Written(_)));
  assert!(matches!(s.save_profile(second).await.unwrap(), Saved::Stale));

  let stored = s.get_profile(alice.user_id).await.unwrap().unwrap();
  assert_eq!(stored.status, "Developer");
  assert_eq!(stored.experience.len(), 1);
}

#[tokio::test]
async fn list_profile_views_includes_every_profile() {
  let s = store().await;
  let alice = user(&s, "Alice").await;
  let bob = user(&s, "Bob").await;
  new_profile(&s, alice.user_id, fields("Developer", "js")).await;
  new_profile(&s, bob.user_id, fields("Student", "go")).await;

  let views = s.list_profile_views().await.unwrap();
  assert_eq!(views.len(), 2);
  let names: Vec<_> = views.iter().map(|v| v.user.name.as_str()).collect();
  assert!(names.contains(&"Alice"));
  assert!(names.contains(&"Bob"));
}

// ─── Posts ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn posts_are_listed_newest_first() {
  let s = store().await;
  let alice = user(&s, "Alice").await;

  let first = s.create_post(NewPost::new(&alice, "first".into())).await.unwrap();
  let second = s.create_post(NewPost::new(&alice, "second".into())).await.unwrap();

  let posts = s.list_posts().await.unwrap();
  let ids: Vec<_> = posts.iter().map(|p| p.post_id).collect();
  assert_eq!(ids, vec![second.post_id, first.post_id]);
  assert_eq!(posts[0].name, "Alice");
}

#[tokio::test]
async fn save_post_round_trips_likes_and_comments() {
  let s = store().await;
  let alice = user(&s, "Alice").await;
  let bob = user(&s, "Bob").await;

  let mut post = s.create_post(NewPost::new(&alice, "hello".into())).await.unwrap();
  post.like(bob.user_id).unwrap();
  post.add_comment(Comment::new(&bob, "nice".into()));

  assert!(matches!(s.save_post(post.clone()).await.unwrap(), Saved::Written(_)));
  // `post` still carries the old version
  assert!(matches!(s.save_post(post.clone()).await.unwrap(), Saved::Stale));

  let stored = s.get_post(post.post_id).await.unwrap().unwrap();
  assert_eq!(stored.version, 1);
  assert!(stored.is_liked_by(bob.user_id));
  assert_eq!(stored.comments.len(), 1);
  assert_eq!(stored.comments[0].text, "nice");
}

#[tokio::test]
async fn delete_post_makes_it_unfindable() {
  let s = store().await;
  let alice = user(&s, "Alice").await;
  let post = s.create_post(NewPost::new(&alice, "bye".into())).await.unwrap();

  assert!(s.delete_post(post.post_id).await.unwrap());
  assert!(s.get_post(post.post_id).await.unwrap().is_none());
  assert!(!s.delete_post(post.post_id).await.unwrap());
}

// ─── Accounts ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_account_removes_profile_and_posts() {
  let s = store().await;
  let alice = user(&s, "Alice").await;
  let bob = user(&s, "Bob").await;
  new_profile(&s, alice.user_id, fields("Developer", "js")).await;
  let hers = s.create_post(NewPost::new(&alice, "mine".into())).await.unwrap();
  let his = s.create_post(NewPost::new(&bob, "his".into())).await.unwrap();

  assert!(s.delete_account(alice.user_id).await.unwrap());

  assert!(s.get_user(alice.user_id).await.unwrap().is_none());
  assert!(s.get_profile(alice.user_id).await.unwrap().is_none());
  assert!(s.get_post(hers.post_id).await.unwrap().is_none());
  assert!(s.get_post(his.post_id).await.unwrap().is_some());
  assert!(!s.delete_account(alice.user_id).await.unwrap());
}
