//! Async HTTP client wrapping the devlink JSON API.

use std::{collections::VecDeque, time::Duration};

use anyhow::{Context, Result, anyhow, bail};
use devlink_core::{
  post::{Comment, Like, Post},
  profile::{Profile, ProfileView},
  token::TOKEN_HEADER,
  user::User,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::Value;
use uuid::Uuid;

/// Connection settings for the devlink API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
  pub token:    Option<String>,
}

#[derive(Deserialize)]
struct TokenBody {
  token: String,
}

/// Async HTTP client for the devlink JSON REST API.
///
/// Cheap to clone; the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!(
      "{}/api{}",
      self.config.base_url.trim_end_matches('/'),
      path
    )
  }

  fn auth(&self, req: RequestBuilder) -> Result<RequestBuilder> {
    match &self.config.token {
      Some(token) => Ok(req.header(TOKEN_HEADER, token)),
      None => bail!("no token; run `devlink login` and set DEVLINK_TOKEN"),
    }
  }

  /// Send `req` and decode a JSON body, turning error responses into a
  /// readable message.
  async fn send<T: DeserializeOwned>(&self, req: RequestBuilder, what: &str) -> Result<T> {
    let resp = req.send().await.with_context(|| format!("{what} failed"))?;
    let resp = check(resp, what).await?;
    resp
      .json()
      .await
      .with_context(|| format!("deserialising {what} response"))
  }

  // ── Accounts ──────────────────────────────────────────────────────────────

  /// `POST /api/users`
  pub async fn register(&self, name: &str, email: &str, password: &str) -> Result<String> {
    let req = self
      .client
      .post(self.url("/users"))
      .json(&serde_json::json!({ "name": name, "email": email, "password": password }));
    let body: TokenBody = self.send(req, "POST /users").await?;
    Ok(body.token)
  }

  /// `POST /api/auth`
  pub async fn login(&self, email: &str, password: &str) -> Result<String> {
    let req = self
      .client
      .post(self.url("/auth"))
      .json(&serde_json::json!({ "email": email, "password": password }));
    let body: TokenBody = self.send(req, "POST /auth").await?;
    Ok(body.token)
  }

  /// `GET /api/auth`
  pub async fn whoami(&self) -> Result<User> {
    let req = self.auth(self.client.get(self.url("/auth")))?;
    self.send(req, "GET /auth").await
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  /// `GET /api/profile/me`
  pub async fn my_profile(&self) -> Result<ProfileView> {
    let req = self.auth(self.client.get(self.url("/profile/me")))?;
    self.send(req, "GET /profile/me").await
  }

  /// `GET /api/profile/user/:user_id`
  pub async fn profile_of(&self, user_id: Uuid) -> Result<ProfileView> {
    let req = self.client.get(self.url(&format!("/profile/user/{user_id}")));
    self.send(req, "GET /profile/user").await
  }

  /// `POST /api/profile`
  pub async fn upsert_profile(&self, body: &Value) -> Result<Profile> {
    let req = self.auth(self.client.post(self.url("/profile")).json(body))?;
    self.send(req, "POST /profile").await
  }

  /// `DELETE /api/profile`
  pub async fn delete_account(&self) -> Result<()> {
    let req = self.auth(self.client.delete(self.url("/profile")))?;
    let _: Value = self.send(req, "DELETE /profile").await?;
    Ok(())
  }

  /// `PUT /api/profile/experience`
  pub async fn add_experience(&self, body: &Value) -> Result<Profile> {
    let req = self.auth(self.client.put(self.url("/profile/experience")).json(body))?;
    self.send(req, "PUT /profile/experience").await
  }

  /// `DELETE /api/profile/experience/:exp_id`
  pub async fn remove_experience(&self, id: Uuid) -> Result<Profile> {
    let req = self.auth(self.client.delete(self.url(&format!("/profile/experience/{id}"))))?;
    self.send(req, "DELETE /profile/experience").await
  }

  /// `PUT /api/profile/education`
  pub async fn add_education(&self, body: &Value) -> Result<Profile> {
    let req = self.auth(self.client.put(self.url("/profile/education")).json(body))?;
    self.send(req, "PUT /profile/education").await
  }

  /// `DELETE /api/profile/education/:edu_id`
  pub async fn remove_education(&self, id: Uuid) -> Result<Profile> {
    let req = self.auth(self.client.delete(self.url(&format!("/profile/education/{id}"))))?;
    self.send(req, "DELETE /profile/education").await
  }

  // ── Posts ─────────────────────────────────────────────────────────────────

  /// `GET /api/posts`
  pub async fn list_posts(&self) -> Result<Vec<Post>> {
    let req = self.auth(self.client.get(self.url("/posts")))?;
    self.send(req, "GET /posts").await
  }

  /// `POST /api/posts`
  pub async fn create_post(&self, text: &str) -> Result<Post> {
    let req = self.auth(
      self
        .client
        .post(self.url("/posts"))
        .json(&serde_json::json!({ "text": text })),
    )?;
    self.send(req, "POST /posts").await
  }

  /// `DELETE /api/posts/:id`
  pub async fn delete_post(&self, id: Uuid) -> Result<()> {
    let req = self.auth(self.client.delete(self.url(&format!("/posts/{id}"))))?;
    let _: Value = self.send(req, "DELETE /posts").await?;
    Ok(())
  }

  /// `PUT /api/posts/like/:id`
  pub async fn like(&self, id: Uuid) -> Result<VecDeque<Like>> {
    let req = self.auth(self.client.put(self.url(&format!("/posts/like/{id}"))))?;
    self.send(req, "PUT /posts/like").await
  }

  /// `PUT /api/posts/unlike/:id`
  pub async fn unlike(&self, id: Uuid) -> Result<VecDeque<Like>> {
    let req = self.auth(self.client.put(self.url(&format!("/posts/unlike/{id}"))))?;
    self.send(req, "PUT /posts/unlike").await
  }

  /// `POST /api/posts/comment/:id`
  pub async fn comment(&self, id: Uuid, text: &str) -> Result<VecDeque<Comment>> {
    let req = self.auth(
      self
        .client
        .post(self.url(&format!("/posts/comment/{id}")))
        .json(&serde_json::json!({ "text": text })),
    )?;
    self.send(req, "POST /posts/comment").await
  }

  /// `DELETE /api/posts/comment/:id/:comment_id`
  pub async fn uncomment(&self, id: Uuid, comment_id: Uuid) -> Result<VecDeque<Comment>> {
    let req = self.auth(
      self
        .client
        .delete(self.url(&format!("/posts/comment/{id}/{comment_id}"))),
    )?;
    self.send(req, "DELETE /posts/comment").await
  }
}

// ─── Error bodies ─────────────────────────────────────────────────────────────

async fn check(resp: Response, what: &str) -> Result<Response> {
  let status = resp.status();
  if status.is_success() {
    return Ok(resp);
  }
  let body: Value = resp.json().await.unwrap_or(Value::Null);
  Err(anyhow!("{what} → {}", describe_error(status, &body)))
}

/// Render an API error body (`{"msg"}` or `{"errors":[{param,msg}]}`).
pub fn describe_error(status: StatusCode, body: &Value) -> String {
  if let Some(msg) = body.get("msg").and_then(Value::as_str) {
    return format!("{status}: {msg}");
  }
  if let Some(errors) = body.get("errors").and_then(Value::as_array) {
    let parts: Vec<String> = errors
      .iter()
      .map(|e| {
        let param = e.get("param").and_then(Value::as_str).unwrap_or("?");
        let msg = e.get("msg").and_then(Value::as_str).unwrap_or("invalid");
        format!("{param}: {msg}")
      })
      .collect();
    return format!("{status}: {}", parts.join("; "));
  }
  status.to_string()
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn describes_message_bodies() {
    let s = describe_error(StatusCode::FORBIDDEN, &json!({ "msg": "user not authorized" }));
    assert!(s.ends_with("user not authorized"), "{s}");
  }

  #[test]
  fn describes_validation_bodies() {
    let body = json!({ "errors": [
      { "param": "status", "msg": "Status is required" },
      { "param": "skills", "msg": "Skills is required" },
    ]});
    let s = describe_error(StatusCode::BAD_REQUEST, &body);
    assert!(s.contains("status: Status is required; skills: Skills is required"), "{s}");
  }

  #[test]
  fn falls_back_to_status() {
    let s = describe_error(StatusCode::BAD_GATEWAY, &Value::Null);
    assert_eq!(s, StatusCode::BAD_GATEWAY.to_string());
  }

  #[test]
  fn urls_are_rooted_under_api() {
    let client = ApiClient::new(ApiConfig {
      base_url: "http://localhost:5000/".into(),
      token:    None,
    })
    .unwrap();
    assert_eq!(client.url("/posts"), "http://localhost:5000/api/posts");
    assert!(client.auth(client.client.get("http://x")).is_err());
  }
}
