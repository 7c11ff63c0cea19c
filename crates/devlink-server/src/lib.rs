//! HTTP front for devlink.
//!
//! Mounts the JSON API from [`devlink_api`] under `/api`, adds a liveness
//! route at `/` and wraps everything in a request-tracing layer.

use std::path::{Path, PathBuf};

use axum::{Router, routing::get};
use devlink_api::{AppState, api_router};
use devlink_core::{store::NetworkStore, token::DEFAULT_TOKEN_TTL_SECS};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` layered under
/// `DEVLINK_*` environment variables.
#[derive(Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:           String,
  #[serde(default = "default_port")]
  pub port:           u16,
  #[serde(default = "default_store_path")]
  pub store_path:     PathBuf,
  /// HS256 signing secret for issued tokens.
  pub jwt_secret:     String,
  #[serde(default = "default_token_ttl")]
  pub token_ttl_secs: u64,
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 5000 }
fn default_store_path() -> PathBuf { PathBuf::from("devlink.db") }
fn default_token_ttl() -> u64 { DEFAULT_TOKEN_TTL_SECS }

impl std::fmt::Debug for ServerConfig {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("ServerConfig")
      .field("host", &self.host)
      .field("port", &self.port)
      .field("store_path", &self.store_path)
      .field("jwt_secret", &"<redacted>")
      .field("token_ttl_secs", &self.token_ttl_secs)
      .finish()
  }
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the full application router.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: NetworkStore + Clone + 'static,
{
  Router::new()
    .route("/", get(root))
    .nest("/api", api_router(state))
    .layer(TraceLayer::new_for_http())
}

async fn root() -> &'static str { "API Running!" }

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use config::{Config, File, FileFormat};
  use devlink_core::token::{TOKEN_HEADER, TokenService};
  use devlink_store_sqlite::SqliteStore;
  use tower::ServiceExt;

  use super::*;

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    AppState::new(Arc::new(store), TokenService::new(b"secret", 60))
  }

  async fn oneshot_raw(
    state:   AppState<SqliteStore>,
    method:  &str,
    uri:     &str,
    headers: Vec<(&str, &str)>,
    body:    &str,
  ) -> axum::response::Response {
    let mut builder = Request::builder().method(method).uri(uri);
    for (k, v) in headers {
      builder = builder.header(k, v);
    }
    let req = builder.body(Body::from(body.to_string())).unwrap();
    router(state).oneshot(req).await.unwrap()
  }

  fn parse(toml: &str) -> ServerConfig {
    Config::builder()
      .add_source(File::from_str(toml, FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  // ── Config ──────────────────────────────────────────────────────────────────

  #[test]
  fn config_fills_defaults() {
    let cfg = parse(r#"jwt_secret = "s3cret""#);
    assert_eq!(cfg.address(), "127.0.0.1:5000");
    assert_eq!(cfg.store_path, PathBuf::from("devlink.db"));
    assert_eq!(cfg.token_ttl_secs, 100_000);
  }

  #[test]
  fn config_overrides_and_redacts_secret() {
    let cfg = parse(
      r#"
        host = "0.0.0.0"
        port = 8080
        store_path = "/var/lib/devlink/db.sqlite"
        jwt_secret = "s3cret"
        token_ttl_secs = 3600
      "#,
    );
    assert_eq!(cfg.address(), "0.0.0.0:8080");
    assert_eq!(cfg.token_ttl_secs, 3600);
    assert!(!format!("{cfg:?}").contains("s3cret"));
  }

  #[test]
  fn config_requires_secret() {
    let res = Config::builder()
      .add_source(File::from_str("port = 1", FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize::<ServerConfig>();
    assert!(res.is_err());
  }

  #[test]
  fn tilde_expands_against_home() {
    let plain = PathBuf::from("/tmp/devlink.db");
    assert_eq!(expand_tilde(&plain), plain);
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/devlink.db")),
        PathBuf::from(home).join("devlink.db")
      );
    }
  }

  // ── Routing ─────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn root_reports_liveness() {
    let resp = oneshot_raw(make_state().await, "GET", "/", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"API Running!");
  }

  #[tokio::test]
  async fn api_is_nested() {
    let state = make_state().await;

    let resp = oneshot_raw(state.clone(), "GET", "/api/auth", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = oneshot_raw(state.clone(), "GET", "/api/profile", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = oneshot_raw(state, "GET", "/auth", vec![], "").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn register_then_whoami_through_server() {
    let state = make_state().await;
    let resp = oneshot_raw(
      state.clone(),
      "POST",
      "/api/users",
      vec![("content-type", "application/json")],
      r#"{"name":"Ada","email":"ada@example.com","password":"lovelace"}"#,
    )
    .await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    let token = body["token"].as_str().unwrap();

    let resp = oneshot_raw(state, "GET", "/api/auth", vec![(TOKEN_HEADER, token)], "").await;
    assert_eq!(resp.status(), StatusCode::OK);
  }
}
