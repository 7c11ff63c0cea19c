//! Handlers for `/posts` endpoints. All routes require an [`Identity`].
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/posts` | Newest first |
//! | `POST`   | `/posts` | Body: `{"text"}` |
//! | `GET`    | `/posts/:id` | |
//! | `DELETE` | `/posts/:id` | Author only |
//! | `PUT`    | `/posts/like/:id` | Returns the likes |
//! | `PUT`    | `/posts/unlike/:id` | Returns the likes |
//! | `POST`   | `/posts/comment/:id` | Body: `{"text"}`; returns the comments |
//! | `DELETE` | `/posts/comment/:id/:comment_id` | Comment author only; returns the comments |

use std::collections::VecDeque;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use devlink_core::{
  guard::{Action, authorize},
  post::{Comment, Like, NewPost, Post},
  store::{NetworkStore, Saved},
  user::User,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
  AppState,
  error::ApiError,
  extract::{ApiJson, ApiPath},
  identity::Identity,
  validate::Validator,
};

#[derive(Debug, Deserialize)]
pub struct TextBody {
  pub text: Option<String>,
}

impl TextBody {
  fn into_text(self) -> Result<String, ApiError> {
    let mut v = Validator::default();
    let text = v.required("text", self.text, "Text is required");
    v.finish()?;
    Ok(text)
  }
}

// ─── Shared helpers ───────────────────────────────────────────────────────────

async fn load_post<S>(state: &AppState<S>, id: Uuid) -> Result<Post, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  state
    .store
    .get_post(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("post"))
}

async fn load_author<S>(state: &AppState<S>, id: Uuid) -> Result<User, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  state
    .store
    .get_user(id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("user"))
}

async fn persist<S>(state: &AppState<S>, post: Post) -> Result<Post, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  match state.store.save_post(post).await.map_err(ApiError::store)? {
    Saved::Written(p) => Ok(p),
    Saved::Stale => Err(devlink_core::Error::Conflict("post").into()),
  }
}

// ─── Posts ────────────────────────────────────────────────────────────────────

/// `GET /posts`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Identity(_): Identity,
) -> Result<Json<Vec<Post>>, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let posts = state.store.list_posts().await.map_err(ApiError::store)?;
  Ok(Json(posts))
}

/// `POST /posts`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  Identity(identity): Identity,
  ApiJson(body): ApiJson<TextBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let text = body.into_text()?;
  let author = load_author(&state, identity.subject_id).await?;

  let post = state
    .store
    .create_post(NewPost::new(&author, text))
    .await
    .map_err(ApiError::store)?;

  tracing::debug!(post_id = %post.post_id, user_id = %author.user_id, "created post");
  Ok((StatusCode::CREATED, Json(post)))
}

/// `GET /posts/:id`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Identity(_): Identity,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Post>, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  Ok(Json(load_post(&state, id).await?))
}

/// `DELETE /posts/:id`
pub async fn delete_one<S>(
  State(state): State<AppState<S>>,
  Identity(identity): Identity,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<impl IntoResponse, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let post = load_post(&state, id).await?;
  authorize(Action::DeletePost, &post, &identity)?;

  if !state.store.delete_post(id).await.map_err(ApiError::store)? {
    return Err(ApiError::not_found("post"));
  }
  Ok(Json(json!({ "msg": "Post removed" })))
}

// ─── Likes ────────────────────────────────────────────────────────────────────

/// `PUT /posts/like/:id`
pub async fn like<S>(
  State(state): State<AppState<S>>,
  Identity(identity): Identity,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<VecDeque<Like>>, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let mut post = load_post(&state, id).await?;
  post.like(identity.subject_id)?;
  Ok(Json(persist(&state, post).await?.likes))
}

/// `PUT /posts/unlike/:id`
pub async fn unlike<S>(
  State(state): State<AppState<S>>,
  Identity(identity): Identity,
  ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<VecDeque<Like>>, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let mut post = load_post(&state, id).await?;
  post.unlike(identity.subject_id)?;
  Ok(Json(persist(&state, post).await?.likes))
}

// ─── Comments ─────────────────────────────────────────────────────────────────

/// `POST /posts/comment/:id`
pub async fn add_comment<S>(
  State(state): State<AppState<S>>,
  Identity(identity): Identity,
  ApiPath(id): ApiPath<Uuid>,
  ApiJson(body): ApiJson<TextBody>,
) -> Result<Json<VecDeque<Comment>>, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let text = body.into_text()?;
  let author = load_author(&state, identity.subject_id).await?;
  let mut post = load_post(&state, id).await?;

  post.add_comment(Comment::new(&author, text));
  Ok(Json(persist(&state, post).await?.comments))
}

/// `DELETE /posts/comment/:id/:comment_id`
pub async fn remove_comment<S>(
  State(state): State<AppState<S>>,
  Identity(identity): Identity,
  ApiPath((id, comment_id)): ApiPath<(Uuid, Uuid)>,
) -> Result<Json<VecDeque<Comment>>, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let mut post = load_post(&state, id).await?;
  let comment = post
    .comment(comment_id)
    .ok_or_else(|| ApiError::NotFound("comment does not exist".into()))?;
  authorize(Action::DeleteComment, comment, &identity)?;

  post.remove_comment(comment_id)?;
  Ok(Json(persist(&state, post).await?.comments))
}
