//! Handlers for `/profile` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/profile` | Public; every profile with its owner |
//! | `POST`   | `/profile` | Create or update own profile; `status` and `skills` required |
//! | `DELETE` | `/profile` | Delete own account, profile and posts |
//! | `GET`    | `/profile/me` | Own profile with owner |
//! | `GET`    | `/profile/user/:user_id` | Public |
//! | `PUT`    | `/profile/experience` | Front-insert an experience entry |
//! | `DELETE` | `/profile/experience/:exp_id` | |
//! | `PUT`    | `/profile/education` | Front-insert an education entry |
//! | `DELETE` | `/profile/education/:edu_id` | |
//!
//! Every mutation fetches the profile, passes it through the ownership guard,
//! mutates it in memory and re-saves the whole document conditionally on the
//! version that was read.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use devlink_core::{
  guard::{Action, authorize},
  profile::{NewEducation, NewExperience, Profile, ProfileFields, ProfileView, Social, parse_skills},
  store::{Created, NetworkStore, Saved},
  token::IdentityClaim,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
  AppState,
  error::ApiError,
  extract::{ApiJson, ApiPath},
  identity::Identity,
  validate::{Validator, present},
};

// ─── Shared helpers ───────────────────────────────────────────────────────────

/// Fetch the caller's profile and confirm they may edit it.
async fn load_own<S>(state: &AppState<S>, identity: &IdentityClaim) -> Result<Profile, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let profile = state
    .store
    .get_profile(identity.subject_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("profile"))?;
  authorize(Action::EditProfile, &profile, identity)?;
  Ok(profile)
}

async fn persist<S>(state: &AppState<S>, profile: Profile) -> Result<Profile, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  match state.store.save_profile(profile).await.map_err(ApiError::store)? {
    Saved::Written(p) => Ok(p),
    Saved::Stale => Err(devlink_core::Error::Conflict("profile").into()),
  }
}

// ─── Reads ────────────────────────────────────────────────────────────────────

/// `GET /profile`
pub async fn list<S>(State(state): State<AppState<S>>) -> Result<Json<Vec<ProfileView>>, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let views = state.store.list_profile_views().await.map_err(ApiError::store)?;
  Ok(Json(views))
}

/// `GET /profile/me`
pub async fn me<S>(
  State(state): State<AppState<S>>,
  Identity(identity): Identity,
) -> Result<Json<ProfileView>, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let view = state
    .store
    .profile_view(identity.subject_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("There is no profile for this user".into()))?;
  Ok(Json(view))
}

/// `GET /profile/user/:user_id`
pub async fn by_user<S>(
  State(state): State<AppState<S>>,
  ApiPath(user_id): ApiPath<Uuid>,
) -> Result<Json<ProfileView>, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let view = state
    .store
    .profile_view(user_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("Profile not found".into()))?;
  Ok(Json(view))
}

// ─── Create / update ──────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ProfileBody {
  pub company:         Option<String>,
  pub website:         Option<String>,
  pub location:        Option<String>,
  pub bio:             Option<String>,
  pub status:          Option<String>,
  /// Comma-separated, e.g. `"rust, sql"`.
  pub skills:          Option<String>,
  #[serde(alias = "githubusername")]
  pub github_username: Option<String>,
  pub youtube:         Option<String>,
  pub twitter:         Option<String>,
  pub facebook:        Option<String>,
  pub linkedin:        Option<String>,
  pub instagram:       Option<String>,
}

impl ProfileBody {
  fn into_fields(self) -> Result<ProfileFields, ApiError> {
    let mut v = Validator::default();
    let status = v.required("status", self.status, "Status is required");
    let skills = v.required("skills", self.skills, "Skills is required");
    v.finish()?;

    Ok(ProfileFields {
      company: present(self.company),
      website: present(self.website),
      location: present(self.location),
      bio: present(self.bio),
      status,
      skills: parse_skills(&skills),
      github_username: present(self.github_username),
      social: Social {
        youtube:   present(self.youtube),
        twitter:   present(self.twitter),
        facebook:  present(self.facebook),
        linkedin:  present(self.linkedin),
        instagram: present(self.instagram),
      },
    })
  }
}

/// `POST /profile`: 201 on create, 200 on update.
pub async fn upsert<S>(
  State(state): State<AppState<S>>,
  Identity(identity): Identity,
  ApiJson(body): ApiJson<ProfileBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let fields = body.into_fields()?;

  let existing = state
    .store
    .get_profile(identity.subject_id)
    .await
    .map_err(ApiError::store)?;

  match existing {
    Some(mut profile) => {
      authorize(Action::EditProfile, &profile, &identity)?;
      fields.apply_to(&mut profile);
      let profile = persist(&state, profile).await?;
      Ok((StatusCode::OK, Json(profile)))
    }
    None => {
      let created = state
        .store
        .create_profile(identity.subject_id, fields)
        .await
        .map_err(ApiError::store)?;
      match created {
        Created::New(profile) => Ok((StatusCode::CREATED, Json(profile))),
        // Another request created it between our read and insert.
        Created::Duplicate => Err(devlink_core::Error::Conflict("profile").into()),
      }
    }
  }
}

// ─── Delete account ───────────────────────────────────────────────────────────

/// `DELETE /profile` removes the caller's posts, profile and account.
pub async fn delete_account<S>(
  State(state): State<AppState<S>>,
  Identity(identity): Identity,
) -> Result<impl IntoResponse, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let user = state
    .store
    .get_user(identity.subject_id)
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::not_found("user"))?;
  authorize(Action::DeleteAccount, &user, &identity)?;

  state
    .store
    .delete_account(user.user_id)
    .await
    .map_err(ApiError::store)?;

  tracing::info!(user_id = %user.user_id, "deleted account");
  Ok(Json(json!({ "msg": "User deleted" })))
}

// ─── Experience ───────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ExperienceBody {
  pub title:       Option<String>,
  pub company:     Option<String>,
  pub location:    Option<String>,
  pub from:        Option<String>,
  pub to:          Option<String>,
  #[serde(default)]
  pub current:     bool,
  pub description: Option<String>,
}

impl ExperienceBody {
  fn into_new(self) -> Result<NewExperience, ApiError> {
    let mut v = Validator::default();
    let title = v.required("title", self.title, "Title is required");
    let company = v.required("company", self.company, "Company is required");
    let from = v.required_date("from", self.from, "From date is required");
    let to = v.optional_date("to", self.to);
    v.finish()?;

    Ok(NewExperience {
      title,
      company,
      location: present(self.location),
      from: from.unwrap_or_default(),
      to,
      current: self.current,
      description: present(self.description),
    })
  }
}

/// `PUT /profile/experience`
pub async fn add_experience<S>(
  State(state): State<AppState<S>>,
  Identity(identity): Identity,
  ApiJson(body): ApiJson<ExperienceBody>,
) -> Result<Json<Profile>, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let entry = body.into_new()?;
  let mut profile = load_own(&state, &identity).await?;
  profile.add_experience(entry);
  Ok(Json(persist(&state, profile).await?))
}

/// `DELETE /profile/experience/:exp_id`
pub async fn remove_experience<S>(
  State(state): State<AppState<S>>,
  Identity(identity): Identity,
  ApiPath(exp_id): ApiPath<Uuid>,
) -> Result<Json<Profile>, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let mut profile = load_own(&state, &identity).await?;
  profile.remove_experience(exp_id)?;
  Ok(Json(persist(&state, profile).await?))
}

// ─── Education ────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct EducationBody {
  pub school:         Option<String>,
  pub degree:         Option<String>,
  #[serde(alias = "fieldofstudy")]
  pub field_of_study: Option<String>,
  pub from:           Option<String>,
  pub to:             Option<String>,
  #[serde(default)]
  pub current:        bool,
  pub description:    Option<String>,
}

impl EducationBody {
  fn into_new(self) -> Result<NewEducation, ApiError> {
    let mut v = Validator::default();
    let school = v.required("school", self.school, "School is required");
    let degree = v.required("degree", self.degree, "Degree is required");
    let field_of_study =
      v.required("fieldofstudy", self.field_of_study, "Field of study is required");
    let from = v.required_date("from", self.from, "From date is required");
    let to = v.optional_date("to", self.to);
    v.finish()?;

    Ok(NewEducation {
      school,
      degree,
      field_of_study,
      from: from.unwrap_or_default(),
      to,
      current: self.current,
      description: present(self.description),
    })
  }
}

/// `PUT /profile/education`
pub async fn add_education<S>(
  State(state): State<AppState<S>>,
  Identity(identity): Identity,
  ApiJson(body): ApiJson<EducationBody>,
) -> Result<Json<Profile>, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let entry = body.into_new()?;
  let mut profile = load_own(&state, &identity).await?;
  profile.add_education(entry);
  Ok(Json(persist(&state, profile).await?))
}

/// `DELETE /profile/education/:edu_id`
pub async fn remove_education<S>(
  State(state): State<AppState<S>>,
  Identity(identity): Identity,
  ApiPath(edu_id): ApiPath<Uuid>,
) -> Result<Json<Profile>, ApiError>
where
  S: NetworkStore + Clone + 'static,
{
  let mut profile = load_own(&state, &identity).await?;
  profile.remove_education(edu_id)?;
  Ok(Json(persist(&state, profile).await?))
}
