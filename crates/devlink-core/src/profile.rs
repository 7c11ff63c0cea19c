//! Profiles and their embedded experience / education sequences.
//!
//! A user owns at most one profile. Experience and education entries are
//! stored most-recent-first; a new entry is always inserted at the head.

use std::collections::VecDeque;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  collection::{self, Keyed},
  guard::Owned,
  user::UserSummary,
};

// ─── Social links ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub youtube:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub twitter:   Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub facebook:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub linkedin:  Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub instagram: Option<String>,
}

// ─── Sub-resources ───────────────────────────────────────────────────────────

/// A position held, most recent first within [`Profile::experience`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
  pub experience_id: Uuid,
  pub title:         String,
  pub company:       String,
  pub location:      Option<String>,
  pub from:          NaiveDate,
  pub to:            Option<NaiveDate>,
  #[serde(default)]
  pub current:       bool,
  pub description:   Option<String>,
}

impl Keyed for Experience {
  fn key(&self) -> Uuid { self.experience_id }
}

/// Input for a new [`Experience`]; the id is generated on insertion.
#[derive(Debug, Clone)]
pub struct NewExperience {
  pub title:       String,
  pub company:     String,
  pub location:    Option<String>,
  pub from:        NaiveDate,
  pub to:          Option<NaiveDate>,
  pub current:     bool,
  pub description: Option<String>,
}

impl From<NewExperience> for Experience {
  fn from(n: NewExperience) -> Self {
    Experience {
      experience_id: Uuid::new_v4(),
      title:         n.title,
      company:       n.company,
      location:      n.location,
      from:          n.from,
      to:            n.to,
      current:       n.current,
      description:   n.description,
    }
  }
}

/// A course of study, most recent first within [`Profile::education`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
  pub education_id:   Uuid,
  pub school:         String,
  pub degree:         String,
  pub field_of_study: String,
  pub from:           NaiveDate,
  pub to:             Option<NaiveDate>,
  #[serde(default)]
  pub current:        bool,
  pub description:    Option<String>,
}

impl Keyed for Education {
  fn key(&self) -> Uuid { self.education_id }
}

#[derive(Debug, Clone)]
pub struct NewEducation {
  pub school:         String,
  pub degree:         String,
  pub field_of_study: String,
  pub from:           NaiveDate,
  pub to:             Option<NaiveDate>,
  pub current:        bool,
  pub description:    Option<String>,
}

impl From<NewEducation> for Education {
  fn from(n: NewEducation) -> Self {
    Education {
      education_id:   Uuid::new_v4(),
      school:         n.school,
      degree:         n.degree,
      field_of_study: n.field_of_study,
      from:           n.from,
      to:             n.to,
      current:        n.current,
      description:    n.description,
    }
  }
}

// ─── Profile ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
  pub profile_id:      Uuid,
  /// The owning user; unique across all profiles.
  pub user_id:         Uuid,
  pub company:         Option<String>,
  pub website:         Option<String>,
  pub location:        Option<String>,
  pub status:          String,
  pub skills:          Vec<String>,
  pub bio:             Option<String>,
  pub github_username: Option<String>,
  pub social:          Social,
  pub experience:      VecDeque<Experience>,
  pub education:       VecDeque<Education>,
  pub created_at:      DateTime<Utc>,
  /// Incremented on every successful save; writes are conditional on it.
  pub version:         u64,
}

impl Owned for Profile {
  fn owner_id(&self) -> Uuid { self.user_id }
}

impl Profile {
  /// Front-insert a new experience entry and return its id.
  pub fn add_experience(&mut self, entry: NewExperience) -> Uuid {
    let entry = Experience::from(entry);
    let id = entry.experience_id;
    collection::insert_front(&mut self.experience, entry);
    id
  }

  /// Remove the experience entry with `id`. An unknown id is
  /// [`Error::NotFound`] and leaves the sequence unchanged.
  pub fn remove_experience(&mut self, id: Uuid) -> Result<Experience> {
    collection::remove_by_key(&mut self.experience, id)
      .ok_or(Error::NotFound("experience entry"))
  }

  pub fn add_education(&mut self, entry: NewEducation) -> Uuid {
    let entry = Education::from(entry);
    let id = entry.education_id;
    collection::insert_front(&mut self.education, entry);
    id
  }

  pub fn remove_education(&mut self, id: Uuid) -> Result<Education> {
    collection::remove_by_key(&mut self.education, id)
      .ok_or(Error::NotFound("education entry"))
  }
}

// ─── Create / update input ───────────────────────────────────────────────────

/// The whitelisted scalar fields accepted by create-or-update.
///
/// `None` means "not supplied" and leaves the stored value untouched on
/// update. `social` is always written as a whole.
#[derive(Debug, Clone, Default)]
pub struct ProfileFields {
  pub company:         Option<String>,
  pub website:         Option<String>,
  pub location:        Option<String>,
  pub bio:             Option<String>,
  pub status:          String,
  pub skills:          Vec<String>,
  pub github_username: Option<String>,
  pub social:          Social,
}

impl ProfileFields {
  /// Overwrite the supplied fields of `profile`.
  pub fn apply_to(self, profile: &mut Profile) {
    fn set(slot: &mut Option<String>, value: Option<String>) {
      if value.is_some() {
        *slot = value;
      }
    }

    set(&mut profile.company, self.company);
    set(&mut profile.website, self.website);
    set(&mut profile.location, self.location);
    set(&mut profile.bio, self.bio);
    set(&mut profile.github_username, self.github_username);
    profile.status = self.status;
    profile.skills = self.skills;
    profile.social = self.social;
  }
}

/// Split a comma-separated skills string, trimming and dropping empties.
pub fn parse_skills(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
    .collect()
}

// ─── Read model ──────────────────────────────────────────────────────────────

/// A profile together with its owner's public details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileView {
  #[serde(flatten)]
  pub profile: Profile,
  pub user:    UserSummary,
}
