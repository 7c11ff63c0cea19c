//! Plain-text rendering of API documents for the terminal.

use std::fmt::Write as _;

use chrono::NaiveDate;
use devlink_core::{
  post::{Comment, Post},
  profile::{Profile, ProfileView},
  user::User,
};

fn span(from: NaiveDate, to: Option<NaiveDate>, current: bool) -> String {
  let end = match (to, current) {
    (_, true) => "now".to_string(),
    (Some(d), false) => d.format("%Y-%m-%d").to_string(),
    (None, false) => "?".to_string(),
  };
  format!("{} → {end}", from.format("%Y-%m-%d"))
}

pub fn user(u: &User) -> String {
  format!("{} <{}>\n  id:     {}\n  avatar: {}\n", u.name, u.email, u.user_id, u.avatar)
}

pub fn profile_view(v: &ProfileView) -> String {
  let mut out = format!("{} ({})\n", v.user.name, v.user.user_id);
  out.push_str(&profile(&v.profile));
  out
}

pub fn profile(p: &Profile) -> String {
  let mut out = String::new();
  let _ = writeln!(out, "  status:  {}", p.status);
  if let Some(company) = &p.company {
    let _ = writeln!(out, "  company: {company}");
  }
  if let Some(location) = &p.location {
    let _ = writeln!(out, "  location: {location}");
  }
  if !p.skills.is_empty() {
    let _ = writeln!(out, "  skills:  {}", p.skills.join(", "));
  }
  if let Some(gh) = &p.github_username {
    let _ = writeln!(out, "  github:  {gh}");
  }

  if !p.experience.is_empty() {
    out.push_str("  experience:\n");
    for e in &p.experience {
      let _ = writeln!(
        out,
        "    [{}] {} @ {} ({})",
        e.experience_id,
        e.title,
        e.company,
        span(e.from, e.to, e.current)
      );
    }
  }

  if !p.education.is_empty() {
    out.push_str("  education:\n");
    for e in &p.education {
      let _ = writeln!(
        out,
        "    [{}] {}, {} in {} ({})",
        e.education_id,
        e.school,
        e.degree,
        e.field_of_study,
        span(e.from, e.to, e.current)
      );
    }
  }
  out
}

pub fn post(p: &Post) -> String {
  let mut out = format!(
    "[{}] {} · {} · {} like(s)\n  {}\n",
    p.post_id,
    p.name,
    p.created_at.format("%Y-%m-%d %H:%M"),
    p.likes.len(),
    p.text
  );
  for c in &p.comments {
    out.push_str(&comment(c));
  }
  out
}

pub fn comment(c: &Comment) -> String {
  format!("    ↳ [{}] {}: {}\n", c.comment_id, c.name, c.text)
}

#[cfg(test)]
mod tests {
  use super::*;

  fn d(s: &str) -> NaiveDate { s.parse().unwrap() }

  #[test]
  fn spans() {
    assert_eq!(span(d("2020-01-01"), None, true), "2020-01-01 → now");
    assert_eq!(
      span(d("2020-01-01"), Some(d("2021-06-30")), false),
      "2020-01-01 → 2021-06-30"
    );
    assert_eq!(span(d("2020-01-01"), None, false), "2020-01-01 → ?");
  }
}
