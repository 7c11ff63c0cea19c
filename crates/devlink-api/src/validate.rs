//! Field-presence validation for request bodies.
//!
//! Every check records a [`FieldError`] instead of failing fast, so a client
//! sees all problems with a body at once.

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
  pub param: String,
  pub msg:   String,
}

impl FieldError {
  pub fn new(param: &str, msg: &str) -> Self {
    Self { param: param.to_owned(), msg: msg.to_owned() }
  }
}

#[derive(Debug, Default)]
pub struct Validator {
  errors: Vec<FieldError>,
}

impl Validator {
  fn fail(&mut self, param: &str, msg: &str) { self.errors.push(FieldError::new(param, msg)); }

  /// A trimmed, non-empty value. Records `msg` when absent or blank.
  pub fn required(&mut self, param: &str, value: Option<String>, msg: &str) -> String {
    match present(value) {
      Some(v) => v,
      None => {
        self.fail(param, msg);
        String::new()
      }
    }
  }

  pub fn email(&mut self, param: &str, value: Option<String>, msg: &str) -> String {
    match present(value) {
      Some(v) if looks_like_email(&v) => v,
      _ => {
        self.fail(param, msg);
        String::new()
      }
    }
  }

  /// Passwords are taken verbatim (no trimming).
  pub fn min_len(
    &mut self,
    param: &str,
    value: Option<String>,
    min: usize,
    msg: &str,
  ) -> String {
    match value {
      Some(v) if v.chars().count() >= min => v,
      _ => {
        self.fail(param, msg);
        String::new()
      }
    }
  }

  pub fn required_date(
    &mut self,
    param: &str,
    value: Option<String>,
    msg: &str,
  ) -> Option<NaiveDate> {
    let date = present(value).as_deref().and_then(parse_date);
    if date.is_none() {
      self.fail(param, msg);
    }
    date
  }

  /// An optional date; a supplied but unparseable value is an error.
  pub fn optional_date(&mut self, param: &str, value: Option<String>) -> Option<NaiveDate> {
    let raw = present(value)?;
    let date = parse_date(&raw);
    if date.is_none() {
      self.fail(param, "Invalid date");
    }
    date
  }

  pub fn finish(self) -> Result<(), ApiError> {
    if self.errors.is_empty() {
      Ok(())
    } else {
      Err(ApiError::Validation(self.errors))
    }
  }
}

/// `Some(trimmed)` when the value is supplied and not blank.
pub fn present(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

/// Accepts `YYYY-MM-DD` or a full RFC 3339 timestamp.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
  raw
    .parse::<NaiveDate>()
    .ok()
    .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn looks_like_email(s: &str) -> bool {
  let Some((local, domain)) = s.split_once('@') else {
    return false;
  };
  !local.is_empty()
    && !domain.contains('@')
    && !s.chars().any(char::is_whitespace)
    && domain
      .split_once('.')
      .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
}
