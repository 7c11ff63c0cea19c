//! Credential issuance and verification.
//!
//! A credential is an HS256 JWT whose payload is
//! `{"user":{"id":"<uuid>"},"iat":<secs>,"exp":<secs>}`. The signing secret is
//! supplied once at construction and never rotated for the lifetime of the
//! [`TokenService`].

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{
  Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

/// Validity window applied to freshly issued credentials unless configured
/// otherwise.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 100_000;

/// Request header carrying the credential.
pub const TOKEN_HEADER: &str = "x-auth-token";

// ─── Identity ────────────────────────────────────────────────────────────────

/// The verified subject behind a request. Rebuilt from the credential on every
/// request; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityClaim {
  pub subject_id: Uuid,
}

impl IdentityClaim {
  pub fn new(subject_id: Uuid) -> Self { Self { subject_id } }
}

// ─── Wire payload ────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
struct ClaimUser {
  id: Uuid,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
  user: ClaimUser,
  iat:  u64,
  exp:  u64,
}

// ─── Service ─────────────────────────────────────────────────────────────────

/// Issues and verifies credentials with a single process-wide secret.
///
/// Cloning is cheap enough to hand a copy to every router; wrap it in an `Arc`
/// when shared across many tasks.
#[derive(Clone)]
pub struct TokenService {
  encoding:   EncodingKey,
  decoding:   DecodingKey,
  validation: Validation,
  ttl:        Duration,
}

impl TokenService {
  pub fn new(secret: &[u8], ttl_secs: u64) -> Self {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    Self {
      encoding: EncodingKey::from_secret(secret),
      decoding: DecodingKey::from_secret(secret),
      validation,
      ttl: i64::try_from(ttl_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .unwrap_or(Duration::MAX),
    }
  }

  /// Sign a credential for `claim`, valid from now for the configured window.
  pub fn issue(&self, claim: IdentityClaim) -> Result<String> {
    self.issue_at(claim, Utc::now())
  }

  /// Sign a credential as though it had been issued at `issued_at`.
  pub fn issue_at(
    &self,
    claim: IdentityClaim,
    issued_at: DateTime<Utc>,
  ) -> Result<String> {
    let expires_at = issued_at
      .checked_add_signed(self.ttl)
      .unwrap_or(DateTime::<Utc>::MAX_UTC);

    let claims = Claims {
      user: ClaimUser { id: claim.subject_id },
      iat:  unix_secs(issued_at),
      exp:  unix_secs(expires_at),
    };

    encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
      .map_err(|e| Error::Credential(e.to_string()))
  }

  /// Verify a raw credential taken from a request header.
  ///
  /// - `None` or a blank value fails with [`Error::Unauthenticated`].
  /// - A bad signature, malformed structure or past expiry fails with
  ///   [`Error::InvalidCredential`].
  pub fn verify(&self, raw: Option<&str>) -> Result<IdentityClaim> {
    let raw = raw
      .map(str::trim)
      .filter(|t| !t.is_empty())
      .ok_or(Error::Unauthenticated)?;

    let data = decode::<Claims>(raw, &self.decoding, &self.validation)
      .map_err(|_| Error::InvalidCredential)?;

    Ok(IdentityClaim::new(data.claims.user.id))
  }
}

fn unix_secs(at: DateTime<Utc>) -> u64 { u64::try_from(at.timestamp()).unwrap_or(0) }
