//! Resource ownership guard.
//!
//! Every mutating operation calls [`authorize`] with the resource it is about
//! to touch, after the resource has been fetched and before it is modified.
//! The decision depends only on the resource's owner and the acting identity,
//! so it can be exercised without any storage.

use std::fmt;

use uuid::Uuid;

use crate::{Error, Result, token::IdentityClaim};

/// A mutation that requires the actor to own the target resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
  DeletePost,
  DeleteComment,
  EditProfile,
  DeleteAccount,
}

impl fmt::Display for Action {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::DeletePost => "delete this post",
      Self::DeleteComment => "delete this comment",
      Self::EditProfile => "edit this profile",
      Self::DeleteAccount => "delete this account",
    })
  }
}

/// Anything with a single owning subject.
pub trait Owned {
  fn owner_id(&self) -> Uuid;
}

impl Owned for IdentityClaim {
  fn owner_id(&self) -> Uuid { self.subject_id }
}

/// Pass iff `identity` owns `resource`; otherwise [`Error::Forbidden`].
pub fn authorize<R>(
  action: Action,
  resource: &R,
  identity: &IdentityClaim,
) -> Result<()>
where
  R: Owned + ?Sized,
{
  if resource.owner_id() == identity.subject_id {
    Ok(())
  } else {
    Err(Error::Forbidden(action))
  }
}
