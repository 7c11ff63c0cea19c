//! Core types and trait definitions for devlink.
//!
//! This crate has no HTTP or database dependencies. It holds
//! the domain model, the credential issuer/verifier, the ownership guard and
//! the sequence mutation primitives. Storage backends implement
//! [`store::NetworkStore`]; the HTTP layer consumes it.

pub mod collection;
pub mod error;
pub mod guard;
pub mod post;
pub mod profile;
pub mod store;
pub mod token;
pub mod user;

pub use error::{Error, Result};
