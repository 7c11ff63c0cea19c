//! Request extractors whose rejections render as [`ApiError`] JSON bodies.
//!
//! axum's own `Json` and `Path` reject with plain-text bodies; these wrappers
//! run the same extraction and route the rejection through `ApiError`.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON request body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// Path parameters.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);
