//! Extractors answering with `AppError` bodies instead of axum's plain-text
//! rejections

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::AppError;

/// Urlencoded form body
#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(AppError))]
pub struct FormInput<T>(pub T);

/// Path parameter. A value that does not parse names nothing, so it is a 404.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct PathId<T>(pub T);
