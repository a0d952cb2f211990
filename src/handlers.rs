use axum::extract::FromRequest;

use crate::error::ApiError;

pub mod auth;
pub mod health;
pub mod investors;

/// JSON body extractor whose rejections render as `{"error": "..."}` with 400
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);
