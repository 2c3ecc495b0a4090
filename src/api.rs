// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! One-shot helpers
//!
//! Each call runs in a fresh [`Session`] with only the process-wide
//! configuration, so no cookies are kept between calls.

use std::collections::HashMap;

use crate::error::Result;
use crate::http::{RequestDescriptor, Response};
use crate::session::Session;

/// Send a descriptor
pub async fn send(request: &RequestDescriptor) -> Result<Response> {
    Session::new().send(request).await
}

/// GET `url`
pub async fn get(url: &str) -> Result<Response> {
    Session::new().get(url).await
}

/// GET `url` with query parameters
pub async fn get_with_params(url: &str, params: HashMap<String, String>) -> Result<Response> {
    Session::new().get_with_params(url, params).await
}

/// POST a url-encoded form
pub async fn post_form(url: &str, data: HashMap<String, String>) -> Result<Response> {
    Session::new().post_form(url, data).await
}

/// POST JSON text
pub async fn post_json(url: &str, json: impl Into<String>) -> Result<Response> {
    Session::new().post_json(url, json).await
}

/// POST form fields and files as multipart
pub async fn post_multipart(
    url: &str,
    data: HashMap<String, String>,
    files: HashMap<String, String>,
) -> Result<Response> {
    Session::new().post_multipart(url, data, files).await
}

/// POST a raw body with an explicit content type
pub async fn post_raw(url: &str, raw: impl Into<String>, content_type: &str) -> Result<Response> {
    Session::new().post_raw(url, raw, content_type).await
}
