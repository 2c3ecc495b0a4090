// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie-preserving session
//!
//! A [`Session`] owns a cookie jar. Every send fills in jar cookies the
//! request does not already define, and stores cookies from the response.

use std::collections::HashMap;
use std::sync::Arc;

use crate::config::{fill_missing, Config};
use crate::error::Result;
use crate::http::{CookieJar, HttpClient, RequestDescriptor, Response};

/// A sequence of related requests sharing cookies
///
/// Cloning yields another handle to the same session: the clones share one
/// jar, so a cookie stored through either is sent by both. Sessions built
/// separately (`new`, `with_config`, `with_client`) never share a jar.
#[derive(Debug, Clone, Default)]
pub struct Session {
    client: HttpClient,
    jar: Arc<CookieJar>,
}

impl Session {
    /// Create a session using the process-wide configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session with its own configuration layer
    pub fn with_config(config: Config) -> Self {
        Self::with_client(HttpClient::new().with_config(config))
    }

    /// Create a session over an existing client
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            jar: Arc::new(CookieJar::new()),
        }
    }

    /// Underlying client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Snapshot of the jar
    pub fn cookies(&self) -> HashMap<String, String> {
        self.jar.snapshot()
    }

    /// Empty the jar
    pub fn clear_cookies(&self) {
        self.jar.clear();
    }

    /// Send a request through the session
    pub async fn send(&self, request: &RequestDescriptor) -> Result<Response> {
        let jar = self.jar.snapshot();
        let response = if jar.is_empty() {
            self.client.execute(request).await?
        } else {
            let mut request = request.clone();
            request.cookies = fill_missing(request.cookies.as_ref(), Some(&jar));
            self.client.execute(&request).await?
        };

        if !response.cookies.is_empty() {
            tracing::debug!(count = response.cookies.len(), "Storing response cookies");
            self.jar.merge(&response.cookies);
        }
        Ok(response)
    }

    /// GET `url`
    pub async fn get(&self, url: &str) -> Result<Response> {
        self.send(&RequestDescriptor::get(url)).await
    }

    /// GET `url` with query parameters
    pub async fn get_with_params(
        &self,
        url: &str,
        params: HashMap<String, String>,
    ) -> Result<Response> {
        self.send(&RequestDescriptor::get(url).params(params)).await
    }

    /// POST a url-encoded form
    pub async fn post_form(&self, url: &str, data: HashMap<String, String>) -> Result<Response> {
        self.send(&RequestDescriptor::post(url).form(data)).await
    }

    /// POST JSON text
    pub async fn post_json(&self, url: &str, json: impl Into<String>) -> Result<Response> {
        self.send(&RequestDescriptor::post(url).json_text(json)).await
    }

    /// POST form fields and files as multipart; `files` maps field name to path
    pub async fn post_multipart(
        &self,
        url: &str,
        data: HashMap<String, String>,
        files: HashMap<String, String>,
    ) -> Result<Response> {
        self.send(&RequestDescriptor::post(url).form(data).files(files))
            .await
    }

    /// POST a raw body with an explicit content type
    pub async fn post_raw(
        &self,
        url: &str,
        raw: impl Into<String>,
        content_type: &str,
    ) -> Result<Response> {
        self.send(&RequestDescriptor::post(url).raw(raw).content_type(content_type))
            .await
    }
}
