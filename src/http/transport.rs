// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport seam and the reqwest-backed implementation
//!
//! The pipeline hands a [`PreparedRequest`] to a [`Transport`] and gets a
//! [`RawResponse`] back. [`ReqwestTransport`] builds a fresh client per send,
//! so nothing is pooled between calls.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use bytes::Bytes;
use hyper::ext::ReasonPhrase;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder, Method};
use url::Url;

use super::body::EncodedBody;
use crate::error::{Error, Result};

/// Per-send client settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportOptions {
    /// Proxy URL for all schemes
    pub proxy: Option<String>,
    /// Whole-call deadline, `None` = transport default
    pub timeout: Option<Duration>,
    /// Follow `Location` on 3xx
    pub follow_redirects: bool,
    /// Skip TLS certificate verification
    pub accept_invalid_certs: bool,
    /// Allow HTTP/2
    pub http2: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: None,
            follow_redirects: true,
            accept_invalid_certs: false,
            http2: false,
        }
    }
}

impl TransportOptions {
    /// Deadline in milliseconds, 0 when unset
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.map_or(0, |t| t.as_millis() as u64)
    }
}

/// A fully assembled request
#[derive(Debug)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: EncodedBody,
    pub options: TransportOptions,
}

/// Response as received, before normalization
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// Numeric status code
    pub status: u16,
    /// Status line without the protocol, e.g. `404 Not Found`
    pub status_line: String,
    /// Header pairs in arrival order, repeated names allowed
    pub headers: Vec<(String, String)>,
    /// Whole body
    pub body: Bytes,
    /// Time from send until response headers arrived
    pub elapsed: Duration,
    /// Final URL after any redirects
    pub url: String,
}

/// Performs the network call for a prepared request
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send `request` and read the whole response
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse>;
}

/// Transport backed by `reqwest`
#[derive(Debug, Clone, Copy, Default)]
pub struct ReqwestTransport;

impl ReqwestTransport {
    /// Create a transport with reqwest defaults
    pub fn new() -> Self {
        Self::default()
    }

    fn client_builder(&self, options: &TransportOptions, http2: bool) -> ClientBuilder {
        let redirect = if options.follow_redirects {
            Policy::default()
        } else {
            Policy::none()
        };

        let mut builder = Client::builder()
            .redirect(redirect)
            .danger_accept_invalid_certs(options.accept_invalid_certs);

        if !http2 {
            builder = builder.http1_only();
        }
        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        match options.proxy.as_deref() {
            Some(proxy_url) => match reqwest::Proxy::all(proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(e) => {
                    tracing::warn!(proxy = %proxy_url, error = %e, "Invalid proxy URL, sending directly");
                    builder = builder.no_proxy();
                }
            },
            None => builder = builder.no_proxy(),
        }

        builder
    }

    /// Build the client for one send, falling back to HTTP/1.1 if HTTP/2
    /// setup fails
    pub fn build_client(&self, options: &TransportOptions) -> Result<Client> {
        match self.client_builder(options, options.http2).build() {
            Ok(client) => Ok(client),
            Err(e) if options.http2 => {
                tracing::warn!(error = %e, "HTTP/2 transport setup failed, falling back to HTTP/1.1");
                self.client_builder(options, false)
                    .build()
                    .map_err(|e| Error::TransportSetup(e.to_string()))
            }
            Err(e) => Err(Error::TransportSetup(e.to_string())),
        }
    }
}

fn header_map(headers: &HashMap<String, String>) -> HeaderMap {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        match (
            HeaderName::try_from(name.as_str()),
            HeaderValue::try_from(value.as_str()),
        ) {
            (Ok(name), Ok(value)) => {
                map.insert(name, value);
            }
            _ => tracing::warn!(header = %name, "Skipping invalid header"),
        }
    }
    map
}

/// Status line without the protocol, using the phrase the server sent
///
/// hyper keeps the received phrase only when it differs from the canonical
/// one, so the canonical phrase fills in otherwise.
fn status_line(status: reqwest::StatusCode, received: Option<&ReasonPhrase>) -> String {
    let reason = match received {
        Some(phrase) => Some(String::from_utf8_lossy(phrase.as_bytes()).into_owned()),
        None => status.canonical_reason().map(str::to_string),
    };
    match reason.filter(|r| !r.is_empty()) {
        Some(reason) => format!("{} {}", status.as_u16(), reason),
        None => status.as_u16().to_string(),
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse> {
        let url = Url::parse(&request.url)?;
        let client = self.build_client(&request.options)?;
        let timeout_ms = request.options.timeout_ms();

        let mut builder = client.request(request.method, url);
        builder = match request.body {
            EncodedBody::Empty => builder,
            EncodedBody::Bytes { bytes, .. } => builder.body(bytes),
            EncodedBody::Multipart(multipart) => builder.multipart(multipart.into_form()),
        };
        // After the body: our Content-Type replaces the one `multipart` added.
        builder = builder.headers(header_map(&request.headers));

        let start = Instant::now();
        let response = builder
            .send()
            .await
            .map_err(|e| Error::send(request.url.as_str(), e, timeout_ms))?;
        let elapsed = start.elapsed();

        let status = response.status();
        let status_line = status_line(status, response.extensions().get::<ReasonPhrase>());
        let final_url = response.url().to_string();
        let headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();

        let body = response.bytes().await.map_err(|source| Error::BodyRead {
            url: final_url.clone(),
            source,
        })?;

        Ok(RawResponse {
            status: status.as_u16(),
            status_line,
            headers,
            body,
            elapsed,
            url: final_url,
        })
    }
}
