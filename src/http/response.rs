// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::cookie::Cookie;
use super::headers::{CONTENT_TYPE, SET_COOKIE};
use super::request::RequestDescriptor;
use super::transport::RawResponse;
use crate::error::{Error, Result};

/// Separator placed between the values of a repeated header
pub const HEADER_VALUE_SEPARATOR: &str = ";";

/// Reason phrase: everything after the first space of a status line
pub fn reason_phrase(status_line: &str) -> String {
    status_line
        .trim()
        .split_once(' ')
        .map(|(_, reason)| reason.trim().to_string())
        .unwrap_or_default()
}

/// Normalized HTTP response
#[derive(Debug, Clone)]
pub struct Response {
    /// Status code
    pub status_code: u16,
    /// Reason phrase, e.g. `Not Found`
    pub reason: String,
    /// Seconds from send until headers arrived
    pub elapsed: f64,
    /// Raw body
    pub content: Bytes,
    /// Body decoded as UTF-8, invalid sequences replaced
    pub text: String,
    /// Headers, lower-case names, repeated values joined
    pub headers: HashMap<String, String>,
    /// Cookies set by this response, last one wins per name
    pub cookies: HashMap<String, String>,
    /// Final URL after redirects
    pub url: String,
    /// Effective request that produced this response
    pub request: Arc<RequestDescriptor>,
    set_cookie_headers: Vec<String>,
}

impl Response {
    /// Normalize a raw transport response
    pub fn from_raw(raw: RawResponse, request: RequestDescriptor) -> Self {
        let mut headers: HashMap<String, String> = HashMap::new();
        let mut cookies = HashMap::new();
        let mut set_cookie_headers = Vec::new();

        for (name, value) in &raw.headers {
            let name = name.to_ascii_lowercase();
            if name == SET_COOKIE {
                if let Some(cookie) = Cookie::parse(value) {
                    cookies.insert(cookie.name, cookie.value);
                }
                set_cookie_headers.push(value.clone());
            }
            headers
                .entry(name)
                .and_modify(|joined| {
                    joined.push_str(HEADER_VALUE_SEPARATOR);
                    joined.push_str(value);
                })
                .or_insert_with(|| value.clone());
        }

        Self {
            status_code: raw.status,
            reason: reason_phrase(&raw.status_line),
            elapsed: raw.elapsed.as_secs_f64(),
            text: String::from_utf8_lossy(&raw.body).into_owned(),
            content: raw.body,
            headers,
            cookies,
            url: raw.url,
            request: Arc::new(request),
            set_cookie_headers,
        }
    }

    /// Check if status is success (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    /// Check if status is redirect (3xx)
    pub fn is_redirect(&self) -> bool {
        (300..400).contains(&self.status_code)
    }

    /// Check if status is client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code)
    }

    /// Check if status is server error (5xx)
    pub fn is_server_error(&self) -> bool {
        (500..600).contains(&self.status_code)
    }

    /// Get a header value, case-insensitive
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header(CONTENT_TYPE)
    }

    /// Parse every `Set-Cookie` header with its attributes
    pub fn set_cookies(&self) -> Vec<Cookie> {
        self.set_cookie_headers
            .iter()
            .filter_map(|header| Cookie::parse(header))
            .collect()
    }

    /// Get body length
    pub fn body_len(&self) -> usize {
        self.content.len()
    }

    /// Deserialize the body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.content).map_err(Error::from)
    }

    /// Body as a JSON object; empty if the body is not one
    pub fn json_object(&self) -> Map<String, Value> {
        self.json().unwrap_or_else(|e| {
            tracing::warn!(url = %self.url, error = %e, "Response body is not a JSON object");
            Map::new()
        })
    }

    /// Body as a JSON array of objects; empty if the body is not one
    pub fn json_array(&self) -> Vec<Map<String, Value>> {
        self.json().unwrap_or_else(|e| {
            tracing::warn!(url = %self.url, error = %e, "Response body is not a JSON array of objects");
            Vec::new()
        })
    }

    /// Look up a dotted path such as `json.name` or `items.0.id` in the JSON body
    pub fn get(&self, path: &str) -> Option<Value> {
        let root: Value = match self.json() {
            Ok(root) => root,
            Err(e) => {
                tracing::warn!(url = %self.url, error = %e, "Response body is not JSON");
                return None;
            }
        };

        let mut current = &root;
        for segment in path.split('.').filter(|s| !s.is_empty()) {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current.clone())
    }

    /// Like [`get`](Self::get), rendering strings without quotes
    pub fn get_str(&self, path: &str) -> Option<String> {
        self.get(path).map(|value| match value {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }
}
