// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Declarative request descriptor and builder

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::{ErrorContext, Result};

/// Basic-auth username and password
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "Vec<String>")]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Create a credential pair
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Build from a `[username, password]` list; any other length is rejected
    pub fn from_pair(pair: Vec<String>) -> Option<Self> {
        match <[String; 2]>::try_from(pair) {
            Ok([username, password]) => Some(Self { username, password }),
            Err(pair) => {
                tracing::warn!(
                    elements = pair.len(),
                    "Ignoring basic auth: expected [username, password]"
                );
                None
            }
        }
    }

    /// `Authorization` header value
    pub fn header_value(&self) -> String {
        let encoded = base64::Engine::encode(
            &base64::engine::general_purpose::STANDARD,
            format!("{}:{}", self.username, self.password),
        );
        format!("Basic {}", encoded)
    }
}

impl From<Credentials> for Vec<String> {
    fn from(creds: Credentials) -> Self {
        vec![creds.username, creds.password]
    }
}

/// Deserialize an optional `[username, password]` list, dropping malformed pairs
pub(crate) fn deserialize_credentials<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<Credentials>, D::Error>
where
    D: Deserializer<'de>,
{
    let pair: Option<Vec<String>> = Option::deserialize(deserializer)?;
    Ok(pair.and_then(Credentials::from_pair))
}

/// Accept the JSON body either as ready-made text or as an inline value
fn deserialize_json_text<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<serde_json::Value> = Option::deserialize(deserializer)?;
    Ok(value.map(|value| match value {
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    }))
}

/// Declarative description of one HTTP request
///
/// Several body fields may be set at once; only one is sent, chosen in the
/// order raw, multipart (files), form, JSON. An empty `method` is inferred:
/// `GET` without a body, `POST` with one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDescriptor {
    /// HTTP method, case-insensitive, empty = inferred
    pub method: String,
    /// Absolute URL, or relative to the configured base URL
    pub url: String,
    /// Query parameters
    pub params: Option<HashMap<String, String>>,
    /// Request headers
    pub headers: Option<HashMap<String, String>>,
    /// Request cookies
    pub cookies: Option<HashMap<String, String>>,
    /// Form fields (urlencoded, or multipart alongside `files`)
    pub data: Option<HashMap<String, String>>,
    /// JSON body text, sent verbatim
    #[serde(deserialize_with = "deserialize_json_text")]
    pub json: Option<String>,
    /// Upload files: field name -> file path
    pub files: Option<HashMap<String, String>>,
    /// Raw body, sent as-is without a content type
    pub raw: Option<String>,
    /// Basic-auth credentials
    #[serde(
        deserialize_with = "deserialize_credentials",
        skip_serializing_if = "Option::is_none"
    )]
    pub auth: Option<Credentials>,
    /// Proxy URL
    pub proxy: Option<String>,
    /// Timeout in milliseconds, 0 = transport default
    pub timeout: u64,
    /// Stop at the first 3xx instead of following it; documents spell
    /// this `allow_redirects`
    #[serde(rename = "allow_redirects")]
    pub no_redirects: bool,
    /// Skip TLS certificate verification
    pub no_verify: bool,
    /// Enable HTTP/2
    #[serde(rename = "http_2")]
    pub http2: bool,
}

fn insert(map: &mut Option<HashMap<String, String>>, key: String, value: String) {
    map.get_or_insert_with(HashMap::new).insert(key, value);
}

fn extend(map: &mut Option<HashMap<String, String>>, entries: HashMap<String, String>) {
    map.get_or_insert_with(HashMap::new).extend(entries);
}

impl RequestDescriptor {
    /// Create a request with an explicit method
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            ..Default::default()
        }
    }

    /// Create a request whose method is inferred from its body
    pub fn to(url: impl Into<String>) -> Self {
        Self::new("", url)
    }

    /// Create a GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new("GET", url)
    }

    /// Create a POST request
    pub fn post(url: impl Into<String>) -> Self {
        Self::new("POST", url)
    }

    /// Parse a request from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a request from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .context(&format!("reading request {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Set the method
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = method.into();
        self
    }

    /// Set the URL
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set a query parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert(&mut self.params, name.into(), value.into());
        self
    }

    /// Set multiple query parameters
    pub fn params(mut self, params: HashMap<String, String>) -> Self {
        extend(&mut self.params, params);
        self
    }

    /// Set a header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert(&mut self.headers, name.into(), value.into());
        self
    }

    /// Set multiple headers
    pub fn headers(mut self, headers: HashMap<String, String>) -> Self {
        extend(&mut self.headers, headers);
        self
    }

    /// Set a cookie
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert(&mut self.cookies, name.into(), value.into());
        self
    }

    /// Set multiple cookies
    pub fn cookies(mut self, cookies: HashMap<String, String>) -> Self {
        extend(&mut self.cookies, cookies);
        self
    }

    /// Set a form field
    pub fn form_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        insert(&mut self.data, name.into(), value.into());
        self
    }

    /// Set form fields
    pub fn form(mut self, data: HashMap<String, String>) -> Self {
        extend(&mut self.data, data);
        self
    }

    /// Add an upload file for a multipart body
    pub fn file(mut self, field: impl Into<String>, path: impl Into<String>) -> Self {
        insert(&mut self.files, field.into(), path.into());
        self
    }

    /// Set upload files
    pub fn files(mut self, files: HashMap<String, String>) -> Self {
        extend(&mut self.files, files);
        self
    }

    /// Set the JSON body from ready-made text
    pub fn json_text(mut self, json: impl Into<String>) -> Self {
        self.json = Some(json.into());
        self
    }

    /// Serialize `data` as the JSON body
    pub fn json<T: Serialize>(mut self, data: &T) -> Result<Self> {
        self.json = Some(serde_json::to_string(data)?);
        Ok(self)
    }

    /// Set a raw body
    pub fn raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    /// Set basic auth
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Credentials::new(username, password));
        self
    }

    /// Set an `Authorization: Bearer` header
    pub fn bearer_token(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.header("Authorization", value)
    }

    /// Set the `Content-Type` header
    pub fn content_type(self, content_type: impl Into<String>) -> Self {
        self.header("Content-Type", content_type)
    }

    /// Set a proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Set timeout in milliseconds
    pub fn timeout_ms(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Disable following redirects
    pub fn no_redirects(mut self, disable: bool) -> Self {
        self.no_redirects = disable;
        self
    }

    /// Skip TLS certificate verification
    pub fn no_verify(mut self, skip: bool) -> Self {
        self.no_verify = skip;
        self
    }

    /// Enable HTTP/2
    pub fn http2(mut self, enable: bool) -> Self {
        self.http2 = enable;
        self
    }

    /// Check whether any body field is populated
    pub fn has_body(&self) -> bool {
        let text = |s: &Option<String>| s.as_deref().map_or(false, |s| !s.is_empty());
        let map = |m: &Option<HashMap<String, String>>| m.as_ref().map_or(false, |m| !m.is_empty());
        text(&self.raw) || text(&self.json) || map(&self.data) || map(&self.files)
    }

    /// Proxy URL, if set and non-empty
    pub fn proxy_str(&self) -> Option<&str> {
        self.proxy.as_deref().filter(|s| !s.is_empty())
    }
}
