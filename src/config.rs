// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Configuration layers
//!
//! Three scopes feed a send: the process-wide defaults behind [`global`],
//! the client or session [`Config`], and the values on the request itself.
//! Every field is optional; an unset field never overrides anything.

use std::collections::HashMap;
use std::path::Path;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorContext, Result};
use crate::http::request::{deserialize_credentials, Credentials};

lazy_static! {
    static ref GLOBAL_CONFIG: RwLock<Config> = RwLock::new(Config::default());
}

/// Default values applied to requests
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Prefix for relative request URLs
    pub base_url: Option<String>,
    /// Default query parameters
    pub params: Option<HashMap<String, String>>,
    /// Default headers
    pub headers: Option<HashMap<String, String>>,
    /// Default cookies
    pub cookies: Option<HashMap<String, String>>,
    /// Default basic-auth credentials
    #[serde(
        deserialize_with = "deserialize_credentials",
        skip_serializing_if = "Option::is_none"
    )]
    pub auth: Option<Credentials>,
    /// Default timeout in milliseconds, 0 = unset
    pub timeout: u64,
    /// Enable HTTP/2 for every request
    #[serde(rename = "http_2")]
    pub http2: bool,
    /// Default proxy URL, e.g. `http://127.0.0.1:8888`
    pub proxy: Option<String>,
}

impl Config {
    /// Create an empty config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Add a default query parameter
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Add a default header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Add a default cookie
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies
            .get_or_insert_with(HashMap::new)
            .insert(name.into(), value.into());
        self
    }

    /// Set default basic auth
    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(Credentials::new(username, password));
        self
    }

    /// Set default timeout in milliseconds
    pub fn timeout_ms(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enable HTTP/2 by default
    pub fn http2(mut self, enable: bool) -> Self {
        self.http2 = enable;
        self
    }

    /// Set default proxy
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Parse a config from a JSON document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a config from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .context(&format!("reading config {}", path.display()))?;
        Self::from_json(&json)
    }

    /// Base URL, if set and non-empty
    pub fn base_url_str(&self) -> Option<&str> {
        self.base_url.as_deref().filter(|s| !s.is_empty())
    }

    /// Proxy URL, if set and non-empty
    pub fn proxy_str(&self) -> Option<&str> {
        self.proxy.as_deref().filter(|s| !s.is_empty())
    }

    /// Check whether no field is set
    pub fn is_empty(&self) -> bool {
        *self == Config::default()
    }

    /// Layer this config over `fallback`
    ///
    /// Map entries and scalar options from `self` win; anything unset here is
    /// taken from `fallback`. Header names compare case-insensitively.
    /// HTTP/2 is enabled if either side enables it.
    pub fn overlay(&self, fallback: &Config) -> Config {
        Config {
            base_url: self
                .base_url_str()
                .or_else(|| fallback.base_url_str())
                .map(str::to_string),
            params: fill_missing(self.params.as_ref(), fallback.params.as_ref()),
            headers: fill_missing_headers(self.headers.as_ref(), fallback.headers.as_ref()),
            cookies: fill_missing(self.cookies.as_ref(), fallback.cookies.as_ref()),
            auth: self.auth.clone().or_else(|| fallback.auth.clone()),
            timeout: if self.timeout > 0 {
                self.timeout
            } else {
                fallback.timeout
            },
            http2: self.http2 || fallback.http2,
            proxy: self
                .proxy_str()
                .or_else(|| fallback.proxy_str())
                .map(str::to_string),
        }
    }
}

/// Fill the keys missing from `primary` with entries from `defaults`
///
/// An absent `primary` adopts `defaults` wholesale; keys already in
/// `primary` are never overwritten.
pub(crate) fn fill_missing(
    primary: Option<&HashMap<String, String>>,
    defaults: Option<&HashMap<String, String>>,
) -> Option<HashMap<String, String>> {
    match (primary, defaults) {
        (Some(primary), Some(defaults)) => {
            let mut merged = primary.clone();
            for (key, value) in defaults {
                merged.entry(key.clone()).or_insert_with(|| value.clone());
            }
            Some(merged)
        }
        (Some(primary), None) => Some(primary.clone()),
        (None, Some(defaults)) => Some(defaults.clone()),
        (None, None) => None,
    }
}

/// Like [`fill_missing`], but a primary header shadows any default header
/// with the same name in a different case
pub(crate) fn fill_missing_headers(
    primary: Option<&HashMap<String, String>>,
    defaults: Option<&HashMap<String, String>>,
) -> Option<HashMap<String, String>> {
    match (primary, defaults) {
        (Some(primary), Some(defaults)) => {
            let mut merged = primary.clone();
            for (name, value) in defaults {
                if !primary.keys().any(|k| k.eq_ignore_ascii_case(name)) {
                    merged.insert(name.clone(), value.clone());
                }
            }
            Some(merged)
        }
        (primary, defaults) => fill_missing(primary, defaults),
    }
}

/// Snapshot of the process-wide default config
pub fn global() -> Config {
    GLOBAL_CONFIG.read().clone()
}

/// Replace the process-wide default config
pub fn set_global(config: Config) {
    *GLOBAL_CONFIG.write() = config;
}

/// Modify the process-wide default config in place
pub fn update_global<F: FnOnce(&mut Config)>(f: F) {
    f(&mut GLOBAL_CONFIG.write());
}

/// Restore the process-wide default config to empty
pub fn reset_global() {
    set_global(Config::default());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_fill_missing_keeps_primary() {
        let merged = fill_missing(
            Some(&map(&[("a", "request")])),
            Some(&map(&[("a", "config"), ("b", "config")])),
        )
        .unwrap();
        assert_eq!(merged, map(&[("a", "request"), ("b", "config")]));
    }

    #[test]
    fn test_fill_missing_adopts_defaults() {
        let defaults = map(&[("token", "abc")]);
        assert_eq!(fill_missing(None, Some(&defaults)), Some(defaults));
        assert_eq!(fill_missing(None, None), None);
    }

    #[test]
    fn test_overlay() {
        let session = Config::new()
            .header("x-scope", "session")
            .proxy("http://session:8080");
        let global = Config::new()
            .base_url("https://example.org")
            .header("x-scope", "global")
            .header("x-global", "1")
            .timeout_ms(10_000)
            .http2(true)
            .proxy("http://global:8080");

        let merged = session.overlay(&global);
        assert_eq!(merged.base_url.as_deref(), Some("https://example.org"));
        assert_eq!(
            merged.headers,
            Some(map(&[("x-scope", "session"), ("x-global", "1")]))
        );
        assert_eq!(merged.timeout, 10_000);
        assert!(merged.http2);
        assert_eq!(merged.proxy.as_deref(), Some("http://session:8080"));
    }

    #[test]
    fn test_overlay_headers_ignore_case() {
        let session = Config::new().header("X-Scope", "session");
        let global = Config::new()
            .header("x-scope", "global")
            .header("Accept", "*/*");

        let merged = session.overlay(&global);
        assert_eq!(
            merged.headers,
            Some(map(&[("X-Scope", "session"), ("Accept", "*/*")]))
        );
    }

    #[test]
    fn test_config_from_json() {
        let config = Config::from_json(
            r#"{
                "base_url": "https://httpbin.org",
                "headers": {"token": "abc123"},
                "auth": ["kevin", "123456"],
                "timeout": 3000,
                "http_2": true
            }"#,
        )
        .unwrap();

        assert_eq!(config.base_url_str(), Some("https://httpbin.org"));
        assert_eq!(config.timeout, 3000);
        assert!(config.http2);
        assert_eq!(config.auth, Some(Credentials::new("kevin", "123456")));
        assert!(config.proxy.is_none());
    }

    #[test]
    fn test_malformed_auth_is_ignored() {
        let config = Config::from_json(r#"{"auth": ["only-user"]}"#).unwrap();
        assert!(config.auth.is_none());
    }

    #[test]
    fn test_is_empty() {
        assert!(Config::new().is_empty());
        assert!(!Config::new().timeout_ms(1).is_empty());
        assert!(!Config::new().param("a", "1").is_empty());
    }
}
