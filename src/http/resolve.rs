// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Configuration merge, method defaulting and query assembly

use std::collections::HashMap;
use std::time::Duration;

use lazy_static::lazy_static;
use regex::Regex;
use reqwest::Method;
use url::Url;

use super::body::BodySpec;
use super::headers::{AUTHORIZATION, AUTHORIZATION_NAME, COOKIE, COOKIE_NAME};
use super::request::RequestDescriptor;
use super::transport::{PreparedRequest, TransportOptions};
use crate::config::{fill_missing, fill_missing_headers, Config};
use crate::error::{Error, Result};

lazy_static! {
    static ref SCHEME_PREFIX: Regex = Regex::new(r"^[A-Za-z][A-Za-z0-9+.\-]*://").unwrap();
}

/// Check whether `url` starts with a scheme such as `https://`
pub fn looks_absolute(url: &str) -> bool {
    SCHEME_PREFIX.is_match(url)
}

/// Merge `config` into `request`, producing the effective request
///
/// Request values win everywhere except the proxy: a configured proxy
/// replaces the request's proxy. HTTP/2 is enabled if either side enables
/// it. The inputs are not modified.
pub fn resolve(request: &RequestDescriptor, config: Option<&Config>) -> RequestDescriptor {
    let mut effective = request.clone();
    let Some(config) = config else {
        return effective;
    };

    if let Some(base_url) = config.base_url_str() {
        if !looks_absolute(&effective.url) {
            effective.url = format!("{}{}", base_url, effective.url);
        }
    }

    effective.params = fill_missing(effective.params.as_ref(), config.params.as_ref());
    effective.headers = fill_missing_headers(effective.headers.as_ref(), config.headers.as_ref());
    effective.cookies = fill_missing(effective.cookies.as_ref(), config.cookies.as_ref());

    if effective.timeout == 0 {
        effective.timeout = config.timeout;
    }
    if effective.auth.is_none() {
        effective.auth = config.auth.clone();
    }
    effective.http2 = effective.http2 || config.http2;

    // Configured proxy always wins, unlike every other field.
    if let Some(proxy) = config.proxy_str() {
        effective.proxy = Some(proxy.to_string());
    }

    effective
}

/// Effective method: the given one upper-cased, else `GET` or `POST`
pub fn resolve_method(request: &RequestDescriptor) -> String {
    let method = request.method.trim();
    if method.is_empty() {
        if request.has_body() {
            "POST".to_string()
        } else {
            "GET".to_string()
        }
    } else {
        method.to_ascii_uppercase()
    }
}

/// Set each query parameter on `url`
///
/// Existing pairs for other keys are kept; a parameter replaces every
/// existing value of its key. An unparseable URL is returned unchanged.
pub fn assemble_url(url: &str, params: Option<&HashMap<String, String>>) -> String {
    let Some(params) = params.filter(|p| !p.is_empty()) else {
        return url.to_string();
    };

    let mut parsed = match Url::parse(url) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::warn!(url = %url, error = %e, "Cannot parse URL, sending without query parameters");
            return url.to_string();
        }
    };

    let kept: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !params.contains_key(key.as_ref()))
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut keys: Vec<&String> = params.keys().collect();
    keys.sort();

    {
        let mut query = parsed.query_pairs_mut();
        query.clear();
        query.extend_pairs(kept);
        for key in keys {
            query.append_pair(key, &params[key]);
        }
    }

    parsed.to_string()
}

/// `Cookie` header value for `cookies`, appended to any caller-set value
fn cookie_header(existing: Option<&str>, cookies: &HashMap<String, String>) -> String {
    let mut pairs: Vec<(&String, &String)> = cookies.iter().collect();
    pairs.sort();

    let joined = pairs
        .iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join("; ");

    match existing.filter(|s| !s.is_empty()) {
        Some(existing) => format!("{}; {}", existing, joined),
        None => joined,
    }
}

fn take_header(headers: &mut HashMap<String, String>, name: &str) -> Option<String> {
    let key = headers.keys().find(|k| k.eq_ignore_ascii_case(name))?.clone();
    headers.remove(&key)
}

/// Turn an effective request into a wire request
pub async fn prepare(effective: &RequestDescriptor) -> Result<PreparedRequest> {
    let method_name = resolve_method(effective);
    let method = Method::from_bytes(method_name.as_bytes())
        .map_err(|_| Error::InvalidMethod(method_name.clone()))?;

    let url = assemble_url(&effective.url, effective.params.as_ref());

    let spec = BodySpec::from_descriptor(effective);
    let kind = spec.kind();
    let body = spec.encode().await?;

    let mut headers = effective.headers.clone().unwrap_or_default();
    body.apply_content_type(&mut headers);

    if let Some(cookies) = effective.cookies.as_ref().filter(|c| !c.is_empty()) {
        let existing = take_header(&mut headers, COOKIE);
        headers.insert(
            COOKIE_NAME.to_string(),
            cookie_header(existing.as_deref(), cookies),
        );
    }

    if let Some(auth) = &effective.auth {
        take_header(&mut headers, AUTHORIZATION);
        headers.insert(AUTHORIZATION_NAME.to_string(), auth.header_value());
    }

    let options = TransportOptions {
        proxy: effective.proxy_str().map(str::to_string),
        timeout: (effective.timeout > 0).then(|| Duration::from_millis(effective.timeout)),
        follow_redirects: !effective.no_redirects,
        accept_invalid_certs: effective.no_verify,
        http2: effective.http2,
    };

    tracing::debug!(
        method = %method,
        url = %url,
        body = kind,
        headers = headers.len(),
        "Prepared request"
    );

    Ok(PreparedRequest {
        method,
        url,
        headers,
        body,
        options,
    })
}
