// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Shared test helpers

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::Mutex;
use reqkit::http::{EncodedBody, PartInfo};
use reqkit::{PreparedRequest, RawResponse, Result, Transport, TransportOptions};

/// What a [`RecordingTransport`] saw for one send
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<Bytes>,
    pub parts: Vec<PartInfo>,
    pub options: TransportOptions,
}

impl Recorded {
    /// Header value by case-insensitive name
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Body as UTF-8 text
    pub fn body_text(&self) -> String {
        self.body
            .as_ref()
            .map(|b| String::from_utf8_lossy(b).into_owned())
            .unwrap_or_default()
    }
}

/// Transport that records every request and answers with a canned response
#[derive(Clone)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<Recorded>>>,
    status_line: String,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self {
            sent: Arc::new(Mutex::new(Vec::new())),
            status_line: "200 OK".to_string(),
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status_line(mut self, line: &str) -> Self {
        self.status_line = line.to_string();
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = Bytes::from(body.to_string());
        self
    }

    /// Everything sent so far
    pub fn sent(&self) -> Vec<Recorded> {
        self.sent.lock().clone()
    }

    /// The most recent send
    pub fn last(&self) -> Recorded {
        self.sent
            .lock()
            .last()
            .cloned()
            .expect("nothing was sent")
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse> {
        let parts = match &request.body {
            EncodedBody::Multipart(multipart) => multipart.parts().to_vec(),
            _ => Vec::new(),
        };
        self.sent.lock().push(Recorded {
            method: request.method.to_string(),
            url: request.url.clone(),
            headers: request.headers.clone(),
            body: request.body.bytes().cloned(),
            parts,
            options: request.options.clone(),
        });

        let status = self
            .status_line
            .split(' ')
            .next()
            .and_then(|code| code.parse().ok())
            .unwrap_or(200);

        Ok(RawResponse {
            status,
            status_line: self.status_line.clone(),
            headers: self.headers.clone(),
            body: self.body.clone(),
            elapsed: Duration::from_millis(1),
            url: request.url,
        })
    }
}

/// Build a string map from pairs
pub fn map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
