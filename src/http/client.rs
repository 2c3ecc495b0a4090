// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client: runs the whole request pipeline

use std::sync::Arc;

use super::request::RequestDescriptor;
use super::resolve::{prepare, resolve};
use super::response::Response;
use super::transport::{ReqwestTransport, Transport};
use crate::config::{self, Config};
use crate::error::Result;

/// Executes request descriptors against a transport
///
/// Cloning is cheap; clones share the transport and configuration.
#[derive(Clone)]
pub struct HttpClient {
    transport: Arc<dyn Transport>,
    config: Option<Arc<Config>>,
}

impl HttpClient {
    /// Create a client that uses only the process-wide configuration
    pub fn new() -> Self {
        Self {
            transport: Arc::new(ReqwestTransport::new()),
            config: None,
        }
    }

    /// Layer `config` over the process-wide configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(Arc::new(config));
        self
    }

    /// Send through a different transport
    pub fn with_transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    /// Client-scoped configuration, if any
    pub fn config(&self) -> Option<&Config> {
        self.config.as_deref()
    }

    /// Configuration a send would use right now
    pub fn effective_config(&self) -> Config {
        let global = config::global();
        match &self.config {
            Some(config) => config.overlay(&global),
            None => global,
        }
    }

    /// Execute a request
    pub async fn execute(&self, request: &RequestDescriptor) -> Result<Response> {
        let config = self.effective_config();
        let effective = resolve(request, Some(&config));
        let prepared = prepare(&effective).await?;
        let method = prepared.method.clone();

        let raw = match self.transport.send(prepared).await {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(method = %method, url = %effective.url, error = %e, "Request failed");
                return Err(e);
            }
        };

        tracing::info!(
            method = %method,
            url = %raw.url,
            status = raw.status,
            elapsed_ms = raw.elapsed.as_millis() as u64,
            "Request completed"
        );

        Ok(Response::from_raw(raw, effective))
    }

    /// Execute multiple requests concurrently
    pub async fn execute_all(&self, requests: &[RequestDescriptor]) -> Vec<Result<Response>> {
        let futures: Vec<_> = requests.iter().map(|r| self.execute(r)).collect();
        futures::future::join_all(futures).await
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
