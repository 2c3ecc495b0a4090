// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Bounded asynchronous sends
//!
//! Each dispatched request runs on its own tokio task and hands back a
//! [`PendingResponse`] that resolves to exactly one result. A semaphore caps
//! how many sends are in flight; `dispatch` waits for a slot instead of
//! queueing without bound.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use super::client::HttpClient;
use super::request::RequestDescriptor;
use super::response::Response;
use crate::error::{Error, Result};

/// Default number of concurrent in-flight sends
pub const DEFAULT_DISPATCH_CAPACITY: usize = 10;

/// Launches sends in the background with a concurrency bound
#[derive(Debug, Clone)]
pub struct Dispatcher {
    client: HttpClient,
    capacity: usize,
    semaphore: Arc<Semaphore>,
}

/// Handle to one in-flight send
#[derive(Debug)]
pub struct PendingResponse {
    handle: JoinHandle<Result<Response>>,
}

impl PendingResponse {
    /// Wait for the send to finish
    pub async fn wait(self) -> Result<Response> {
        match self.handle.await {
            Ok(result) => result,
            Err(e) if e.is_cancelled() => Err(Error::dispatch("send was cancelled")),
            Err(e) => Err(Error::dispatch(format!("send task panicked: {}", e))),
        }
    }

    /// Check whether the send has completed
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Cancel the send
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl Dispatcher {
    /// Create a dispatcher with the default capacity
    pub fn new(client: HttpClient) -> Self {
        Self::with_capacity(client, DEFAULT_DISPATCH_CAPACITY)
    }

    /// Create a dispatcher allowing `capacity` concurrent sends (at least 1)
    pub fn with_capacity(client: HttpClient, capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            client,
            capacity,
            semaphore: Arc::new(Semaphore::new(capacity)),
        }
    }

    /// Start a send, waiting for a free slot first
    pub async fn dispatch(&self, request: RequestDescriptor) -> Result<PendingResponse> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| Error::dispatch("Dispatcher semaphore closed"))?;

        let client = self.client.clone();
        let handle = tokio::spawn(async move {
            let _permit = permit;
            client.execute(&request).await
        });

        Ok(PendingResponse { handle })
    }

    /// Start a send only if a slot is free right now
    pub fn try_dispatch(&self, request: RequestDescriptor) -> Result<PendingResponse> {
        let permit = self.semaphore.clone().try_acquire_owned().map_err(|_| {
            Error::dispatch(format!("all {} dispatch slots are busy", self.capacity))
        })?;

        let client = self.client.clone();
        let handle = tokio::spawn(async move {
            let _permit = permit;
            client.execute(&request).await
        });

        Ok(PendingResponse { handle })
    }

    /// Send a batch concurrently within the bound, results in input order
    pub async fn execute_all(&self, requests: Vec<RequestDescriptor>) -> Vec<Result<Response>> {
        let mut pending = Vec::with_capacity(requests.len());
        for request in requests {
            pending.push(self.dispatch(request).await);
        }

        let futures = pending.into_iter().map(|p| async move {
            match p {
                Ok(p) => p.wait().await,
                Err(e) => Err(e),
            }
        });
        futures::future::join_all(futures).await
    }

    /// Maximum concurrent sends
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots free right now
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}
