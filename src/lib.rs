// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # reqkit - Declarative HTTP Requests
//!
//! Describe a request as data, merge it with layered configuration, send it
//! and get back a normalized response.
//!
//! ## Features
//!
//! - Declarative requests: build in code or load from JSON
//! - Layered configuration: process-wide, session, per-request
//! - Body encodings: raw, JSON, url-encoded form, multipart, empty
//! - Sessions: cookies carried across calls
//! - Bounded background sends with per-call handles
//! - Scenario runner: suites of test cases with JSON reports
//!
//! ## Example
//!
//! ```rust,no_run
//! use reqkit::{Config, RequestDescriptor, Session};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::with_config(Config::new().base_url("https://httpbin.org"));
//!
//!     let request = RequestDescriptor::to("/post")
//!         .form_field("name", "kevin")
//!         .basic_auth("kevin", "123456");
//!     let response = session.send(&request).await?;
//!
//!     println!("{} {}", response.status_code, response.reason);
//!     println!("{:?}", response.get_str("form.name"));
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod runner;
pub mod session;

// Re-exports for convenience

// Configuration
pub use config::Config;

// Errors
pub use error::{Error, ErrorContext, Result};

// HTTP pipeline
pub use http::{
    Cookie, CookieJar, Credentials, Dispatcher, HttpClient, PendingResponse, RequestDescriptor,
    Response,
};
pub use http::{PreparedRequest, RawResponse, ReqwestTransport, Transport, TransportOptions};

// Session
pub use session::Session;

// Runner
pub use runner::{SuiteReport, TestCase, TestSuite};

/// reqkit version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
