// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request pipeline
//!
//! A [`RequestDescriptor`] is merged with configuration ([`resolve`]),
//! encoded ([`body`]), sent through a [`Transport`] and normalized into a
//! [`Response`]. [`HttpClient`] runs the whole pipeline.

pub mod body;
mod client;
mod cookie;
mod dispatch;
pub mod request;
pub mod resolve;
mod response;
pub mod transport;

pub use body::{BodySpec, EncodedBody, MultipartBody, PartInfo};
pub use client::HttpClient;
pub use cookie::{Cookie, CookieJar};
pub use dispatch::{Dispatcher, PendingResponse, DEFAULT_DISPATCH_CAPACITY};
pub use request::{Credentials, RequestDescriptor};
pub use resolve::{assemble_url, prepare, resolve, resolve_method};
pub use response::{reason_phrase, Response, HEADER_VALUE_SEPARATOR};
pub use transport::{PreparedRequest, RawResponse, ReqwestTransport, Transport, TransportOptions};

/// `application/x-www-form-urlencoded`
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// `application/json`
pub const JSON: &str = "application/json";

/// Common HTTP headers
pub mod headers {
    pub const AUTHORIZATION: &str = "authorization";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const SET_COOKIE: &str = "set-cookie";

    /// Canonical spelling used when a header is written into a request map
    pub const AUTHORIZATION_NAME: &str = "Authorization";
    pub const CONTENT_TYPE_NAME: &str = "Content-Type";
    pub const COOKIE_NAME: &str = "Cookie";
}
