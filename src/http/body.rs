// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request body selection and encoding

use std::collections::HashMap;
use std::path::Path;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};

use super::headers::{CONTENT_TYPE, CONTENT_TYPE_NAME};
use super::request::RequestDescriptor;
use super::{FORM_URLENCODED, JSON};
use crate::error::{Error, Result};

/// The one body representation chosen for a send
#[derive(Debug, Clone, PartialEq)]
pub enum BodySpec {
    /// Raw text, no implicit content type
    Raw(String),
    /// Form fields plus upload files (field name -> path)
    Multipart {
        fields: HashMap<String, String>,
        files: HashMap<String, String>,
    },
    /// `application/x-www-form-urlencoded` fields
    Form(HashMap<String, String>),
    /// JSON text, sent verbatim
    Json(String),
    /// No body
    Empty,
}

impl BodySpec {
    /// Pick the body: raw, then multipart, then form, then JSON
    pub fn from_descriptor(request: &RequestDescriptor) -> Self {
        let non_empty_map = |m: &Option<HashMap<String, String>>| {
            m.as_ref().filter(|m| !m.is_empty()).cloned()
        };

        if let Some(raw) = request.raw.as_ref().filter(|s| !s.is_empty()) {
            return BodySpec::Raw(raw.clone());
        }
        if let Some(files) = non_empty_map(&request.files) {
            return BodySpec::Multipart {
                fields: non_empty_map(&request.data).unwrap_or_default(),
                files,
            };
        }
        if let Some(fields) = non_empty_map(&request.data) {
            return BodySpec::Form(fields);
        }
        if let Some(json) = request.json.as_ref().filter(|s| !s.is_empty()) {
            return BodySpec::Json(json.clone());
        }
        BodySpec::Empty
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            BodySpec::Raw(_) => "raw",
            BodySpec::Multipart { .. } => "multipart",
            BodySpec::Form(_) => "form",
            BodySpec::Json(_) => "json",
            BodySpec::Empty => "empty",
        }
    }

    /// Produce the wire body
    ///
    /// Upload files are read fully into memory here, so no handle outlives
    /// this call. An unreadable file fails the whole encode.
    pub async fn encode(self) -> Result<EncodedBody> {
        match self {
            BodySpec::Raw(raw) => Ok(EncodedBody::Bytes {
                bytes: Bytes::from(raw),
                content_type: None,
            }),
            BodySpec::Multipart { fields, files } => {
                encode_multipart(fields, files).await.map(EncodedBody::Multipart)
            }
            BodySpec::Form(fields) => Ok(EncodedBody::Bytes {
                bytes: Bytes::from(encode_form(&fields)),
                content_type: Some(FORM_URLENCODED.to_string()),
            }),
            BodySpec::Json(json) => Ok(EncodedBody::Bytes {
                bytes: Bytes::from(json),
                content_type: Some(JSON.to_string()),
            }),
            BodySpec::Empty => Ok(EncodedBody::Empty),
        }
    }
}

/// Percent-encode form fields, sorted by key
pub fn encode_form(fields: &HashMap<String, String>) -> String {
    let mut keys: Vec<&String> = fields.keys().collect();
    keys.sort();

    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for key in keys {
        serializer.append_pair(key, &fields[key]);
    }
    serializer.finish()
}

/// Name and optional file name of one multipart part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartInfo {
    pub name: String,
    pub file_name: Option<String>,
}

/// A multipart form ready to stream
#[derive(Debug)]
pub struct MultipartBody {
    form: Form,
    parts: Vec<PartInfo>,
}

impl MultipartBody {
    /// `Content-Type` value carrying the boundary
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.form.boundary())
    }

    /// Parts in the order they were added
    pub fn parts(&self) -> &[PartInfo] {
        &self.parts
    }

    /// Take the form for sending
    pub fn into_form(self) -> Form {
        self.form
    }
}

async fn encode_multipart(
    fields: HashMap<String, String>,
    files: HashMap<String, String>,
) -> Result<MultipartBody> {
    let mut form = Form::new();
    let mut parts = Vec::with_capacity(fields.len() + files.len());

    let mut fields: Vec<(String, String)> = fields.into_iter().collect();
    fields.sort();
    for (name, value) in fields {
        parts.push(PartInfo {
            name: name.clone(),
            file_name: None,
        });
        form = form.text(name, value);
    }

    let mut files: Vec<(String, String)> = files.into_iter().collect();
    files.sort();
    for (name, path) in files {
        let content = tokio::fs::read(&path).await.map_err(|source| Error::Upload {
            field: name.clone(),
            path: path.clone().into(),
            source,
        })?;
        let file_name = Path::new(&path)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.clone());

        tracing::debug!(field = %name, file = %file_name, bytes = content.len(), "Adding upload part");

        let part = Part::bytes(content)
            .file_name(file_name.clone())
            .mime_str("application/octet-stream")
            .map_err(|e| Error::other(format!("Invalid part mime type: {}", e)))?;
        parts.push(PartInfo {
            name: name.clone(),
            file_name: Some(file_name),
        });
        form = form.part(name, part);
    }

    Ok(MultipartBody { form, parts })
}

/// Encoded request body
#[derive(Debug)]
pub enum EncodedBody {
    /// No body
    Empty,
    /// In-memory body with its implied content type, if any
    Bytes {
        bytes: Bytes,
        content_type: Option<String>,
    },
    /// Streaming multipart form
    Multipart(MultipartBody),
}

impl EncodedBody {
    /// Content type implied by this body
    pub fn content_type(&self) -> Option<String> {
        match self {
            EncodedBody::Empty => None,
            EncodedBody::Bytes { content_type, .. } => content_type.clone(),
            EncodedBody::Multipart(multipart) => Some(multipart.content_type()),
        }
    }

    /// Write the implied content type into `headers`, replacing any caller value
    pub fn apply_content_type(&self, headers: &mut HashMap<String, String>) {
        if let Some(content_type) = self.content_type() {
            headers.retain(|name, _| !name.eq_ignore_ascii_case(CONTENT_TYPE));
            headers.insert(CONTENT_TYPE_NAME.to_string(), content_type);
        }
    }

    /// In-memory bytes, if this body has them
    pub fn bytes(&self) -> Option<&Bytes> {
        match self {
            EncodedBody::Bytes { bytes, .. } => Some(bytes),
            _ => None,
        }
    }

    /// Check for an empty body
    pub fn is_empty(&self) -> bool {
        matches!(self, EncodedBody::Empty)
    }
}
