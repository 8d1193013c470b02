//! HTTP Client Abstraction
//!
//! Describes the requests Playo makes (plain GETs and multipart POSTs) and
//! the responses it reads back, independent of any HTTP stack.

use async_trait::async_trait;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::time::Duration;

use crate::error::{BridgeError, Result};

/// HTTP method types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

/// A single part of a `multipart/form-data` body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartPart {
    pub name: String,
    /// Present for file parts only
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

/// Ordered `multipart/form-data` body.
///
/// Boundary and encoding are chosen by the [`HttpClient`] implementation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultipartForm {
    pub parts: Vec<MultipartPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plain text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(MultipartPart {
            name: name.into(),
            file_name: None,
            content_type: None,
            data: Bytes::from(value.into()),
        });
        self
    }

    /// Append a file field.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        content_type: Option<String>,
        data: Bytes,
    ) -> Self {
        self.parts.push(MultipartPart {
            name: name.into(),
            file_name: Some(file_name.into()),
            content_type,
            data,
        });
        self
    }

    /// First part with the given field name.
    pub fn part(&self, name: &str) -> Option<&MultipartPart> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Text of the first part with the given field name.
    pub fn text_value(&self, name: &str) -> Option<String> {
        self.part(name)
            .map(|p| String::from_utf8_lossy(&p.data).into_owned())
    }
}

/// Outgoing request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub multipart: Option<MultipartForm>,
    /// Overrides the client-wide timeout for this request
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HashMap::new(),
            multipart: None,
            timeout: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.multipart = Some(form);
        self
    }

    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }
}

/// Response as read off the wire. Non-2xx statuses are not errors at this
/// level.
#[derive(Debug)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl HttpResponse {
    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(|e| {
            BridgeError::OperationFailed(format!("JSON deserialization failed: {}", e))
        })
    }

    /// Status is 2xx.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Async HTTP client trait
///
/// Implemented over reqwest by `bridge-desktop`; tests substitute doubles
/// that answer in-process.
///
/// ```ignore
/// let request = HttpRequest::new(HttpMethod::Get, "http://localhost:3000/api/songs");
/// let songs: Vec<Song> = client.execute(request).await?.json()?;
/// ```
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Send the request once. There is no automatic retry.
    ///
    /// # Errors
    ///
    /// Fails when the connection, TLS handshake or timeout fails. An HTTP
    /// error status is returned as a normal response.
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse>;
}
