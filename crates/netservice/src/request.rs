//! HTTP request types.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// Common HTTP header names and values.
pub mod headers {
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const ACCEPT: &str = "Accept";
    pub const AUTHORIZATION: &str = "Authorization";
    pub const CONTENT_TYPE_JSON: &str = "application/json";
}

/// Methods supported by [`crate::NetworkService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A single header. Header lists keep their order and may repeat a name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HttpHeader {
    pub name: String,
    pub value: String,
}

impl HttpHeader {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    pub fn content_type(value: impl Into<String>) -> Self {
        Self::new(headers::CONTENT_TYPE, value)
    }

    pub fn accept(value: impl Into<String>) -> Self {
        Self::new(headers::ACCEPT, value)
    }

    /// `Authorization: Bearer <token>`.
    pub fn authorization_bearer(token: impl AsRef<str>) -> Self {
        Self::new(headers::AUTHORIZATION, format!("Bearer {}", token.as_ref()))
    }

    pub fn content_type_json() -> Self {
        Self::content_type(headers::CONTENT_TYPE_JSON)
    }

    pub fn accept_json() -> Self {
        Self::accept(headers::CONTENT_TYPE_JSON)
    }
}

/// An outgoing request, opaque to everything but the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: HttpMethod,
    pub url: Url,
    pub headers: Vec<HttpHeader>,
    pub body: Option<Bytes>,
}

impl Request {
    /// Assemble a request.
    pub fn build(
        url: Url,
        body: Option<Bytes>,
        headers: Vec<HttpHeader>,
        method: HttpMethod,
    ) -> Self {
        Self {
            method,
            url,
            headers,
            body,
        }
    }

    /// First value for `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }

    /// Every value for `name` in insertion order.
    pub fn header_values<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.headers
            .iter()
            .filter(move |h| h.name.eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str())
    }
}
