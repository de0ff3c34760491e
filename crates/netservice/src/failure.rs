//! The closed error taxonomy returned by every public operation.

use crate::request::HttpHeader;
use bytes::Bytes;
use std::fmt;

/// Coarse classification of transport-level failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// Could not establish a connection.
    Connect,
    /// The exchange exceeded its deadline.
    Timeout,
    /// Redirect policy rejected the response.
    Redirect,
    /// Sending the request failed.
    Request,
    /// Reading the response body failed.
    Body,
    /// The request could not be assembled.
    Builder,
    /// Anything the transport could not classify.
    Other,
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Connect => "connect",
            Self::Timeout => "timeout",
            Self::Redirect => "redirect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Builder => "builder",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// HTTP status code classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Informational,
    Success,
    Redirection,
    ClientError,
    ServerError,
    Unrecognized,
}

impl StatusClass {
    /// Classify a raw status code.
    pub fn of(status: u16) -> Self {
        match status {
            100..=199 => Self::Informational,
            200..=299 => Self::Success,
            300..=399 => Self::Redirection,
            400..=499 => Self::ClientError,
            500..=599 => Self::ServerError,
            _ => Self::Unrecognized,
        }
    }
}

/// Every failure a network call can produce.
#[derive(Debug, Clone, PartialEq, Eq, Hash, thiserror::Error)]
pub enum Failure {
    /// The response could not be interpreted as an HTTP response.
    #[error("response could not be interpreted as an HTTP response")]
    UrlResponseInvalid,

    /// A response arrived with a status outside the success range.
    #[error("HTTP response error: status {status}")]
    HttpResponse {
        status: u16,
        headers: Vec<HttpHeader>,
        body: Bytes,
    },

    /// The transport failed before a response was received.
    #[error("transport error ({kind}): {message}")]
    Transport {
        kind: TransportErrorKind,
        message: String,
    },

    /// Codec failures and anything else; keeps the original message.
    #[error("{0}")]
    Unknown(String),
}

impl Failure {
    pub fn transport(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self::Transport {
            kind,
            message: message.into(),
        }
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::Unknown(message.into())
    }

    /// HTTP status, if this failure carries a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpResponse { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn status_class(&self) -> Option<StatusClass> {
        self.status().map(StatusClass::of)
    }

    /// True for a 4xx response.
    pub fn is_client_error(&self) -> bool {
        self.status_class() == Some(StatusClass::ClientError)
    }

    /// True for a 5xx response.
    pub fn is_server_error(&self) -> bool {
        self.status_class() == Some(StatusClass::ServerError)
    }

    /// Response body of an [`Failure::HttpResponse`].
    pub fn body(&self) -> Option<&Bytes> {
        match self {
            Self::HttpResponse { body, .. } => Some(body),
            _ => None,
        }
    }
}
