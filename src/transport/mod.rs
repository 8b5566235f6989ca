//! Transport - the only seam through which a store talks to a server.
//!
//! Collections and items build a [`Request`] against their REST endpoint and
//! hand it to a [`Transport`]. The transport only moves bytes; deciding whether
//! a status is a success and merging the body back into the store happens in
//! the collection layer, once, for every implementation.
//!
//! ## Wire shape
//!
//! | operation   | request                         | body                       |
//! |-------------|---------------------------------|----------------------------|
//! | `fetch_all` | `GET <url>`                     |                            |
//! | `fetch`     | `GET <url>/<id>`                |                            |
//! | `create`    | `POST <url>`                    | `{ <identifier>: [attrs] }` |
//! | `update`    | `PUT <url>/<id>`                | `{ <identifier>: [attrs] }` |
//! | `destroy`   | `DELETE <url>/<id>`             |                            |
//!
//! Every response that is merged is expected to look like
//! `{ <identifier>: [attrs, ...] }`.

mod error;
#[cfg(feature = "http")]
mod http;
mod in_memory;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use error::TransportError;
#[cfg(feature = "http")]
pub use http::HttpTransport;
pub use in_memory::InMemoryTransport;

/// HTTP verb of a transport request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An outbound request against a collection or item endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub method: Method,
    pub url: String,
    #[serde(default)]
    pub body: Option<Value>,
}

impl Request {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            body: Some(body),
        }
    }

    pub fn put(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            url: url.into(),
            body: Some(body),
        }
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            url: url.into(),
            body: None,
        }
    }
}

/// The status and decoded JSON body of a completed round trip.
///
/// An empty body decodes to `Value::Null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub status: u16,
    #[serde(default)]
    pub body: Value,
}

impl Response {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx response into `TransportError::Status`.
    pub fn error_for_status(self) -> Result<Self, TransportError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(TransportError::Status {
                status: self.status,
                body: self.body,
            })
        }
    }
}

/// Moves a [`Request`] to a server and returns what came back.
///
/// Implementations return `Ok` for any response that arrived, whatever its
/// status, and `Err` only when no response could be produced.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: Request) -> Result<Response, TransportError>;
}
