//! HTTP transport backed by `reqwest`.
//!
//! Requires the `http` feature. Collection URLs are usually relative
//! (`/api/v1/cats`); set an origin to turn them into absolute URLs.
//!
//! ```ignore
//! use data_connector::{transport::HttpTransport, Store};
//!
//! let store = Store::builder()
//!     .transport(HttpTransport::new().with_origin("http://127.0.0.1:3000"))
//!     .build();
//! ```

use async_trait::async_trait;
use serde_json::Value;

use super::{Method, Request, Response, Transport, TransportError};

#[derive(Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
    origin: Option<String>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reuse an already configured client (timeouts, default headers).
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            origin: None,
        }
    }

    /// Prefix prepended to every URL that does not carry a scheme.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = Some(origin.into().trim_end_matches('/').to_string());
        self
    }

    fn absolute(&self, url: &str) -> String {
        match &self.origin {
            Some(origin) if !url.contains("://") => {
                if url.starts_with('/') {
                    format!("{}{}", origin, url)
                } else {
                    format!("{}/{}", origin, url)
                }
            }
            _ => url.to_string(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let url = self.absolute(&request.url);
        let builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        let builder = match &request.body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let status = response.status().as_u16();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).map_err(|e| TransportError::Decode(e.to_string()))?
        };

        Ok(Response::new(status, body))
    }
}
