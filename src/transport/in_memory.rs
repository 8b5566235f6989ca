//! In-memory transport for testing and offline use.
//!
//! Responses are scripted per method and URL and stay in place until replaced,
//! so the same endpoint can be hit any number of times. Every request is
//! recorded in order for later inspection.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use serde_json::Value;

use super::{Method, Request, Response, Transport, TransportError};

type Scripted = Result<Response, TransportError>;

/// Scripted, recording transport.
///
/// ## Example
///
/// ```
/// use data_connector::transport::{InMemoryTransport, Method};
/// use serde_json::json;
///
/// let transport = InMemoryTransport::new()
///     .when(Method::Post, "/api/v1/cats", 201, json!({ "cats": [{ "id": 1 }] }));
/// assert!(transport.requests().is_empty());
/// ```
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    routes: Arc<Mutex<HashMap<(Method, String), Scripted>>>,
    requests: Arc<Mutex<Vec<Request>>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method url` with `status` and `body` from now on.
    pub fn when(self, method: Method, url: impl Into<String>, status: u16, body: Value) -> Self {
        self.respond(method, url, status, body);
        self
    }

    /// Non-consuming form of [`when`](Self::when), for re-scripting a shared transport.
    pub fn respond(&self, method: Method, url: impl Into<String>, status: u16, body: Value) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((method, url.into()), Ok(Response::new(status, body)));
    }

    /// Fail `method url` with `error` instead of producing a response.
    pub fn fail(&self, method: Method, url: impl Into<String>, error: TransportError) {
        self.routes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((method, url.into()), Err(error));
    }

    /// Every request received so far, oldest first.
    pub fn requests(&self) -> Vec<Request> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The most recent request, if any.
    pub fn last_request(&self) -> Option<Request> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }
}

#[async_trait]
impl Transport for InMemoryTransport {
    async fn send(&self, request: Request) -> Result<Response, TransportError> {
        let key = (request.method, request.url.clone());
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let routes = self.routes.lock().unwrap_or_else(PoisonError::into_inner);
        match routes.get(&key) {
            Some(scripted) => scripted.clone(),
            None => Err(TransportError::Unhandled {
                method: key.0,
                url: key.1,
            }),
        }
    }
}
