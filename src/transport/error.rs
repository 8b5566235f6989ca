use std::fmt;

use super::Method;

/// Failure of a transport round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The server answered with a non-2xx status.
    Status {
        status: u16,
        body: serde_json::Value,
    },
    /// The request never produced a response (connect, timeout, TLS).
    Network(String),
    /// The response body was not valid JSON.
    Decode(String),
    /// No response was scripted for this request (in-memory transport).
    Unhandled { method: Method, url: String },
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::Status { status, body } => {
                write!(f, "request failed with status {}: {}", status, body)
            }
            TransportError::Network(message) => write!(f, "network error: {}", message),
            TransportError::Decode(message) => write!(f, "invalid response body: {}", message),
            TransportError::Unhandled { method, url } => {
                write!(f, "no response scripted for {} {}", method, url)
            }
        }
    }
}

impl std::error::Error for TransportError {}
