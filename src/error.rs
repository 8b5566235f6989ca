use std::fmt;

use crate::transport::TransportError;

#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    DuplicateCollection(String),
    UnknownCollection(String),
    UnknownRelationship {
        collection: String,
        name: String,
    },
    NotAnObject,
    MissingId {
        collection: String,
    },
    MalformedEnvelope {
        identifier: String,
    },
    Serde(String),
    LockPoisoned(&'static str),
    Transport(TransportError),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DuplicateCollection(identifier) => {
                write!(f, "{} collection already exists", identifier)
            }
            StoreError::UnknownCollection(identifier) => {
                write!(f, "no collection registered as {}", identifier)
            }
            StoreError::UnknownRelationship { collection, name } => write!(
                f,
                "collection {} declares no relationship named {}",
                collection, name
            ),
            StoreError::NotAnObject => write!(f, "item content must be a JSON object"),
            StoreError::MissingId { collection } => {
                write!(f, "item in {} has no id", collection)
            }
            StoreError::MalformedEnvelope { identifier } => write!(
                f,
                "response body has no `{}` array to merge",
                identifier
            ),
            StoreError::Serde(message) => write!(f, "serialization error: {}", message),
            StoreError::LockPoisoned(operation) => {
                write!(f, "store lock poisoned during {}", operation)
            }
            StoreError::Transport(err) => write!(f, "transport error: {}", err),
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StoreError::Transport(err) => Some(err),
            _ => None,
        }
    }
}

impl From<TransportError> for StoreError {
    fn from(err: TransportError) -> Self {
        StoreError::Transport(err)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Serde(err.to_string())
    }
}
