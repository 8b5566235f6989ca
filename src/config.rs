//! Store-wide configuration.

use serde::{Deserialize, Serialize};

/// Environment variable read by [`StoreConfig::from_env`].
pub const BASE_URL_ENV: &str = "DATA_CONNECTOR_BASE_URL";

/// Default prefix for collection URLs.
pub const DEFAULT_BASE_URL: &str = "/api/v1/";

/// Settings fixed when a [`Store`](crate::Store) is built.
///
/// `base_url` is concatenated with a collection identifier to form the
/// collection URL unless the collection's model names its own `url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub base_url: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl StoreConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    /// Defaults, with `base_url` overridden by `DATA_CONNECTOR_BASE_URL` when set.
    pub fn from_env() -> Self {
        match std::env::var(BASE_URL_ENV) {
            Ok(base_url) if !base_url.is_empty() => Self::new(base_url),
            _ => Self::default(),
        }
    }

    /// URL for a collection without an explicit model URL.
    pub fn collection_url(&self, identifier: &str) -> String {
        format!("{}{}", self.base_url, identifier)
    }
}
