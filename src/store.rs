//! Store - the registry of collections.
//!
//! A store is built once per application scope and passed by reference to
//! whatever needs collections. Identifiers are unique for the lifetime of the
//! store; registering one twice is an error. Cloning a store shares the
//! registry.
//!
//! ## Example
//!
//! ```
//! use data_connector::{Model, Store, StoreError};
//! use serde_json::json;
//!
//! let store = Store::new();
//! let cats = store
//!     .register_collection("cats", Model::new().has_many("dogs", "dogs", "cat_id"))
//!     .unwrap();
//! let dogs = store.register_collection("dogs", Model::new()).unwrap();
//!
//! cats.add(json!({ "id": 1, "name": "Felix" })).unwrap();
//! dogs.add(json!({ "id": 1, "name": "Fido", "cat_id": 1 })).unwrap();
//!
//! let felix = cats.find(1).unwrap().unwrap();
//! let felix_dogs = felix.has_many(&store, "dogs").unwrap();
//! assert_eq!(felix_dogs[0].get("name").unwrap(), Some(json!("Fido")));
//!
//! assert!(matches!(
//!     store.register_collection("cats", Model::new()),
//!     Err(StoreError::DuplicateCollection(_))
//! ));
//! ```

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use tracing::debug;

use crate::collection::Collection;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::model::Model;
use crate::transport::{InMemoryTransport, Transport};

struct StoreInner {
    config: StoreConfig,
    transport: Arc<dyn Transport>,
    collections: RwLock<HashMap<String, Collection>>,
}

#[derive(Clone)]
pub struct Store {
    inner: Arc<StoreInner>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// A store with default configuration and an empty [`InMemoryTransport`].
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::default()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.inner.config
    }

    /// Create and register an empty collection under `identifier`.
    ///
    /// Its URL is `model.url` when set, `<base_url><identifier>` otherwise.
    pub fn register_collection(
        &self,
        identifier: impl Into<String>,
        model: Model,
    ) -> Result<Collection, StoreError> {
        let identifier = identifier.into();
        let mut collections = self
            .inner
            .collections
            .write()
            .map_err(|_| StoreError::LockPoisoned("registry write"))?;

        if collections.contains_key(&identifier) {
            return Err(StoreError::DuplicateCollection(identifier));
        }

        let url = model
            .url
            .clone()
            .unwrap_or_else(|| self.inner.config.collection_url(&identifier));
        let collection = Collection::new(
            identifier.clone(),
            model,
            url,
            Arc::clone(&self.inner.transport),
        );
        debug!(collection = %identifier, url = %collection.url(), "registered collection");
        collections.insert(identifier, collection.clone());

        Ok(collection)
    }

    /// The canonical collection registered under `identifier`, if any.
    pub fn lookup(&self, identifier: &str) -> Result<Option<Collection>, StoreError> {
        let collections = self
            .inner
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned("registry read"))?;
        Ok(collections.get(identifier).cloned())
    }

    /// Every registered collection, keyed by identifier. The handles are live.
    pub fn dump(&self) -> Result<HashMap<String, Collection>, StoreError> {
        let collections = self
            .inner
            .collections
            .read()
            .map_err(|_| StoreError::LockPoisoned("registry read"))?;
        Ok(collections.clone())
    }

    pub(crate) fn require(&self, identifier: &str) -> Result<Collection, StoreError> {
        self.lookup(identifier)?
            .ok_or_else(|| StoreError::UnknownCollection(identifier.to_string()))
    }
}

/// Fixes configuration and transport before any collection exists.
#[derive(Default)]
pub struct StoreBuilder {
    config: StoreConfig,
    transport: Option<Arc<dyn Transport>>,
}

impl StoreBuilder {
    pub fn config(mut self, config: StoreConfig) -> Self {
        self.config = config;
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.config.base_url = base_url.into();
        self
    }

    pub fn transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Some(Arc::new(transport));
        self
    }

    pub fn shared_transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Store {
        let transport = self
            .transport
            .unwrap_or_else(|| Arc::new(InMemoryTransport::new()));
        Store {
            inner: Arc::new(StoreInner {
                config: self.config,
                transport,
                collections: RwLock::new(HashMap::new()),
            }),
        }
    }
}
