//! Item - a single entity held by a collection.
//!
//! An `Item` is a handle: clones point at the same attribute bag, and merging
//! attributes through any path is observed by every holder. Items are only
//! created by [`Collection::add`](crate::Collection::add).

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard};

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::StoreError;
use crate::model::{Model, Relationship};
use crate::relation::{self, Relation, RelationView};
use crate::store::Store;
use crate::transport::Request;

/// Attribute bag of an item, as received from the server.
pub type Attributes = Map<String, Value>;

struct ItemInner {
    identifier: String,
    model: Arc<Model>,
    attributes: RwLock<Attributes>,
}

#[derive(Clone)]
pub struct Item {
    inner: Arc<ItemInner>,
}

impl Item {
    pub(crate) fn new(identifier: &str, model: Arc<Model>, attributes: Attributes) -> Self {
        Self {
            inner: Arc::new(ItemInner {
                identifier: identifier.to_string(),
                model,
                attributes: RwLock::new(attributes),
            }),
        }
    }

    /// Identifier of the owning collection.
    pub fn identifier(&self) -> &str {
        &self.inner.identifier
    }

    /// Model of the owning collection.
    pub fn model(&self) -> &Model {
        &self.inner.model
    }

    /// `true` when both handles refer to the same item.
    pub fn ptr_eq(&self, other: &Item) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The `id` attribute. `null` counts as absent.
    pub fn id(&self) -> Result<Option<Value>, StoreError> {
        Ok(self.get("id")?.filter(|id| !id.is_null()))
    }

    pub fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let attributes = self.read()?;
        Ok(attributes.get(key).cloned())
    }

    /// Snapshot of every attribute.
    pub fn attributes(&self) -> Result<Attributes, StoreError> {
        Ok(self.read()?.clone())
    }

    /// Deserialize the current attributes into a typed value.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, StoreError> {
        let attributes = self.attributes()?;
        Ok(serde_json::from_value(Value::Object(attributes))?)
    }

    /// Resolve the relationship declared under `name`, with the cardinality it
    /// was declared with. Evaluated against the store on every call.
    pub fn relationship(&self, store: &Store, name: &str) -> Result<Relation, StoreError> {
        let declared = self.declared(name)?;
        relation::resolve(store, self, declared)
    }

    /// Items of the relationship `name` as a [`RelationView`].
    pub fn has_many(&self, store: &Store, name: &str) -> Result<RelationView, StoreError> {
        let declared = self.declared(name)?;
        relation::has_many(store, self.id()?.as_ref(), declared)
    }

    /// First item of the relationship `name`, if any.
    pub fn has_one(&self, store: &Store, name: &str) -> Result<Option<Item>, StoreError> {
        let declared = self.declared(name)?;
        relation::has_one(store, self.id()?.as_ref(), declared)
    }

    /// PUT `attributes` to `<collection url>/<id>` and merge the reply.
    ///
    /// The reply envelope is merged through the canonical collection. A reply
    /// without a body merges the submitted attributes instead. Resolves with
    /// this same item.
    pub async fn update(&self, store: &Store, attributes: Value) -> Result<Item, StoreError> {
        let Value::Object(mut attributes) = attributes else {
            return Err(StoreError::NotAnObject);
        };
        let id = self.require_id()?;
        let collection = store.require(self.identifier())?;

        let payload = collection.envelope(Value::Object(attributes.clone()));
        let response = collection
            .send(Request::put(collection.item_url(&id), payload))
            .await?;

        if response.body.is_null() {
            attributes.entry("id").or_insert(id);
            collection.add(Value::Object(attributes))?;
        } else {
            collection.receive(response.body)?;
        }

        Ok(self.clone())
    }

    /// DELETE `<collection url>/<id>`, then drop the item from its canonical
    /// collection. Resolves with the response body.
    pub async fn destroy(&self, store: &Store) -> Result<Value, StoreError> {
        let id = self.require_id()?;
        let collection = store.require(self.identifier())?;

        let response = collection
            .send(Request::delete(collection.item_url(&id)))
            .await?;
        collection.remove(id)?;

        Ok(response.body)
    }

    /// Shallow-merge `content` over the current attributes.
    pub(crate) fn merge(&self, content: Attributes) -> Result<(), StoreError> {
        let mut attributes = self
            .inner
            .attributes
            .write()
            .map_err(|_| StoreError::LockPoisoned("item write"))?;
        attributes.extend(content);
        Ok(())
    }

    pub(crate) fn has_value(&self, key: &str, value: &Value) -> Result<bool, StoreError> {
        let attributes = self.read()?;
        Ok(attributes.get(key).is_some_and(|held| same_value(held, value)))
    }

    fn declared(&self, name: &str) -> Result<&Relationship, StoreError> {
        self.inner
            .model
            .relationship(name)
            .ok_or_else(|| StoreError::UnknownRelationship {
                collection: self.identifier().to_string(),
                name: name.to_string(),
            })
    }

    fn require_id(&self) -> Result<Value, StoreError> {
        self.id()?.ok_or_else(|| StoreError::MissingId {
            collection: self.identifier().to_string(),
        })
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Attributes>, StoreError> {
        self.inner
            .attributes
            .read()
            .map_err(|_| StoreError::LockPoisoned("item read"))
    }
}

/// Equality used for ids and foreign keys.
///
/// Two numbers are equal when their numeric values are (`1` == `1.0`); every
/// other pair compares as JSON, so `1` != `"1"`.
pub(crate) fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => match (x.as_i64(), y.as_i64()) {
            (Some(x), Some(y)) => x == y,
            _ => match (x.as_u64(), y.as_u64()) {
                (Some(x), Some(y)) => x == y,
                _ => x.as_f64() == y.as_f64(),
            },
        },
        _ => a == b,
    }
}

impl fmt::Debug for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Item");
        debug.field("identifier", &self.inner.identifier);
        match self.inner.attributes.read() {
            Ok(attributes) => debug.field("attributes", &*attributes),
            Err(_) => debug.field("attributes", &"<poisoned>"),
        };
        debug.finish()
    }
}
