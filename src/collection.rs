//! Collection - the canonical, identity-addressed sequence of items for one
//! resource type.
//!
//! Every write to an item of a resource type ends up here: relation views
//! delegate to the collection they were resolved from, and transport replies
//! are merged through [`Collection::add`]. Items keep insertion order and `id`
//! values stay unique among current members.
//!
//! ## Example
//!
//! ```
//! use data_connector::{Model, Store};
//! use serde_json::json;
//!
//! let store = Store::new();
//! let cats = store.register_collection("cats", Model::new()).unwrap();
//!
//! let first = cats.add(json!({ "id": 1, "name": "Felix" })).unwrap();
//! let again = cats.add(json!({ "id": 1, "legs": 4 })).unwrap();
//!
//! assert!(first.ptr_eq(&again));
//! assert_eq!(first.get("name").unwrap(), Some(json!("Felix")));
//! assert_eq!(first.get("legs").unwrap(), Some(json!(4)));
//! assert_eq!(cats.remove(2).unwrap(), 0);
//! ```

use std::fmt;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::item::{Attributes, Item};
use crate::model::Model;
use crate::transport::{Request, Response, Transport};

struct CollectionInner {
    identifier: String,
    model: Arc<Model>,
    url: String,
    items: RwLock<Vec<Item>>,
    transport: Arc<dyn Transport>,
}

/// Handle to a registered collection. Clones share the same items.
#[derive(Clone)]
pub struct Collection {
    inner: Arc<CollectionInner>,
}

impl Collection {
    pub(crate) fn new(
        identifier: String,
        model: Model,
        url: String,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            inner: Arc::new(CollectionInner {
                identifier,
                model: Arc::new(model),
                url,
                items: RwLock::new(Vec::new()),
                transport,
            }),
        }
    }

    pub fn identifier(&self) -> &str {
        &self.inner.identifier
    }

    pub fn model(&self) -> &Model {
        &self.inner.model
    }

    /// Endpoint of the collection; item endpoints are `<url>/<id>`.
    pub fn url(&self) -> &str {
        &self.inner.url
    }

    pub fn item_url(&self, id: &Value) -> String {
        format!("{}/{}", self.inner.url, id_segment(id))
    }

    /// `true` when both handles refer to the same collection.
    pub fn ptr_eq(&self, other: &Collection) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.read()?.is_empty())
    }

    /// Every member in insertion order.
    ///
    /// The returned handles are the live items, not copies; later merges are
    /// visible through them. Membership is as of the call.
    pub fn all(&self) -> Result<Vec<Item>, StoreError> {
        Ok(self.read()?.clone())
    }

    /// First member whose `id` equals `id`. Linear scan.
    pub fn find(&self, id: impl Into<Value>) -> Result<Option<Item>, StoreError> {
        let id = id.into();
        let items = self.read()?;
        Ok(position_of(&items, &id)?.map(|index| items[index].clone()))
    }

    /// Upsert `content` by its `id`.
    ///
    /// A member with the same `id` has `content` merged over it in place and
    /// is returned. Otherwise a new item is appended. Content without an `id`
    /// is always appended.
    pub fn add(&self, content: Value) -> Result<Item, StoreError> {
        let Value::Object(content) = content else {
            return Err(StoreError::NotAnObject);
        };
        self.upsert(content)
    }

    /// [`add`](Self::add) for any serializable value.
    pub fn add_from<T: Serialize>(&self, content: &T) -> Result<Item, StoreError> {
        self.add(serde_json::to_value(content)?)
    }

    /// Remove the member with `id`. Returns how many items were removed: `1`,
    /// or `0` when no member has that id.
    pub fn remove(&self, id: impl Into<Value>) -> Result<usize, StoreError> {
        let id = id.into();
        let mut items = self.write()?;
        match position_of(&items, &id)? {
            Some(index) => {
                items.remove(index);
                debug!(collection = %self.identifier(), %id, "removed item");
                Ok(1)
            }
            None => {
                debug!(collection = %self.identifier(), %id, "remove of unknown id ignored");
                Ok(0)
            }
        }
    }

    /// Merge a `{ <identifier>: [attrs, ...] }` envelope, element by element,
    /// through [`add`](Self::add). A single object in place of the array is
    /// treated as a one-element array.
    ///
    /// Every element must be an object; otherwise nothing is merged.
    pub fn receive(&self, mut body: Value) -> Result<Vec<Item>, StoreError> {
        let payload = body
            .get_mut(self.identifier())
            .map(Value::take)
            .ok_or_else(|| self.malformed())?;

        let elements = match payload {
            Value::Array(elements) => elements,
            Value::Object(_) => vec![payload],
            _ => return Err(self.malformed()),
        };
        if !elements.iter().all(Value::is_object) {
            return Err(StoreError::NotAnObject);
        }

        elements.into_iter().map(|e| self.add(e)).collect()
    }

    /// GET the collection endpoint and merge every returned item.
    ///
    /// Concurrent fetches of the same collection merge in the order their
    /// responses arrive, not the order they were issued; reads taken before
    /// the future resolves may be stale.
    pub async fn fetch_all(&self) -> Result<Vec<Item>, StoreError> {
        let response = self.send(Request::get(self.url())).await?;
        self.receive(response.body)
    }

    /// GET `<url>/<id>` and merge the returned item(s).
    pub async fn fetch(&self, id: impl Into<Value>) -> Result<Vec<Item>, StoreError> {
        let url = self.item_url(&id.into());
        let response = self.send(Request::get(url)).await?;
        self.receive(response.body)
    }

    /// POST `{ <identifier>: [attributes] }` and merge the reply.
    ///
    /// Nothing is added locally until the server answers; the server assigns
    /// the `id`.
    pub async fn create(&self, attributes: Value) -> Result<Vec<Item>, StoreError> {
        if !attributes.is_object() {
            return Err(StoreError::NotAnObject);
        }
        let payload = self.envelope(attributes);
        let response = self.send(Request::post(self.url(), payload)).await?;
        self.receive(response.body)
    }

    /// Wrap attributes as `{ <identifier>: [attributes] }`.
    pub(crate) fn envelope(&self, attributes: Value) -> Value {
        let mut payload = serde_json::Map::new();
        payload.insert(self.identifier().to_string(), json!([attributes]));
        Value::Object(payload)
    }

    /// Send through the store's transport; non-2xx replies become errors.
    pub(crate) async fn send(&self, request: Request) -> Result<Response, StoreError> {
        let method = request.method;
        let url = request.url.clone();
        debug!(collection = %self.identifier(), %method, %url, "transport request");

        let response = self.inner.transport.send(request).await?;
        if !response.is_success() {
            warn!(
                collection = %self.identifier(),
                %method,
                %url,
                status = response.status,
                "transport request failed"
            );
        }
        Ok(response.error_for_status()?)
    }

    /// Members whose `key` attribute equals `value`, in insertion order.
    pub(crate) fn matching(&self, key: &str, value: &Value) -> Result<Vec<Item>, StoreError> {
        let items = self.read()?;
        let mut matches = Vec::new();
        for item in items.iter() {
            if item.has_value(key, value)? {
                matches.push(item.clone());
            }
        }
        Ok(matches)
    }

    /// First member whose `key` attribute equals `value`.
    pub(crate) fn first_matching(
        &self,
        key: &str,
        value: &Value,
    ) -> Result<Option<Item>, StoreError> {
        let items = self.read()?;
        for item in items.iter() {
            if item.has_value(key, value)? {
                return Ok(Some(item.clone()));
            }
        }
        Ok(None)
    }

    fn upsert(&self, content: Attributes) -> Result<Item, StoreError> {
        let mut items = self.write()?;

        let id = content.get("id").filter(|id| !id.is_null()).cloned();
        if let Some(id) = &id {
            if let Some(index) = position_of(&items, id)? {
                let existing = items[index].clone();
                existing.merge(content)?;
                debug!(collection = %self.identifier(), %id, "merged item");
                return Ok(existing);
            }
        }

        let item = Item::new(self.identifier(), Arc::clone(&self.inner.model), content);
        items.push(item.clone());
        match &id {
            Some(id) => debug!(collection = %self.identifier(), %id, "added item"),
            None => debug!(collection = %self.identifier(), "added item without id"),
        }
        Ok(item)
    }

    fn malformed(&self) -> StoreError {
        StoreError::MalformedEnvelope {
            identifier: self.identifier().to_string(),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Item>>, StoreError> {
        self.inner
            .items
            .read()
            .map_err(|_| StoreError::LockPoisoned("collection read"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Item>>, StoreError> {
        self.inner
            .items
            .write()
            .map_err(|_| StoreError::LockPoisoned("collection write"))
    }
}

impl fmt::Debug for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let len = self.inner.items.read().map(|items| items.len()).ok();
        f.debug_struct("Collection")
            .field("identifier", &self.inner.identifier)
            .field("url", &self.inner.url)
            .field("len", &len)
            .finish()
    }
}

/// Index of the first item whose `id` equals `id`.
pub(crate) fn position_of(items: &[Item], id: &Value) -> Result<Option<usize>, StoreError> {
    for (index, item) in items.iter().enumerate() {
        if item.has_value("id", id)? {
            return Ok(Some(index));
        }
    }
    Ok(None)
}

/// Characters escaped in an id path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Path segment for an id: strings percent-encoded, anything else as JSON text.
fn id_segment(id: &Value) -> String {
    match id {
        Value::String(s) => utf8_percent_encode(s, PATH_SEGMENT).to_string(),
        other => other.to_string(),
    }
}
