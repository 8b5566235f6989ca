//! data_connector - an identity-preserving, in-memory store for REST resources.
//!
//! A [`Store`] holds named [`Collection`]s. Adding content with an `id` that is
//! already present merges it into the existing [`Item`] instead of creating a
//! second one, so every holder of an item sees server updates. Relationships
//! declared on a collection's [`Model`] are resolved on demand by scanning the
//! target collection; nothing is joined eagerly or cached.

mod collection;
mod config;
mod error;
mod item;
mod model;
mod relation;
mod store;
pub mod transport;

pub use collection::Collection;
pub use config::{StoreConfig, BASE_URL_ENV, DEFAULT_BASE_URL};
pub use error::StoreError;
pub use item::{Attributes, Item};
pub use model::{Model, Relationship, RelationshipKind};
pub use relation::{resolve, Relation, RelationView};
pub use store::{Store, StoreBuilder};
#[cfg(feature = "http")]
pub use transport::HttpTransport;
pub use transport::{InMemoryTransport, Method, Request, Response, Transport, TransportError};
