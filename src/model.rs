//! Models - per-collection metadata: endpoint URL and declared relationships.
//!
//! A model is fixed when its collection is registered and shared by every
//! item of that collection. Relationships are resolved on demand; nothing
//! here holds item data.
//!
//! ## Example
//!
//! ```
//! use data_connector::{Model, RelationshipKind};
//!
//! let cats = Model::new().has_many("dogs", "dogs", "cat_id");
//! let rel = cats.relationship("dogs").unwrap();
//! assert_eq!(rel.kind, RelationshipKind::HasMany);
//!
//! // The JSON shape used by model declarations elsewhere is accepted as-is.
//! let parsed: Model = serde_json::from_str(r#"{
//!     "relationships": {
//!         "dogs": { "kind": "hasMany", "collection": "dogs", "foreignKey": "cat_id" }
//!     }
//! }"#).unwrap();
//! assert_eq!(parsed, cats);
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Cardinality of a relationship.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RelationshipKind {
    HasMany,
    HasOne,
}

/// Declares that items of the target collection point back at the owning
/// item through `foreign_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Relationship {
    pub kind: RelationshipKind,
    pub collection: String,
    pub foreign_key: String,
}

impl Relationship {
    pub fn has_many(collection: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self {
            kind: RelationshipKind::HasMany,
            collection: collection.into(),
            foreign_key: foreign_key.into(),
        }
    }

    pub fn has_one(collection: impl Into<String>, foreign_key: impl Into<String>) -> Self {
        Self {
            kind: RelationshipKind::HasOne,
            collection: collection.into(),
            foreign_key: foreign_key.into(),
        }
    }
}

/// Metadata a collection is registered with.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    /// Overrides `<base_url><identifier>` as the collection endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default)]
    pub relationships: BTreeMap<String, Relationship>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn relate(mut self, name: impl Into<String>, relationship: Relationship) -> Self {
        self.relationships.insert(name.into(), relationship);
        self
    }

    pub fn has_many(
        self,
        name: impl Into<String>,
        collection: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.relate(name, Relationship::has_many(collection, foreign_key))
    }

    pub fn has_one(
        self,
        name: impl Into<String>,
        collection: impl Into<String>,
        foreign_key: impl Into<String>,
    ) -> Self {
        self.relate(name, Relationship::has_one(collection, foreign_key))
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.get(name)
    }
}
