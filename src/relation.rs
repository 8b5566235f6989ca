//! Relationship resolution and relation views.
//!
//! Relationships are never cached. Each call scans the target collection for
//! members whose foreign key equals the owner's `id`, so a result reflects the
//! store at the moment it was resolved and goes stale only afterwards.

use std::ops::Index;

use serde_json::Value;

use crate::collection::{position_of, Collection};
use crate::error::StoreError;
use crate::item::Item;
use crate::model::{Relationship, RelationshipKind};
use crate::store::Store;

/// A resolved relationship.
#[derive(Debug)]
pub enum Relation {
    Many(RelationView),
    One(Option<Item>),
}

impl Relation {
    pub fn kind(&self) -> RelationshipKind {
        match self {
            Relation::Many(_) => RelationshipKind::HasMany,
            Relation::One(_) => RelationshipKind::HasOne,
        }
    }

    pub fn into_many(self) -> Option<RelationView> {
        match self {
            Relation::Many(view) => Some(view),
            Relation::One(_) => None,
        }
    }

    pub fn into_one(self) -> Option<Item> {
        match self {
            Relation::One(item) => item,
            Relation::Many(_) => None,
        }
    }
}

/// Resolve `relationship` for `owner` with its declared cardinality.
pub fn resolve(
    store: &Store,
    owner: &Item,
    relationship: &Relationship,
) -> Result<Relation, StoreError> {
    let owner_id = owner.id()?;
    match relationship.kind {
        RelationshipKind::HasMany => Ok(Relation::Many(has_many(
            store,
            owner_id.as_ref(),
            relationship,
        )?)),
        RelationshipKind::HasOne => Ok(Relation::One(has_one(
            store,
            owner_id.as_ref(),
            relationship,
        )?)),
    }
}

/// Every member of the target collection pointing at `owner_id`, in the
/// target's insertion order. An owner without an id matches nothing.
pub(crate) fn has_many(
    store: &Store,
    owner_id: Option<&Value>,
    relationship: &Relationship,
) -> Result<RelationView, StoreError> {
    let target = store.require(&relationship.collection)?;
    let items = match owner_id {
        Some(id) => target.matching(&relationship.foreign_key, id)?,
        None => Vec::new(),
    };
    Ok(RelationView::new(target, items))
}

/// First member of the target collection pointing at `owner_id`.
pub(crate) fn has_one(
    store: &Store,
    owner_id: Option<&Value>,
    relationship: &Relationship,
) -> Result<Option<Item>, StoreError> {
    let target = store.require(&relationship.collection)?;
    match owner_id {
        Some(id) => target.first_matching(&relationship.foreign_key, id),
        None => Ok(None),
    }
}

/// A snapshot subset of a collection, produced by a has-many relationship.
///
/// Reads see only the items captured at resolution time (plus those added
/// through the view). Writes go to the canonical collection first and are
/// then mirrored into the view, so the collection stays the single source of
/// truth. A view is never registered in the store.
#[derive(Debug)]
pub struct RelationView {
    canonical: Collection,
    items: Vec<Item>,
}

impl RelationView {
    pub(crate) fn new(canonical: Collection, items: Vec<Item>) -> Self {
        Self { canonical, items }
    }

    /// Identifier of the collection the view was resolved from.
    pub fn identifier(&self) -> &str {
        self.canonical.identifier()
    }

    pub fn canonical(&self) -> &Collection {
        &self.canonical
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }

    pub fn all(&self) -> &[Item] {
        &self.items
    }

    /// First item of the view whose `id` equals `id`.
    pub fn find(&self, id: impl Into<Value>) -> Result<Option<Item>, StoreError> {
        let id = id.into();
        Ok(position_of(&self.items, &id)?.map(|index| self.items[index].clone()))
    }

    /// Upsert through the canonical collection, then hold the resulting item
    /// in the view too (once).
    pub fn add(&mut self, content: Value) -> Result<Item, StoreError> {
        let item = self.canonical.add(content)?;
        if !self.items.iter().any(|held| held.ptr_eq(&item)) {
            self.items.push(item.clone());
        }
        Ok(item)
    }

    /// Remove the item with `id` from the canonical collection and the view.
    /// An id the view does not hold is a no-op returning `0`.
    pub fn remove(&mut self, id: impl Into<Value>) -> Result<usize, StoreError> {
        let id = id.into();
        let Some(index) = position_of(&self.items, &id)? else {
            return Ok(0);
        };
        self.canonical.remove(id)?;
        self.items.remove(index);
        Ok(1)
    }
}

impl Index<usize> for RelationView {
    type Output = Item;

    fn index(&self, index: usize) -> &Item {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a RelationView {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for RelationView {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}
