use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::{CatalogStore, ListingStore, RepositoryError};
use crate::catalog::{PropertyTag, PropertyTagId, PropertyType, PropertyTypeId};
use crate::error::EstateError;
use crate::listings::{Property, PropertyId};

/// In-memory store backing tests and light embeddings.
///
/// One mutex guards all records; [`ListingStore::mutate`] holds it across
/// the read-check-write of a closure, which is what serializes concurrent
/// compound mutations of the same aggregate.
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    properties: BTreeMap<PropertyId, Property>,
    types: BTreeMap<PropertyTypeId, PropertyType>,
    tags: BTreeMap<PropertyTagId, PropertyTag>,
    next_property: u64,
    next_type: u64,
    next_tag: u64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CatalogStore for MemoryStore {
    fn insert_type(&self, mut ty: PropertyType) -> Result<PropertyType, RepositoryError> {
        let mut inner = self.lock()?;
        if inner.types.values().any(|existing| existing.name == ty.name) {
            return Err(RepositoryError::Conflict);
        }
        inner.next_type += 1;
        ty.id = PropertyTypeId(inner.next_type);
        inner.types.insert(ty.id, ty.clone());
        Ok(ty)
    }

    fn update_type(&self, ty: PropertyType) -> Result<(), RepositoryError> {
        let mut inner = self.lock()?;
        if !inner.types.contains_key(&ty.id) {
            return Err(RepositoryError::NotFound);
        }
        if inner
            .types
            .values()
            .any(|existing| existing.id != ty.id && existing.name == ty.name)
        {
            return Err(RepositoryError::Conflict);
        }
        inner.types.insert(ty.id, ty);
        Ok(())
    }

    fn fetch_type(&self, id: PropertyTypeId) -> Result<Option<PropertyType>, RepositoryError> {
        Ok(self.lock()?.types.get(&id).cloned())
    }

    fn list_types(&self) -> Result<Vec<PropertyType>, RepositoryError> {
        Ok(self.lock()?.types.values().cloned().collect())
    }

    fn insert_tag(&self, mut tag: PropertyTag) -> Result<PropertyTag, RepositoryError> {
        let mut inner = self.lock()?;
        if inner.tags.values().any(|existing| existing.name == tag.name) {
            return Err(RepositoryError::Conflict);
        }
        inner.next_tag += 1;
        tag.id = PropertyTagId(inner.next_tag);
        inner.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    fn update_tag(&self, tag: PropertyTag) -> Result<(), RepositoryError> {
        let mut inner = self.lock()?;
        if !inner.tags.contains_key(&tag.id) {
            return Err(RepositoryError::NotFound);
        }
        if inner
            .tags
            .values()
            .any(|existing| existing.id != tag.id && existing.name == tag.name)
        {
            return Err(RepositoryError::Conflict);
        }
        inner.tags.insert(tag.id, tag);
        Ok(())
    }

    fn fetch_tag(&self, id: PropertyTagId) -> Result<Option<PropertyTag>, RepositoryError> {
        Ok(self.lock()?.tags.get(&id).cloned())
    }

    fn list_tags(&self) -> Result<Vec<PropertyTag>, RepositoryError> {
        Ok(self.lock()?.tags.values().cloned().collect())
    }
}

impl ListingStore for MemoryStore {
    fn insert(&self, mut property: Property) -> Result<Property, RepositoryError> {
        let mut inner = self.lock()?;
        inner.next_property += 1;
        property.id = PropertyId(inner.next_property);
        for offer in &mut property.offers {
            offer.property = property.id;
        }
        inner.properties.insert(property.id, property.clone());
        Ok(property)
    }

    fn fetch(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError> {
        Ok(self.lock()?.properties.get(&id).cloned())
    }

    fn list(&self) -> Result<Vec<Property>, RepositoryError> {
        Ok(self.lock()?.properties.values().cloned().collect())
    }

    fn mutate(
        &self,
        id: PropertyId,
        apply: &mut dyn FnMut(&mut Property) -> Result<(), EstateError>,
    ) -> Result<Property, EstateError> {
        let mut inner = self.lock()?;
        let current = inner.properties.get(&id).ok_or(RepositoryError::NotFound)?;

        // Work on a private copy; the stored record only changes on success.
        let mut draft = current.clone();
        apply(&mut draft)?;
        inner.properties.insert(id, draft.clone());
        Ok(draft)
    }
}
