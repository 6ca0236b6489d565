use std::sync::Arc;

use tracing::debug;

use super::domain::{
    PropertyTag, PropertyTagId, PropertyType, PropertyTypeId, DEFAULT_TYPE_SEQUENCE,
};
use crate::error::{EstateError, ValidationError};
use crate::store::{CatalogStore, RepositoryError};

/// Service facade over the reference-data store.
///
/// Uniqueness of names is enforced by the store; this layer translates the
/// storage conflict into the domain validation error the caller expects.
pub struct CatalogService<S> {
    store: Arc<S>,
}

impl<S> CatalogService<S>
where
    S: CatalogStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn create_type(
        &self,
        name: &str,
        sequence: Option<i32>,
    ) -> Result<PropertyType, EstateError> {
        let ty = PropertyType {
            id: PropertyTypeId::default(),
            name: name.to_string(),
            sequence: sequence.unwrap_or(DEFAULT_TYPE_SEQUENCE),
        };
        let stored = self
            .store
            .insert_type(ty)
            .map_err(|err| duplicate_name(err, "property type", name))?;
        debug!(id = stored.id.0, name, "property type created");
        Ok(stored)
    }

    pub fn update_type(
        &self,
        id: PropertyTypeId,
        name: Option<&str>,
        sequence: Option<i32>,
    ) -> Result<PropertyType, EstateError> {
        let mut ty = self.get_type(id)?;
        if let Some(name) = name {
            ty.name = name.to_string();
        }
        if let Some(sequence) = sequence {
            ty.sequence = sequence;
        }
        self.store
            .update_type(ty.clone())
            .map_err(|err| duplicate_name(err, "property type", &ty.name))?;
        Ok(ty)
    }

    pub fn get_type(&self, id: PropertyTypeId) -> Result<PropertyType, EstateError> {
        let ty = self.store.fetch_type(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(ty)
    }

    /// All types, ordered by sequence then name.
    pub fn list_types(&self) -> Result<Vec<PropertyType>, EstateError> {
        let mut types = self.store.list_types()?;
        types.sort_by(|a, b| (a.sequence, &a.name).cmp(&(b.sequence, &b.name)));
        Ok(types)
    }

    pub fn create_tag(&self, name: &str, color: Option<i32>) -> Result<PropertyTag, EstateError> {
        let tag = PropertyTag {
            id: PropertyTagId::default(),
            name: name.to_string(),
            color: color.unwrap_or(0),
        };
        let stored = self
            .store
            .insert_tag(tag)
            .map_err(|err| duplicate_name(err, "property tag", name))?;
        debug!(id = stored.id.0, name, "property tag created");
        Ok(stored)
    }

    pub fn update_tag(
        &self,
        id: PropertyTagId,
        name: Option<&str>,
        color: Option<i32>,
    ) -> Result<PropertyTag, EstateError> {
        let mut tag = self.get_tag(id)?;
        if let Some(name) = name {
            tag.name = name.to_string();
        }
        if let Some(color) = color {
            tag.color = color;
        }
        self.store
            .update_tag(tag.clone())
            .map_err(|err| duplicate_name(err, "property tag", &tag.name))?;
        Ok(tag)
    }

    pub fn get_tag(&self, id: PropertyTagId) -> Result<PropertyTag, EstateError> {
        let tag = self.store.fetch_tag(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(tag)
    }

    /// All tags, ordered by name.
    pub fn list_tags(&self) -> Result<Vec<PropertyTag>, EstateError> {
        let mut tags = self.store.list_tags()?;
        tags.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(tags)
    }
}

fn duplicate_name(err: RepositoryError, kind: &'static str, name: &str) -> EstateError {
    match err {
        RepositoryError::Conflict => ValidationError::DuplicateName {
            kind,
            name: name.to_string(),
        }
        .into(),
        other => other.into(),
    }
}
