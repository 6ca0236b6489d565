//! Storage seams for the domain services.
//!
//! The traits describe what a persistence collaborator must provide:
//! id assignment, uniqueness enforcement, and an aggregate-scoped atomic
//! mutation primitive. [`MemoryStore`] is the reference implementation used
//! by tests and by embedders that do not need durable storage.

mod memory;

pub use memory::MemoryStore;

use crate::catalog::{PropertyTag, PropertyTagId, PropertyType, PropertyTypeId};
use crate::error::EstateError;
use crate::listings::{Property, PropertyId};

/// Error enumeration for storage failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Storage for the shared reference data.
///
/// Inserts assign the definitive id (the id on the incoming record is
/// ignored). Both inserts and updates reject a name already carried by
/// another record of the same kind with [`RepositoryError::Conflict`].
pub trait CatalogStore: Send + Sync {
    fn insert_type(&self, ty: PropertyType) -> Result<PropertyType, RepositoryError>;
    fn update_type(&self, ty: PropertyType) -> Result<(), RepositoryError>;
    fn fetch_type(&self, id: PropertyTypeId) -> Result<Option<PropertyType>, RepositoryError>;
    fn list_types(&self) -> Result<Vec<PropertyType>, RepositoryError>;

    fn insert_tag(&self, tag: PropertyTag) -> Result<PropertyTag, RepositoryError>;
    fn update_tag(&self, tag: PropertyTag) -> Result<(), RepositoryError>;
    fn fetch_tag(&self, id: PropertyTagId) -> Result<Option<PropertyTag>, RepositoryError>;
    fn list_tags(&self) -> Result<Vec<PropertyTag>, RepositoryError>;
}

/// Storage for the property aggregate.
pub trait ListingStore: Send + Sync {
    /// Stores a new aggregate and assigns its definitive id.
    fn insert(&self, property: Property) -> Result<Property, RepositoryError>;

    fn fetch(&self, id: PropertyId) -> Result<Option<Property>, RepositoryError>;

    fn list(&self) -> Result<Vec<Property>, RepositoryError>;

    /// Runs `apply` against the aggregate under the store's exclusive lock
    /// and commits the result only when it returns `Ok`. An error leaves the
    /// stored aggregate untouched, so concurrent compound mutations of the
    /// same property serialize and never observe partial state.
    fn mutate(
        &self,
        id: PropertyId,
        apply: &mut dyn FnMut(&mut Property) -> Result<(), EstateError>,
    ) -> Result<Property, EstateError>;
}
