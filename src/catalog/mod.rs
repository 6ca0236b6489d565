//! Shared reference data: property types and tags.
//!
//! Pure create/read/update records with storage-enforced name uniqueness and
//! fixed display orderings. Nothing here owns or mutates listings; the
//! reverse type-to-properties collection lives on the listing service, which
//! holds the data it is derived from.

pub mod domain;
pub mod service;


pub use domain::{PropertyTag, PropertyTagId, PropertyType, PropertyTypeId, DEFAULT_TYPE_SEQUENCE};
pub use service::CatalogService;
