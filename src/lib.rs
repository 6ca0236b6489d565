//! Domain models and business rules for a real-estate listing and offer
//! workflow.
//!
//! The crate models four entities: shared reference data ([`catalog`]), the
//! central [`listings::Property`] aggregate that owns its
//! [`listings::PropertyOffer`] collection, and the storage seams in
//! [`store`]. All compound mutations flow through the service facades so the
//! aggregate invariants are re-checked inside a single atomic store
//! transaction; presentation layers talk to the services and to the live-edit
//! hooks on the domain types, never to the store directly.

pub mod catalog;
pub mod context;
pub mod error;
pub mod listings;
pub mod store;

pub use context::{RequestContext, UserId};
pub use error::{AdvisoryWarning, EstateError, OperationNotAllowed, ValidationError};
