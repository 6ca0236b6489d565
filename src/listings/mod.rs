//! Property listings and the offer workflow built on top of them.
//!
//! [`Property`] together with its owned offers forms one consistency
//! boundary: every compound mutation goes through [`ListingService`], which
//! re-evaluates the aggregate's invariants inside a single store
//! transaction. The live-edit hooks on [`Property`] are the only pieces
//! meant for direct presentation-layer use before a save.

pub mod domain;
mod policy;
mod rules;
pub mod service;

#[cfg(test)]
mod tests;

pub use domain::{
    GardenOrientation, OfferDraft, OfferId, OfferStatus, PartnerId, Property, PropertyDraft,
    PropertyId, PropertyOffer, PropertyState, GARDEN_DEFAULT_AREA, GARDEN_DEFAULT_ORIENTATION,
};
pub use policy::ListingPolicy;
pub use service::ListingService;
