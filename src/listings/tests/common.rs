use std::sync::Arc;

use chrono::NaiveDate;

use crate::context::{RequestContext, UserId};
use crate::listings::domain::{OfferDraft, PartnerId, Property, PropertyDraft};
use crate::listings::service::ListingService;
use crate::store::MemoryStore;

pub(super) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, 1).expect("valid date")
}

pub(super) fn context() -> RequestContext {
    RequestContext::new(UserId(7), today())
}

pub(super) fn service() -> ListingService<MemoryStore> {
    ListingService::new(Arc::new(MemoryStore::new()))
}

pub(super) fn draft(name: &str, expected_price: f64) -> PropertyDraft {
    PropertyDraft::new(name, expected_price)
}

pub(super) fn offer(price: f64, partner: u64) -> OfferDraft {
    OfferDraft::new(price, PartnerId(partner))
}

pub(super) fn created(service: &ListingService<MemoryStore>, expected_price: f64) -> Property {
    service
        .create_property(&context(), draft("Sample listing", expected_price))
        .expect("can create property")
}
