use std::sync::Arc;
use std::thread;

use chrono::Duration;

use super::common::*;
use crate::catalog::PropertyTypeId;
use crate::context::RequestContext;
use crate::error::{EstateError, OperationNotAllowed, ValidationError};
use crate::listings::domain::{OfferStatus, PartnerId, PropertyState};
use crate::listings::service::ListingService;
use crate::store::MemoryStore;

#[test]
fn place_offer_derives_deadline_and_best_price() {
    let service = service();
    let ctx = context();
    let property = created(&service, 300_000.0);

    let (updated, offer_id) = service
        .place_offer(&ctx, property.id, offer(280_000.0, 31))
        .expect("can place offer");

    let placed = updated.offer(offer_id).expect("offer present");
    assert_eq!(placed.validity, 7);
    assert_eq!(placed.date_deadline, today() + Duration::days(7));
    assert_eq!(placed.created_on, today());
    assert!(placed.is_pending());
    assert_eq!(placed.partner, PartnerId(31));
    assert_eq!(placed.property, property.id);

    assert_eq!(updated.best_price, 280_000.0);
    assert_eq!(updated.state, PropertyState::OfferReceived);
}

#[test]
fn place_offer_honors_explicit_validity() {
    let service = service();
    let ctx = context();
    let property = created(&service, 300_000.0);

    let mut draft = offer(280_000.0, 31);
    draft.validity = Some(14);
    let (updated, offer_id) = service
        .place_offer(&ctx, property.id, draft)
        .expect("can place offer");

    let placed = updated.offer(offer_id).expect("offer present");
    assert_eq!(placed.validity, 14);
    assert_eq!(placed.date_deadline, today() + Duration::days(14));
}

#[test]
fn non_positive_offer_price_is_rejected() {
    let service = service();
    let ctx = context();
    let property = created(&service, 300_000.0);

    match service.place_offer(&ctx, property.id, offer(0.0, 31)) {
        Err(EstateError::Validation(ValidationError::NonPositiveOfferPrice)) => {}
        other => panic!("expected validation error, got {other:?}"),
    }

    let stored = service.get(property.id).expect("present");
    assert!(stored.offers.is_empty(), "the rejected offer must not persist");
    assert_eq!(stored.state, PropertyState::New);
    assert_eq!(stored.best_price, 0.0);
}

#[test]
fn best_price_is_the_maximum_and_offers_sort_descending() {
    let service = service();
    let ctx = context();
    let property = created(&service, 300_000.0);

    service
        .place_offer(&ctx, property.id, offer(250_000.0, 31))
        .expect("can place offer");
    service
        .place_offer(&ctx, property.id, offer(280_000.0, 32))
        .expect("can place offer");
    let (updated, _) = service
        .place_offer(&ctx, property.id, offer(260_000.0, 33))
        .expect("can place offer");

    assert_eq!(updated.best_price, 280_000.0);
    let prices: Vec<f64> = updated
        .offers_by_price()
        .iter()
        .map(|offer| offer.price)
        .collect();
    assert_eq!(prices, vec![280_000.0, 260_000.0, 250_000.0]);
}

#[test]
fn withdrawing_the_last_offer_keeps_the_state() {
    let service = service();
    let ctx = context();
    let property = created(&service, 300_000.0);
    let (_, offer_id) = service
        .place_offer(&ctx, property.id, offer(280_000.0, 31))
        .expect("can place offer");

    let updated = service
        .withdraw_offer(&ctx, property.id, offer_id)
        .expect("can withdraw offer");

    assert!(updated.offers.is_empty());
    assert_eq!(updated.best_price, 0.0);
    assert_eq!(
        updated.state,
        PropertyState::OfferReceived,
        "the state never falls back to new"
    );
}

#[test]
fn accept_propagates_price_and_buyer_only() {
    let service = service();
    let ctx = context();
    let property = created(&service, 300_000.0);
    let (_, offer_id) = service
        .place_offer(&ctx, property.id, offer(280_000.0, 31))
        .expect("can place offer");

    let updated = service
        .accept_offer(&ctx, property.id, offer_id)
        .expect("can accept offer");

    let accepted = updated.offer(offer_id).expect("offer present");
    assert_eq!(accepted.status, Some(OfferStatus::Accepted));
    assert_eq!(updated.selling_price, 280_000.0);
    assert_eq!(updated.buyer, Some(PartnerId(31)));
    assert_eq!(
        updated.state,
        PropertyState::OfferReceived,
        "acceptance itself leaves the state alone"
    );
}

#[test]
fn second_accept_on_a_sibling_offer_is_rejected() {
    let service = service();
    let ctx = context();
    let property = created(&service, 300_000.0);
    let (_, first) = service
        .place_offer(&ctx, property.id, offer(280_000.0, 31))
        .expect("can place offer");
    let (_, second) = service
        .place_offer(&ctx, property.id, offer(290_000.0, 32))
        .expect("can place offer");

    service
        .accept_offer(&ctx, property.id, first)
        .expect("first accept wins");

    match service.accept_offer(&ctx, property.id, second) {
        Err(EstateError::NotAllowed(OperationNotAllowed::OfferAlreadyAccepted)) => {}
        other => panic!("expected rejection, got {other:?}"),
    }

    let stored = service.get(property.id).expect("present");
    assert_eq!(stored.selling_price, 280_000.0);
    assert_eq!(stored.buyer, Some(PartnerId(31)));
    assert!(
        stored.offer(second).expect("offer present").is_pending(),
        "the losing offer stays pending"
    );
}

#[test]
fn refuse_is_idempotent() {
    let service = service();
    let ctx = context();
    let property = created(&service, 300_000.0);
    let (_, offer_id) = service
        .place_offer(&ctx, property.id, offer(280_000.0, 31))
        .expect("can place offer");

    for _ in 0..2 {
        let updated = service
            .refuse_offer(&ctx, property.id, offer_id)
            .expect("refuse always succeeds");
        assert_eq!(
            updated.offer(offer_id).expect("offer present").status,
            Some(OfferStatus::Refused)
        );
    }
}

#[test]
fn accepting_an_offer_below_the_floor_aborts_cleanly() {
    let service = service();
    let ctx = context();
    let property = created(&service, 300_000.0);
    // Positive, so it can be placed; below 90% of expected, so it cannot be
    // accepted.
    let (_, offer_id) = service
        .place_offer(&ctx, property.id, offer(200_000.0, 31))
        .expect("can place offer");

    match service.accept_offer(&ctx, property.id, offer_id) {
        Err(EstateError::Validation(ValidationError::SellingPriceBelowFloor { .. })) => {}
        other => panic!("expected floor violation, got {other:?}"),
    }

    let stored = service.get(property.id).expect("present");
    assert!(
        stored.offer(offer_id).expect("offer present").is_pending(),
        "the failed acceptance must not persist a status"
    );
    assert_eq!(stored.selling_price, 0.0);
    assert!(stored.buyer.is_none());
}

#[test]
fn selling_price_floor_tolerates_representation_noise() {
    let service = service();
    let ctx = context();
    let property = created(&service, 300_000.0);
    // 269_999.996 rounds to the 270_000.00 floor at two decimals.
    let (_, offer_id) = service
        .place_offer(&ctx, property.id, offer(269_999.996, 31))
        .expect("can place offer");

    service
        .accept_offer(&ctx, property.id, offer_id)
        .expect("a within-tolerance price passes the floor");
}

#[test]
fn deadline_and_validity_round_trip_same_day() {
    let service = service();
    let ctx = context();
    let property = created(&service, 300_000.0);
    let (_, offer_id) = service
        .place_offer(&ctx, property.id, offer(280_000.0, 31))
        .expect("can place offer");

    let updated = service
        .set_offer_deadline(&ctx, property.id, offer_id, today() + Duration::days(10))
        .expect("can set deadline");
    let changed = updated.offer(offer_id).expect("offer present");
    assert_eq!(changed.validity, 10);
    assert_eq!(changed.date_deadline, today() + Duration::days(10));

    let updated = service
        .set_offer_validity(&ctx, property.id, offer_id, 5)
        .expect("can set validity");
    let changed = updated.offer(offer_id).expect("offer present");
    assert_eq!(changed.validity, 5);
    assert_eq!(changed.date_deadline, today() + Duration::days(5));
}

#[test]
fn cross_day_deadline_edit_drifts_validity() {
    let service = service();
    let ctx = context();
    let property = created(&service, 300_000.0);
    let (_, offer_id) = service
        .place_offer(&ctx, property.id, offer(280_000.0, 31))
        .expect("can place offer");

    // Three days later the same absolute deadline yields a shorter window:
    // the inverse derivation is anchored to the edit date, not creation.
    let later = RequestContext::new(ctx.user, today() + Duration::days(3));
    let updated = service
        .set_offer_deadline(&later, property.id, offer_id, today() + Duration::days(10))
        .expect("can set deadline");
    let changed = updated.offer(offer_id).expect("offer present");
    assert_eq!(changed.validity, 7);
    assert_eq!(changed.date_deadline, today() + Duration::days(10));
}

#[test]
fn offers_cache_the_owning_property_type() {
    let service = service();
    let ctx = context();
    let mut draft = draft("Typed listing", 300_000.0);
    draft.property_type = Some(PropertyTypeId(5));
    let property = service
        .create_property(&ctx, draft)
        .expect("can create property");

    let (updated, offer_id) = service
        .place_offer(&ctx, property.id, offer(280_000.0, 31))
        .expect("can place offer");
    assert_eq!(
        updated.offer(offer_id).expect("offer present").property_type,
        Some(PropertyTypeId(5))
    );

    let mut edited = updated;
    edited.property_type = Some(PropertyTypeId(9));
    let saved = service.save_property(&ctx, &edited).expect("can save");
    assert_eq!(
        saved.offer(offer_id).expect("offer present").property_type,
        Some(PropertyTypeId(9)),
        "cached copies follow the property's type"
    );
}

#[test]
fn a_late_offer_reopens_the_received_state() {
    let service = service();
    let ctx = context();
    let property = created(&service, 300_000.0);
    service.sell(&ctx, property.id).expect("can sell");

    // Price data changed, so the derivation runs again and overrides the
    // later stage. Removing the offer does not undo it.
    let (updated, _) = service
        .place_offer(&ctx, property.id, offer(280_000.0, 31))
        .expect("can place offer");
    assert_eq!(updated.state, PropertyState::OfferReceived);
}

#[test]
fn concurrent_accepts_let_exactly_one_win() {
    let store = Arc::new(MemoryStore::new());
    let service = Arc::new(ListingService::new(store));
    let ctx = context();
    let property = service
        .create_property(&ctx, draft("Contended listing", 300_000.0))
        .expect("can create property");
    let (_, first) = service
        .place_offer(&ctx, property.id, offer(280_000.0, 31))
        .expect("can place offer");
    let (_, second) = service
        .place_offer(&ctx, property.id, offer(290_000.0, 32))
        .expect("can place offer");

    let mut handles = Vec::new();
    for offer_id in [first, second] {
        let service = Arc::clone(&service);
        let property_id = property.id;
        handles.push(thread::spawn(move || {
            let ctx = context();
            service.accept_offer(&ctx, property_id, offer_id).is_ok()
        }));
    }

    let won: Vec<bool> = handles
        .into_iter()
        .map(|handle| handle.join().expect("accept thread completes"))
        .collect();
    assert_eq!(won.iter().filter(|ok| **ok).count(), 1);

    let stored = service.get(property.id).expect("present");
    assert_eq!(
        stored
            .offers
            .iter()
            .filter(|offer| offer.status == Some(OfferStatus::Accepted))
            .count(),
        1
    );
    assert!(stored.buyer.is_some());
}
