use std::sync::Arc;

use chrono::{Months, NaiveDate};
use tracing::{debug, info};

use super::domain::{
    OfferDraft, OfferId, OfferStatus, Property, PropertyDraft, PropertyId, PropertyState,
};
use super::policy::ListingPolicy;
use super::rules;
use crate::catalog::PropertyTypeId;
use crate::context::RequestContext;
use crate::error::{EstateError, OperationNotAllowed};
use crate::store::{ListingStore, RepositoryError};

/// Service facade for the property aggregate.
///
/// Every compound mutation runs inside [`ListingStore::mutate`], so the
/// sibling-offer checks and price constraints are evaluated against current
/// state and either commit together or not at all.
pub struct ListingService<S> {
    store: Arc<S>,
    policy: ListingPolicy,
}

impl<S> ListingService<S>
where
    S: ListingStore,
{
    pub fn new(store: Arc<S>) -> Self {
        Self::with_policy(store, ListingPolicy::default())
    }

    pub fn with_policy(store: Arc<S>, policy: ListingPolicy) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &ListingPolicy {
        &self.policy
    }

    /// Creates a listing from a draft, filling unset fields from the policy
    /// and the context. Nothing is stored when validation fails.
    pub fn create_property(
        &self,
        ctx: &RequestContext,
        draft: PropertyDraft,
    ) -> Result<Property, EstateError> {
        let mut property = Property {
            id: PropertyId::default(),
            name: draft.name,
            description: draft.description,
            postcode: draft.postcode,
            date_availability: draft.date_availability.unwrap_or_else(|| {
                ctx.today + Months::new(self.policy.availability_lead_months)
            }),
            expected_price: draft.expected_price,
            selling_price: 0.0,
            bedrooms: draft.bedrooms.unwrap_or(self.policy.default_bedrooms),
            living_area: draft.living_area,
            facades: draft.facades,
            garage: draft.garage,
            garden: draft.garden,
            garden_area: draft.garden_area,
            garden_orientation: draft.garden_orientation,
            state: PropertyState::New,
            active: true,
            property_type: draft.property_type,
            buyer: None,
            salesperson: draft.salesperson.unwrap_or(ctx.user),
            tags: draft.tags,
            offers: Vec::new(),
            total_area: 0,
            best_price: 0.0,
            created_on: ctx.today,
            next_offer_seq: 1,
        };
        property.recompute_total_area();
        rules::check_property(&property, &self.policy)?;

        let stored = self.store.insert(property)?;
        debug!(
            property = stored.id.0,
            user = ctx.user.0,
            "property created"
        );
        Ok(stored)
    }

    /// Persists the editable fields of an edited copy.
    ///
    /// The id, selling price, buyer, state, offers, derived fields and
    /// creation date of the stored record are kept; those only move through
    /// their dedicated operations.
    pub fn save_property(
        &self,
        ctx: &RequestContext,
        edited: &Property,
    ) -> Result<Property, EstateError> {
        let updated = self.store.mutate(edited.id, &mut |current| {
            current.name = edited.name.clone();
            current.description = edited.description.clone();
            current.postcode = edited.postcode.clone();
            current.date_availability = edited.date_availability;
            current.expected_price = edited.expected_price;
            current.bedrooms = edited.bedrooms;
            current.living_area = edited.living_area;
            current.facades = edited.facades;
            current.garage = edited.garage;
            current.garden = edited.garden;
            current.garden_area = edited.garden_area;
            current.garden_orientation = edited.garden_orientation;
            current.property_type = edited.property_type;
            current.salesperson = edited.salesperson;
            current.tags = edited.tags.clone();
            current.active = edited.active;
            current.sync_offer_types();
            current.recompute_total_area();
            rules::check_property(current, &self.policy).map_err(EstateError::from)
        })?;
        debug!(property = updated.id.0, user = ctx.user.0, "property saved");
        Ok(updated)
    }

    /// Marks the property sold. Rejected on cancelled properties.
    pub fn sell(&self, ctx: &RequestContext, id: PropertyId) -> Result<Property, EstateError> {
        let updated = self
            .store
            .mutate(id, &mut |property| {
                property.mark_sold().map_err(EstateError::from)
            })?;
        info!(property = id.0, user = ctx.user.0, "property sold");
        Ok(updated)
    }

    /// Marks the property cancelled. Rejected on sold properties.
    pub fn cancel(&self, ctx: &RequestContext, id: PropertyId) -> Result<Property, EstateError> {
        let updated = self
            .store
            .mutate(id, &mut |property| {
                property.mark_cancelled().map_err(EstateError::from)
            })?;
        info!(property = id.0, user = ctx.user.0, "property cancelled");
        Ok(updated)
    }

    /// Soft-deletes the property; the record stays in storage.
    pub fn archive(&self, ctx: &RequestContext, id: PropertyId) -> Result<Property, EstateError> {
        let updated = self.store.mutate(id, &mut |property| {
            property.active = false;
            Ok(())
        })?;
        info!(property = id.0, user = ctx.user.0, "property archived");
        Ok(updated)
    }

    pub fn restore(&self, ctx: &RequestContext, id: PropertyId) -> Result<Property, EstateError> {
        let updated = self.store.mutate(id, &mut |property| {
            property.active = true;
            Ok(())
        })?;
        info!(property = id.0, user = ctx.user.0, "property restored");
        Ok(updated)
    }

    pub fn get(&self, id: PropertyId) -> Result<Property, EstateError> {
        let property = self.store.fetch(id)?.ok_or(RepositoryError::NotFound)?;
        Ok(property)
    }

    /// Listings newest first; archived records only on request.
    pub fn list(&self, include_archived: bool) -> Result<Vec<Property>, EstateError> {
        let mut properties = self.store.list()?;
        if !include_archived {
            properties.retain(|property| property.active);
        }
        properties.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(properties)
    }

    /// Reverse collection of a property type, newest first, archived hidden.
    pub fn properties_of_type(
        &self,
        type_id: PropertyTypeId,
    ) -> Result<Vec<Property>, EstateError> {
        let mut properties = self.store.list()?;
        properties.retain(|property| property.active && property.property_type == Some(type_id));
        properties.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(properties)
    }

    /// Places a pending offer on a property. The best-price derivation and
    /// the full constraint check run in the same transaction.
    pub fn place_offer(
        &self,
        ctx: &RequestContext,
        property_id: PropertyId,
        draft: OfferDraft,
    ) -> Result<(Property, OfferId), EstateError> {
        let mut placed = None;
        let updated = self.store.mutate(property_id, &mut |property| {
            let id = property.add_offer(
                draft.clone(),
                ctx.today,
                self.policy.default_offer_validity,
            );
            property.recompute_best_price();
            placed = Some(id);
            rules::check_property(property, &self.policy).map_err(EstateError::from)
        })?;
        match placed {
            Some(offer_id) => {
                debug!(
                    property = property_id.0,
                    offer = offer_id.0,
                    price = draft.price,
                    user = ctx.user.0,
                    "offer placed"
                );
                Ok((updated, offer_id))
            }
            None => Err(RepositoryError::Unavailable("offer id not recorded".to_string()).into()),
        }
    }

    /// Removes an offer. The best price is re-derived; the state never
    /// reverts to `New`, even when the last offer goes away.
    pub fn withdraw_offer(
        &self,
        ctx: &RequestContext,
        property_id: PropertyId,
        offer_id: OfferId,
    ) -> Result<Property, EstateError> {
        let updated = self.store.mutate(property_id, &mut |property| {
            let before = property.offers.len();
            property.offers.retain(|offer| offer.id != offer_id);
            if property.offers.len() == before {
                return Err(RepositoryError::NotFound.into());
            }
            property.recompute_best_price();
            rules::check_property(property, &self.policy).map_err(EstateError::from)
        })?;
        debug!(
            property = property_id.0,
            offer = offer_id.0,
            user = ctx.user.0,
            "offer withdrawn"
        );
        Ok(updated)
    }

    /// Accepts an offer: first accepted wins. Price and buyer propagate to
    /// the property; the state is left to the best-price derivation, which
    /// acceptance itself never triggers.
    pub fn accept_offer(
        &self,
        ctx: &RequestContext,
        property_id: PropertyId,
        offer_id: OfferId,
    ) -> Result<Property, EstateError> {
        let updated = self.store.mutate(property_id, &mut |property| {
            if property.accepted_offer().is_some() {
                return Err(OperationNotAllowed::OfferAlreadyAccepted.into());
            }
            let offer = property
                .offer_mut(offer_id)
                .ok_or(RepositoryError::NotFound)?;
            offer.status = Some(OfferStatus::Accepted);
            let price = offer.price;
            let partner = offer.partner;
            property.selling_price = price;
            property.buyer = Some(partner);
            rules::check_property(property, &self.policy).map_err(EstateError::from)
        })?;
        info!(
            property = property_id.0,
            offer = offer_id.0,
            price = updated.selling_price,
            user = ctx.user.0,
            "offer accepted"
        );
        Ok(updated)
    }

    /// Refuses an offer. No cross-offer checks; refusing twice is a no-op.
    pub fn refuse_offer(
        &self,
        ctx: &RequestContext,
        property_id: PropertyId,
        offer_id: OfferId,
    ) -> Result<Property, EstateError> {
        let updated = self.store.mutate(property_id, &mut |property| {
            let offer = property
                .offer_mut(offer_id)
                .ok_or(RepositoryError::NotFound)?;
            offer.status = Some(OfferStatus::Refused);
            Ok(())
        })?;
        debug!(
            property = property_id.0,
            offer = offer_id.0,
            user = ctx.user.0,
            "offer refused"
        );
        Ok(updated)
    }

    /// Stores a new validity window and re-derives the deadline from the
    /// offer's creation date.
    pub fn set_offer_validity(
        &self,
        _ctx: &RequestContext,
        property_id: PropertyId,
        offer_id: OfferId,
        days: i64,
    ) -> Result<Property, EstateError> {
        self.store.mutate(property_id, &mut |property| {
            let offer = property
                .offer_mut(offer_id)
                .ok_or(RepositoryError::NotFound)?;
            offer.validity = days;
            offer.recompute_deadline();
            Ok(())
        })
    }

    /// Stores a directly assigned deadline and back-derives the validity
    /// from the context date.
    pub fn set_offer_deadline(
        &self,
        ctx: &RequestContext,
        property_id: PropertyId,
        offer_id: OfferId,
        deadline: NaiveDate,
    ) -> Result<Property, EstateError> {
        let today = ctx.today;
        self.store.mutate(property_id, &mut |property| {
            let offer = property
                .offer_mut(offer_id)
                .ok_or(RepositoryError::NotFound)?;
            offer.set_deadline(deadline, today);
            Ok(())
        })
    }
}
