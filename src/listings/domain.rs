use std::collections::BTreeSet;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::catalog::{PropertyTagId, PropertyTypeId};
use crate::context::UserId;
use crate::error::{AdvisoryWarning, OperationNotAllowed};

/// Identifier wrapper for properties.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PropertyId(pub u64);

/// Identifier of an offer inside its owning property. Offers never outlive
/// the property, so the id is only unique within the aggregate.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct OfferId(pub u64);

/// Identifier of a buying party kept in an external partner registry.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PartnerId(pub u64);

/// Garden area assigned when the garden flag is switched on interactively.
pub const GARDEN_DEFAULT_AREA: u32 = 10;
/// Orientation assigned alongside [`GARDEN_DEFAULT_AREA`].
pub const GARDEN_DEFAULT_ORIENTATION: GardenOrientation = GardenOrientation::North;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GardenOrientation {
    North,
    South,
    East,
    West,
}

impl GardenOrientation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
        }
    }
}

/// Lifecycle state of a listing.
///
/// `OfferAccepted` exists for schema compatibility; no operation assigns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyState {
    New,
    OfferReceived,
    OfferAccepted,
    Sold,
    Cancelled,
}

impl PropertyState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New",
            Self::OfferReceived => "Offer Received",
            Self::OfferAccepted => "Offer Accepted",
            Self::Sold => "Sold",
            Self::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OfferStatus {
    Accepted,
    Refused,
}

impl OfferStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Accepted => "Accepted",
            Self::Refused => "Refused",
        }
    }
}

/// A bid placed on a property. Owned by the property aggregate; `status`
/// stays `None` while the bid is pending.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyOffer {
    pub id: OfferId,
    pub price: f64,
    pub status: Option<OfferStatus>,
    pub partner: PartnerId,
    pub property: PropertyId,
    /// Cached copy of the owning property's type, re-synced whenever the
    /// property's type changes.
    pub property_type: Option<PropertyTypeId>,
    pub validity: i64,
    pub date_deadline: NaiveDate,
    pub created_on: NaiveDate,
}

impl PropertyOffer {
    /// Deadline derived from the validity window, anchored to the offer's
    /// creation date so repeated edits do not drift.
    pub fn recompute_deadline(&mut self) {
        self.date_deadline = self.created_on + Duration::days(self.validity);
    }

    /// Inverse path: a directly assigned deadline back-derives the validity
    /// from the caller's current date. The pair only round-trips when both
    /// edits happen the same day; cross-day edits are inherently lossy.
    pub fn set_deadline(&mut self, deadline: NaiveDate, today: NaiveDate) {
        self.date_deadline = deadline;
        self.validity = (deadline - today).num_days();
    }

    pub fn is_pending(&self) -> bool {
        self.status.is_none()
    }
}

/// Input for creating a property. Fields left unset fall back to the
/// listing policy and the request context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDraft {
    pub name: String,
    pub expected_price: f64,
    pub description: Option<String>,
    pub postcode: Option<String>,
    pub date_availability: Option<NaiveDate>,
    pub bedrooms: Option<u32>,
    pub living_area: u32,
    pub facades: u32,
    pub garage: bool,
    pub garden: bool,
    pub garden_area: u32,
    pub garden_orientation: Option<GardenOrientation>,
    pub property_type: Option<PropertyTypeId>,
    pub salesperson: Option<UserId>,
    pub tags: BTreeSet<PropertyTagId>,
}

impl PropertyDraft {
    /// Draft with only the required fields set; everything else falls back
    /// to policy and context defaults at creation time.
    pub fn new(name: &str, expected_price: f64) -> Self {
        Self {
            name: name.to_string(),
            expected_price,
            description: None,
            postcode: None,
            date_availability: None,
            bedrooms: None,
            living_area: 0,
            facades: 0,
            garage: false,
            garden: false,
            garden_area: 0,
            garden_orientation: None,
            property_type: None,
            salesperson: None,
            tags: BTreeSet::new(),
        }
    }
}

/// Input for placing an offer on a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfferDraft {
    pub price: f64,
    pub partner: PartnerId,
    pub validity: Option<i64>,
}

impl OfferDraft {
    pub fn new(price: f64, partner: PartnerId) -> Self {
        Self {
            price,
            partner,
            validity: None,
        }
    }
}

/// The central aggregate: a listing together with the offers placed on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: PropertyId,
    pub name: String,
    pub description: Option<String>,
    pub postcode: Option<String>,
    pub date_availability: NaiveDate,
    pub expected_price: f64,
    /// Set exclusively through offer acceptance.
    pub selling_price: f64,
    pub bedrooms: u32,
    pub living_area: u32,
    pub facades: u32,
    pub garage: bool,
    pub garden: bool,
    pub garden_area: u32,
    pub garden_orientation: Option<GardenOrientation>,
    pub state: PropertyState,
    /// Soft-delete flag; archived records stay in storage.
    pub active: bool,
    pub property_type: Option<PropertyTypeId>,
    pub buyer: Option<PartnerId>,
    pub salesperson: UserId,
    pub tags: BTreeSet<PropertyTagId>,
    pub offers: Vec<PropertyOffer>,
    pub total_area: u32,
    pub best_price: f64,
    pub created_on: NaiveDate,
    pub(crate) next_offer_seq: u64,
}

impl Property {
    pub fn recompute_total_area(&mut self) {
        self.total_area = self.living_area + self.garden_area;
    }

    /// Best price over the current offers, 0 when there are none.
    ///
    /// A positive best price forces the state to `OfferReceived`. The
    /// derivation never writes `New` back: emptying the offer collection
    /// leaves the state where it was. Only operations that change offer
    /// price data invoke this.
    pub fn recompute_best_price(&mut self) {
        self.best_price = self
            .offers
            .iter()
            .map(|offer| offer.price)
            .fold(0.0, f64::max);
        if self.best_price > 0.0 {
            self.state = PropertyState::OfferReceived;
        }
    }

    /// Live-edit hook for the garden flag. Only the presentation layer calls
    /// this, on an in-memory copy, when the flag is interactively toggled;
    /// loading or saving a record never re-fires it.
    pub fn toggle_garden(&mut self, enabled: bool) {
        self.garden = enabled;
        if enabled {
            self.garden_area = GARDEN_DEFAULT_AREA;
            self.garden_orientation = Some(GARDEN_DEFAULT_ORIENTATION);
        } else {
            self.garden_area = 0;
            self.garden_orientation = None;
        }
        self.recompute_total_area();
    }

    /// Live-edit hook for the availability date. The new value always
    /// sticks; a date in the past yields an advisory warning for the caller
    /// to surface.
    pub fn change_availability(
        &mut self,
        date: NaiveDate,
        today: NaiveDate,
    ) -> Option<AdvisoryWarning> {
        self.date_availability = date;
        if date < today {
            Some(AdvisoryWarning::AvailabilityDateInPast)
        } else {
            None
        }
    }

    pub fn mark_sold(&mut self) -> Result<(), OperationNotAllowed> {
        if self.state == PropertyState::Cancelled {
            return Err(OperationNotAllowed::SellCancelled);
        }
        self.state = PropertyState::Sold;
        Ok(())
    }

    pub fn mark_cancelled(&mut self) -> Result<(), OperationNotAllowed> {
        if self.state == PropertyState::Sold {
            return Err(OperationNotAllowed::CancelSold);
        }
        self.state = PropertyState::Cancelled;
        Ok(())
    }

    pub fn offer(&self, id: OfferId) -> Option<&PropertyOffer> {
        self.offers.iter().find(|offer| offer.id == id)
    }

    pub(crate) fn offer_mut(&mut self, id: OfferId) -> Option<&mut PropertyOffer> {
        self.offers.iter_mut().find(|offer| offer.id == id)
    }

    pub fn accepted_offer(&self) -> Option<&PropertyOffer> {
        self.offers
            .iter()
            .find(|offer| offer.status == Some(OfferStatus::Accepted))
    }

    /// Offers as presented: highest price first.
    pub fn offers_by_price(&self) -> Vec<&PropertyOffer> {
        let mut offers: Vec<&PropertyOffer> = self.offers.iter().collect();
        offers.sort_by(|a, b| b.price.total_cmp(&a.price));
        offers
    }

    pub(crate) fn add_offer(
        &mut self,
        draft: OfferDraft,
        today: NaiveDate,
        default_validity: i64,
    ) -> OfferId {
        let id = OfferId(self.next_offer_seq);
        self.next_offer_seq += 1;
        let validity = draft.validity.unwrap_or(default_validity);
        self.offers.push(PropertyOffer {
            id,
            price: draft.price,
            status: None,
            partner: draft.partner,
            property: self.id,
            property_type: self.property_type,
            validity,
            date_deadline: today + Duration::days(validity),
            created_on: today,
        });
        id
    }

    /// Re-syncs the cached type on every owned offer after the property's
    /// type changed.
    pub(crate) fn sync_offer_types(&mut self) {
        let property_type = self.property_type;
        for offer in &mut self.offers {
            offer.property_type = property_type;
        }
    }
}
