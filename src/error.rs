use serde::{Deserialize, Serialize};

use crate::store::RepositoryError;

/// Data-integrity violations that block the write they were raised on.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("expected price must be strictly positive")]
    NonPositiveExpectedPrice,
    #[error("selling price {selling:.2} is below the minimum share {floor:.2} of the expected price")]
    SellingPriceBelowFloor { selling: f64, floor: f64 },
    #[error("offer price must be strictly positive")]
    NonPositiveOfferPrice,
    #[error("{kind} name {name:?} already exists")]
    DuplicateName { kind: &'static str, name: String },
}

/// Business-rule violations raised by an explicit user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OperationNotAllowed {
    #[error("cancelled properties cannot be sold")]
    SellCancelled,
    #[error("sold properties cannot be cancelled")]
    CancelSold,
    #[error("this property has already been sold")]
    OfferAlreadyAccepted,
}

/// Non-blocking diagnostic surfaced alongside a successful live edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryWarning {
    AvailabilityDateInPast,
}

impl AdvisoryWarning {
    pub const fn message(self) -> &'static str {
        match self {
            Self::AvailabilityDateInPast => "availability date is set in the past",
        }
    }
}

/// Error raised by the service facades.
#[derive(Debug, thiserror::Error)]
pub enum EstateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    NotAllowed(#[from] OperationNotAllowed),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
