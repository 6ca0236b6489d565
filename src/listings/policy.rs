use serde::{Deserialize, Serialize};

/// Policy knobs applied when drafting listings and offers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListingPolicy {
    /// Months between creation and the default availability date.
    pub availability_lead_months: u32,
    pub default_bedrooms: u32,
    /// Days an offer stays valid when none are specified.
    pub default_offer_validity: i64,
    /// Lowest accepted selling price, as a share of the expected price.
    pub min_selling_ratio: f64,
}

impl Default for ListingPolicy {
    fn default() -> Self {
        Self {
            availability_lead_months: 3,
            default_bedrooms: 2,
            default_offer_validity: 7,
            min_selling_ratio: 0.9,
        }
    }
}
