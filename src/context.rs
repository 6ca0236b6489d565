use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Identifier of the user acting on the system.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UserId(pub u64);

/// Per-request context carrying the acting user and the date the caller
/// considers current.
///
/// Date-derived defaults and recomputes take their reference date from here
/// instead of reading a clock, so every rule stays deterministic under test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub user: UserId,
    pub today: NaiveDate,
}

impl RequestContext {
    pub fn new(user: UserId, today: NaiveDate) -> Self {
        Self { user, today }
    }
}
