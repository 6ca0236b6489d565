use serde::{Deserialize, Serialize};

/// Identifier wrapper for property types.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PropertyTypeId(pub u64);

/// Identifier wrapper for property tags.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct PropertyTagId(pub u64);

/// Display ordering used when a type is created without an explicit rank.
pub const DEFAULT_TYPE_SEQUENCE: i32 = 1;

/// Named category a property can belong to.
///
/// Types are shared across listings and listed ordered by (sequence, name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyType {
    pub id: PropertyTypeId,
    pub name: String,
    pub sequence: i32,
}

/// Named label attached many-to-many to properties. The color is an index
/// into the presentation layer's palette; no range is enforced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyTag {
    pub id: PropertyTagId,
    pub name: String,
    pub color: i32,
}
