//! Closed table of record variants and their declared default fields.
//!
//! # Invariants
//! - The variant set is fixed at compile time; names resolve only through
//!   [`Variant::from_name`].
//! - Variants differ only by their default field table.

use crate::error::{StoreError, StoreResult};
use crate::model::value::FieldKind;
use std::fmt::{Display, Formatter};

/// Declared attribute of a variant: name plus the kind of its zero default.
pub type FieldSpec = (&'static str, FieldKind);

/// Record variant; its name doubles as the persisted type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Variant {
    /// Generic record without declared fields.
    BaseModel,
    User,
    State,
    /// `state_id` refers to a `State` id by convention.
    City,
    Amenity,
    /// `city_id`, `user_id` and `amenity_ids` refer to other variants by convention.
    Place,
    /// `place_id` and `user_id` refer to other variants by convention.
    Review,
}

const USER_FIELDS: &[FieldSpec] = &[
    ("email", FieldKind::Text),
    ("password", FieldKind::Text),
    ("first_name", FieldKind::Text),
    ("last_name", FieldKind::Text),
];

const STATE_FIELDS: &[FieldSpec] = &[("name", FieldKind::Text)];

const CITY_FIELDS: &[FieldSpec] = &[("state_id", FieldKind::Text), ("name", FieldKind::Text)];

const AMENITY_FIELDS: &[FieldSpec] = &[("name", FieldKind::Text)];

const PLACE_FIELDS: &[FieldSpec] = &[
    ("city_id", FieldKind::Text),
    ("user_id", FieldKind::Text),
    ("name", FieldKind::Text),
    ("description", FieldKind::Text),
    ("number_rooms", FieldKind::Integer),
    ("number_bathrooms", FieldKind::Integer),
    ("max_guest", FieldKind::Integer),
    ("price_by_night", FieldKind::Integer),
    ("latitude", FieldKind::Float),
    ("longitude", FieldKind::Float),
    ("amenity_ids", FieldKind::TextList),
];

const REVIEW_FIELDS: &[FieldSpec] = &[
    ("place_id", FieldKind::Text),
    ("user_id", FieldKind::Text),
    ("text", FieldKind::Text),
];

impl Variant {
    pub const ALL: [Variant; 7] = [
        Variant::BaseModel,
        Variant::User,
        Variant::State,
        Variant::City,
        Variant::Amenity,
        Variant::Place,
        Variant::Review,
    ];

    /// Type-tag name used in storage keys and the durable file.
    pub fn name(self) -> &'static str {
        match self {
            Self::BaseModel => "BaseModel",
            Self::User => "User",
            Self::State => "State",
            Self::City => "City",
            Self::Amenity => "Amenity",
            Self::Place => "Place",
            Self::Review => "Review",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|variant| variant.name() == name)
    }

    /// Resolves a variant name, failing with `UnknownVariant` otherwise.
    pub fn lookup(name: &str) -> StoreResult<Self> {
        Self::from_name(name).ok_or_else(|| StoreError::UnknownVariant(name.to_string()))
    }

    pub fn declared_fields(self) -> &'static [FieldSpec] {
        match self {
            Self::BaseModel => &[],
            Self::User => USER_FIELDS,
            Self::State => STATE_FIELDS,
            Self::City => CITY_FIELDS,
            Self::Amenity => AMENITY_FIELDS,
            Self::Place => PLACE_FIELDS,
            Self::Review => REVIEW_FIELDS,
        }
    }

    pub fn declared_kind(self, field: &str) -> Option<FieldKind> {
        self.declared_fields()
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, kind)| *kind)
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
