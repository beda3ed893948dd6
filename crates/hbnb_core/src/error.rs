//! Error taxonomy shared by model, serializer, store and service layers.
//!
//! # Invariants
//! - Only the missing-file case of `load()` is tolerated without an error.
//! - `MalformedPersistedData` always means on-disk content cannot be trusted.

use crate::model::value::FieldKind;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error type for record construction, persistence and lookup failures.
#[derive(Debug)]
pub enum StoreError {
    /// Variant name is not part of the fixed recognized set.
    UnknownVariant(String),
    /// `"<Variant>.<id>"` key is absent from the collection.
    RecordNotFound(String),
    /// Durable content is not valid JSON or violates the record contract.
    MalformedPersistedData(String),
    /// Attempt to assign one of `id`, `created_at`, `updated_at`, `__class__`.
    ReservedField(String),
    /// Textual update value cannot be parsed as the field's current type.
    InvalidValue {
        field: String,
        expected: FieldKind,
        value: String,
    },
    Io(std::io::Error),
    Encode(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownVariant(name) => write!(f, "unknown record variant `{name}`"),
            Self::RecordNotFound(key) => write!(f, "record not found: {key}"),
            Self::MalformedPersistedData(message) => {
                write!(f, "malformed persisted data: {message}")
            }
            Self::ReservedField(name) => write!(f, "field `{name}` is reserved"),
            Self::InvalidValue {
                field,
                expected,
                value,
            } => write!(
                f,
                "cannot parse `{value}` as {} for field `{field}`",
                expected.as_str()
            ),
            Self::Io(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode records: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Encode(err) => Some(err),
            Self::UnknownVariant(_)
            | Self::RecordNotFound(_)
            | Self::MalformedPersistedData(_)
            | Self::ReservedField(_)
            | Self::InvalidValue { .. } => None,
        }
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
