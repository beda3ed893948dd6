//! Record domain model.
//!
//! # Responsibility
//! - Hold identity, timestamps and the open field map of one entity.
//! - Provide the fresh and persisted construction paths.
//!
//! # Invariants
//! - `id` and `created_at` never change after construction.
//! - `created_at <= updated_at`; `touch()` strictly advances `updated_at`.
//! - Declared variant defaults are read-through: they are never copied into
//!   the instance field map, so export only carries explicitly set fields.
//! - `export()` and `display()` are pure views of the same state.

use crate::error::{StoreError, StoreResult};
use crate::model::value::FieldValue;
use crate::model::variant::Variant;
use crate::serializer::timestamp::{format_timestamp, now, parse_timestamp, Timestamp};
use crate::serializer::TYPE_TAG_FIELD;
use chrono::Duration;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Textual record identifier (UUID-v4 for fresh records, verbatim on reload).
pub type RecordId = String;

/// Keyed record collection, addressed by [`record_key`].
pub type RecordMap = BTreeMap<String, Record>;

const ID_FIELD: &str = "id";
const CREATED_AT_FIELD: &str = "created_at";
const UPDATED_AT_FIELD: &str = "updated_at";
const RESERVED_FIELDS: &[&str] = &[ID_FIELD, CREATED_AT_FIELD, UPDATED_AT_FIELD, TYPE_TAG_FIELD];

/// Builds the collection key `"<VariantName>.<id>"`.
pub fn record_key(variant: Variant, id: &str) -> String {
    format!("{}.{id}", variant.name())
}

/// Returns whether `name` is managed by the record itself and cannot be set.
pub fn is_reserved_field(name: &str) -> bool {
    RESERVED_FIELDS.contains(&name)
}

/// One persisted entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    variant: Variant,
    id: RecordId,
    created_at: Timestamp,
    updated_at: Timestamp,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Creates a fresh record with a generated id and equal timestamps.
    ///
    /// The caller (normally the store) is responsible for registering it.
    pub fn new(variant: Variant) -> Self {
        let created_at = now();
        Self {
            variant,
            id: Uuid::new_v4().to_string(),
            created_at,
            updated_at: created_at,
            fields: BTreeMap::new(),
        }
    }

    /// Rebuilds a record from its persisted field map.
    ///
    /// The type tag is consumed and discarded, timestamps are parsed, every
    /// other key is kept verbatim (unknown keys included).
    ///
    /// # Errors
    /// - `MalformedPersistedData` when `id` or a timestamp is missing or
    ///   mistyped, a value has an unsupported shape, or
    ///   `created_at > updated_at`.
    pub fn from_persisted(variant: Variant, map: &Map<String, Value>) -> StoreResult<Self> {
        let mut id = None;
        let mut created_at = None;
        let mut updated_at = None;
        let mut fields = BTreeMap::new();

        for (key, value) in map {
            match key.as_str() {
                TYPE_TAG_FIELD => {}
                ID_FIELD => {
                    let text = value.as_str().ok_or_else(|| {
                        malformed(format!("`id` of {} must be a string", variant.name()))
                    })?;
                    id = Some(text.to_string());
                }
                CREATED_AT_FIELD => created_at = Some(persisted_timestamp(key, value)?),
                UPDATED_AT_FIELD => updated_at = Some(persisted_timestamp(key, value)?),
                _ => {
                    let field_value = FieldValue::from_json(value).ok_or_else(|| {
                        malformed(format!("unsupported value for field `{key}`: {value}"))
                    })?;
                    fields.insert(key.clone(), field_value);
                }
            }
        }

        let id = id.ok_or_else(|| malformed("missing `id`".to_string()))?;
        let created_at = created_at
            .ok_or_else(|| malformed(format!("missing `created_at` for id `{id}`")))?;
        let updated_at = updated_at
            .ok_or_else(|| malformed(format!("missing `updated_at` for id `{id}`")))?;
        if created_at > updated_at {
            return Err(malformed(format!(
                "created_at is later than updated_at for id `{id}`"
            )));
        }

        Ok(Self {
            variant,
            id,
            created_at,
            updated_at,
            fields,
        })
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    /// Collection key of this record.
    pub fn key(&self) -> String {
        record_key(self.variant, &self.id)
    }

    /// Explicitly set fields, without variant defaults.
    pub fn instance_fields(&self) -> &BTreeMap<String, FieldValue> {
        &self.fields
    }

    /// Returns the instance value, else the variant's declared default.
    pub fn field(&self, name: &str) -> Option<FieldValue> {
        self.fields.get(name).cloned().or_else(|| {
            self.variant
                .declared_kind(name)
                .map(|kind| kind.default_value())
        })
    }

    /// Sets a field by name, shadowing any variant default.
    ///
    /// # Errors
    /// - `ReservedField` for `id`, `created_at`, `updated_at` and the type tag.
    /// - `InvalidValue` for a non-finite float.
    pub fn set_field(
        &mut self,
        name: impl Into<String>,
        value: impl Into<FieldValue>,
    ) -> StoreResult<()> {
        let name = name.into();
        if is_reserved_field(&name) {
            return Err(StoreError::ReservedField(name));
        }
        let value = value.into();
        value.check(&name)?;
        self.fields.insert(name, value);
        Ok(())
    }

    /// Bumps `updated_at` to the current time.
    ///
    /// Two touches within the same microsecond still move forward by one
    /// microsecond.
    pub fn touch(&mut self) {
        let current = now();
        self.updated_at = if current > self.updated_at {
            current
        } else {
            self.updated_at + Duration::microseconds(1)
        };
    }

    /// Persisted representation: instance fields, `id`, text timestamps and
    /// the type tag.
    pub fn export(&self) -> Map<String, Value> {
        let mut map = Map::new();
        for (name, value) in &self.fields {
            map.insert(name.clone(), value.to_json());
        }
        map.insert(ID_FIELD.to_string(), Value::from(self.id.as_str()));
        map.insert(
            CREATED_AT_FIELD.to_string(),
            Value::from(format_timestamp(&self.created_at)),
        );
        map.insert(
            UPDATED_AT_FIELD.to_string(),
            Value::from(format_timestamp(&self.updated_at)),
        );
        map.insert(TYPE_TAG_FIELD.to_string(), Value::from(self.variant.name()));
        map
    }
}

impl Display for Record {
    /// Renders `[<Variant>] (<id>) {<fields>}` without the type tag.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{}] ({}) {{\"id\": {:?}, \"created_at\": {:?}, \"updated_at\": {:?}",
            self.variant.name(),
            self.id,
            self.id,
            format_timestamp(&self.created_at),
            format_timestamp(&self.updated_at),
        )?;
        for (name, value) in &self.fields {
            write!(f, ", {name:?}: {value}")?;
        }
        f.write_str("}")
    }
}

fn persisted_timestamp(field: &str, value: &Value) -> StoreResult<Timestamp> {
    value
        .as_str()
        .and_then(parse_timestamp)
        .ok_or_else(|| malformed(format!("invalid `{field}` timestamp: {value}")))
}

fn malformed(message: String) -> StoreError {
    StoreError::MalformedPersistedData(message)
}
