//! JSON encode/decode of the keyed record collection.

use crate::error::{StoreError, StoreResult};
use crate::model::record::{Record, RecordMap};
use crate::model::variant::Variant;
use serde_json::{Map, Value};

/// Encodes the collection as one JSON object of exported records.
///
/// Keys are emitted in collection order; readers must not rely on it.
pub fn encode(records: &RecordMap) -> StoreResult<String> {
    let mut root = Map::new();
    for (key, record) in records {
        root.insert(key.clone(), Value::Object(record.export()));
    }
    serde_json::to_string(&Value::Object(root)).map_err(StoreError::Encode)
}

/// Decodes a durable JSON object back into a record collection.
///
/// Every entry goes through [`Record::from_persisted`]; nothing is registered
/// as a fresh record.
///
/// # Errors
/// - `UnknownVariant` when a key prefix names no known variant.
/// - `MalformedPersistedData` for invalid JSON, non-object entries, keys
///   without a `.` separator, key/id mismatches or invalid record content.
///
/// The first failing entry aborts the whole decode.
pub fn decode(text: &str) -> StoreResult<RecordMap> {
    let root: Value = serde_json::from_str(text)
        .map_err(|err| StoreError::MalformedPersistedData(format!("invalid JSON: {err}")))?;
    let entries = root.as_object().ok_or_else(|| {
        StoreError::MalformedPersistedData("top-level value must be an object".to_string())
    })?;

    let mut records = RecordMap::new();
    for (key, value) in entries {
        let (variant_name, id) = key.split_once('.').ok_or_else(|| {
            StoreError::MalformedPersistedData(format!(
                "key `{key}` is not of the form <Variant>.<id>"
            ))
        })?;
        let variant = Variant::lookup(variant_name)?;
        let fields = value.as_object().ok_or_else(|| {
            StoreError::MalformedPersistedData(format!("entry `{key}` must be an object"))
        })?;

        let record = Record::from_persisted(variant, fields)?;
        if record.id() != id {
            return Err(StoreError::MalformedPersistedData(format!(
                "entry `{key}` carries mismatching id `{}`",
                record.id()
            )));
        }
        records.insert(key.clone(), record);
    }

    Ok(records)
}
