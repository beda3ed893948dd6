//! Record use-case service.
//!
//! # Responsibility
//! - Provide create/show/destroy/update/all/count entry points for the console.
//! - Apply the update coercion policy before delegating to the store.
//!
//! # Invariants
//! - Variant names are validated before any key lookup.
//! - Every mutating call leaves the durable file in sync with memory.
//! - A multi-field update either applies every field or none.

use crate::error::{StoreError, StoreResult};
use crate::model::record::{is_reserved_field, record_key, Record, RecordId};
use crate::model::value::FieldValue;
use crate::model::variant::Variant;
use crate::repo::record_store::RecordStore;
use log::info;

/// Incoming value for one field update.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput {
    /// User text, coerced to the field's current type when it has one.
    Text(String),
    /// Already typed value, stored as-is.
    Value(FieldValue),
}

/// Use-case service wrapper over a record store.
pub struct RecordService<S: RecordStore> {
    store: S,
}

impl<S: RecordStore> RecordService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Resolves a variant name through the store's closed table.
    pub fn variant(&self, name: &str) -> StoreResult<Variant> {
        self.store.lookup_variant(name)
    }

    /// Creates, registers and persists a fresh record.
    ///
    /// # Contract
    /// - Returns the new record id.
    /// - The new record has `created_at == updated_at`.
    /// - A failed flush unregisters the record again.
    pub fn create(&mut self, variant_name: &str) -> StoreResult<RecordId> {
        let variant = self.variant(variant_name)?;
        let record = Record::new(variant);
        let id = record.id().to_string();
        let key = self.store.register(record);
        if let Err(err) = self.store.flush() {
            self.store.all_mut().remove(&key);
            return Err(err);
        }
        info!(
            "event=record_create module=service status=ok variant={}",
            variant.name()
        );
        Ok(id)
    }

    pub fn show(&self, variant_name: &str, id: &str) -> StoreResult<&Record> {
        let variant = self.variant(variant_name)?;
        self.store.get(&record_key(variant, id))
    }

    /// Removes a record and persists the collection.
    pub fn destroy(&mut self, variant_name: &str, id: &str) -> StoreResult<Record> {
        let variant = self.variant(variant_name)?;
        let removed = self.store.destroy(&record_key(variant, id))?;
        info!(
            "event=record_destroy module=service status=ok variant={}",
            variant.name()
        );
        Ok(removed)
    }

    /// Lists records, optionally restricted to one variant, in key order.
    pub fn all(&self, variant_name: Option<&str>) -> StoreResult<Vec<&Record>> {
        let filter = variant_name.map(|name| self.variant(name)).transpose()?;
        Ok(self
            .store
            .all()
            .values()
            .filter(|record| filter.map_or(true, |variant| record.variant() == variant))
            .collect())
    }

    /// Counts records of exactly one variant.
    pub fn count(&self, variant_name: &str) -> StoreResult<usize> {
        Ok(self.all(Some(variant_name))?.len())
    }

    /// Updates one field from user text and saves the record.
    pub fn update(
        &mut self,
        variant_name: &str,
        id: &str,
        field: &str,
        raw_value: &str,
    ) -> StoreResult<()> {
        self.update_fields(
            variant_name,
            id,
            vec![(field.to_string(), FieldInput::Text(raw_value.to_string()))],
        )
    }

    /// Updates several fields at once and saves the record.
    ///
    /// # Contract
    /// - Text inputs follow the coercion policy: when the field already has a
    ///   value of some type (instance value, else variant default), the text
    ///   is parsed as that type; otherwise it is stored as text.
    /// - Any invalid field aborts the update before the record is modified.
    /// - A failed save restores the record as it was before the call.
    pub fn update_fields(
        &mut self,
        variant_name: &str,
        id: &str,
        fields: Vec<(String, FieldInput)>,
    ) -> StoreResult<()> {
        let variant = self.variant(variant_name)?;
        let key = record_key(variant, id);

        let record = self.store.get(&key)?;
        let mut resolved = Vec::with_capacity(fields.len());
        for (name, input) in fields {
            if is_reserved_field(&name) {
                return Err(StoreError::ReservedField(name));
            }
            let value = match input {
                FieldInput::Value(value) => value,
                FieldInput::Text(raw) => coerce_text(record, &name, &raw)?,
            };
            value.check(&name)?;
            resolved.push((name, value));
        }
        let previous = record.clone();

        let field_count = resolved.len();
        let record = self
            .store
            .all_mut()
            .get_mut(&key)
            .ok_or_else(|| StoreError::RecordNotFound(key.clone()))?;
        for (name, value) in resolved {
            record.set_field(name, value)?;
        }
        if let Err(err) = self.store.save(&key) {
            self.store.all_mut().insert(key, previous);
            return Err(err);
        }
        info!(
            "event=record_update module=service status=ok variant={} fields={}",
            variant.name(),
            field_count
        );
        Ok(())
    }
}

fn coerce_text(record: &Record, field: &str, raw: &str) -> StoreResult<FieldValue> {
    match record.field(field) {
        Some(current) => current.kind().parse(field, raw),
        None => Ok(FieldValue::Text(raw.to_string())),
    }
}
