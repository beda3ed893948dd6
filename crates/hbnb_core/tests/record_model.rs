use hbnb_core::{FieldValue, Record, StoreError, Variant, TYPE_TAG_FIELD};
use serde_json::json;

fn persisted(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    value.as_object().cloned().unwrap()
}

#[test]
fn new_record_has_uuid_equal_timestamps_and_read_through_defaults() {
    let record = Record::new(Variant::Place);

    assert!(uuid::Uuid::parse_str(record.id()).is_ok());
    assert_eq!(record.created_at(), record.updated_at());
    assert!(record.instance_fields().is_empty());
    assert_eq!(record.field("number_rooms"), Some(FieldValue::Integer(0)));
    assert_eq!(record.field("latitude"), Some(FieldValue::Float(0.0)));
    assert_eq!(record.field("amenity_ids"), Some(FieldValue::TextList(Vec::new())));
    assert_eq!(record.field("name"), Some(FieldValue::from("")));
    assert_eq!(record.field("undeclared"), None);
    assert_eq!(record.key(), format!("Place.{}", record.id()));
}

#[test]
fn touch_strictly_advances_updated_at() {
    let mut record = Record::new(Variant::BaseModel);
    let created_at = record.created_at();

    record.touch();
    assert!(record.updated_at() > created_at);
    assert_eq!(record.created_at(), created_at);

    let first_touch = record.updated_at();
    record.touch();
    assert!(record.updated_at() > first_touch);
}

#[test]
fn set_field_shadows_default_and_rejects_reserved_names() {
    let mut record = Record::new(Variant::User);
    record.set_field("email", "betty@example.com").unwrap();
    record.set_field("my_number", 89_i64).unwrap();

    assert_eq!(record.field("email"), Some(FieldValue::from("betty@example.com")));
    assert_eq!(record.field("my_number"), Some(FieldValue::Integer(89)));

    for name in ["id", "created_at", "updated_at", TYPE_TAG_FIELD] {
        let err = record.set_field(name, "x").unwrap_err();
        assert!(matches!(err, StoreError::ReservedField(ref field) if field == name));
    }
}

#[test]
fn export_carries_tag_and_text_timestamps_and_is_idempotent() {
    let mut record = Record::new(Variant::City);
    record.set_field("name", "San Francisco").unwrap();
    let display_before = record.to_string();

    let first = record.export();
    let second = record.export();
    assert_eq!(first, second);
    assert_eq!(record.to_string(), display_before);

    assert_eq!(first[TYPE_TAG_FIELD], json!("City"));
    assert_eq!(first["id"], json!(record.id()));
    assert_eq!(first["name"], json!("San Francisco"));
    assert!(first["created_at"].is_string());
    assert!(first["updated_at"].is_string());
    // Defaults are read-through and never exported.
    assert!(!first.contains_key("state_id"));
}

#[test]
fn display_shows_variant_id_and_raw_fields_without_type_tag() {
    let mut record = Record::new(Variant::User);
    record.set_field("first_name", "Betty").unwrap();

    let shown = record.to_string();
    assert!(shown.starts_with(&format!("[User] ({}) {{\"id\": \"{}\"", record.id(), record.id())));
    assert!(shown.contains("\"first_name\": \"Betty\""));
    assert!(shown.ends_with('}'));
    assert!(!shown.contains(TYPE_TAG_FIELD));
}

#[test]
fn from_persisted_discards_tag_parses_timestamps_and_keeps_extra_keys() {
    let map = persisted(json!({
        "id": "56d43177-cc5f-4d6c-a0c1-e167f8c27337",
        "created_at": "2017-09-28T21:03:54.052298",
        "updated_at": "2017-09-28T21:03:54.052302",
        "__class__": "Place",
        "number_rooms": 3,
        "latitude": 37.77,
        "amenity_ids": ["a1", "a2"],
        "nickname": "extra"
    }));

    let record = Record::from_persisted(Variant::Place, &map).unwrap();
    assert_eq!(record.id(), "56d43177-cc5f-4d6c-a0c1-e167f8c27337");
    assert_eq!(
        record.created_at().format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
        "2017-09-28T21:03:54.052298"
    );
    assert!(record.created_at() < record.updated_at());
    assert!(!record.instance_fields().contains_key(TYPE_TAG_FIELD));
    assert_eq!(record.field("number_rooms"), Some(FieldValue::Integer(3)));
    assert_eq!(record.field("latitude"), Some(FieldValue::Float(37.77)));
    assert_eq!(
        record.field("amenity_ids"),
        Some(FieldValue::TextList(vec!["a1".into(), "a2".into()]))
    );
    assert_eq!(record.field("nickname"), Some(FieldValue::from("extra")));
}

#[test]
fn from_persisted_rejects_missing_identity_and_bad_timestamps() {
    let missing_id = persisted(json!({
        "created_at": "2017-09-28T21:03:54.052298",
        "updated_at": "2017-09-28T21:03:54.052298"
    }));
    assert!(matches!(
        Record::from_persisted(Variant::BaseModel, &missing_id),
        Err(StoreError::MalformedPersistedData(_))
    ));

    let missing_updated = persisted(json!({
        "id": "x",
        "created_at": "2017-09-28T21:03:54.052298"
    }));
    assert!(matches!(
        Record::from_persisted(Variant::BaseModel, &missing_updated),
        Err(StoreError::MalformedPersistedData(_))
    ));

    let bad_format = persisted(json!({
        "id": "x",
        "created_at": "yesterday",
        "updated_at": "2017-09-28T21:03:54.052298"
    }));
    assert!(matches!(
        Record::from_persisted(Variant::BaseModel, &bad_format),
        Err(StoreError::MalformedPersistedData(_))
    ));

    let reversed = persisted(json!({
        "id": "x",
        "created_at": "2017-09-28T21:03:55.000000",
        "updated_at": "2017-09-28T21:03:54.000000"
    }));
    assert!(matches!(
        Record::from_persisted(Variant::BaseModel, &reversed),
        Err(StoreError::MalformedPersistedData(_))
    ));
}

#[test]
fn from_persisted_rejects_unsupported_value_shapes() {
    let map = persisted(json!({
        "id": "x",
        "created_at": "2017-09-28T21:03:54.052298",
        "updated_at": "2017-09-28T21:03:54.052298",
        "flag": true
    }));

    let err = Record::from_persisted(Variant::BaseModel, &map).unwrap_err();
    assert!(err.to_string().contains("flag"), "unexpected error: {err}");
}

#[test]
fn set_field_rejects_non_finite_floats() {
    let mut record = Record::new(Variant::Place);
    let err = record.set_field("latitude", f64::NAN).unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidValue { ref field, .. } if field == "latitude"
    ));
    assert!(record.set_field("longitude", f64::NEG_INFINITY).is_err());
    assert!(record.instance_fields().is_empty());
}
