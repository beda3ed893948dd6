use hbnb_core::{
    FieldInput, FieldKind, FieldValue, FileStorage, Record, RecordService, RecordStore, StoreError,
    Variant,
};
use tempfile::TempDir;

fn setup() -> (TempDir, RecordService<FileStorage>) {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path().join("file.json")).unwrap();
    (dir, RecordService::new(storage))
}

fn reopen(dir: &TempDir) -> FileStorage {
    FileStorage::open(dir.path().join("file.json")).unwrap()
}

#[test]
fn create_persists_a_fresh_record_immediately() {
    let (dir, mut service) = setup();
    let id = service.create("User").unwrap();

    let record = service.show("User", &id).unwrap();
    assert_eq!(record.variant(), Variant::User);
    assert_eq!(record.created_at(), record.updated_at());
    assert!(reopen(&dir).all().contains_key(&format!("User.{id}")));
}

#[test]
fn unknown_variant_is_rejected_everywhere() {
    let (_dir, mut service) = setup();
    assert!(matches!(service.create("Foo"), Err(StoreError::UnknownVariant(_))));
    assert!(matches!(service.show("Foo", "1"), Err(StoreError::UnknownVariant(_))));
    assert!(matches!(service.count("Foo"), Err(StoreError::UnknownVariant(_))));
    assert!(matches!(service.all(Some("Foo")), Err(StoreError::UnknownVariant(_))));
}

#[test]
fn show_and_destroy_report_missing_records() {
    let (_dir, mut service) = setup();
    assert!(matches!(
        service.show("User", "missing"),
        Err(StoreError::RecordNotFound(ref key)) if key == "User.missing"
    ));
    assert!(matches!(
        service.destroy("User", "missing"),
        Err(StoreError::RecordNotFound(_))
    ));
}

#[test]
fn update_coerces_to_existing_type_and_saves() {
    let (dir, mut service) = setup();
    let id = service.create("Place").unwrap();
    let created_at = service.show("Place", &id).unwrap().created_at();

    service.update("Place", &id, "number_rooms", "4").unwrap();
    service.update("Place", &id, "latitude", "37.77").unwrap();
    service.update("Place", &id, "amenity_ids", "wifi, pool").unwrap();
    service.update("Place", &id, "nickname", "42").unwrap();

    let record = service.show("Place", &id).unwrap();
    assert!(record.updated_at() > created_at);
    assert_eq!(record.field("number_rooms"), Some(FieldValue::Integer(4)));
    assert_eq!(record.field("latitude"), Some(FieldValue::Float(37.77)));
    assert_eq!(
        record.field("amenity_ids"),
        Some(FieldValue::TextList(vec!["wifi".into(), "pool".into()]))
    );
    // No current value: stored as text.
    assert_eq!(record.field("nickname"), Some(FieldValue::from("42")));

    let reloaded = reopen(&dir);
    let persisted = reloaded.get(&format!("Place.{id}")).unwrap();
    assert_eq!(persisted, record);
}

#[test]
fn update_follows_instance_type_for_extra_fields() {
    let (_dir, mut service) = setup();
    let id = service.create("BaseModel").unwrap();
    service
        .update_fields(
            "BaseModel",
            &id,
            vec![(
                "my_number".to_string(),
                FieldInput::Value(FieldValue::Integer(89)),
            )],
        )
        .unwrap();

    service.update("BaseModel", &id, "my_number", "90").unwrap();
    assert_eq!(
        service.show("BaseModel", &id).unwrap().field("my_number"),
        Some(FieldValue::Integer(90))
    );
}

#[test]
fn failed_update_leaves_record_untouched() {
    let (_dir, mut service) = setup();
    let id = service.create("Place").unwrap();
    let before = service.show("Place", &id).unwrap().clone();

    let err = service
        .update_fields(
            "Place",
            &id,
            vec![
                ("name".to_string(), FieldInput::Text("Loft".to_string())),
                ("max_guest".to_string(), FieldInput::Text("many".to_string())),
            ],
        )
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidValue { expected: FieldKind::Integer, .. }
    ));
    assert_eq!(service.show("Place", &id).unwrap(), &before);

    let reserved = service.update("Place", &id, "id", "other").unwrap_err();
    assert!(matches!(reserved, StoreError::ReservedField(ref name) if name == "id"));
    assert_eq!(service.show("Place", &id).unwrap(), &before);
}

#[test]
fn all_and_count_filter_by_exact_variant() {
    let (_dir, mut service) = setup();
    service.create("User").unwrap();
    service.create("User").unwrap();
    service.create("BaseModel").unwrap();

    assert_eq!(service.all(None).unwrap().len(), 3);
    assert_eq!(service.all(Some("User")).unwrap().len(), 2);
    assert_eq!(service.count("User").unwrap(), 2);
    assert_eq!(service.count("BaseModel").unwrap(), 1);
    assert_eq!(service.count("Review").unwrap(), 0);
}

#[test]
fn destroy_removes_from_memory_and_disk() {
    let (dir, mut service) = setup();
    let id = service.create("Amenity").unwrap();

    let removed = service.destroy("Amenity", &id).unwrap();
    assert_eq!(removed.id(), id);
    assert_eq!(service.count("Amenity").unwrap(), 0);
    assert!(reopen(&dir).all().is_empty());
}

fn unwritable() -> (TempDir, RecordService<FileStorage>) {
    let dir = tempfile::tempdir().unwrap();
    let storage = FileStorage::open(dir.path().join("missing_dir").join("file.json")).unwrap();
    (dir, RecordService::new(storage))
}

#[test]
fn failed_create_flush_unregisters_the_record() {
    let (_dir, mut service) = unwritable();

    let err = service.create("User").unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
    assert_eq!(service.count("User").unwrap(), 0);
    assert!(!service.store().path().exists());
}

#[test]
fn failed_update_flush_restores_fields_and_timestamp() {
    let (_dir, mut service) = unwritable();
    let record = Record::new(Variant::Place);
    let id = record.id().to_string();
    service.store_mut().register(record);
    let before = service.show("Place", &id).unwrap().clone();

    let err = service.update("Place", &id, "number_rooms", "4").unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
    assert_eq!(service.show("Place", &id).unwrap(), &before);
    assert!(service.show("Place", &id).unwrap().instance_fields().is_empty());
}

#[test]
fn typed_update_rejects_non_finite_float() {
    let (_dir, mut service) = setup();
    let id = service.create("Place").unwrap();

    let err = service
        .update_fields(
            "Place",
            &id,
            vec![
                ("name".to_string(), FieldInput::Text("Loft".to_string())),
                (
                    "latitude".to_string(),
                    FieldInput::Value(FieldValue::Float(f64::INFINITY)),
                ),
            ],
        )
        .unwrap_err();
    assert!(matches!(
        err,
        StoreError::InvalidValue { expected: FieldKind::Float, .. }
    ));
    assert!(service.show("Place", &id).unwrap().instance_fields().is_empty());
}
