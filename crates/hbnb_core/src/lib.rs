//! Core record persistence for the hbnb console.
//! This crate is the single source of truth for identity and storage invariants.

pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod serializer;
pub mod service;

pub use config::{CoreConfig, DEFAULT_FILE_PATH};
pub use error::{StoreError, StoreResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::record::{is_reserved_field, record_key, Record, RecordId, RecordMap};
pub use model::value::{FieldKind, FieldValue};
pub use model::variant::Variant;
pub use repo::file_storage::FileStorage;
pub use repo::record_store::{RecordStore, StoreState};
pub use serializer::timestamp::Timestamp;
pub use serializer::TYPE_TAG_FIELD;
pub use service::record_service::{FieldInput, RecordService};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
