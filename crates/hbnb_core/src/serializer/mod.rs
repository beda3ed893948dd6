//! Durable text representation of the record collection.
//!
//! # Responsibility
//! - Encode/decode the whole collection as one JSON object.
//! - Own the timestamp text form and the type-tag field name.
//!
//! # Invariants
//! - Top-level keys are `"<VariantName>.<id>"`.
//! - Every value carries the type tag plus ISO-8601 timestamps.

pub mod json;
pub mod timestamp;

/// Field carrying the variant name in exported maps.
pub const TYPE_TAG_FIELD: &str = "__class__";

pub use json::{decode, encode};
