//! Record domain model.
//!
//! # Responsibility
//! - Define the record shape shared by every variant.
//! - Keep the closed variant table and its default field sets.
//!
//! # Invariants
//! - Every record is addressed by the key `"<VariantName>.<id>"`.
//! - Variants differ only by declared defaults, never by behavior.

pub mod record;
pub mod value;
pub mod variant;
