//! Record store contracts and the JSON file implementation.
//!
//! # Responsibility
//! - Define the store interface consumed by services and the console.
//! - Keep durable-file details inside the persistence boundary.
//!
//! # Invariants
//! - The store is the only owner of the live keyed collection.
//! - Mutating helpers (`save`, `destroy`) flush the whole collection before
//!   returning.

pub mod file_storage;
pub mod record_store;
