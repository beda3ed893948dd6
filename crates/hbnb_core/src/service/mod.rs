//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate store calls into the console's command vocabulary.
//! - Keep the console decoupled from durable-file details.

pub mod record_service;
