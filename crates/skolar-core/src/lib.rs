//! Core domain types for the Skolar multi-tenant school platform.
//!
//! This crate holds everything the HTTP and storage layers share: the school
//! and actor models, the role classifier, the error taxonomy, routing-key
//! validation, configuration, and the registry traits implemented by
//! `skolar-db`.

pub mod config;
pub mod error;
pub mod models;
pub mod registry;
pub mod routing_key;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
