//! HTTP layer of the Skolar multi-tenant school platform.
//!
//! Exposed as a library so integration tests can build the full router
//! against the in-memory registry.

pub mod api_doc;
pub mod auth;
pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod tenancy;
