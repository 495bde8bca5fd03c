//! The tenant resolution and isolation engine.
//!
//! Control flow per request: host switch selects a route table, the auth
//! middleware authenticates, the resolver detects the school, the guard
//! decides ALLOW / DENY and attaches the resolved school to the request, and
//! handlers read it through the `SchoolScope` extractor.

pub mod context;
pub mod guard;
pub mod host;
pub mod resolver;
pub mod session;

pub use context::SchoolScope;
pub use guard::tenancy_middleware;
pub use host::{classify_host, HostClass, HostSwitch};
pub use resolver::resolve_school;
