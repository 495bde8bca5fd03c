//! Error types module
//!
//! All errors are unified under the `AppError` enum. Isolation-layer errors
//! (`CrossTenantAccessDenied`, `MisconfiguredActor`) are decided once per
//! request by the tenancy guard; handlers must not re-derive them.
//!
//! The `Database` variant and `From<sqlx::Error>` are gated behind the `sqlx`
//! feature so the domain types stay usable without a database driver.

use std::io;

#[cfg(feature = "sqlx")]
use sqlx::Error as SqlxError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for denied requests worth keeping an eye on
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// The role a capability check was missing. Used in `InsufficientRole`
/// messages; these may name the missing role since they reveal only the
/// caller's own shortcoming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleRequirement {
    Superuser,
    SchoolAdmin,
    Staff,
    Student,
}

impl RoleRequirement {
    pub fn message(&self) -> &'static str {
        match self {
            RoleRequirement::Superuser => "Platform superuser required",
            RoleRequirement::SchoolAdmin => "School administrator required",
            RoleRequirement::Staff => "Staff member required",
            RoleRequirement::Student => "Student account required",
        }
    }
}

/// Metadata for error responses - defines how an error should be presented.
/// This trait allows errors to self-describe their HTTP response
/// characteristics without the core crate depending on an HTTP framework.
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "DUPLICATE_ROUTING_KEY")
    fn error_code(&self) -> &'static str;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[source] SqlxError),

    #[cfg(not(feature = "sqlx"))]
    #[error("Database error: {0}")]
    Database(String),

    /// No school could be determined for a request that needs one.
    #[error("School unresolved: {0}")]
    TenantUnresolved(String),

    /// An actor bound to one school reached a request resolved to another.
    /// Rendered as a generic permission error; the internal fields exist for
    /// logging only and must never reach the client.
    #[error("Cross-school access denied: actor school {actor_school} vs resolved {resolved_school}")]
    CrossTenantAccessDenied {
        actor_school: uuid::Uuid,
        resolved_school: uuid::Uuid,
    },

    /// A bound role with no school binding. Should never occur in a correctly
    /// provisioned system; surfaced as an internal error, not a normal deny.
    #[error("Misconfigured actor {0}: bound role with no school binding")]
    MisconfiguredActor(String),

    /// Actor authenticated and school-matched but lacks the required role.
    #[error("Insufficient role: {}", .0.message())]
    InsufficientRole(RoleRequirement),

    #[error("Routing key already in use: {0}")]
    DuplicateRoutingKey(String),

    #[error("Routing key is reserved: {0}")]
    ReservedRoutingKey(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

// Error conversion implementations
#[cfg(feature = "sqlx")]
impl From<SqlxError> for AppError {
    fn from(err: SqlxError) -> Self {
        AppError::Database(err)
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Internal(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::InvalidInput(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::InvalidInput(format!("UUID parsing error: {}", err))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::InvalidInput(format!("Validation error: {}", err))
    }
}

/// Static metadata per variant: (http_status, error_code, sensitive, log_level).
/// `client_message` stays per-variant for dynamic content.
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, LogLevel) {
    match err {
        AppError::Database(_) => (500, "DATABASE_ERROR", true, LogLevel::Error),
        AppError::TenantUnresolved(_) => (403, "SCHOOL_UNRESOLVED", false, LogLevel::Debug),
        AppError::CrossTenantAccessDenied { .. } => {
            (403, "PERMISSION_DENIED", true, LogLevel::Warn)
        }
        AppError::MisconfiguredActor(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
        AppError::InsufficientRole(_) => (403, "INSUFFICIENT_ROLE", false, LogLevel::Debug),
        AppError::DuplicateRoutingKey(_) => (409, "DUPLICATE_ROUTING_KEY", false, LogLevel::Debug),
        AppError::ReservedRoutingKey(_) => (400, "RESERVED_ROUTING_KEY", false, LogLevel::Debug),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, LogLevel::Debug),
        AppError::BadRequest(_) => (400, "BAD_REQUEST", false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, LogLevel::Debug),
        AppError::Unauthorized(_) => (401, "UNAUTHORIZED", false, LogLevel::Debug),
        AppError::Internal(_) => (500, "INTERNAL_ERROR", true, LogLevel::Error),
        AppError::InternalWithSource { .. } => (500, "INTERNAL_ERROR", true, LogLevel::Error),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::Database(_) => "Database",
            AppError::TenantUnresolved(_) => "TenantUnresolved",
            AppError::CrossTenantAccessDenied { .. } => "CrossTenantAccessDenied",
            AppError::MisconfiguredActor(_) => "MisconfiguredActor",
            AppError::InsufficientRole(_) => "InsufficientRole",
            AppError::DuplicateRoutingKey(_) => "DuplicateRoutingKey",
            AppError::ReservedRoutingKey(_) => "ReservedRoutingKey",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::BadRequest(_) => "BadRequest",
            AppError::NotFound(_) => "NotFound",
            AppError::Unauthorized(_) => "Unauthorized",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).3
    }

    fn client_message(&self) -> String {
        match self {
            AppError::Database(_) => "Failed to access database".to_string(),
            AppError::TenantUnresolved(ref msg) => msg.clone(),
            // Deliberately generic: must not reveal the other school's
            // identity or whether it exists.
            AppError::CrossTenantAccessDenied { .. } => {
                "You do not have permission to perform this action".to_string()
            }
            AppError::MisconfiguredActor(_) => "Internal server error".to_string(),
            AppError::InsufficientRole(requirement) => requirement.message().to_string(),
            AppError::DuplicateRoutingKey(ref key) => {
                format!("Routing key '{}' is already taken", key)
            }
            AppError::ReservedRoutingKey(ref key) => {
                format!("Routing key '{}' is reserved", key)
            }
            AppError::InvalidInput(ref msg) => msg.clone(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::Unauthorized(ref msg) => msg.clone(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}
