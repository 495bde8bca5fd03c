//! Routing-key (subdomain) validation.
//!
//! A routing key is the unique, URL-safe token that identifies a school in
//! host-based lookup (`<key>.example.com`) and doubles as its display slug.

use crate::error::AppError;

/// Keys that collide with infrastructure subdomains and can never be claimed
/// by a school.
pub const RESERVED_ROUTING_KEYS: &[&str] = &[
    "www",
    "admin",
    "superadmin",
    "api",
    "mail",
    "ftp",
    "localhost",
];

/// Host labels the resolver skips when extracting a subdomain. A request to
/// `www.example.com` must not be treated as a lookup for a school named "www".
pub const INFRASTRUCTURE_LABELS: &[&str] = &["www"];

/// Lowercase a candidate routing key. Lookup and uniqueness are both
/// case-insensitive, so every code path normalizes before comparing.
pub fn normalize(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

/// Validate a routing key at provisioning time and return its normalized form.
///
/// Rules: non-empty, at most 63 characters (a DNS label), lowercase letters,
/// digits and hyphens only, no leading/trailing hyphen, not reserved.
pub fn validate(key: &str) -> Result<String, AppError> {
    let key = normalize(key);

    if key.is_empty() {
        return Err(AppError::InvalidInput(
            "Routing key must not be empty".to_string(),
        ));
    }
    if key.len() > 63 {
        return Err(AppError::InvalidInput(
            "Routing key must be at most 63 characters".to_string(),
        ));
    }
    if !key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-') {
        return Err(AppError::InvalidInput(
            "Routing key may contain only lowercase letters, digits and hyphens".to_string(),
        ));
    }
    if key.starts_with('-') || key.ends_with('-') {
        return Err(AppError::InvalidInput(
            "Routing key must not start or end with a hyphen".to_string(),
        ));
    }
    if RESERVED_ROUTING_KEYS.contains(&key.as_str()) {
        return Err(AppError::ReservedRoutingKey(key));
    }

    Ok(key)
}
