//! Configuration module
//!
//! Environment-driven configuration for the API server. `.env` files are
//! honored in development via `dotenvy`; every value has a sensible default
//! except the database URL and the JWT secret.

use std::env;

use crate::error::AppError;

const DEFAULT_SERVER_PORT: u16 = 8080;
const DEFAULT_MAX_CONNECTIONS: u32 = 20;
const DEFAULT_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_JWT_EXPIRY_HOURS: i64 = 24;
/// Hosts that select the master-console route table when nothing is
/// configured. Mirrors a local setup where `127.0.0.1` is the console and
/// `localhost` (plus school subdomains) is the school app.
const DEFAULT_ADMIN_HOSTS: &str = "admin.localhost,master.localhost,127.0.0.1";

#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub database_url: String,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    /// Exact (case-insensitive, port-stripped) host names that serve the
    /// master console. Every other host gets the school route table.
    pub admin_hosts: Vec<String>,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        // Load .env if present; ignored in production images.
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| AppError::Internal("DATABASE_URL must be set".to_string()))?;
        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| AppError::Internal("JWT_SECRET must be set".to_string()))?;
        if jwt_secret.len() < 32 {
            return Err(AppError::Internal(
                "JWT_SECRET must be at least 32 characters".to_string(),
            ));
        }

        Ok(Self {
            server_port: parse_or(env::var("SERVER_PORT").ok(), DEFAULT_SERVER_PORT),
            database_url,
            db_max_connections: parse_or(
                env::var("DB_MAX_CONNECTIONS").ok(),
                DEFAULT_MAX_CONNECTIONS,
            ),
            db_timeout_seconds: parse_or(
                env::var("DB_TIMEOUT_SECONDS").ok(),
                DEFAULT_CONNECTION_TIMEOUT_SECS,
            ),
            jwt_secret,
            jwt_expiry_hours: parse_or(env::var("JWT_EXPIRY_HOURS").ok(), DEFAULT_JWT_EXPIRY_HOURS),
            admin_hosts: parse_host_list(
                &env::var("ADMIN_HOSTS").unwrap_or_else(|_| DEFAULT_ADMIN_HOSTS.to_string()),
            ),
            cors_origins: parse_list(&env::var("CORS_ORIGINS").unwrap_or_default()),
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.parse().ok()).unwrap_or(default)
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Admin hosts are matched case-insensitively and without ports, so normalize
/// once at load time.
fn parse_host_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.to_ascii_lowercase())
        .collect()
}
