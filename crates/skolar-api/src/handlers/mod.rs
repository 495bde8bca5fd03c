pub mod auth;
pub mod health;
pub mod provisioning;
pub mod schools;
pub mod students;
pub mod users;
