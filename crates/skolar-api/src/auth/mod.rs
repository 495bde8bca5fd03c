pub mod jwt;
pub mod middleware;
pub mod models;
pub mod password;

pub use models::Actor;
