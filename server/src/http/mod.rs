pub mod auth;
pub mod health;
pub mod ingest;
pub mod metrics;
pub mod players;
pub mod routes;

pub use auth::JwtAuth;
