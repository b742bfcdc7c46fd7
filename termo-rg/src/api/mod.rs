//! HTTP API handlers for termo-rg

pub mod health;
pub mod reports;

pub use health::health_routes;
pub use reports::create_report;
