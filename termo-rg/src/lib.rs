//! termo-rg library - Report Generator service
//!
//! HTTP surface over the report build pipeline: accepts an inspection
//! submission as JSON, runs validation, delta diagnostics, and context
//! assembly, drives the map and document collaborators, and returns the
//! build result.

use axum::Router;
use std::sync::Arc;
use termo_common::report::ReportBuilder;
use tower_http::cors::CorsLayer;

pub mod api;
pub mod assembler;
pub mod error;
pub mod map_client;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Report build pipeline with its collaborators wired in
    pub builder: Arc<ReportBuilder>,
}

impl AppState {
    /// Create new application state
    pub fn new(builder: Arc<ReportBuilder>) -> Self {
        Self { builder }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::post;

    Router::new()
        .route("/api/reports", post(api::create_report))
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
