//! iris-web library - flower classification web form
//!
//! Serves the measurement form, validates submissions, and renders the
//! predicted species. Exposed as a library so the router can be exercised
//! in integration tests.

use std::sync::Arc;

use axum::Router;
use chrono::{DateTime, Utc};
use iris_common::Predictor;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
///
/// Everything here is built once at startup and never written afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Schema, model, and catalog bundle
    pub predictor: Arc<Predictor>,
    /// Service startup timestamp for uptime reporting
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(predictor: Predictor) -> Self {
        Self {
            predictor: Arc::new(predictor),
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(api::ui_routes())
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
