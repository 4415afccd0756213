//! HTTP API handlers for iris-web

pub mod health;
pub mod render;
pub mod ui;

pub use health::health_routes;
pub use ui::ui_routes;
