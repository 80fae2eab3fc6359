//! Geoattend
//!
//! Geofence-gated event attendance: decides whether a user may check in to
//! an event from where they stand, tracks open and closed attendance
//! sessions, and finds events near a location.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod geofence;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
