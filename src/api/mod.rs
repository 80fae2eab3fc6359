//! HTTP handlers for the attendance REST endpoints

pub mod attendance;
pub mod events;
pub mod geofences;
pub mod health;
pub mod openapi;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{error::AppError, AppState};

/// Header carrying the caller's user id, set by the upstream auth gateway
pub const USER_ID_HEADER: &str = "x-user-id";

/// Extractor for the acting user
pub struct CallerId(pub i64);

#[async_trait]
impl FromRequestParts<AppState> for CallerId {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing user id header".to_string()))?;

        let user_id = raw
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::Authentication("Invalid user id header".to_string()))?;

        Ok(CallerId(user_id))
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(health::health_check))
        // Events
        .route("/events/nearby", get(events::nearby_events))
        // Attendance
        .route("/events/:id/check-in", post(attendance::check_in))
        .route("/events/:id/check-out", post(attendance::check_out))
        .route("/events/:id/attendance-status", get(attendance::attendance_status))
        .route("/events/:id/presence", get(attendance::presence))
        .route("/events/:id/attendances", get(attendance::list_attendances))
        // Geofences
        .route("/geofences/validate", post(geofences::validate_geofence))
        .route("/geofences/contains", post(geofences::contains_point))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
