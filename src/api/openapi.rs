//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{attendance, events, geofences, health};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Geoattend API",
        version = "0.1.0",
        description = "Geofence-gated event attendance REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        // Events
        events::nearby_events,
        // Attendance
        attendance::check_in,
        attendance::check_out,
        attendance::attendance_status,
        attendance::presence,
        attendance::list_attendances,
        // Geofences
        geofences::validate_geofence,
        geofences::contains_point,
    ),
    components(
        schemas(
            crate::geofence::Point,
            crate::geofence::GeofenceKind,
            crate::geofence::GeofenceDocument,
            crate::geofence::shape::CircleDocument,
            crate::geofence::shape::PolygonDocument,
            crate::models::event::Event,
            crate::models::event::NearbyQuery,
            crate::models::attendance::AttendanceRecord,
            crate::models::attendance::LocationRequest,
            crate::models::attendance::PresenceResponse,
            geofences::ContainsRequest,
            geofences::ContainsResponse,
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "events", description = "Event discovery"),
        (name = "attendance", description = "Check-in and check-out"),
        (name = "geofences", description = "Geofence tools")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
