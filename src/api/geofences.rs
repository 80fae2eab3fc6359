//! Geofence validation and containment endpoints

use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    geofence::{self, GeofenceDocument, GeofenceSpec, Point},
};

/// Containment check request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ContainsRequest {
    /// Geofence in its persisted encoding
    #[schema(value_type = GeofenceDocument)]
    pub geofence: serde_json::Value,
    pub point: Point,
}

/// Containment check result
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ContainsResponse {
    pub inside: bool,
}

/// Validate a geofence definition and return its normalized form
#[utoipa::path(
    post,
    path = "/geofences/validate",
    tag = "geofences",
    request_body(content = GeofenceDocument, content_type = "application/json"),
    responses(
        (status = 200, description = "Geofence is valid", body = GeofenceDocument),
        (status = 400, description = "Invalid geofence")
    )
)]
pub async fn validate_geofence(body: String) -> AppResult<Json<GeofenceSpec>> {
    let spec = geofence::parse(&body)?;
    Ok(Json(spec))
}

/// Test whether a point lies inside a geofence
#[utoipa::path(
    post,
    path = "/geofences/contains",
    tag = "geofences",
    request_body = ContainsRequest,
    responses(
        (status = 200, description = "Containment result", body = ContainsResponse),
        (status = 400, description = "Invalid geofence")
    )
)]
pub async fn contains_point(Json(req): Json<ContainsRequest>) -> AppResult<Json<ContainsResponse>> {
    let spec = geofence::from_value(req.geofence)?;
    Ok(Json(ContainsResponse {
        inside: geofence::contains(req.point, &spec),
    }))
}
