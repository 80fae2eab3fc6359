//! Geofence model and containment engine
//!
//! Geofences are circles (center + radius in meters) or closed polygons.
//! Everything here is pure and can be called from any task without locking.

pub mod containment;
pub mod distance;
pub mod shape;

pub use containment::contains;
pub use distance::{great_circle_distance, EARTH_RADIUS_METERS};
pub use shape::{Geofence, GeofenceDocument, GeofenceKind, GeofenceSpec, Point};

use crate::error::{AppError, AppResult};

/// Parse the persisted textual encoding of a geofence
pub fn parse(raw: &str) -> AppResult<GeofenceSpec> {
    if raw.trim().is_empty() {
        return Err(AppError::InvalidGeofence("empty geofence data".to_string()));
    }

    let doc: GeofenceDocument = serde_json::from_str(raw)
        .map_err(|e| AppError::InvalidGeofence(format!("malformed geofence: {}", e)))?;

    GeofenceSpec::try_from(doc)
}

/// Validate a geofence already decoded as a JSON value, e.g. nested in a
/// request body
pub fn from_value(value: serde_json::Value) -> AppResult<GeofenceSpec> {
    let doc: GeofenceDocument = serde_json::from_value(value)
        .map_err(|e| AppError::InvalidGeofence(format!("malformed geofence: {}", e)))?;

    GeofenceSpec::try_from(doc)
}
