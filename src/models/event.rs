//! Event model (read-only view of the event catalogue)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppError,
    geofence::{self, GeofenceDocument, GeofenceSpec},
};

/// Event as seen by the attendance service
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Free-text venue description
    pub location: Option<String>,
    /// Area a user must be inside to check in (none means anywhere)
    #[schema(value_type = Option<GeofenceDocument>)]
    pub geofence: Option<GeofenceSpec>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub brand_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Event row as stored, with the geofence still encoded
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub geofence_data: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub brand_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<EventRow> for Event {
    type Error = AppError;

    fn try_from(row: EventRow) -> Result<Self, Self::Error> {
        // Blank column means the event has no geofence
        let geofence = row
            .geofence_data
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .map(geofence::parse)
            .transpose()?;

        Ok(Event {
            id: row.id,
            name: row.name,
            description: row.description,
            location: row.location,
            geofence,
            start_time: row.start_time,
            end_time: row.end_time,
            brand_id: row.brand_id,
            created_at: row.created_at,
        })
    }
}

/// Query parameters for nearby events
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
#[into_params(parameter_in = Query)]
pub struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    /// Search radius in kilometers, added to each event's own radius
    pub radius_km: Option<f64>,
    /// Page size
    pub limit: Option<i64>,
    /// Number of results to skip
    pub offset: Option<i64>,
}
