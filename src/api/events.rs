//! Nearby events endpoint

use axum::{
    extract::{Query, State},
    Json,
};

use crate::{
    config::ProximityConfig,
    error::AppResult,
    geofence::Point,
    models::event::{Event, NearbyQuery},
};

/// Search arguments after applying defaults and limits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NearbySearch {
    pub point: Point,
    pub radius_meters: f64,
    pub limit: usize,
    pub offset: usize,
}

impl NearbySearch {
    /// Out-of-range values fall back to defaults instead of being rejected
    pub fn from_query(query: &NearbyQuery, limits: &ProximityConfig) -> Self {
        let radius_km = match query.radius_km {
            Some(r) if r.is_finite() && r >= 0.0 => r.min(limits.max_radius_km),
            _ => limits.default_radius_km,
        };

        let limit = match query.limit {
            Some(l) if l > 0 => (l as usize).min(limits.max_limit),
            _ => limits.default_limit,
        };

        let offset = query.offset.filter(|o| *o > 0).unwrap_or(0) as usize;

        Self {
            point: Point::new(query.latitude, query.longitude),
            radius_meters: radius_km * 1000.0,
            limit,
            offset,
        }
    }
}

/// Upcoming events whose circular geofence is within reach of a location
#[utoipa::path(
    get,
    path = "/events/nearby",
    tag = "events",
    params(NearbyQuery),
    responses(
        (status = 200, description = "Nearby events ordered by start time", body = Vec<Event>)
    )
)]
pub async fn nearby_events(
    State(state): State<crate::AppState>,
    Query(query): Query<NearbyQuery>,
) -> AppResult<Json<Vec<Event>>> {
    let search = NearbySearch::from_query(&query, &state.config.proximity);
    let events = state
        .services
        .proximity
        .find_nearby(search.point, search.radius_meters, search.limit, search.offset)
        .await?;
    Ok(Json(events))
}
