//! Nearby-event search

use std::sync::Arc;

use crate::{
    error::AppResult,
    geofence::{great_circle_distance, GeofenceSpec, Point},
    models::event::Event,
    repository::EventSource,
};

#[derive(Clone)]
pub struct ProximityService {
    events: Arc<dyn EventSource>,
    candidate_cap: usize,
}

/// Whether `point` is within `radius_meters` of the event's circle geofence.
///
/// The query radius is added to the circle's own radius. Polygon-fenced and
/// unfenced events have no center to measure from and never match.
pub fn within_reach(event: &Event, point: Point, radius_meters: f64) -> bool {
    match &event.geofence {
        Some(GeofenceSpec::Circle {
            center,
            radius_meters: fence_radius,
        }) => great_circle_distance(point, *center) <= fence_radius + radius_meters,
        Some(GeofenceSpec::Polygon { .. }) | None => false,
    }
}

impl ProximityService {
    pub fn new(events: Arc<dyn EventSource>, candidate_cap: usize) -> Self {
        Self {
            events,
            candidate_cap,
        }
    }

    /// Upcoming events near `point`, ordered by start time then id, paginated.
    /// Arguments are expected to be clamped by the caller.
    pub async fn find_nearby(
        &self,
        point: Point,
        radius_meters: f64,
        limit: usize,
        offset: usize,
    ) -> AppResult<Vec<Event>> {
        let candidates = self
            .events
            .list_upcoming_events(self.candidate_cap)
            .await
            .map_err(|e| e.during("nearby search"))?;
        let scanned = candidates.len();

        let mut nearby: Vec<Event> = candidates
            .into_iter()
            .filter(|event| within_reach(event, point, radius_meters))
            .collect();
        nearby.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));

        tracing::debug!(
            scanned,
            matched = nearby.len(),
            radius_meters,
            "Nearby event search"
        );

        Ok(nearby.into_iter().skip(offset).take(limit).collect())
    }
}
