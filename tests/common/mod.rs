//! Shared fixtures for integration tests

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use geoattend::{
    config::{AppConfig, ProximityConfig},
    geofence::{GeofenceSpec, Point},
    models::event::Event,
    repository::memory::{MemoryAttendanceStore, MemoryEventSource},
    services::Services,
    AppState,
};

pub const VENUE: Point = Point {
    latitude: 48.8584,
    longitude: 2.2945,
};

/// A point roughly `meters` north of `VENUE`
pub fn north_of_venue(meters: f64) -> Point {
    Point::new(VENUE.latitude + meters / 111_195.0, VENUE.longitude)
}

pub fn event(
    id: i64,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    geofence: Option<GeofenceSpec>,
) -> Event {
    Event {
        id,
        name: format!("Event {}", id),
        description: Some("Integration fixture".to_string()),
        location: Some("Champ de Mars".to_string()),
        geofence,
        start_time: start,
        end_time: end,
        brand_id: None,
        created_at: start - Duration::days(1),
    }
}

/// An event running now, fenced by a 50 m circle around `VENUE`
pub fn running_event(id: i64) -> Event {
    let now = Utc::now();
    event(
        id,
        now - Duration::hours(1),
        now + Duration::hours(2),
        Some(GeofenceSpec::circle(VENUE, 50.0).unwrap()),
    )
}

pub struct Harness {
    pub events: Arc<MemoryEventSource>,
    pub store: Arc<MemoryAttendanceStore>,
    pub services: Services,
}

pub fn harness(events: Vec<Event>) -> Harness {
    let events = Arc::new(MemoryEventSource::new(events));
    let store = Arc::new(MemoryAttendanceStore::new());
    let services = Services::new(events.clone(), store.clone(), &ProximityConfig::default());
    Harness {
        events,
        store,
        services,
    }
}

pub fn app_state(harness: &Harness) -> AppState {
    AppState {
        config: Arc::new(AppConfig::default()),
        services: Arc::new(harness.services.clone()),
    }
}
