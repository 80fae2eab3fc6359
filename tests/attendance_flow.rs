//! End-to-end attendance and proximity behavior over the in-memory repositories

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use common::{event, harness, north_of_venue, running_event, VENUE};
use geoattend::{
    config::ProximityConfig,
    error::AppResult,
    geofence::{GeofenceSpec, Point},
    models::attendance::{AttendanceRecord, NewAttendance},
    repository::{
        memory::{MemoryAttendanceStore, MemoryEventSource},
        AttendanceStore,
    },
    services::Services,
    AppError,
};
use tokio::sync::Barrier;

/// Holds every caller after its open-session lookup until all of them have
/// looked, so they all reach `insert_attendance` believing no session is open
struct LookupBarrierStore {
    inner: Arc<MemoryAttendanceStore>,
    gate: Barrier,
}

#[async_trait]
impl AttendanceStore for LookupBarrierStore {
    async fn insert_attendance(&self, record: NewAttendance) -> AppResult<AttendanceRecord> {
        self.inner.insert_attendance(record).await
    }

    async fn update_attendance_checkout(
        &self,
        id: i64,
        time: DateTime<Utc>,
        location: Point,
    ) -> AppResult<AttendanceRecord> {
        self.inner.update_attendance_checkout(id, time, location).await
    }

    async fn find_open_attendance(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> AppResult<Option<AttendanceRecord>> {
        let open = self.inner.find_open_attendance(user_id, event_id).await;
        self.gate.wait().await;
        open
    }

    async fn list_event_attendances(&self, event_id: i64) -> AppResult<Vec<AttendanceRecord>> {
        self.inner.list_event_attendances(event_id).await
    }
}

fn open_count(store: &MemoryAttendanceStore) -> usize {
    store
        .snapshot()
        .unwrap()
        .into_iter()
        .filter(|r| r.is_open())
        .count()
}

#[tokio::test]
async fn test_check_in_gating() {
    let t0 = Utc.with_ymd_and_hms(2025, 9, 20, 10, 0, 0).unwrap();
    let t1 = t0 + Duration::hours(4);
    let h = harness(vec![event(
        1,
        t0,
        t1,
        Some(GeofenceSpec::circle(VENUE, 50.0).unwrap()),
    )]);
    let attendance = &h.services.attendance;

    let err = attendance
        .check_in(7, 1, VENUE, t0 - Duration::seconds(1))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EventNotStarted));

    let during = t0 + Duration::hours(1);
    let err = attendance
        .check_in(7, 1, north_of_venue(100.0), during)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::OutsideGeofence));

    let record = attendance
        .check_in(7, 1, north_of_venue(10.0), during)
        .await
        .unwrap();
    assert!(record.is_open());
    assert_eq!(h.store.snapshot().unwrap().len(), 1);

    let err = attendance
        .check_in(7, 2, VENUE, during)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::EventNotFound(2)));
}

#[tokio::test]
async fn test_checkout_lifecycle_and_re_entry() {
    let h = harness(vec![running_event(1)]);
    let attendance = &h.services.attendance;
    let now = Utc::now();

    let err = attendance.check_out(3, 1, VENUE, now).await.unwrap_err();
    assert!(matches!(err, AppError::NoActiveSession));

    let first = attendance.check_in(3, 1, VENUE, now).await.unwrap();
    assert!(attendance.is_present(3, 1).await.unwrap());

    let closed = attendance
        .check_out(3, 1, Point::new(0.0, 0.0), now + Duration::minutes(20))
        .await
        .unwrap();
    assert_eq!(closed.id, first.id);
    assert!(!attendance.is_present(3, 1).await.unwrap());

    let err = attendance
        .check_out(3, 1, VENUE, now + Duration::minutes(21))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NoActiveSession));

    let second = attendance
        .check_in(3, 1, VENUE, now + Duration::minutes(30))
        .await
        .unwrap();
    assert_ne!(second.id, first.id);
    assert!(attendance.is_present(3, 1).await.unwrap());

    let records = h.store.snapshot().unwrap();
    assert_eq!(records.len(), 2);
    assert!(!records[0].is_open());
    assert!(records[1].is_open());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_check_ins_create_one_open_record() {
    let h = harness(vec![running_event(1)]);
    let attendance = Arc::new(h.services.attendance.clone());
    let now = Utc::now();

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let attendance = attendance.clone();
            tokio::spawn(async move { attendance.check_in(5, 1, VENUE, now).await })
        })
        .collect();

    let mut successes = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AppError::AlreadyCheckedIn) => {}
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(open_count(&h.store), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_check_ins_racing_past_lookup_create_one_open_record() {
    const RACERS: usize = 4;

    let inner = Arc::new(MemoryAttendanceStore::new());
    let store = Arc::new(LookupBarrierStore {
        inner: inner.clone(),
        gate: Barrier::new(RACERS),
    });
    let events = Arc::new(MemoryEventSource::new(vec![running_event(1)]));
    let services = Services::new(events, store, &ProximityConfig::default());
    let attendance = Arc::new(services.attendance);
    let now = Utc::now();

    let tasks: Vec<_> = (0..RACERS)
        .map(|_| {
            let attendance = attendance.clone();
            tokio::spawn(async move { attendance.check_in(5, 1, VENUE, now).await })
        })
        .collect();

    let mut successes = 0;
    let mut rejected = 0;
    for task in tasks {
        match task.await.unwrap() {
            Ok(_) => successes += 1,
            Err(AppError::AlreadyCheckedIn) => rejected += 1,
            Err(other) => panic!("unexpected error: {:?}", other),
        }
    }

    assert_eq!(successes, 1);
    assert_eq!(rejected, RACERS - 1);
    assert_eq!(open_count(&inner), 1);
    assert_eq!(inner.snapshot().unwrap().len(), 1);
}

#[tokio::test]
async fn test_attendee_ids_are_distinct() {
    let h = harness(vec![running_event(1)]);
    let attendance = &h.services.attendance;
    let now = Utc::now();

    for user in [9, 4, 9] {
        attendance.check_in(user, 1, VENUE, now).await.unwrap();
        attendance.check_out(user, 1, VENUE, now).await.unwrap();
    }

    assert_eq!(attendance.event_attendee_ids(1).await.unwrap(), vec![4, 9]);
    assert_eq!(attendance.event_attendances(1).await.unwrap().len(), 3);
    assert!(matches!(
        attendance.event_attendances(77).await.unwrap_err(),
        AppError::EventNotFound(77)
    ));
}

#[tokio::test]
async fn test_nearby_ordering_and_pagination() {
    let now = Utc::now();
    let circle = |radius| Some(GeofenceSpec::circle(VENUE, radius).unwrap());
    let square = GeofenceSpec::polygon(vec![
        Point::new(48.0, 2.0),
        Point::new(48.0, 3.0),
        Point::new(49.0, 3.0),
        Point::new(49.0, 2.0),
    ])
    .unwrap();

    let h = harness(vec![
        event(10, now + Duration::hours(5), now + Duration::hours(6), circle(30.0)),
        event(11, now + Duration::hours(1), now + Duration::hours(2), circle(30.0)),
        event(12, now + Duration::hours(3), now + Duration::hours(4), circle(30.0)),
        // excluded: polygon, unfenced, already over
        event(13, now, now + Duration::hours(1), Some(square)),
        event(14, now, now + Duration::hours(1), None),
        event(15, now - Duration::hours(3), now - Duration::hours(2), circle(30.0)),
    ]);
    h.events
        .upsert(event(
            16,
            now + Duration::hours(2),
            now + Duration::hours(3),
            Some(GeofenceSpec::circle(Point::new(40.0, -3.7), 30.0).unwrap()),
        ))
        .unwrap();

    let proximity = &h.services.proximity;
    let all: Vec<i64> = proximity
        .find_nearby(north_of_venue(500.0), 1_000.0, 10, 0)
        .await
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(all, vec![11, 12, 10]);

    let page = proximity
        .find_nearby(north_of_venue(500.0), 1_000.0, 1, 1)
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].id, 12);

    // Too far for a 100 m search around a 30 m fence
    assert!(proximity
        .find_nearby(north_of_venue(500.0), 100.0, 10, 0)
        .await
        .unwrap()
        .is_empty());
}
