//! Repository layer: collaborator contracts and their implementations

pub mod attendances;
pub mod events;
pub mod memory;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::AppResult,
    geofence::Point,
    models::{
        attendance::{AttendanceRecord, NewAttendance},
        event::Event,
    },
};

/// Read access to the event catalogue
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventSource: Send + Sync {
    /// Fails with `EventNotFound` when no such event exists
    async fn get_event(&self, id: i64) -> AppResult<Event>;

    /// Events that have not ended yet, earliest start first, at most `cap`
    async fn list_upcoming_events(&self, cap: usize) -> AppResult<Vec<Event>>;
}

/// Storage for attendance records.
///
/// Implementations must make `insert_attendance` atomic with respect to
/// "at most one open record per (user, event)" and fail with
/// `AlreadyCheckedIn` instead of creating a second one.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceStore: Send + Sync {
    async fn insert_attendance(&self, record: NewAttendance) -> AppResult<AttendanceRecord>;

    /// Close an open record. The check-out location is only written if the
    /// record has none yet. Fails with `NoActiveSession` if the record is
    /// missing or already closed.
    async fn update_attendance_checkout(
        &self,
        id: i64,
        time: DateTime<Utc>,
        location: Point,
    ) -> AppResult<AttendanceRecord>;

    async fn find_open_attendance(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> AppResult<Option<AttendanceRecord>>;

    /// All records of an event, latest check-in first
    async fn list_event_attendances(&self, event_id: i64) -> AppResult<Vec<AttendanceRecord>>;
}

/// PostgreSQL-backed repositories sharing one pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub events: events::EventsRepository,
    pub attendances: attendances::AttendancesRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            events: events::EventsRepository::new(pool.clone()),
            attendances: attendances::AttendancesRepository::new(pool.clone()),
            pool,
        }
    }
}
