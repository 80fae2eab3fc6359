//! In-process repositories for tests and database-less runs

use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    geofence::Point,
    models::{
        attendance::{AttendanceRecord, NewAttendance},
        event::Event,
    },
};

use super::{AttendanceStore, EventSource};

fn poisoned<T>(_: T) -> AppError {
    AppError::Internal("in-memory repository lock poisoned".to_string())
}

/// Event catalogue held in memory
#[derive(Default)]
pub struct MemoryEventSource {
    events: RwLock<Vec<Event>>,
}

impl MemoryEventSource {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    /// Add or replace an event
    pub fn upsert(&self, event: Event) -> AppResult<()> {
        let mut events = self.events.write().map_err(poisoned)?;
        events.retain(|e| e.id != event.id);
        events.push(event);
        Ok(())
    }
}

#[async_trait]
impl EventSource for MemoryEventSource {
    async fn get_event(&self, id: i64) -> AppResult<Event> {
        let events = self.events.read().map_err(poisoned)?;
        events
            .iter()
            .find(|e| e.id == id)
            .cloned()
            .ok_or(AppError::EventNotFound(id))
    }

    async fn list_upcoming_events(&self, cap: usize) -> AppResult<Vec<Event>> {
        let now = Utc::now();
        let events = self.events.read().map_err(poisoned)?;

        let mut upcoming: Vec<Event> = events.iter().filter(|e| e.end_time >= now).cloned().collect();
        upcoming.sort_by(|a, b| a.start_time.cmp(&b.start_time).then(a.id.cmp(&b.id)));
        upcoming.truncate(cap);
        Ok(upcoming)
    }
}

#[derive(Default)]
struct AttendanceTable {
    records: Vec<AttendanceRecord>,
    next_id: i64,
}

/// Attendance records held in memory.
///
/// One mutex guards the whole table, so the open-session check and the
/// insert happen as a single step.
#[derive(Default)]
pub struct MemoryAttendanceStore {
    table: Mutex<AttendanceTable>,
}

impl MemoryAttendanceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every stored record, in insertion order
    pub fn snapshot(&self) -> AppResult<Vec<AttendanceRecord>> {
        Ok(self.table.lock().map_err(poisoned)?.records.clone())
    }
}

#[async_trait]
impl AttendanceStore for MemoryAttendanceStore {
    async fn insert_attendance(&self, record: NewAttendance) -> AppResult<AttendanceRecord> {
        let mut table = self.table.lock().map_err(poisoned)?;

        let open_exists = table.records.iter().any(|r| {
            r.user_id == record.user_id && r.event_id == record.event_id && r.is_open()
        });
        if open_exists {
            return Err(AppError::AlreadyCheckedIn);
        }

        table.next_id += 1;
        let stored = AttendanceRecord {
            id: table.next_id,
            user_id: record.user_id,
            event_id: record.event_id,
            check_in_time: record.check_in_time,
            check_out_time: None,
            check_in_location: record.check_in_location,
            check_out_location: None,
            created_at: Utc::now(),
        };
        table.records.push(stored.clone());
        Ok(stored)
    }

    async fn update_attendance_checkout(
        &self,
        id: i64,
        time: DateTime<Utc>,
        location: Point,
    ) -> AppResult<AttendanceRecord> {
        let mut table = self.table.lock().map_err(poisoned)?;

        let record = table
            .records
            .iter_mut()
            .find(|r| r.id == id && r.is_open())
            .ok_or(AppError::NoActiveSession)?;

        record.check_out_time = Some(time);
        record.check_out_location.get_or_insert(location);
        Ok(record.clone())
    }

    async fn find_open_attendance(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> AppResult<Option<AttendanceRecord>> {
        let table = self.table.lock().map_err(poisoned)?;
        Ok(table
            .records
            .iter()
            .find(|r| r.user_id == user_id && r.event_id == event_id && r.is_open())
            .cloned())
    }

    async fn list_event_attendances(&self, event_id: i64) -> AppResult<Vec<AttendanceRecord>> {
        let table = self.table.lock().map_err(poisoned)?;
        let mut records: Vec<AttendanceRecord> = table
            .records
            .iter()
            .filter(|r| r.event_id == event_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.check_in_time.cmp(&a.check_in_time).then(b.id.cmp(&a.id)));
        Ok(records)
    }
}
