//! Attendance lifecycle: geofence-gated check-in and check-out

use std::{collections::BTreeSet, sync::Arc};

use chrono::{DateTime, Utc};

use crate::{
    error::{AppError, AppResult},
    geofence::Point,
    models::{
        attendance::{AttendanceRecord, NewAttendance},
        event::Event,
    },
    repository::{AttendanceStore, EventSource},
};

#[derive(Clone)]
pub struct AttendanceService {
    events: Arc<dyn EventSource>,
    store: Arc<dyn AttendanceStore>,
}

/// Reject instants outside `[start_time, end_time]`
fn ensure_within_window(event: &Event, now: DateTime<Utc>) -> AppResult<()> {
    if now < event.start_time {
        return Err(AppError::EventNotStarted);
    }
    if now > event.end_time {
        return Err(AppError::EventEnded);
    }
    Ok(())
}

impl AttendanceService {
    pub fn new(events: Arc<dyn EventSource>, store: Arc<dyn AttendanceStore>) -> Self {
        Self { events, store }
    }

    /// Record a user as present at an event.
    ///
    /// Checks, in order: the event exists, `now` is inside its time window,
    /// `point` is inside its geofence (if it has one), and the user has no
    /// open session there yet.
    pub async fn check_in(
        &self,
        user_id: i64,
        event_id: i64,
        point: Point,
        now: DateTime<Utc>,
    ) -> AppResult<AttendanceRecord> {
        let event = self
            .events
            .get_event(event_id)
            .await
            .map_err(|e| e.during("check-in"))?;

        ensure_within_window(&event, now).inspect_err(|e| {
            tracing::debug!(user_id, event_id, "Check-in rejected: {}", e);
        })?;

        if let Some(fence) = &event.geofence {
            if !fence.contains(point) {
                tracing::debug!(
                    user_id,
                    event_id,
                    lat = point.latitude,
                    lng = point.longitude,
                    "Check-in rejected: outside geofence"
                );
                return Err(AppError::OutsideGeofence);
            }
        }

        let open = self
            .store
            .find_open_attendance(user_id, event_id)
            .await
            .map_err(|e| e.during("check-in"))?;
        if open.is_some() {
            return Err(AppError::AlreadyCheckedIn);
        }

        // The store re-checks atomically; a concurrent check-in that slipped
        // past the lookup above still ends in AlreadyCheckedIn
        let record = self
            .store
            .insert_attendance(NewAttendance {
                user_id,
                event_id,
                check_in_time: now,
                check_in_location: point,
            })
            .await
            .map_err(|e| e.during("check-in"))?;

        tracing::info!(user_id, event_id, attendance_id = record.id, "User checked in");
        Ok(record)
    }

    /// Close the user's open session at an event. No location or time
    /// window check applies.
    pub async fn check_out(
        &self,
        user_id: i64,
        event_id: i64,
        point: Point,
        now: DateTime<Utc>,
    ) -> AppResult<AttendanceRecord> {
        let open = self
            .store
            .find_open_attendance(user_id, event_id)
            .await
            .map_err(|e| e.during("check-out"))?
            .ok_or(AppError::NoActiveSession)?;

        let record = self
            .store
            .update_attendance_checkout(open.id, now, point)
            .await
            .map_err(|e| e.during("check-out"))?;

        tracing::info!(user_id, event_id, attendance_id = record.id, "User checked out");
        Ok(record)
    }

    pub async fn is_present(&self, user_id: i64, event_id: i64) -> AppResult<bool> {
        Ok(self.current_session(user_id, event_id).await?.is_some())
    }

    /// The open record for the pair, if any
    pub async fn current_session(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> AppResult<Option<AttendanceRecord>> {
        self.store
            .find_open_attendance(user_id, event_id)
            .await
            .map_err(|e| e.during("attendance lookup"))
    }

    /// All attendance records of an event, latest check-in first
    pub async fn event_attendances(&self, event_id: i64) -> AppResult<Vec<AttendanceRecord>> {
        // Verify event exists
        self.events
            .get_event(event_id)
            .await
            .map_err(|e| e.during("attendance listing"))?;

        self.store
            .list_event_attendances(event_id)
            .await
            .map_err(|e| e.during("attendance listing"))
    }

    /// Distinct users who ever checked in to an event, ascending
    pub async fn event_attendee_ids(&self, event_id: i64) -> AppResult<Vec<i64>> {
        let ids: BTreeSet<i64> = self
            .event_attendances(event_id)
            .await?
            .into_iter()
            .map(|r| r.user_id)
            .collect();
        Ok(ids.into_iter().collect())
    }
}
