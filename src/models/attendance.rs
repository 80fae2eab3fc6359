//! Attendance records: one user's presence episode at one event

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::geofence::Point;

/// A check-in, and its check-out once the user leaves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AttendanceRecord {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub check_in_time: DateTime<Utc>,
    /// `None` while the session is open
    pub check_out_time: Option<DateTime<Utc>>,
    pub check_in_location: Point,
    pub check_out_location: Option<Point>,
    pub created_at: DateTime<Utc>,
}

impl AttendanceRecord {
    pub fn is_open(&self) -> bool {
        self.check_out_time.is_none()
    }
}

/// Flat database row for an attendance record
#[derive(Debug, Clone, FromRow)]
pub struct AttendanceRow {
    pub id: i64,
    pub user_id: i64,
    pub event_id: i64,
    pub check_in_time: DateTime<Utc>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub check_in_latitude: f64,
    pub check_in_longitude: f64,
    pub check_out_latitude: Option<f64>,
    pub check_out_longitude: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl From<AttendanceRow> for AttendanceRecord {
    fn from(row: AttendanceRow) -> Self {
        let check_out_location = match (row.check_out_latitude, row.check_out_longitude) {
            (Some(lat), Some(lng)) => Some(Point::new(lat, lng)),
            _ => None,
        };

        AttendanceRecord {
            id: row.id,
            user_id: row.user_id,
            event_id: row.event_id,
            check_in_time: row.check_in_time,
            check_out_time: row.check_out_time,
            check_in_location: Point::new(row.check_in_latitude, row.check_in_longitude),
            check_out_location,
            created_at: row.created_at,
        }
    }
}

/// Data for a new open attendance record
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    pub user_id: i64,
    pub event_id: i64,
    pub check_in_time: DateTime<Utc>,
    pub check_in_location: Point,
}

/// Device position sent with a check-in or check-out
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LocationRequest {
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Longitude must be between -180 and 180"))]
    pub longitude: f64,
}

impl LocationRequest {
    pub fn point(&self) -> Point {
        Point::new(self.latitude, self.longitude)
    }
}

/// Presence flag for a user at an event
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PresenceResponse {
    pub user_id: i64,
    pub event_id: i64,
    pub present: bool,
}
