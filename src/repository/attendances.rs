//! Attendances repository for database operations

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    geofence::Point,
    models::attendance::{AttendanceRecord, AttendanceRow, NewAttendance},
};

use super::AttendanceStore;

#[derive(Clone)]
pub struct AttendancesRepository {
    pool: Pool<Postgres>,
}

impl AttendancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AttendanceStore for AttendancesRepository {
    async fn insert_attendance(&self, record: NewAttendance) -> AppResult<AttendanceRecord> {
        let result = sqlx::query_as::<_, AttendanceRow>(
            r#"
            INSERT INTO attendances (
                user_id, event_id, check_in_time, check_in_latitude, check_in_longitude
            ) VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(record.user_id)
        .bind(record.event_id)
        .bind(record.check_in_time)
        .bind(record.check_in_location.latitude)
        .bind(record.check_in_location.longitude)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(row) => Ok(row.into()),
            // uq_attendances_open: an open session already exists for the pair
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(AppError::AlreadyCheckedIn)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_attendance_checkout(
        &self,
        id: i64,
        time: DateTime<Utc>,
        location: Point,
    ) -> AppResult<AttendanceRecord> {
        sqlx::query_as::<_, AttendanceRow>(
            r#"
            UPDATE attendances
            SET check_out_time = $2,
                check_out_latitude = COALESCE(check_out_latitude, $3),
                check_out_longitude = COALESCE(check_out_longitude, $4)
            WHERE id = $1 AND check_out_time IS NULL
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(time)
        .bind(location.latitude)
        .bind(location.longitude)
        .fetch_optional(&self.pool)
        .await?
        .map(AttendanceRecord::from)
        .ok_or(AppError::NoActiveSession)
    }

    async fn find_open_attendance(
        &self,
        user_id: i64,
        event_id: i64,
    ) -> AppResult<Option<AttendanceRecord>> {
        let row = sqlx::query_as::<_, AttendanceRow>(
            r#"
            SELECT * FROM attendances
            WHERE user_id = $1 AND event_id = $2 AND check_out_time IS NULL
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(event_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(AttendanceRecord::from))
    }

    async fn list_event_attendances(&self, event_id: i64) -> AppResult<Vec<AttendanceRecord>> {
        let rows = sqlx::query_as::<_, AttendanceRow>(
            r#"
            SELECT * FROM attendances
            WHERE event_id = $1
            ORDER BY check_in_time DESC, id DESC
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(AttendanceRecord::from).collect())
    }
}
