//! Events repository

use async_trait::async_trait;
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::event::{Event, EventRow},
};

use super::EventSource;

#[derive(Clone)]
pub struct EventsRepository {
    pool: Pool<Postgres>,
}

impl EventsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

/// Decode a stored row. A geofence that no longer parses is a fault in the
/// stored data, not in the caller's request.
fn decode(row: EventRow) -> AppResult<Event> {
    let id = row.id;
    Event::try_from(row).map_err(|e| {
        AppError::Internal(format!("event {} has an undecodable geofence: {}", id, e))
    })
}

#[async_trait]
impl EventSource for EventsRepository {
    /// Get event by ID
    async fn get_event(&self, id: i64) -> AppResult<Event> {
        let row = sqlx::query_as::<_, EventRow>("SELECT * FROM events WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(AppError::EventNotFound(id))?;

        decode(row)
    }

    async fn list_upcoming_events(&self, cap: usize) -> AppResult<Vec<Event>> {
        let rows = sqlx::query_as::<_, EventRow>(
            r#"
            SELECT * FROM events
            WHERE end_time >= NOW()
            ORDER BY start_time ASC, id ASC
            LIMIT $1
            "#,
        )
        .bind(i64::try_from(cap).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        // A corrupt geofence on one event must not hide every other event
        let events = rows
            .into_iter()
            .filter_map(|row| match decode(row) {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::warn!("Skipping upcoming event: {}", e);
                    None
                }
            })
            .collect();

        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn row(geofence_data: &str) -> EventRow {
        let now = Utc::now();
        EventRow {
            id: 3,
            name: "Night market".to_string(),
            description: None,
            location: None,
            geofence_data: Some(geofence_data.to_string()),
            start_time: now,
            end_time: now,
            brand_id: None,
            created_at: now,
        }
    }

    #[test]
    fn test_corrupt_stored_geofence_is_internal() {
        let err = decode(row(r#"{"type":"blob"}"#)).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
        assert_eq!(
            axum::response::IntoResponse::into_response(err).status(),
            axum::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_valid_stored_geofence_decodes() {
        let event =
            decode(row(r#"{"type":"circle","circle":{"center":{"lat":1,"lng":1},"radius":9}}"#))
                .unwrap();
        assert!(event.geofence.is_some());
    }
}
