//! Geofence shapes and their persisted JSON encoding

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

/// A geographic coordinate in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Point {
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }
}

/// A geofence shape.
///
/// [`crate::geofence::parse`] and the checked constructors reject bad
/// radii and short polygons. Shapes built from the variants directly are
/// not checked; containment treats a degenerate shape as enclosing nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GeofenceDocument", into = "GeofenceDocument")]
pub enum GeofenceSpec {
    Circle { center: Point, radius_meters: f64 },
    /// Closed ring; the last vertex connects back to the first
    Polygon { vertices: Vec<Point> },
}

impl GeofenceSpec {
    pub fn circle(center: Point, radius_meters: f64) -> AppResult<Self> {
        if !radius_meters.is_finite() || radius_meters <= 0.0 {
            return Err(AppError::InvalidGeofence(
                "invalid radius for circle geofence".to_string(),
            ));
        }
        Ok(GeofenceSpec::Circle { center, radius_meters })
    }

    pub fn polygon(vertices: Vec<Point>) -> AppResult<Self> {
        if vertices.len() < 3 {
            return Err(AppError::InvalidGeofence(
                "polygon geofence must have at least 3 points".to_string(),
            ));
        }
        Ok(GeofenceSpec::Polygon { vertices })
    }

    pub fn kind(&self) -> GeofenceKind {
        match self {
            GeofenceSpec::Circle { .. } => GeofenceKind::Circle,
            GeofenceSpec::Polygon { .. } => GeofenceKind::Polygon,
        }
    }

    /// Encode into the textual form stored alongside events
    pub fn to_json(&self) -> AppResult<String> {
        serde_json::to_string(self)
            .map_err(|e| AppError::Internal(format!("Failed to encode geofence: {}", e)))
    }
}

/// Shape discriminator used in the `type` field of the encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum GeofenceKind {
    Circle,
    Polygon,
}

/// A geofence attached to an event under a display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Geofence {
    pub event_id: i64,
    pub name: String,
    pub data: GeofenceSpec,
}

impl Geofence {
    pub fn circle(
        event_id: i64,
        name: impl Into<String>,
        center: Point,
        radius_meters: f64,
    ) -> AppResult<Self> {
        Ok(Self {
            event_id,
            name: name.into(),
            data: GeofenceSpec::circle(center, radius_meters)?,
        })
    }

    pub fn polygon(event_id: i64, name: impl Into<String>, points: Vec<Point>) -> AppResult<Self> {
        Ok(Self {
            event_id,
            name: name.into(),
            data: GeofenceSpec::polygon(points)?,
        })
    }
}

/// Circle body of the persisted encoding
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CircleDocument {
    pub center: Point,
    /// Radius in meters
    pub radius: f64,
}

/// Polygon body of the persisted encoding
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PolygonDocument {
    pub points: Vec<Point>,
}

/// Persisted geofence encoding.
///
/// `{"type":"circle","circle":{"center":{"lat":..,"lng":..},"radius":..}}` or
/// `{"type":"polygon","polygon":{"points":[..]}}`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GeofenceDocument {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub circle: Option<CircleDocument>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub polygon: Option<PolygonDocument>,
}

impl TryFrom<GeofenceDocument> for GeofenceSpec {
    type Error = AppError;

    fn try_from(doc: GeofenceDocument) -> AppResult<Self> {
        match doc.kind.as_str() {
            "circle" => {
                let circle = doc.circle.ok_or_else(|| {
                    AppError::InvalidGeofence("missing circle data for circle geofence".to_string())
                })?;
                GeofenceSpec::circle(circle.center, circle.radius)
            }
            "polygon" => {
                let polygon = doc.polygon.ok_or_else(|| {
                    AppError::InvalidGeofence(
                        "missing polygon data for polygon geofence".to_string(),
                    )
                })?;
                GeofenceSpec::polygon(polygon.points)
            }
            other => Err(AppError::InvalidGeofence(format!(
                "invalid geofence type '{}'",
                other
            ))),
        }
    }
}

impl From<GeofenceSpec> for GeofenceDocument {
    fn from(spec: GeofenceSpec) -> Self {
        match spec {
            GeofenceSpec::Circle { center, radius_meters } => GeofenceDocument {
                kind: "circle".to_string(),
                circle: Some(CircleDocument {
                    center,
                    radius: radius_meters,
                }),
                polygon: None,
            },
            GeofenceSpec::Polygon { vertices } => GeofenceDocument {
                kind: "polygon".to_string(),
                circle: None,
                polygon: Some(PolygonDocument { points: vertices }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circle_constructor_rejects_non_positive_radius() {
        let center = Point::new(48.85, 2.35);
        assert!(GeofenceSpec::circle(center, 0.0).is_err());
        assert!(GeofenceSpec::circle(center, -5.0).is_err());
        assert!(GeofenceSpec::circle(center, f64::NAN).is_err());
        assert!(GeofenceSpec::circle(center, 25.0).is_ok());
    }

    #[test]
    fn test_named_geofence() {
        let fence = Geofence::polygon(
            3,
            "Main hall",
            vec![Point::new(0.0, 0.0), Point::new(0.0, 1.0), Point::new(1.0, 1.0)],
        )
        .unwrap();
        assert_eq!(fence.event_id, 3);
        assert_eq!(fence.data.kind(), GeofenceKind::Polygon);

        let err = Geofence::circle(3, "Stage", Point::new(0.0, 0.0), 0.0).unwrap_err();
        assert!(matches!(err, AppError::InvalidGeofence(_)));
    }

    #[test]
    fn test_encoding_shape() {
        let spec = GeofenceSpec::circle(Point::new(52.52, 13.405), 150.0).unwrap();
        let value: serde_json::Value = serde_json::from_str(&spec.to_json().unwrap()).unwrap();
        assert_eq!(value["type"], "circle");
        assert_eq!(value["circle"]["center"]["lat"], 52.52);
        assert_eq!(value["circle"]["center"]["lng"], 13.405);
        assert_eq!(value["circle"]["radius"], 150.0);
        assert!(value.get("polygon").is_none());
    }
}
