//! Point-in-geofence tests

use super::{
    distance::great_circle_distance,
    shape::{GeofenceSpec, Point},
};

/// Whether `point` lies inside `spec`
pub fn contains(point: Point, spec: &GeofenceSpec) -> bool {
    match spec {
        GeofenceSpec::Circle {
            center,
            radius_meters,
        } => great_circle_distance(point, *center) <= *radius_meters,
        GeofenceSpec::Polygon { vertices } => point_in_ring(point, vertices),
    }
}

/// Even-odd ray casting. Points on an edge or vertex may land either way.
/// A ring with fewer than 3 vertices encloses nothing.
fn point_in_ring(point: Point, ring: &[Point]) -> bool {
    if ring.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = ring.len() - 1;

    for i in 0..ring.len() {
        let (pi, pj) = (ring[i], ring[j]);
        if (pi.latitude > point.latitude) != (pj.latitude > point.latitude) {
            let crossing = (pj.longitude - pi.longitude) * (point.latitude - pi.latitude)
                / (pj.latitude - pi.latitude)
                + pi.longitude;
            if point.longitude < crossing {
                inside = !inside;
            }
        }
        j = i;
    }

    inside
}

impl GeofenceSpec {
    pub fn contains(&self, point: Point) -> bool {
        contains(point, self)
    }
}
