//! Business logic services

pub mod attendance;
pub mod proximity;

use std::sync::Arc;

use crate::{
    config::ProximityConfig,
    repository::{AttendanceStore, EventSource},
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub attendance: attendance::AttendanceService,
    pub proximity: proximity::ProximityService,
}

impl Services {
    /// Create all services over the given collaborators
    pub fn new(
        events: Arc<dyn EventSource>,
        attendances: Arc<dyn AttendanceStore>,
        proximity_config: &ProximityConfig,
    ) -> Self {
        Self {
            attendance: attendance::AttendanceService::new(events.clone(), attendances),
            proximity: proximity::ProximityService::new(events, proximity_config.candidate_cap),
        }
    }
}
