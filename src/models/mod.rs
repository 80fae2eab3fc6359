//! Data models

pub mod attendance;
pub mod event;

// Re-export commonly used types
pub use attendance::{AttendanceRecord, NewAttendance};
pub use event::Event;
