//! Driven port for per-subject attendance.

use async_trait::async_trait;

use crate::domain::{AttendanceRecord, ScholarId, SubjectAttendance};

use super::define_port_error;

define_port_error! {
    /// Errors raised by attendance repository adapters.
    pub enum AttendancePersistenceError {
        /// The store could not be reached.
        Connection as connection => "attendance repository connection failed: {message}",
        /// A query or mutation failed.
        Query as query => "attendance repository query failed: {message}",
    }
}

/// Port for attendance storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    /// Attendance for `scholar_id`, entries in insertion order.
    async fn find(
        &self,
        scholar_id: &ScholarId,
    ) -> Result<Option<AttendanceRecord>, AttendancePersistenceError>;

    /// Overwrite the entry with the same subject code or append a new one.
    ///
    /// Creates the record when none exists. Must be atomic with respect to
    /// concurrent updates for the same student.
    async fn upsert_subject(
        &self,
        scholar_id: &ScholarId,
        entry: &SubjectAttendance,
    ) -> Result<(), AttendancePersistenceError>;
}
