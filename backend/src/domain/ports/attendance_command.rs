//! Driving ports for attendance.

use async_trait::async_trait;

use crate::domain::{AttendanceRecord, AttendanceUpdate, Error, ScholarId};

/// Read attendance.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceQuery: Send + Sync {
    /// Attendance for `scholar_id`; an empty record when none is stored.
    async fn attendance(&self, scholar_id: &ScholarId) -> Result<AttendanceRecord, Error>;
}

/// Record attendance for one subject.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttendanceCommand: Send + Sync {
    /// Upsert the subject entry named by `update`.
    async fn update(&self, update: AttendanceUpdate) -> Result<(), Error>;
}
