//! Per-subject attendance and the service exposing it.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info};

use crate::domain::ports::{
    AttendanceCommand, AttendancePersistenceError, AttendanceQuery, AttendanceRepository,
};
use crate::domain::{Error, ScholarId};

/// Attendance counts for one subject.
///
/// Counts are stored as given; `attended > total` is not rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubjectAttendance {
    /// Subject code, matched exactly.
    pub subject_code: String,
    /// Classes held.
    pub total: i64,
    /// Classes attended.
    pub attended: i64,
}

impl SubjectAttendance {
    /// Rounded attendance percentage, see [`attendance_percentage`].
    #[must_use]
    pub fn percentage(&self) -> i64 {
        attendance_percentage(self.total, self.attended)
    }
}

/// `attended / total` as a percentage rounded half up; `0` when no classes
/// were held.
///
/// # Examples
/// ```
/// use scholar_portal::domain::attendance_percentage;
///
/// assert_eq!(attendance_percentage(8, 1), 13);
/// assert_eq!(attendance_percentage(3, 2), 67);
/// assert_eq!(attendance_percentage(0, 5), 0);
/// ```
#[must_use]
pub fn attendance_percentage(total: i64, attended: i64) -> i64 {
    if total == 0 {
        return 0;
    }
    // floor(100a/t + 1/2) == floor((200a + t) / 2t), kept in integers.
    let mut numerator = 200 * i128::from(attended) + i128::from(total);
    let mut denominator = 2 * i128::from(total);
    if denominator < 0 {
        numerator = -numerator;
        denominator = -denominator;
    }
    let rounded = numerator.div_euclid(denominator);
    i64::try_from(rounded).unwrap_or(if rounded < 0 { i64::MIN } else { i64::MAX })
}

/// A student's attendance across subjects, in first-recorded order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceRecord {
    /// Owner of the record.
    pub scholar_id: ScholarId,
    /// One entry per subject code.
    pub subjects: Vec<SubjectAttendance>,
}

/// Whether [`AttendanceRecord::upsert_subject`] added or replaced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubjectUpsert {
    /// A new subject was appended.
    Appended,
    /// An existing subject's counts were replaced.
    Replaced,
}

impl AttendanceRecord {
    /// Record with no subjects.
    #[must_use]
    pub fn empty(scholar_id: ScholarId) -> Self {
        Self {
            scholar_id,
            subjects: Vec::new(),
        }
    }

    /// Replace the counts of the entry with the same code, or append.
    pub fn upsert_subject(&mut self, entry: SubjectAttendance) -> SubjectUpsert {
        match self
            .subjects
            .iter_mut()
            .find(|existing| existing.subject_code == entry.subject_code)
        {
            Some(existing) => {
                existing.total = entry.total;
                existing.attended = entry.attended;
                SubjectUpsert::Replaced
            }
            None => {
                self.subjects.push(entry);
                SubjectUpsert::Appended
            }
        }
    }
}

/// Validated attendance update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttendanceUpdate {
    /// Whose attendance changes.
    pub scholar_id: ScholarId,
    /// New counts.
    pub entry: SubjectAttendance,
}

/// Validation failures for [`AttendanceUpdate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AttendanceUpdateValidationError {
    /// Subject code missing or blank.
    #[error("subject code must not be empty")]
    EmptySubjectCode,
}

impl AttendanceUpdate {
    /// Build an update; the subject code must not be blank.
    pub fn try_new(
        scholar_id: ScholarId,
        subject_code: impl Into<String>,
        total: i64,
        attended: i64,
    ) -> Result<Self, AttendanceUpdateValidationError> {
        let subject_code = subject_code.into();
        if subject_code.trim().is_empty() {
            return Err(AttendanceUpdateValidationError::EmptySubjectCode);
        }
        Ok(Self {
            scholar_id,
            entry: SubjectAttendance {
                subject_code,
                total,
                attended,
            },
        })
    }
}

fn map_attendance_persistence_error(err: AttendancePersistenceError) -> Error {
    error!(error = %err, "attendance repository failed");
    Error::internal(err.to_string())
}

/// Attendance use cases over an [`AttendanceRepository`].
pub struct AttendanceService<R: ?Sized> {
    repo: Arc<R>,
}

impl<R> AttendanceService<R>
where
    R: AttendanceRepository + ?Sized,
{
    /// Service over `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> AttendanceQuery for AttendanceService<R>
where
    R: AttendanceRepository + ?Sized,
{
    async fn attendance(&self, scholar_id: &ScholarId) -> Result<AttendanceRecord, Error> {
        let record = self
            .repo
            .find(scholar_id)
            .await
            .map_err(map_attendance_persistence_error)?;
        Ok(record.unwrap_or_else(|| AttendanceRecord::empty(scholar_id.clone())))
    }
}

#[async_trait]
impl<R> AttendanceCommand for AttendanceService<R>
where
    R: AttendanceRepository + ?Sized,
{
    async fn update(&self, update: AttendanceUpdate) -> Result<(), Error> {
        self.repo
            .upsert_subject(&update.scholar_id, &update.entry)
            .await
            .map_err(map_attendance_persistence_error)?;
        info!(
            scholar_id = %update.scholar_id,
            subject_code = %update.entry.subject_code,
            "attendance updated"
        );
        Ok(())
    }
}

/// Map update validation failures onto a client error.
pub(crate) fn map_attendance_update_error(err: AttendanceUpdateValidationError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": "subjectCode",
        "code": "missing_field",
    }))
}
