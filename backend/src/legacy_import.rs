//! Import of legacy document-store exports.
//!
//! Exports are JSON arrays of documents from the `students`, `attendances`
//! and `courses` collections. Scholar identifiers were written as numbers by
//! some releases and strings by others; every identifier is normalised to
//! its canonical string form here. Documents that collapse onto an already
//! seen identifier are reported and skipped, so the first occurrence wins.
//! Documents that cannot be interpreted are reported with their position
//! and skipped.

use std::collections::BTreeSet;
use std::io;
use std::path::Path;
use std::sync::Arc;

use cap_std::{ambient_authority, fs::Dir};
use serde::Deserialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::domain::ports::{
    AttendancePersistenceError, AttendanceRepository, CourseCataloguePersistenceError,
    CourseCatalogueRepository, StudentPersistenceError, StudentRepository,
};
use crate::domain::{
    AcademicScores, Course, CourseCatalogueEntry, DEFAULT_PROFILE_IMAGE, ScholarId, Student,
    SubjectAttendance,
};

/// Legacy collections an export may come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Collection {
    /// `students`.
    Students,
    /// `attendances`.
    Attendance,
    /// `courses`.
    Courses,
}

impl Collection {
    /// Collection name as it appeared in the legacy database.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Students => "students",
            Self::Attendance => "attendances",
            Self::Courses => "courses",
        }
    }
}

/// Errors reading an export as a whole.
#[derive(Debug, thiserror::Error)]
pub enum LegacyImportError {
    /// The export is not valid JSON.
    #[error("{collection} export is not valid JSON: {source}")]
    Json {
        /// Collection being read.
        collection: &'static str,
        /// Parser failure.
        source: serde_json::Error,
    },
    /// The export is JSON but not an array of documents.
    #[error("{collection} export must be a JSON array")]
    NotAnArray {
        /// Collection being read.
        collection: &'static str,
    },
    /// Writing students failed.
    #[error(transparent)]
    Students(#[from] StudentPersistenceError),
    /// Writing attendance failed.
    #[error(transparent)]
    Attendance(#[from] AttendancePersistenceError),
    /// Writing the catalogue failed.
    #[error(transparent)]
    Courses(#[from] CourseCataloguePersistenceError),
}

/// Scholar identifier as stored by the legacy database.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LegacyScholarId {
    /// Numeric identifier, e.g. `2415062`.
    Number(serde_json::Number),
    /// String identifier, e.g. `"25EC10001"`.
    Text(String),
}

impl LegacyScholarId {
    /// Canonical string identifier.
    ///
    /// Integral numbers (including floats such as `2415062.0`) become their
    /// decimal digits. Negative or fractional numbers are rejected.
    ///
    /// # Errors
    /// Returns a human-readable reason when no canonical form exists.
    ///
    /// # Examples
    /// ```
    /// use scholar_portal::legacy_import::LegacyScholarId;
    ///
    /// let id: LegacyScholarId = serde_json::from_str("2415062").expect("json");
    /// assert_eq!(id.canonical().expect("canonical").as_str(), "2415062");
    /// ```
    pub fn canonical(&self) -> Result<ScholarId, String> {
        let text = match self {
            Self::Text(text) => text.clone(),
            Self::Number(number) => canonical_number(number)?,
        };
        ScholarId::new(&text).map_err(|err| format!("scholar id {text:?}: {err}"))
    }
}

fn canonical_number(number: &serde_json::Number) -> Result<String, String> {
    if let Some(value) = number.as_u64() {
        return Ok(value.to_string());
    }
    match number.as_f64() {
        Some(value) if value.is_finite() && value >= 0.0 && value.fract() == 0.0 => {
            Ok(format!("{value}"))
        }
        _ => Err(format!("scholar id {number} is not a non-negative integer")),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyStudent {
    scholar_id: LegacyScholarId,
    name: Option<String>,
    email: Option<String>,
    user_name: Option<String>,
    profile_image: Option<String>,
    cgpa: Option<f64>,
    #[serde(rename = "sgpa_curr")]
    sgpa_curr: Option<f64>,
    #[serde(rename = "sgpa_prev")]
    sgpa_prev: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySubject {
    subject_code: Option<String>,
    #[serde(default)]
    total: f64,
    #[serde(default)]
    attended: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyAttendance {
    scholar_id: LegacyScholarId,
    #[serde(default)]
    attendance: Vec<LegacySubject>,
}

#[derive(Debug, Deserialize)]
struct LegacyCourse {
    code: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    credits: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyCourseEntry {
    branch_code: Option<i32>,
    branch_short: String,
    semester: u8,
    #[serde(default)]
    courses: Vec<LegacyCourse>,
}

/// A document that could not be imported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Source collection.
    pub collection: Collection,
    /// Zero-based position in the export.
    pub index: usize,
    /// What was wrong with it.
    pub reason: String,
}

/// A document skipped because an earlier one had the same identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Duplicate {
    /// Source collection.
    pub collection: Collection,
    /// Zero-based position in the export.
    pub index: usize,
    /// Canonical identifier both documents map to.
    pub scholar_id: String,
}

/// Normalised contents of a legacy export, ready to write.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyBatch {
    /// Students in export order.
    pub students: Vec<Student>,
    /// Attendance per student in export order.
    pub attendance: Vec<(ScholarId, Vec<SubjectAttendance>)>,
    /// Catalogue entries in export order.
    pub courses: Vec<CourseCatalogueEntry>,
    /// Skipped duplicates.
    pub duplicates: Vec<Duplicate>,
    /// Skipped malformed documents.
    pub rejections: Vec<Rejection>,
}

/// Counts written by [`LegacyImporter::apply`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    /// Student records written.
    pub students: usize,
    /// Subject attendance entries written.
    pub attendance_entries: usize,
    /// Catalogue entries written.
    pub catalogue_entries: usize,
}

fn documents(collection: Collection, json: &str) -> Result<Vec<Value>, LegacyImportError> {
    let value: Value = serde_json::from_str(json).map_err(|source| LegacyImportError::Json {
        collection: collection.name(),
        source,
    })?;
    match value {
        Value::Array(documents) => Ok(documents),
        _ => Err(LegacyImportError::NotAnArray {
            collection: collection.name(),
        }),
    }
}

// Counts were stored as JS numbers; whole values convert exactly and the
// rest are rejected.
fn legacy_count(value: f64) -> Option<i64> {
    if value.is_finite() && value.fract() == 0.0 && value.abs() <= 9_007_199_254_740_992.0 {
        format!("{value}").parse().ok()
    } else {
        None
    }
}

fn nonblank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

impl LegacyBatch {
    /// Empty batch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn reject(&mut self, collection: Collection, index: usize, reason: impl Into<String>) {
        let reason = reason.into();
        warn!(collection = collection.name(), index, %reason, "legacy document rejected");
        self.rejections.push(Rejection {
            collection,
            index,
            reason,
        });
    }

    fn is_first(
        &mut self,
        seen: &mut BTreeSet<String>,
        collection: Collection,
        index: usize,
        scholar_id: &ScholarId,
    ) -> bool {
        if seen.insert(scholar_id.as_str().to_owned()) {
            return true;
        }
        warn!(collection = collection.name(), index, %scholar_id, "duplicate legacy document skipped");
        self.duplicates.push(Duplicate {
            collection,
            index,
            scholar_id: scholar_id.as_str().to_owned(),
        });
        false
    }

    /// Add a `students` export.
    ///
    /// # Errors
    /// Fails only when the export is not a JSON array; individual documents
    /// are rejected into the batch.
    pub fn add_students(&mut self, json: &str) -> Result<(), LegacyImportError> {
        let mut seen: BTreeSet<String> = self
            .students
            .iter()
            .map(|student| student.scholar_id.as_str().to_owned())
            .collect();
        for (index, document) in documents(Collection::Students, json)?.into_iter().enumerate() {
            let legacy: LegacyStudent = match serde_json::from_value(document) {
                Ok(legacy) => legacy,
                Err(err) => {
                    self.reject(Collection::Students, index, err.to_string());
                    continue;
                }
            };
            let scholar_id = match legacy.scholar_id.canonical() {
                Ok(id) => id,
                Err(reason) => {
                    self.reject(Collection::Students, index, reason);
                    continue;
                }
            };
            if !self.is_first(&mut seen, Collection::Students, index, &scholar_id) {
                continue;
            }
            self.students.push(Student {
                scholar_id,
                name: legacy.name,
                email: nonblank(legacy.email),
                user_name: legacy.user_name,
                profile_image: nonblank(legacy.profile_image)
                    .unwrap_or_else(|| DEFAULT_PROFILE_IMAGE.to_owned()),
                scores: AcademicScores {
                    cgpa: legacy.cgpa.unwrap_or_default(),
                    sgpa_curr: legacy.sgpa_curr.unwrap_or_default(),
                    sgpa_prev: legacy.sgpa_prev.unwrap_or_default(),
                },
            });
        }
        Ok(())
    }

    /// Add an `attendances` export.
    ///
    /// Subjects without a code or with fractional counts are rejected as a
    /// whole document so a student's record is never half-imported.
    ///
    /// # Errors
    /// Fails only when the export is not a JSON array.
    pub fn add_attendance(&mut self, json: &str) -> Result<(), LegacyImportError> {
        let mut seen: BTreeSet<String> = self
            .attendance
            .iter()
            .map(|(id, _)| id.as_str().to_owned())
            .collect();
        for (index, document) in documents(Collection::Attendance, json)?.into_iter().enumerate() {
            let legacy: LegacyAttendance = match serde_json::from_value(document) {
                Ok(legacy) => legacy,
                Err(err) => {
                    self.reject(Collection::Attendance, index, err.to_string());
                    continue;
                }
            };
            let scholar_id = match legacy.scholar_id.canonical() {
                Ok(id) => id,
                Err(reason) => {
                    self.reject(Collection::Attendance, index, reason);
                    continue;
                }
            };
            let subjects: Result<Vec<_>, String> = legacy
                .attendance
                .into_iter()
                .map(|subject| {
                    let subject_code = nonblank(subject.subject_code)
                        .ok_or_else(|| "subject without a code".to_owned())?;
                    let total = legacy_count(subject.total)
                        .ok_or_else(|| format!("{subject_code}: total is not a whole number"))?;
                    let attended = legacy_count(subject.attended)
                        .ok_or_else(|| format!("{subject_code}: attended is not a whole number"))?;
                    Ok(SubjectAttendance {
                        subject_code,
                        total,
                        attended,
                    })
                })
                .collect();
            let subjects = match subjects {
                Ok(subjects) => subjects,
                Err(reason) => {
                    self.reject(Collection::Attendance, index, reason);
                    continue;
                }
            };
            if self.is_first(&mut seen, Collection::Attendance, index, &scholar_id) {
                self.attendance.push((scholar_id, subjects));
            }
        }
        Ok(())
    }

    /// Add a `courses` export.
    ///
    /// # Errors
    /// Fails only when the export is not a JSON array.
    pub fn add_courses(&mut self, json: &str) -> Result<(), LegacyImportError> {
        for (index, document) in documents(Collection::Courses, json)?.into_iter().enumerate() {
            match serde_json::from_value::<LegacyCourseEntry>(document) {
                Ok(entry) if entry.branch_short.trim().is_empty() => {
                    self.reject(Collection::Courses, index, "branchShort must not be empty");
                }
                Ok(entry) => self.courses.push(CourseCatalogueEntry {
                    branch_short: entry.branch_short.trim().to_owned(),
                    branch_code: entry.branch_code,
                    semester: entry.semester,
                    courses: entry
                        .courses
                        .into_iter()
                        .map(|course| Course {
                            code: course.code,
                            name: course.name,
                            credits: course.credits,
                        })
                        .collect(),
                }),
                Err(err) => self.reject(Collection::Courses, index, err.to_string()),
            }
        }
        Ok(())
    }
}

/// Parse a catalogue file in the legacy `courses` format.
///
/// Malformed entries are logged and skipped.
///
/// # Errors
/// Fails when the file is not a JSON array.
pub fn load_course_catalogue(json: &str) -> Result<Vec<CourseCatalogueEntry>, LegacyImportError> {
    let mut batch = LegacyBatch::new();
    batch.add_courses(json)?;
    Ok(batch.courses)
}

/// Read an export or catalogue file as UTF-8 text.
///
/// # Errors
/// Returns [`io::Error`] naming the path when the file cannot be opened or
/// is not valid UTF-8.
pub fn read_json_file(path: &Path) -> io::Result<String> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path must name a file"))?;
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!("open directory '{}': {err}", parent.display()),
        )
    })?;
    dir.read_to_string(file_name)
        .map_err(|err| io::Error::new(err.kind(), format!("read '{}': {err}", path.display())))
}

/// Writes a [`LegacyBatch`] through the repository ports.
pub struct LegacyImporter {
    students: Arc<dyn StudentRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    courses: Arc<dyn CourseCatalogueRepository>,
}

impl LegacyImporter {
    /// Importer writing to the given repositories.
    pub fn new(
        students: Arc<dyn StudentRepository>,
        attendance: Arc<dyn AttendanceRepository>,
        courses: Arc<dyn CourseCatalogueRepository>,
    ) -> Self {
        Self {
            students,
            attendance,
            courses,
        }
    }

    /// Write every record in `batch`.
    ///
    /// Students are written whole, attendance subject by subject and
    /// catalogue entries replace any stored entry for the same branch and
    /// semester. Re-running an import is therefore idempotent.
    ///
    /// # Errors
    /// Stops at the first repository failure.
    pub async fn apply(&self, batch: &LegacyBatch) -> Result<ImportReport, LegacyImportError> {
        let mut report = ImportReport::default();
        for student in &batch.students {
            self.students.import(student).await?;
            report.students += 1;
        }
        for (scholar_id, subjects) in &batch.attendance {
            for subject in subjects {
                self.attendance.upsert_subject(scholar_id, subject).await?;
                report.attendance_entries += 1;
            }
        }
        for entry in &batch.courses {
            self.courses.replace_entry(entry).await?;
            report.catalogue_entries += 1;
        }
        info!(
            students = report.students,
            attendance_entries = report.attendance_entries,
            catalogue_entries = report.catalogue_entries,
            "legacy import written"
        );
        Ok(report)
    }
}

#[cfg(test)]
#[path = "legacy_import_tests.rs"]
mod tests;
