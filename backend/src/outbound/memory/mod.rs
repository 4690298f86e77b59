//! Process-local store used when no database is configured.
//!
//! Applies the same rules as the PostgreSQL adapters: lookups prefer the
//! lowest matching identifier, registration merges scores atomically and
//! attendance upserts keep first-recorded order. Each operation holds a
//! single lock for its whole read-modify-write.

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use crate::domain::ports::{
    AttendancePersistenceError, AttendanceRepository, CourseCataloguePersistenceError,
    CourseCatalogueRepository, StudentLookup, StudentPersistenceError, StudentRepository,
};
use crate::domain::{
    AttendanceRecord, CourseCatalogueEntry, RegistrationRequest, ScholarId, Student,
    SubjectAttendance,
};

/// In-memory implementation of the student, attendance and catalogue ports.
///
/// # Examples
/// ```
/// use scholar_portal::domain::{ScholarId, Student};
/// use scholar_portal::outbound::memory::InMemoryPortalStore;
///
/// let store = InMemoryPortalStore::default();
/// store.insert_student(Student::new(ScholarId::new("2415062").expect("valid id")));
/// assert_eq!(store.student_count(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InMemoryPortalStore {
    students: Mutex<BTreeMap<String, Student>>,
    attendance: Mutex<BTreeMap<String, AttendanceRecord>>,
    catalogue: Mutex<Vec<CourseCatalogueEntry>>,
}

fn lock<'a, T, E>(
    mutex: &'a Mutex<T>,
    error: impl FnOnce(&'static str) -> E,
) -> Result<MutexGuard<'a, T>, E> {
    mutex.lock().map_err(|_| error("in-memory store lock poisoned"))
}

fn matches_lookup(stored: &str, lookup: &StudentLookup) -> bool {
    match lookup {
        StudentLookup::Exact(value) => stored == value,
        StudentLookup::Numeric(value) => {
            stored.chars().all(|c| c.is_ascii_digit()) && stored.parse::<u64>().ok() == Some(*value)
        }
        StudentLookup::CaseInsensitive(value) => stored.eq_ignore_ascii_case(value),
    }
}

impl InMemoryPortalStore {
    /// Store pre-loaded with `catalogue`.
    #[must_use]
    pub fn with_catalogue(catalogue: Vec<CourseCatalogueEntry>) -> Self {
        Self {
            catalogue: Mutex::new(catalogue),
            ..Self::default()
        }
    }

    /// Insert or replace a student. Silently ignored if the lock is poisoned.
    pub fn insert_student(&self, student: Student) {
        if let Ok(mut students) = self.students.lock() {
            students.insert(student.scholar_id.as_str().to_owned(), student);
        }
    }

    /// Number of stored students.
    #[must_use]
    pub fn student_count(&self) -> usize {
        self.students.lock().map(|students| students.len()).unwrap_or_default()
    }
}

#[async_trait]
impl StudentRepository for InMemoryPortalStore {
    async fn find(&self, lookup: &StudentLookup) -> Result<Option<Student>, StudentPersistenceError> {
        let students = lock(&self.students, StudentPersistenceError::query)?;
        if let StudentLookup::Exact(value) = lookup {
            return Ok(students.get(value).cloned());
        }
        // BTreeMap iteration is ordered, so the first hit has the lowest id.
        Ok(students
            .iter()
            .find(|(stored, _)| matches_lookup(stored, lookup))
            .map(|(_, student)| student.clone()))
    }

    async fn register(
        &self,
        key: &ScholarId,
        request: &RegistrationRequest,
    ) -> Result<Student, StudentPersistenceError> {
        let mut students = lock(&self.students, StudentPersistenceError::query)?;
        let current = students
            .remove(key.as_str())
            .unwrap_or_else(|| Student::new(key.clone()));
        let updated = current.registered_with(request);
        students.insert(key.as_str().to_owned(), updated.clone());
        Ok(updated)
    }

    async fn set_profile_image(
        &self,
        scholar_id: &ScholarId,
        filename: &str,
    ) -> Result<Option<String>, StudentPersistenceError> {
        let mut students = lock(&self.students, StudentPersistenceError::query)?;
        Ok(students
            .get_mut(scholar_id.as_str())
            .map(|student| std::mem::replace(&mut student.profile_image, filename.to_owned())))
    }

    async fn import(&self, student: &Student) -> Result<(), StudentPersistenceError> {
        let mut students = lock(&self.students, StudentPersistenceError::query)?;
        students.insert(student.scholar_id.as_str().to_owned(), student.clone());
        Ok(())
    }
}

#[async_trait]
impl AttendanceRepository for InMemoryPortalStore {
    async fn find(
        &self,
        scholar_id: &ScholarId,
    ) -> Result<Option<AttendanceRecord>, AttendancePersistenceError> {
        let attendance = lock(&self.attendance, AttendancePersistenceError::query)?;
        Ok(attendance.get(scholar_id.as_str()).cloned())
    }

    async fn upsert_subject(
        &self,
        scholar_id: &ScholarId,
        entry: &SubjectAttendance,
    ) -> Result<(), AttendancePersistenceError> {
        let mut attendance = lock(&self.attendance, AttendancePersistenceError::query)?;
        attendance
            .entry(scholar_id.as_str().to_owned())
            .or_insert_with(|| AttendanceRecord::empty(scholar_id.clone()))
            .upsert_subject(entry.clone());
        Ok(())
    }
}

#[async_trait]
impl CourseCatalogueRepository for InMemoryPortalStore {
    async fn entries_for_branch(
        &self,
        branch_short: &str,
    ) -> Result<Vec<CourseCatalogueEntry>, CourseCataloguePersistenceError> {
        let catalogue = lock(&self.catalogue, CourseCataloguePersistenceError::query)?;
        let mut entries: Vec<_> = catalogue
            .iter()
            .filter(|entry| entry.branch_short == branch_short)
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.semester);
        Ok(entries)
    }

    async fn replace_entry(
        &self,
        entry: &CourseCatalogueEntry,
    ) -> Result<(), CourseCataloguePersistenceError> {
        let mut catalogue = lock(&self.catalogue, CourseCataloguePersistenceError::query)?;
        catalogue.retain(|existing| {
            existing.branch_short != entry.branch_short || existing.semester != entry.semester
        });
        catalogue.push(entry.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests;
