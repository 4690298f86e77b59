//! Course catalogue entries and the per-student course listing.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::domain::ports::{CourseCataloguePersistenceError, CourseCatalogueRepository, CourseQuery};
use crate::domain::{Error, ScholarId, ScholarIdProfile};

/// A single course.
#[derive(Debug, Clone, PartialEq)]
pub struct Course {
    /// Course code, e.g. `EC201`.
    pub code: String,
    /// Course title.
    pub name: String,
    /// Credit weight.
    pub credits: f64,
}

/// Courses offered to one branch in one semester.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseCatalogueEntry {
    /// Branch short name, e.g. `ECE`.
    pub branch_short: String,
    /// Legacy numeric branch code, when known.
    pub branch_code: Option<i32>,
    /// Semester number.
    pub semester: u8,
    /// Courses in catalogue order.
    pub courses: Vec<Course>,
}

/// What a student sees on the courses page.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CourseListing {
    /// Courses for the semester the identifier encodes.
    pub current_semester_courses: Vec<Course>,
    /// Every catalogue entry for the branch, ordered by semester.
    pub all_courses: Vec<CourseCatalogueEntry>,
}

impl CourseListing {
    /// Build a listing from the branch's entries.
    ///
    /// Entries are sorted by semester. The current list is the entry whose
    /// semester matches `current`, or empty.
    #[must_use]
    pub fn from_entries(mut entries: Vec<CourseCatalogueEntry>, current: Option<u8>) -> Self {
        entries.sort_by_key(|entry| entry.semester);
        let current_semester_courses = current
            .and_then(|semester| entries.iter().find(|entry| entry.semester == semester))
            .map(|entry| entry.courses.clone())
            .unwrap_or_default();
        Self {
            current_semester_courses,
            all_courses: entries,
        }
    }
}

fn map_catalogue_persistence_error(err: CourseCataloguePersistenceError) -> Error {
    error!(error = %err, "course catalogue failed");
    Error::internal(err.to_string())
}

/// Course listing use case over a [`CourseCatalogueRepository`].
pub struct CourseService<R: ?Sized> {
    repo: Arc<R>,
}

impl<R> CourseService<R>
where
    R: CourseCatalogueRepository + ?Sized,
{
    /// Service over `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> CourseQuery for CourseService<R>
where
    R: CourseCatalogueRepository + ?Sized,
{
    async fn courses_for(&self, scholar_id: &ScholarId) -> Result<CourseListing, Error> {
        let profile = ScholarIdProfile::parse(scholar_id.as_str());
        let Some(branch) = profile.branch else {
            debug!(%scholar_id, "identifier encodes no known branch");
            return Ok(CourseListing::default());
        };
        let entries = self
            .repo
            .entries_for_branch(branch.short_name())
            .await
            .map_err(map_catalogue_persistence_error)?;
        Ok(CourseListing::from_entries(
            entries,
            profile.semester.map(|semester| semester.get()),
        ))
    }
}
