//! Driving port for course listings.

use async_trait::async_trait;

use crate::domain::{CourseListing, Error, ScholarId};

/// Courses for a student's branch.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseQuery: Send + Sync {
    /// Current-semester and all-semester courses. Unknown branches get empty
    /// lists rather than an error.
    async fn courses_for(&self, scholar_id: &ScholarId) -> Result<CourseListing, Error>;
}
