//! Row structs for the persistence layer. Never exposed to the domain.

use diesel::prelude::*;

use super::schema::{attendance_entries, course_catalogue, students};

/// Student columns read back by every student query.
#[derive(Debug, Clone, Queryable, Selectable, QueryableByName)]
#[diesel(table_name = students)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct StudentRow {
    pub scholar_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub user_name: Option<String>,
    pub profile_image: String,
    pub cgpa: f64,
    pub sgpa_curr: f64,
    pub sgpa_prev: f64,
}

/// Previous image filename returned by the profile image swap.
#[derive(Debug, Clone, QueryableByName)]
pub(crate) struct PreviousImageRow {
    #[diesel(sql_type = diesel::sql_types::Text)]
    pub previous_image: String,
}

/// One attendance entry.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = attendance_entries)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AttendanceEntryRow {
    pub subject_code: String,
    pub total: i64,
    pub attended: i64,
}

/// One catalogue course as stored.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = course_catalogue)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CourseRow {
    pub branch_short: String,
    pub branch_code: Option<i32>,
    pub semester: i16,
    pub code: String,
    pub name: String,
    pub credits: f64,
}

/// Insertable catalogue course.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = course_catalogue)]
pub(crate) struct NewCourseRow<'a> {
    pub branch_short: &'a str,
    pub branch_code: Option<i32>,
    pub semester: i16,
    pub position: i32,
    pub code: &'a str,
    pub name: &'a str,
    pub credits: f64,
}
