//! PostgreSQL-backed [`CourseCatalogueRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, RunQueryDsl};
use tracing::warn;

use crate::domain::ports::{CourseCataloguePersistenceError, CourseCatalogueRepository};
use crate::domain::{Course, CourseCatalogueEntry};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CourseRow, NewCourseRow};
use super::pool::{DbPool, PoolError};
use super::schema::course_catalogue;

/// Diesel implementation of [`CourseCatalogueRepository`].
#[derive(Clone)]
pub struct DieselCourseCatalogueRepository {
    pool: DbPool,
}

impl DieselCourseCatalogueRepository {
    /// Repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> CourseCataloguePersistenceError {
    map_pool_error(error, CourseCataloguePersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> CourseCataloguePersistenceError {
    map_diesel_error(
        error,
        CourseCataloguePersistenceError::query,
        CourseCataloguePersistenceError::connection,
    )
}

/// Fold rows ordered by (semester, position) into one entry per semester.
fn group_rows(rows: Vec<CourseRow>) -> Vec<CourseCatalogueEntry> {
    let mut entries: Vec<CourseCatalogueEntry> = Vec::new();
    for row in rows {
        let Ok(semester) = u8::try_from(row.semester) else {
            warn!(semester = row.semester, code = %row.code, "skipping course with invalid semester");
            continue;
        };
        let course = Course {
            code: row.code,
            name: row.name,
            credits: row.credits,
        };
        match entries.last_mut() {
            Some(entry) if entry.semester == semester => entry.courses.push(course),
            _ => entries.push(CourseCatalogueEntry {
                branch_short: row.branch_short,
                branch_code: row.branch_code,
                semester,
                courses: vec![course],
            }),
        }
    }
    entries
}

fn new_rows(entry: &CourseCatalogueEntry) -> Result<Vec<NewCourseRow<'_>>, CourseCataloguePersistenceError> {
    entry
        .courses
        .iter()
        .enumerate()
        .map(|(index, course)| {
            let position = i32::try_from(index)
                .map_err(|_| CourseCataloguePersistenceError::query("too many courses in one semester"))?;
            Ok(NewCourseRow {
                branch_short: entry.branch_short.as_str(),
                branch_code: entry.branch_code,
                semester: i16::from(entry.semester),
                position,
                code: course.code.as_str(),
                name: course.name.as_str(),
                credits: course.credits,
            })
        })
        .collect()
}

#[async_trait]
impl CourseCatalogueRepository for DieselCourseCatalogueRepository {
    async fn entries_for_branch(
        &self,
        branch_short: &str,
    ) -> Result<Vec<CourseCatalogueEntry>, CourseCataloguePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = course_catalogue::table
            .filter(course_catalogue::branch_short.eq(branch_short))
            .order((course_catalogue::semester.asc(), course_catalogue::position.asc()))
            .select(CourseRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(group_rows(rows))
    }

    async fn replace_entry(
        &self,
        entry: &CourseCatalogueEntry,
    ) -> Result<(), CourseCataloguePersistenceError> {
        let rows = new_rows(entry)?;
        let branch_short = entry.branch_short.clone();
        let semester = i16::from(entry.semester);
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            async move {
                diesel::delete(
                    course_catalogue::table
                        .filter(course_catalogue::branch_short.eq(&branch_short))
                        .filter(course_catalogue::semester.eq(semester)),
                )
                .execute(conn)
                .await?;
                if !rows.is_empty() {
                    diesel::insert_into(course_catalogue::table)
                        .values(&rows)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(semester: i16, code: &str) -> CourseRow {
        CourseRow {
            branch_short: "CSE".to_owned(),
            branch_code: Some(6),
            semester,
            code: code.to_owned(),
            name: format!("Course {code}"),
            credits: 3.0,
        }
    }

    #[test]
    fn rows_group_by_semester() {
        let entries = group_rows(vec![row(1, "CS101"), row(1, "CS102"), row(3, "CS301")]);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].courses.len(), 2);
        assert_eq!(entries[1].semester, 3);
    }

    #[test]
    fn negative_semesters_are_skipped() {
        let entries = group_rows(vec![row(-1, "CS000"), row(2, "CS201")]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].semester, 2);
    }

    #[test]
    fn inserts_keep_catalogue_positions() {
        let entry = CourseCatalogueEntry {
            branch_short: "CSE".to_owned(),
            branch_code: Some(6),
            semester: 4,
            courses: vec![
                Course { code: "CS401".to_owned(), name: "Compilers".to_owned(), credits: 4.0 },
                Course { code: "CS402".to_owned(), name: "Networks".to_owned(), credits: 3.0 },
            ],
        };
        let rows = new_rows(&entry).expect("rows");
        let positions: Vec<_> = rows.iter().map(|r| (r.position, r.code)).collect();
        assert_eq!(positions, [(0, "CS401"), (1, "CS402")]);
    }
}
