//! PostgreSQL-backed [`StudentRepository`].
//!
//! Registration and the profile image swap are single statements so
//! concurrent requests for the same student cannot interleave a
//! read-modify-write.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{Double, Nullable, Text};
use diesel_async::RunQueryDsl;
use tracing::warn;

use crate::domain::ports::{StudentLookup, StudentPersistenceError, StudentRepository};
use crate::domain::{
    AcademicScores, DEFAULT_PROFILE_IMAGE, RegistrationRequest, ScholarId, Student,
};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{PreviousImageRow, StudentRow};
use super::pool::DbPool;
use super::schema::students;

const STUDENT_COLUMNS: &str =
    "scholar_id, name, email, user_name, profile_image, cgpa, sgpa_curr, sgpa_prev";

const FIND_NUMERIC_SQL: &str = "SELECT scholar_id, name, email, user_name, profile_image, \
     cgpa, sgpa_curr, sgpa_prev FROM students \
     WHERE (CASE WHEN scholar_id ~ '^[0-9]+$' THEN scholar_id::numeric END) = $1::numeric \
     ORDER BY scholar_id LIMIT 1";

const FIND_CASE_INSENSITIVE_SQL: &str = "SELECT scholar_id, name, email, user_name, \
     profile_image, cgpa, sgpa_curr, sgpa_prev FROM students \
     WHERE lower(scholar_id) = lower($1) \
     ORDER BY scholar_id LIMIT 1";

// A stored score survives only when strictly positive; NaN compares greater
// than everything in PostgreSQL, so it is excluded explicitly.
const REGISTER_SQL: &str = "INSERT INTO students AS s \
     (scholar_id, name, email, user_name, profile_image, cgpa, sgpa_curr, sgpa_prev) \
     VALUES ($1, $3, $2, $3, $4, $5, $6, $7) \
     ON CONFLICT (scholar_id) DO UPDATE SET \
       name = EXCLUDED.name, \
       email = EXCLUDED.email, \
       user_name = EXCLUDED.user_name, \
       cgpa = CASE WHEN s.cgpa > 0 AND s.cgpa <> 'NaN'::float8 THEN s.cgpa ELSE EXCLUDED.cgpa END, \
       sgpa_curr = CASE WHEN s.sgpa_curr > 0 AND s.sgpa_curr <> 'NaN'::float8 THEN s.sgpa_curr ELSE EXCLUDED.sgpa_curr END, \
       sgpa_prev = CASE WHEN s.sgpa_prev > 0 AND s.sgpa_prev <> 'NaN'::float8 THEN s.sgpa_prev ELSE EXCLUDED.sgpa_prev END, \
       updated_at = now() \
     RETURNING scholar_id, name, email, user_name, profile_image, cgpa, sgpa_curr, sgpa_prev";

const SET_PROFILE_IMAGE_SQL: &str = "UPDATE students AS s \
     SET profile_image = $2, updated_at = now() \
     FROM students AS previous \
     WHERE s.scholar_id = $1 AND previous.scholar_id = s.scholar_id \
     RETURNING previous.profile_image AS previous_image";

const IMPORT_SQL: &str = "INSERT INTO students \
     (scholar_id, name, email, user_name, profile_image, cgpa, sgpa_curr, sgpa_prev) \
     VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
     ON CONFLICT (scholar_id) DO UPDATE SET \
       name = EXCLUDED.name, \
       email = EXCLUDED.email, \
       user_name = EXCLUDED.user_name, \
       profile_image = EXCLUDED.profile_image, \
       cgpa = EXCLUDED.cgpa, \
       sgpa_curr = EXCLUDED.sgpa_curr, \
       sgpa_prev = EXCLUDED.sgpa_prev, \
       updated_at = now()";

/// Diesel implementation of [`StudentRepository`].
#[derive(Clone)]
pub struct DieselStudentRepository {
    pool: DbPool,
}

impl DieselStudentRepository {
    /// Repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: super::pool::PoolError) -> StudentPersistenceError {
    map_pool_error(error, StudentPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> StudentPersistenceError {
    map_diesel_error(
        error,
        StudentPersistenceError::query,
        StudentPersistenceError::connection,
    )
}

fn row_to_student(row: StudentRow) -> Result<Student, StudentPersistenceError> {
    let scholar_id = ScholarId::new(&row.scholar_id).map_err(|err| {
        warn!(stored = %row.scholar_id, error = %err, "stored scholar id is invalid");
        StudentPersistenceError::query(format!("stored scholar id is invalid: {err}"))
    })?;
    Ok(Student {
        scholar_id,
        name: row.name,
        email: row.email,
        user_name: row.user_name,
        profile_image: row.profile_image,
        scores: AcademicScores {
            cgpa: row.cgpa,
            sgpa_curr: row.sgpa_curr,
            sgpa_prev: row.sgpa_prev,
        },
    })
}

#[async_trait]
impl StudentRepository for DieselStudentRepository {
    async fn find(&self, lookup: &StudentLookup) -> Result<Option<Student>, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = match lookup {
            StudentLookup::Exact(value) => students::table
                .filter(students::scholar_id.eq(value))
                .select(StudentRow::as_select())
                .first(&mut conn)
                .await
                .optional(),
            StudentLookup::Numeric(value) => sql_query(FIND_NUMERIC_SQL)
                .bind::<Text, _>(value.to_string())
                .get_result::<StudentRow>(&mut conn)
                .await
                .optional(),
            StudentLookup::CaseInsensitive(value) => sql_query(FIND_CASE_INSENSITIVE_SQL)
                .bind::<Text, _>(value)
                .get_result::<StudentRow>(&mut conn)
                .await
                .optional(),
        }
        .map_err(diesel_error)?;
        row.map(row_to_student).transpose()
    }

    async fn register(
        &self,
        key: &ScholarId,
        request: &RegistrationRequest,
    ) -> Result<Student, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let scores = request.scores();
        let row = sql_query(REGISTER_SQL)
            .bind::<Text, _>(key.as_str())
            .bind::<Text, _>(request.email())
            .bind::<Text, _>(request.display_name())
            .bind::<Text, _>(DEFAULT_PROFILE_IMAGE)
            .bind::<Double, _>(scores.cgpa.unwrap_or(0.0))
            .bind::<Double, _>(scores.sgpa_curr.unwrap_or(0.0))
            .bind::<Double, _>(scores.sgpa_prev.unwrap_or(0.0))
            .get_result::<StudentRow>(&mut conn)
            .await
            .map_err(diesel_error)?;
        row_to_student(row)
    }

    async fn set_profile_image(
        &self,
        scholar_id: &ScholarId,
        filename: &str,
    ) -> Result<Option<String>, StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = sql_query(SET_PROFILE_IMAGE_SQL)
            .bind::<Text, _>(scholar_id.as_str())
            .bind::<Text, _>(filename)
            .get_result::<PreviousImageRow>(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        Ok(row.map(|row| row.previous_image))
    }

    async fn import(&self, student: &Student) -> Result<(), StudentPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        sql_query(IMPORT_SQL)
            .bind::<Text, _>(student.scholar_id.as_str())
            .bind::<Nullable<Text>, _>(student.name.as_deref())
            .bind::<Nullable<Text>, _>(student.email.as_deref())
            .bind::<Nullable<Text>, _>(student.user_name.as_deref())
            .bind::<Text, _>(student.profile_image.as_str())
            .bind::<Double, _>(student.scores.cgpa)
            .bind::<Double, _>(student.scores.sgpa_curr)
            .bind::<Double, _>(student.scores.sgpa_prev)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn row(scholar_id: &str) -> StudentRow {
        StudentRow {
            scholar_id: scholar_id.to_owned(),
            name: Some("Ada".to_owned()),
            email: None,
            user_name: None,
            profile_image: DEFAULT_PROFILE_IMAGE.to_owned(),
            cgpa: 8.5,
            sgpa_curr: 0.0,
            sgpa_prev: 7.0,
        }
    }

    #[rstest]
    fn rows_convert_to_students() {
        let student = row_to_student(row("2415062")).expect("valid row");
        assert_eq!(student.scholar_id.as_str(), "2415062");
        assert_eq!(student.scores.cgpa, 8.5);
        assert!(!student.is_registered());
    }

    #[rstest]
    fn malformed_stored_ids_are_query_errors() {
        let err = row_to_student(row("24 15")).expect_err("invalid id");
        assert!(matches!(err, StudentPersistenceError::Query { .. }));
    }

    #[rstest]
    fn select_statements_share_the_column_list() {
        for sql in [FIND_NUMERIC_SQL, FIND_CASE_INSENSITIVE_SQL] {
            assert!(sql.contains(STUDENT_COLUMNS));
        }
        assert!(REGISTER_SQL.ends_with(&format!("RETURNING {STUDENT_COLUMNS}")));
    }
}
