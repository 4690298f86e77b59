//! PostgreSQL-backed [`AttendanceRepository`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};
use diesel_async::RunQueryDsl;

use crate::domain::ports::{AttendancePersistenceError, AttendanceRepository};
use crate::domain::{AttendanceRecord, ScholarId, SubjectAttendance};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::AttendanceEntryRow;
use super::pool::{DbPool, PoolError};
use super::schema::attendance_entries;

const UPSERT_SUBJECT_SQL: &str = "INSERT INTO attendance_entries \
     (scholar_id, subject_code, total, attended) \
     VALUES ($1, $2, $3, $4) \
     ON CONFLICT (scholar_id, subject_code) DO UPDATE SET \
       total = EXCLUDED.total, \
       attended = EXCLUDED.attended, \
       updated_at = now()";

/// Diesel implementation of [`AttendanceRepository`].
#[derive(Clone)]
pub struct DieselAttendanceRepository {
    pool: DbPool,
}

impl DieselAttendanceRepository {
    /// Repository drawing connections from `pool`.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> AttendancePersistenceError {
    map_pool_error(error, AttendancePersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> AttendancePersistenceError {
    map_diesel_error(
        error,
        AttendancePersistenceError::query,
        AttendancePersistenceError::connection,
    )
}

fn rows_to_record(scholar_id: &ScholarId, rows: Vec<AttendanceEntryRow>) -> Option<AttendanceRecord> {
    if rows.is_empty() {
        return None;
    }
    let subjects = rows
        .into_iter()
        .map(|row| SubjectAttendance {
            subject_code: row.subject_code,
            total: row.total,
            attended: row.attended,
        })
        .collect();
    Some(AttendanceRecord {
        scholar_id: scholar_id.clone(),
        subjects,
    })
}

#[async_trait]
impl AttendanceRepository for DieselAttendanceRepository {
    async fn find(
        &self,
        scholar_id: &ScholarId,
    ) -> Result<Option<AttendanceRecord>, AttendancePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let rows = attendance_entries::table
            .filter(attendance_entries::scholar_id.eq(scholar_id.as_str()))
            .order(attendance_entries::entry_order.asc())
            .select(AttendanceEntryRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(rows_to_record(scholar_id, rows))
    }

    async fn upsert_subject(
        &self,
        scholar_id: &ScholarId,
        entry: &SubjectAttendance,
    ) -> Result<(), AttendancePersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        sql_query(UPSERT_SUBJECT_SQL)
            .bind::<Text, _>(scholar_id.as_str())
            .bind::<Text, _>(entry.subject_code.as_str())
            .bind::<BigInt, _>(entry.total)
            .bind::<BigInt, _>(entry.attended)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_rows_means_no_record() {
        let id = ScholarId::new("2415062").expect("valid id");
        assert!(rows_to_record(&id, Vec::new()).is_none());
    }

    #[test]
    fn rows_keep_their_order() {
        let id = ScholarId::new("2415062").expect("valid id");
        let rows = ["EC202", "EC201"]
            .into_iter()
            .map(|code| AttendanceEntryRow {
                subject_code: code.to_owned(),
                total: 10,
                attended: 9,
            })
            .collect();
        let record = rows_to_record(&id, rows).expect("record");
        let codes: Vec<_> = record.subjects.iter().map(|s| s.subject_code.as_str()).collect();
        assert_eq!(codes, ["EC202", "EC201"]);
    }
}
