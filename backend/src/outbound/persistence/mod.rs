//! PostgreSQL adapters built on Diesel and `diesel-async`.

mod diesel_attendance_repository;
mod diesel_course_catalogue_repository;
mod diesel_error_mapping;
mod diesel_student_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_attendance_repository::DieselAttendanceRepository;
pub use diesel_course_catalogue_repository::DieselCourseCatalogueRepository;
pub use diesel_student_repository::DieselStudentRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
