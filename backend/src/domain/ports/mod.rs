//! Domain ports.
//!
//! Driving ports are the use cases inbound adapters call. Driven ports are
//! the stores the domain services call. Adapters live under `outbound`.

mod macros;

mod attendance_command;
mod attendance_repository;
mod course_catalogue_repository;
mod course_query;
mod login_service;
mod profile_image_store;
mod profile_photo_command;
mod student_repository;

pub(crate) use macros::define_port_error;

#[cfg(test)]
pub use attendance_command::{MockAttendanceCommand, MockAttendanceQuery};
pub use attendance_command::{AttendanceCommand, AttendanceQuery};
#[cfg(test)]
pub use attendance_repository::MockAttendanceRepository;
pub use attendance_repository::{AttendancePersistenceError, AttendanceRepository};
#[cfg(test)]
pub use course_catalogue_repository::MockCourseCatalogueRepository;
pub use course_catalogue_repository::{CourseCataloguePersistenceError, CourseCatalogueRepository};
#[cfg(test)]
pub use course_query::MockCourseQuery;
pub use course_query::CourseQuery;
#[cfg(test)]
pub use login_service::{MockLoginService, MockRegistrationCommand, MockStudentProfileQuery};
pub use login_service::{LoginService, RegistrationCommand, RegistrationInput, StudentProfileQuery};
#[cfg(test)]
pub use profile_image_store::MockProfileImageStore;
pub use profile_image_store::{ProfileImageStore, ProfileImageStoreError};
#[cfg(test)]
pub use profile_photo_command::MockProfilePhotoCommand;
pub use profile_photo_command::ProfilePhotoCommand;
#[cfg(test)]
pub use student_repository::MockStudentRepository;
pub use student_repository::{StudentLookup, StudentPersistenceError, StudentRepository};
