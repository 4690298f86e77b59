//! Domain model and services for the student portal.
//!
//! Purpose: hold the rules the portal enforces independent of HTTP or
//! storage. Services implement the driving ports in [`ports`] and depend
//! only on the driven ports declared there.
//!
//! Public surface:
//! - [`ScholarId`], [`ScholarIdProfile`]: identifiers and what they encode.
//! - [`Student`], [`RegistrationRequest`]: records and the registration rule.
//! - [`StudentAccountService`], [`AttendanceService`], [`CourseService`],
//!   [`ProfilePhotoService`]: use-case implementations.
//! - [`Error`], [`ErrorCode`]: transport-agnostic failures.

pub mod attendance;
pub mod courses;
pub mod error;
pub mod ports;
pub mod profile_photo;
pub mod scholar_id;
pub mod student;
pub mod student_accounts;
pub mod trace_id;

pub(crate) use self::attendance::map_attendance_update_error;
pub use self::attendance::{
    AttendanceRecord, AttendanceService, AttendanceUpdate, AttendanceUpdateValidationError,
    SubjectAttendance, SubjectUpsert, attendance_percentage,
};
pub use self::courses::{Course, CourseCatalogueEntry, CourseListing, CourseService};
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::profile_photo::{
    MAX_PROFILE_IMAGE_BYTES, PROFILE_IMAGE_ROUTE, ProfilePhotoService, ProfilePhotoUpload,
    StoredProfilePhoto, profile_image_filename,
};
pub use self::scholar_id::{
    Branch, SCHOLAR_ID_MAX, ScholarId, ScholarIdProfile, ScholarIdValidationError, Semester,
    semester_for_year_code,
};
pub use self::student::{
    AcademicScores, DEFAULT_INSTITUTION_DOMAIN, DEFAULT_PROFILE_IMAGE, EmailPolicy,
    RegistrationRequest, RegistrationValidationError, Student, SuppliedScores,
    merge_registration_score,
};
pub use self::student_accounts::{StudentAccountService, StudentProfile, StudentResolver};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
