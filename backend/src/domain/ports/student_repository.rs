//! Driven port for student persistence.

use async_trait::async_trait;

use crate::domain::{RegistrationRequest, ScholarId, Student};

use super::define_port_error;

define_port_error! {
    /// Errors raised by student repository adapters.
    pub enum StudentPersistenceError {
        /// The store could not be reached.
        Connection as connection => "student repository connection failed: {message}",
        /// A query or mutation failed.
        Query as query => "student repository query failed: {message}",
    }
}

/// One way of finding a student record.
///
/// The resolver tries these in order: exact, numeric, case-insensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StudentLookup {
    /// Identifier text matches byte for byte.
    Exact(String),
    /// All-digit identifier whose numeric value matches, so `"0042"` finds
    /// `"42"`.
    Numeric(u64),
    /// Identifier matches ignoring ASCII case.
    CaseInsensitive(String),
}

/// Port for reading and writing student records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentRepository: Send + Sync {
    /// First record matching `lookup`, if any.
    ///
    /// When several records match a numeric or case-insensitive lookup the
    /// adapter returns the one with the lowest identifier.
    async fn find(&self, lookup: &StudentLookup) -> Result<Option<Student>, StudentPersistenceError>;

    /// Apply `request` to the record keyed by `key`, creating it if missing.
    ///
    /// Must be a single atomic step: email, display name and name are
    /// overwritten and each score follows
    /// [`merge_registration_score`](crate::domain::merge_registration_score).
    async fn register(
        &self,
        key: &ScholarId,
        request: &RegistrationRequest,
    ) -> Result<Student, StudentPersistenceError>;

    /// Point the record at a new profile image filename.
    ///
    /// Returns the previous filename, or `None` when no record exists.
    async fn set_profile_image(
        &self,
        scholar_id: &ScholarId,
        filename: &str,
    ) -> Result<Option<String>, StudentPersistenceError>;

    /// Insert or fully overwrite a record. Used by the legacy importer.
    async fn import(&self, student: &Student) -> Result<(), StudentPersistenceError>;
}
