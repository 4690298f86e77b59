//! Driving ports for student accounts: login, registration and profile.

use async_trait::async_trait;

use crate::domain::{Error, ScholarId, Student, StudentProfile, SuppliedScores};

/// Log a registered student in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Return the student's record.
    ///
    /// Unknown identifiers yield `not_found`; records without an email yield
    /// `forbidden`.
    async fn login(&self, scholar_id: &ScholarId) -> Result<Student, Error>;

    /// Whether the resolved record has an email. Unknown identifiers are
    /// simply unregistered.
    async fn is_registered(&self, scholar_id: &ScholarId) -> Result<bool, Error>;
}

/// Unvalidated registration fields as received from a client.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationInput {
    /// Identifier the student typed.
    pub scholar_id: ScholarId,
    /// Institutional email.
    pub email: String,
    /// Preferred display name.
    pub display_name: String,
    /// Optional scores.
    pub scores: SuppliedScores,
}

/// Register or re-register a student.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RegistrationCommand: Send + Sync {
    /// Validate `input` and apply it, returning the stored record.
    async fn register(&self, input: RegistrationInput) -> Result<Student, Error>;
}

/// Read a student's profile with derived academic facts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentProfileQuery: Send + Sync {
    /// Profile for the resolved record, or `not_found`.
    async fn profile(&self, scholar_id: &ScholarId) -> Result<StudentProfile, Error>;
}
