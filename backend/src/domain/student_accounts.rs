//! Student account use cases: resolution, login, registration and profile.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error};

use crate::domain::ports::{
    LoginService, RegistrationCommand, RegistrationInput, StudentLookup, StudentPersistenceError,
    StudentProfileQuery, StudentRepository,
};
use crate::domain::{
    Branch, EmailPolicy, Error, RegistrationRequest, RegistrationValidationError, ScholarId,
    ScholarIdProfile, Semester, Student,
};

/// Student record plus what its identifier encodes.
#[derive(Debug, Clone, PartialEq)]
pub struct StudentProfile {
    /// The stored record.
    pub student: Student,
    /// Semester derived from the identifier.
    pub semester: Option<Semester>,
    /// Branch derived from the identifier.
    pub branch: Option<Branch>,
}

impl StudentProfile {
    /// Attach derived facts to `student`.
    #[must_use]
    pub fn for_student(student: Student) -> Self {
        let ScholarIdProfile { semester, branch } =
            ScholarIdProfile::parse(student.scholar_id.as_str());
        Self {
            student,
            semester,
            branch,
        }
    }
}

/// Finds the record a client-supplied identifier refers to.
///
/// Tries an exact match, then a numeric match for all-digit input, then a
/// case-insensitive match. Legacy data stored some identifiers as numbers
/// and some in a different case, so every lookup funnels through here.
pub struct StudentResolver<R: ?Sized> {
    repo: Arc<R>,
}

impl<R: ?Sized> Clone for StudentResolver<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R> StudentResolver<R>
where
    R: StudentRepository + ?Sized,
{
    /// Resolver over `repo`.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// The record `scholar_id` refers to, if any.
    pub async fn resolve(
        &self,
        scholar_id: &ScholarId,
    ) -> Result<Option<Student>, StudentPersistenceError> {
        for lookup in lookups_for(scholar_id) {
            if let Some(student) = self.repo.find(&lookup).await? {
                debug!(requested = %scholar_id, stored = %student.scholar_id, ?lookup, "resolved student");
                return Ok(Some(student));
            }
        }
        Ok(None)
    }
}

fn lookups_for(scholar_id: &ScholarId) -> Vec<StudentLookup> {
    let mut lookups = vec![StudentLookup::Exact(scholar_id.as_str().to_owned())];
    if let Some(value) = scholar_id.numeric_value() {
        lookups.push(StudentLookup::Numeric(value));
    }
    lookups.push(StudentLookup::CaseInsensitive(scholar_id.as_str().to_owned()));
    lookups
}

pub(crate) fn map_student_persistence_error(err: StudentPersistenceError) -> Error {
    error!(error = %err, "student repository failed");
    match err {
        StudentPersistenceError::Connection { message } => {
            Error::internal(format!("student store unavailable: {message}"))
        }
        StudentPersistenceError::Query { message } => {
            Error::internal(format!("student store error: {message}"))
        }
    }
}

fn map_registration_validation_error(err: &RegistrationValidationError) -> Error {
    let (field, code) = match err {
        RegistrationValidationError::EmptyEmail => ("email", "missing_field"),
        RegistrationValidationError::MalformedEmail => ("email", "invalid_email"),
        RegistrationValidationError::ForeignEmailDomain { .. } => ("email", "invalid_email_domain"),
        RegistrationValidationError::EmptyDisplayName => ("userName", "missing_field"),
    };
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": field,
        "code": code,
    }))
}

fn student_not_found() -> Error {
    Error::not_found("Student not found")
}

/// Account service backed by a [`StudentRepository`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
/// use scholar_portal::domain::{EmailPolicy, StudentAccountService};
/// use scholar_portal::outbound::memory::InMemoryPortalStore;
///
/// let store = Arc::new(InMemoryPortalStore::default());
/// let _service = StudentAccountService::new(store, EmailPolicy::default());
/// ```
pub struct StudentAccountService<R: ?Sized> {
    repo: Arc<R>,
    resolver: StudentResolver<R>,
    email_policy: EmailPolicy,
}

impl<R> StudentAccountService<R>
where
    R: StudentRepository + ?Sized,
{
    /// Service over `repo` accepting emails allowed by `email_policy`.
    pub fn new(repo: Arc<R>, email_policy: EmailPolicy) -> Self {
        let resolver = StudentResolver::new(Arc::clone(&repo));
        Self {
            repo,
            resolver,
            email_policy,
        }
    }

    async fn resolve(&self, scholar_id: &ScholarId) -> Result<Option<Student>, Error> {
        self.resolver
            .resolve(scholar_id)
            .await
            .map_err(map_student_persistence_error)
    }
}

#[async_trait]
impl<R> LoginService for StudentAccountService<R>
where
    R: StudentRepository + ?Sized,
{
    async fn login(&self, scholar_id: &ScholarId) -> Result<Student, Error> {
        let student = self.resolve(scholar_id).await?.ok_or_else(student_not_found)?;
        if !student.is_registered() {
            return Err(Error::forbidden("Incomplete registration"));
        }
        Ok(student)
    }

    async fn is_registered(&self, scholar_id: &ScholarId) -> Result<bool, Error> {
        Ok(self
            .resolve(scholar_id)
            .await?
            .is_some_and(|student| student.is_registered()))
    }
}

#[async_trait]
impl<R> RegistrationCommand for StudentAccountService<R>
where
    R: StudentRepository + ?Sized,
{
    async fn register(&self, input: RegistrationInput) -> Result<Student, Error> {
        let RegistrationInput {
            scholar_id,
            email,
            display_name,
            scores,
        } = input;
        let request =
            RegistrationRequest::try_new(scholar_id, &email, &display_name, scores, &self.email_policy)
                .map_err(|err| map_registration_validation_error(&err))?;
        // Existing records keep their stored key even when the caller typed a
        // different case or dropped leading zeros.
        let key = match self.resolve(request.scholar_id()).await? {
            Some(existing) => existing.scholar_id,
            None => request.scholar_id().clone(),
        };
        self.repo
            .register(&key, &request)
            .await
            .map_err(map_student_persistence_error)
    }
}

#[async_trait]
impl<R> StudentProfileQuery for StudentAccountService<R>
where
    R: StudentRepository + ?Sized,
{
    async fn profile(&self, scholar_id: &ScholarId) -> Result<StudentProfile, Error> {
        let student = self.resolve(scholar_id).await?.ok_or_else(student_not_found)?;
        Ok(StudentProfile::for_student(student))
    }
}

#[cfg(test)]
#[path = "student_accounts_tests.rs"]
mod tests;
