//! Student records and the registration rules applied to them.

use crate::domain::ScholarId;

/// Profile image every student starts with. It is never deleted from disk.
pub const DEFAULT_PROFILE_IMAGE: &str = "default.png";

/// Institutional mail domain fragment required at registration.
pub const DEFAULT_INSTITUTION_DOMAIN: &str = "nits.ac.in";

/// Cumulative and per-semester grade point averages.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AcademicScores {
    /// Cumulative grade point average.
    pub cgpa: f64,
    /// Grade point average for the current semester.
    pub sgpa_curr: f64,
    /// Grade point average for the previous semester.
    pub sgpa_prev: f64,
}

/// Scores supplied with a registration request; absent means "not sent".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SuppliedScores {
    /// Supplied cumulative average.
    pub cgpa: Option<f64>,
    /// Supplied current-semester average.
    pub sgpa_curr: Option<f64>,
    /// Supplied previous-semester average.
    pub sgpa_prev: Option<f64>,
}

/// Merge one stored score with the value supplied at registration.
///
/// A strictly positive stored score is authoritative. Anything else (zero,
/// negative, NaN) is replaced by the supplied value, or zero when none was
/// sent.
///
/// # Examples
/// ```
/// use scholar_portal::domain::merge_registration_score;
///
/// assert_eq!(merge_registration_score(8.1, Some(9.0)), 8.1);
/// assert_eq!(merge_registration_score(0.0, Some(9.0)), 9.0);
/// assert_eq!(merge_registration_score(0.0, None), 0.0);
/// ```
#[must_use]
pub fn merge_registration_score(existing: f64, supplied: Option<f64>) -> f64 {
    if existing > 0.0 {
        existing
    } else {
        supplied.unwrap_or(0.0)
    }
}

impl AcademicScores {
    /// Scores for a brand new record.
    #[must_use]
    pub fn from_supplied(supplied: SuppliedScores) -> Self {
        Self::default().merge_registration(supplied)
    }

    /// Apply [`merge_registration_score`] to each field.
    #[must_use]
    pub fn merge_registration(self, supplied: SuppliedScores) -> Self {
        Self {
            cgpa: merge_registration_score(self.cgpa, supplied.cgpa),
            sgpa_curr: merge_registration_score(self.sgpa_curr, supplied.sgpa_curr),
            sgpa_prev: merge_registration_score(self.sgpa_prev, supplied.sgpa_prev),
        }
    }
}

/// A student as stored by the portal.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    /// Identifier the record is keyed by.
    pub scholar_id: ScholarId,
    /// Full name.
    pub name: Option<String>,
    /// Institutional email; non-empty once registered.
    pub email: Option<String>,
    /// Display name chosen at registration.
    pub user_name: Option<String>,
    /// Filename of the current profile image.
    pub profile_image: String,
    /// Grade point averages.
    pub scores: AcademicScores,
}

impl Student {
    /// Blank, unregistered record for `scholar_id`.
    #[must_use]
    pub fn new(scholar_id: ScholarId) -> Self {
        Self {
            scholar_id,
            name: None,
            email: None,
            user_name: None,
            profile_image: DEFAULT_PROFILE_IMAGE.to_owned(),
            scores: AcademicScores::default(),
        }
    }

    /// Registered means a non-blank email is on file.
    #[must_use]
    pub fn is_registered(&self) -> bool {
        self.email
            .as_deref()
            .is_some_and(|email| !email.trim().is_empty())
    }

    /// Apply a registration to this record.
    ///
    /// Email, display name and name are overwritten; scores follow
    /// [`AcademicScores::merge_registration`]. The profile image is kept.
    #[must_use]
    pub fn registered_with(self, request: &RegistrationRequest) -> Self {
        Self {
            name: Some(request.display_name().to_owned()),
            email: Some(request.email().to_owned()),
            user_name: Some(request.display_name().to_owned()),
            scores: self.scores.merge_registration(request.scores()),
            ..self
        }
    }
}

/// Validation failures for registration input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistrationValidationError {
    /// Email missing or blank.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Email without an `@`.
    #[error("email must contain '@'")]
    MalformedEmail,
    /// Email outside the institutional domain.
    #[error("email must belong to the {domain} domain")]
    ForeignEmailDomain {
        /// Required domain fragment.
        domain: String,
    },
    /// Display name missing or blank.
    #[error("display name must not be empty")]
    EmptyDisplayName,
}

/// Which emails may register.
///
/// # Examples
/// ```
/// use scholar_portal::domain::EmailPolicy;
///
/// let policy = EmailPolicy::default();
/// assert!(policy.check("ada@cse.nits.ac.in").is_ok());
/// assert!(policy.check("ada@example.com").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailPolicy {
    domain: String,
}

impl EmailPolicy {
    /// Require `domain` somewhere after the `@`.
    #[must_use]
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into().trim().to_ascii_lowercase(),
        }
    }

    /// The required domain fragment.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Check an already-trimmed email.
    pub fn check(&self, email: &str) -> Result<(), RegistrationValidationError> {
        if email.is_empty() {
            return Err(RegistrationValidationError::EmptyEmail);
        }
        let Some((_, host)) = email.split_once('@') else {
            return Err(RegistrationValidationError::MalformedEmail);
        };
        if !host.to_ascii_lowercase().contains(&self.domain) {
            return Err(RegistrationValidationError::ForeignEmailDomain {
                domain: self.domain.clone(),
            });
        }
        Ok(())
    }
}

impl Default for EmailPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_INSTITUTION_DOMAIN)
    }
}

/// Validated registration input.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationRequest {
    scholar_id: ScholarId,
    email: String,
    display_name: String,
    scores: SuppliedScores,
}

impl RegistrationRequest {
    /// Validate raw registration fields against `policy`.
    pub fn try_new(
        scholar_id: ScholarId,
        email: &str,
        display_name: &str,
        scores: SuppliedScores,
        policy: &EmailPolicy,
    ) -> Result<Self, RegistrationValidationError> {
        let email = email.trim();
        policy.check(email)?;
        let display_name = display_name.trim();
        if display_name.is_empty() {
            return Err(RegistrationValidationError::EmptyDisplayName);
        }
        Ok(Self {
            scholar_id,
            email: email.to_owned(),
            display_name: display_name.to_owned(),
            scores,
        })
    }

    /// Identifier as supplied by the caller.
    #[must_use]
    pub fn scholar_id(&self) -> &ScholarId {
        &self.scholar_id
    }

    /// Trimmed institutional email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Trimmed display name.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Scores that came with the request.
    #[must_use]
    pub fn scores(&self) -> SuppliedScores {
        self.scores
    }
}
