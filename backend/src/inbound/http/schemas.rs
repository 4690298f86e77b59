//! Wire representations shared by several handlers.
//!
//! Field names follow the browser frontend, which predates this service:
//! camelCase for most keys, but the grade averages keep their snake_case
//! names.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Student;

/// A student record as the frontend stores it in `localStorage`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentPayload {
    #[schema(example = "2415062")]
    pub scholar_id: String,
    pub name: Option<String>,
    #[schema(example = "ada_ug_24@ei.nits.ac.in")]
    pub email: Option<String>,
    pub user_name: Option<String>,
    #[schema(example = "default.png")]
    pub profile_image: String,
    pub cgpa: f64,
    #[serde(rename = "sgpa_curr")]
    pub sgpa_curr: f64,
    #[serde(rename = "sgpa_prev")]
    pub sgpa_prev: f64,
}

impl From<&Student> for StudentPayload {
    fn from(student: &Student) -> Self {
        Self {
            scholar_id: student.scholar_id.as_str().to_owned(),
            name: student.name.clone(),
            email: student.email.clone(),
            user_name: student.user_name.clone(),
            profile_image: student.profile_image.clone(),
            cgpa: student.scores.cgpa,
            sgpa_curr: student.scores.sgpa_curr,
            sgpa_prev: student.scores.sgpa_prev,
        }
    }
}

/// `{"success": true, "student": {...}}` returned by login and register.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct StudentEnvelope {
    pub success: bool,
    pub student: StudentPayload,
}

impl StudentEnvelope {
    /// Successful envelope around `student`.
    #[must_use]
    pub fn success(student: &Student) -> Self {
        Self {
            success: true,
            student: student.into(),
        }
    }
}

/// `{"success": true}` for commands without a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

impl SuccessResponse {
    /// The only value handlers return.
    pub const OK: Self = Self { success: true };
}
