//! Student account handlers.
//!
//! ```text
//! POST /api/login {"scholarId":"2415062"}
//! POST /api/register {"scholarId":"2415062","email":"...","displayName":"Ada"}
//! GET /api/check-registration/2415062
//! GET /api/profile/2415062
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;
use utoipa::ToSchema;

use crate::domain::SuppliedScores;
use crate::domain::ports::RegistrationInput;
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{StudentEnvelope, StudentPayload};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{SCHOLAR_ID, parse_scholar_id, require_scholar_id};

/// Login request body. `identifier` is accepted as an alias.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(alias = "identifier")]
    pub scholar_id: Option<String>,
}

/// Look a student up by identifier.
///
/// There is no password; a registered record is simply returned.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Registered student", body = StudentEnvelope),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 403, description = "Incomplete registration", body = crate::domain::Error),
        (status = 404, description = "Student not found", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["students"],
    operation_id = "login"
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<StudentEnvelope>> {
    let scholar_id = require_scholar_id(payload.scholar_id.as_deref(), SCHOLAR_ID)?;
    let student = state.login.login(&scholar_id).await?;
    Ok(web::Json(StudentEnvelope::success(&student)))
}

/// Registration request body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(alias = "identifier")]
    pub scholar_id: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "userName")]
    pub display_name: Option<String>,
    pub cgpa: Option<f64>,
    #[serde(rename = "sgpa_curr")]
    pub sgpa_curr: Option<f64>,
    #[serde(rename = "sgpa_prev")]
    pub sgpa_prev: Option<f64>,
}

/// Create or complete a student's registration.
///
/// Existing positive grade averages are never replaced.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 200, description = "Stored student", body = StudentEnvelope),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["students"],
    operation_id = "register"
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<web::Json<StudentEnvelope>> {
    let RegisterRequest {
        scholar_id,
        email,
        display_name,
        cgpa,
        sgpa_curr,
        sgpa_prev,
    } = payload.into_inner();
    let input = RegistrationInput {
        scholar_id: require_scholar_id(scholar_id.as_deref(), SCHOLAR_ID)?,
        email: email.unwrap_or_default(),
        display_name: display_name.unwrap_or_default(),
        scores: SuppliedScores {
            cgpa,
            sgpa_curr,
            sgpa_prev,
        },
    };
    let student = state.registration.register(input).await?;
    Ok(web::Json(StudentEnvelope::success(&student)))
}

/// `GET /api/check-registration/{id}` response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationStatus {
    pub is_registered: bool,
}

/// Whether a student has completed registration.
///
/// Malformed and unknown identifiers are reported as unregistered.
#[utoipa::path(
    get,
    path = "/api/check-registration/{scholar_id}",
    params(("scholar_id" = String, Path, description = "Scholar identifier")),
    responses(
        (status = 200, description = "Registration status", body = RegistrationStatus),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["students"],
    operation_id = "checkRegistration"
)]
#[get("/check-registration/{scholar_id}")]
pub async fn check_registration(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<RegistrationStatus>> {
    let raw = path.into_inner();
    let Ok(scholar_id) = parse_scholar_id(&raw, SCHOLAR_ID) else {
        debug!(scholar_id = %raw, "unparseable identifier treated as unregistered");
        return Ok(web::Json(RegistrationStatus {
            is_registered: false,
        }));
    };
    let is_registered = state.login.is_registered(&scholar_id).await?;
    Ok(web::Json(RegistrationStatus { is_registered }))
}

/// `GET /api/profile/{id}` response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct ProfileResponse {
    pub student: StudentPayload,
    /// Current semester derived from the identifier.
    #[schema(example = 4)]
    pub semester: Option<u8>,
    /// Branch short name derived from the identifier.
    #[schema(example = "EIE")]
    pub branch: Option<String>,
    /// Same value as `branch`, under the key older frontends read.
    #[serde(rename = "branchShort")]
    #[schema(example = "EIE")]
    pub branch_short: Option<String>,
}

/// Student record with semester and branch derived from the identifier.
#[utoipa::path(
    get,
    path = "/api/profile/{scholar_id}",
    params(("scholar_id" = String, Path, description = "Scholar identifier")),
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 400, description = "Invalid identifier", body = crate::domain::Error),
        (status = 404, description = "Student not found", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["students"],
    operation_id = "getProfile"
)]
#[get("/profile/{scholar_id}")]
pub async fn profile(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ProfileResponse>> {
    let scholar_id = parse_scholar_id(&path, SCHOLAR_ID)?;
    let profile = state.profile.profile(&scholar_id).await?;
    let branch = profile.branch.map(|branch| branch.short_name().to_owned());
    Ok(web::Json(ProfileResponse {
        student: (&profile.student).into(),
        semester: profile.semester.map(|semester| semester.get()),
        branch_short: branch.clone(),
        branch,
    }))
}

#[cfg(test)]
#[path = "students_tests.rs"]
mod tests;
