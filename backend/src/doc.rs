//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer together
//! with the request and response schemas they reference. The document is
//! served by Swagger UI in debug builds and exported by the `openapi-dump`
//! binary for external tooling.

use utoipa::OpenApi;

use crate::inbound::http::attendance::{
    AttendanceResponse, AttendanceUpdateRequest, SubjectAttendancePayload,
};
use crate::inbound::http::courses::{CatalogueEntryPayload, CourseListingResponse, CoursePayload};
use crate::inbound::http::health::StatusResponse;
use crate::inbound::http::profile_photo::{ProfilePhotoResponse, ProfilePhotoUploadRequest};
use crate::inbound::http::schemas::{StudentEnvelope, StudentPayload, SuccessResponse};
use crate::inbound::http::students::{
    LoginRequest, ProfileResponse, RegisterRequest, RegistrationStatus,
};

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Scholar portal API",
        description = "Student login, registration, profile, course and attendance endpoints."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::students::login,
        crate::inbound::http::students::register,
        crate::inbound::http::students::check_registration,
        crate::inbound::http::students::profile,
        crate::inbound::http::profile_photo::upload_photo,
        crate::inbound::http::courses::get_courses,
        crate::inbound::http::attendance::get_attendance,
        crate::inbound::http::attendance::update_attendance,
        crate::inbound::http::health::status,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        crate::domain::Error,
        crate::domain::ErrorCode,
        StudentPayload,
        StudentEnvelope,
        SuccessResponse,
        LoginRequest,
        RegisterRequest,
        RegistrationStatus,
        ProfileResponse,
        ProfilePhotoUploadRequest,
        ProfilePhotoResponse,
        CoursePayload,
        CatalogueEntryPayload,
        CourseListingResponse,
        SubjectAttendancePayload,
        AttendanceResponse,
        AttendanceUpdateRequest,
        StatusResponse,
    )),
    tags(
        (name = "students", description = "Login, registration and profiles"),
        (name = "courses", description = "Course catalogue listings"),
        (name = "attendance", description = "Per-subject attendance"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("/api/login")]
    #[case("/api/register")]
    #[case("/api/check-registration/{scholar_id}")]
    #[case("/api/profile/{scholar_id}")]
    #[case("/api/profile/upload-photo")]
    #[case("/api/courses/{scholar_id}")]
    #[case("/api/attendance/{scholar_id}")]
    #[case("/api/attendance/update")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn student_schema_uses_wire_names() {
        let doc = ApiDoc::openapi();
        let json = serde_json::to_value(&doc).expect("serialisable document");
        let properties = &json["components"]["schemas"]["StudentPayload"]["properties"];
        for field in ["scholarId", "userName", "profileImage", "sgpa_curr", "sgpa_prev"] {
            assert!(properties.get(field).is_some(), "missing {field}");
        }
    }
}
