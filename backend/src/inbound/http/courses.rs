//! Course listing handler.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Course, CourseCatalogueEntry, CourseListing};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{SCHOLAR_ID, parse_scholar_id};

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
pub struct CoursePayload {
    #[schema(example = "EI201")]
    pub code: String,
    pub name: String,
    #[schema(example = 4.0)]
    pub credits: f64,
}

impl From<&Course> for CoursePayload {
    fn from(course: &Course) -> Self {
        Self {
            code: course.code.clone(),
            name: course.name.clone(),
            credits: course.credits,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CatalogueEntryPayload {
    pub branch_code: Option<i32>,
    #[schema(example = "EIE")]
    pub branch_short: String,
    pub semester: u8,
    pub courses: Vec<CoursePayload>,
}

impl From<&CourseCatalogueEntry> for CatalogueEntryPayload {
    fn from(entry: &CourseCatalogueEntry) -> Self {
        Self {
            branch_code: entry.branch_code,
            branch_short: entry.branch_short.clone(),
            semester: entry.semester,
            courses: entry.courses.iter().map(Into::into).collect(),
        }
    }
}

/// `GET /api/courses/{id}` response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CourseListingResponse {
    pub current_semester_courses: Vec<CoursePayload>,
    pub all_courses: Vec<CatalogueEntryPayload>,
}

impl From<&CourseListing> for CourseListingResponse {
    fn from(listing: &CourseListing) -> Self {
        Self {
            current_semester_courses: listing
                .current_semester_courses
                .iter()
                .map(Into::into)
                .collect(),
            all_courses: listing.all_courses.iter().map(Into::into).collect(),
        }
    }
}

/// Courses for the branch and semester encoded in the identifier.
///
/// Identifiers that encode no known branch get empty lists.
#[utoipa::path(
    get,
    path = "/api/courses/{scholar_id}",
    params(("scholar_id" = String, Path, description = "Scholar identifier")),
    responses(
        (status = 200, description = "Course listing", body = CourseListingResponse),
        (status = 400, description = "Invalid identifier", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["courses"],
    operation_id = "getCourses"
)]
#[get("/courses/{scholar_id}")]
pub async fn get_courses(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CourseListingResponse>> {
    let scholar_id = parse_scholar_id(&path, SCHOLAR_ID)?;
    let listing = state.courses.courses_for(&scholar_id).await?;
    Ok(web::Json((&listing).into()))
}
