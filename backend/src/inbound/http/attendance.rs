//! Attendance handlers.
//!
//! ```text
//! GET /api/attendance/2415062
//! POST /api/attendance/update {"scholarId":"2415062","subjectCode":"EI201","total":10,"attended":8}
//! ```

use actix_web::{get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AttendanceRecord, AttendanceUpdate, SubjectAttendance, map_attendance_update_error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::SuccessResponse;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, SCHOLAR_ID, missing_field_error, parse_scholar_id, require_scholar_id,
};

/// One subject's counters with the derived percentage.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubjectAttendancePayload {
    #[schema(example = "EI201")]
    pub subject_code: String,
    pub total: i64,
    pub attended: i64,
    /// `attended / total` rounded to the nearest whole percent; 0 when
    /// `total` is 0.
    pub percentage: i64,
}

impl From<&SubjectAttendance> for SubjectAttendancePayload {
    fn from(entry: &SubjectAttendance) -> Self {
        Self {
            subject_code: entry.subject_code.clone(),
            total: entry.total,
            attended: entry.attended,
            percentage: entry.percentage(),
        }
    }
}

/// `GET /api/attendance/{id}` response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceResponse {
    pub scholar_id: String,
    pub attendance: Vec<SubjectAttendancePayload>,
}

impl From<&AttendanceRecord> for AttendanceResponse {
    fn from(record: &AttendanceRecord) -> Self {
        Self {
            scholar_id: record.scholar_id.as_str().to_owned(),
            attendance: record.subjects.iter().map(Into::into).collect(),
        }
    }
}

/// A student's attendance. Students with no record get an empty list.
#[utoipa::path(
    get,
    path = "/api/attendance/{scholar_id}",
    params(("scholar_id" = String, Path, description = "Scholar identifier")),
    responses(
        (status = 200, description = "Attendance", body = AttendanceResponse),
        (status = 400, description = "Invalid identifier", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["attendance"],
    operation_id = "getAttendance"
)]
#[get("/attendance/{scholar_id}")]
pub async fn get_attendance(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<AttendanceResponse>> {
    let scholar_id = parse_scholar_id(&path, SCHOLAR_ID)?;
    let record = state.attendance_query.attendance(&scholar_id).await?;
    Ok(web::Json((&record).into()))
}

/// Attendance update request body.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceUpdateRequest {
    #[serde(alias = "identifier")]
    pub scholar_id: Option<String>,
    pub subject_code: Option<String>,
    pub total: Option<i64>,
    pub attended: Option<i64>,
}

const TOTAL: FieldName = FieldName::new("total");
const ATTENDED: FieldName = FieldName::new("attended");

/// Set one subject's counters, adding the subject when new.
///
/// Counts are stored as sent: attended above total and negative values are
/// accepted.
#[utoipa::path(
    post,
    path = "/api/attendance/update",
    request_body = AttendanceUpdateRequest,
    responses(
        (status = 200, description = "Stored", body = SuccessResponse),
        (status = 400, description = "Invalid request", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["attendance"],
    operation_id = "updateAttendance"
)]
#[post("/attendance/update")]
pub async fn update_attendance(
    state: web::Data<HttpState>,
    payload: web::Json<AttendanceUpdateRequest>,
) -> ApiResult<web::Json<SuccessResponse>> {
    let AttendanceUpdateRequest {
        scholar_id,
        subject_code,
        total,
        attended,
    } = payload.into_inner();
    let scholar_id = require_scholar_id(scholar_id.as_deref(), SCHOLAR_ID)?;
    let total = total.ok_or_else(|| missing_field_error(TOTAL))?;
    let attended = attended.ok_or_else(|| missing_field_error(ATTENDED))?;
    let update = AttendanceUpdate::try_new(
        scholar_id,
        subject_code.unwrap_or_default(),
        total,
        attended,
    )
    .map_err(map_attendance_update_error)?;
    state.attendance.update(update).await?;
    Ok(web::Json(SuccessResponse::OK))
}
