//! Profile photo upload handler.
//!
//! ```text
//! POST /api/profile/upload-photo (multipart: scholarId, profileImage)
//! ```

use actix_multipart::form::bytes::Bytes;
use actix_multipart::form::text::Text;
use actix_multipart::form::{MultipartForm, MultipartFormConfig};
use actix_web::{post, web};
use serde::{Deserialize, Serialize};
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::{MAX_PROFILE_IMAGE_BYTES, ProfilePhotoUpload};
use crate::inbound::http::ApiResult;
use crate::inbound::http::error::{invalid_multipart_error, multipart_error_handler};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, SCHOLAR_ID, missing_field_error, parse_scholar_id};

// Headroom over the image limit so the service, not the parser, reports
// slightly oversized images.
const FORM_LIMIT: usize = MAX_PROFILE_IMAGE_BYTES + 1024 * 1024;

const PROFILE_IMAGE: FieldName = FieldName::new("profileImage");

/// Multipart form extractor.
#[derive(Debug, MultipartForm)]
pub struct ProfilePhotoForm {
    #[multipart(rename = "profileImage")]
    pub profile_image: Option<Bytes>,
    #[multipart(rename = "scholarId")]
    pub scholar_id: Option<Text<String>>,
}

/// OpenAPI description of [`ProfilePhotoForm`].
#[derive(ToSchema)]
#[schema(rename_all = "camelCase")]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ProfilePhotoUploadRequest {
    #[schema(example = "2415062")]
    scholar_id: String,
    /// Image file, at most 5 MB.
    #[schema(value_type = String, format = Binary)]
    profile_image: Vec<u8>,
}

/// Upload response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct ProfilePhotoResponse {
    pub success: bool,
    #[schema(example = "2415062-1760000000000.png")]
    pub filename: String,
    #[schema(example = "/uploads/profile-images/2415062-1760000000000.png")]
    pub url: String,
}

/// Form limits and error mapping for the upload route.
#[must_use]
pub fn multipart_config() -> MultipartFormConfig {
    MultipartFormConfig::default()
        .total_limit(FORM_LIMIT)
        .memory_limit(FORM_LIMIT)
        .error_handler(multipart_error_handler)
}

/// Replace a student's profile photo.
///
/// The previous custom photo is deleted once the record points at the new
/// one. Bodies the multipart extractor refuses outright, such as a
/// non-multipart content type, get the same 400 envelope as malformed forms.
#[utoipa::path(
    post,
    path = "/api/profile/upload-photo",
    request_body(content = ProfilePhotoUploadRequest, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Stored photo", body = ProfilePhotoResponse),
        (status = 400, description = "Missing fields or unsupported file", body = crate::domain::Error),
        (status = 404, description = "Student not found", body = crate::domain::Error),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["students"],
    operation_id = "uploadProfilePhoto"
)]
#[post("/profile/upload-photo")]
pub async fn upload_photo(
    state: web::Data<HttpState>,
    form: Result<MultipartForm<ProfilePhotoForm>, actix_web::Error>,
) -> ApiResult<web::Json<ProfilePhotoResponse>> {
    let MultipartForm(ProfilePhotoForm {
        profile_image,
        scholar_id,
    }) = form.map_err(|err| {
        warn!(error = %err, "multipart extraction failed");
        invalid_multipart_error()
    })?;
    let scholar_id = match scholar_id {
        Some(text) => parse_scholar_id(&text.into_inner(), SCHOLAR_ID)?,
        None => return Err(missing_field_error(SCHOLAR_ID)),
    };
    let image = profile_image.ok_or_else(|| missing_field_error(PROFILE_IMAGE))?;
    let upload = ProfilePhotoUpload {
        content_type: image
            .content_type
            .as_ref()
            .map(|mime| mime.essence_str().to_owned()),
        original_name: image.file_name,
        bytes: image.data.to_vec(),
    };
    let stored = state.profile_photos.replace_photo(&scholar_id, upload).await?;
    Ok(web::Json(ProfilePhotoResponse {
        success: true,
        filename: stored.filename,
        url: stored.url,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error, StoredProfilePhoto};
    use crate::inbound::http::test_utils::{MockPorts, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::Value;

    const BOUNDARY: &str = "portal-test-boundary";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a str, &'a [u8]),
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                            .as_bytes(),
                    );
                }
                Part::File(name, filename, content_type, bytes) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                             Content-Type: {content_type}\r\n\r\n"
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(bytes);
                    body.extend_from_slice(b"\r\n");
                }
            }
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    async fn upload(ports: MockPorts, parts: &[Part<'_>]) -> (StatusCode, Value) {
        let app = actix_test::init_service(test_app(ports)).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/profile/upload-photo")
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={BOUNDARY}"),
            ))
            .set_payload(multipart_body(parts))
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        let status = response.status();
        let body = actix_test::read_body(response).await;
        (status, serde_json::from_slice(&body).unwrap_or(Value::Null))
    }

    #[rstest]
    #[actix_web::test]
    async fn upload_forwards_the_file_and_returns_its_url() {
        let mut ports = MockPorts::default();
        ports
            .profile_photos
            .expect_replace_photo()
            .withf(|id, upload| {
                id.as_str() == "2415062"
                    && upload.content_type.as_deref() == Some("image/png")
                    && upload.original_name.as_deref() == Some("me.png")
                    && upload.bytes == b"\x89PNG"
            })
            .times(1)
            .return_once(|_, _| {
                Ok(StoredProfilePhoto {
                    filename: "2415062-7.png".to_owned(),
                    url: "/uploads/profile-images/2415062-7.png".to_owned(),
                })
            });

        let (status, value) = upload(
            ports,
            &[
                Part::Text("scholarId", "2415062"),
                Part::File("profileImage", "me.png", "image/png", b"\x89PNG"),
            ],
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(value["success"], true);
        assert_eq!(value["filename"], "2415062-7.png");
        assert_eq!(value["url"], "/uploads/profile-images/2415062-7.png");
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_scholar_id_is_rejected() {
        let mut ports = MockPorts::default();
        ports.profile_photos.expect_replace_photo().never();

        let (status, value) = upload(
            ports,
            &[Part::File("profileImage", "me.png", "image/png", b"png")],
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["details"]["field"], "scholarId");
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_file_is_rejected() {
        let mut ports = MockPorts::default();
        ports.profile_photos.expect_replace_photo().never();

        let (status, value) = upload(ports, &[Part::Text("scholarId", "2415062")]).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["details"]["field"], "profileImage");
        assert_eq!(value["details"]["code"], "missing_field");
    }

    #[rstest]
    #[actix_web::test]
    async fn unknown_students_are_not_found() {
        let mut ports = MockPorts::default();
        ports
            .profile_photos
            .expect_replace_photo()
            .return_once(|_, _| Err(Error::not_found("Student not found")));

        let (status, value) = upload(
            ports,
            &[
                Part::Text("scholarId", "2499999"),
                Part::File("profileImage", "me.jpg", "image/jpeg", b"jpg"),
            ],
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(value["error"], "Student not found");
    }

    #[rstest]
    #[case("application/json", "{}")]
    #[case("text/plain", "scholarId=2415062")]
    #[case("multipart/form-data", "no boundary")]
    #[actix_web::test]
    async fn non_multipart_bodies_use_the_error_envelope(
        #[case] content_type: &str,
        #[case] payload: &'static str,
    ) {
        let mut ports = MockPorts::default();
        ports.profile_photos.expect_replace_photo().never();
        let app = actix_test::init_service(test_app(ports)).await;
        let request = actix_test::TestRequest::post()
            .uri("/api/profile/upload-photo")
            .insert_header(("content-type", content_type))
            .set_payload(payload)
            .to_request();
        let response = actix_test::call_service(&app, request).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let value: Value =
            serde_json::from_slice(&actix_test::read_body(response).await).expect("json");
        assert_eq!(value["error"], "Request body must be a valid multipart form");
        assert_eq!(value["code"], "invalid_request");
        assert_eq!(value["details"]["code"], "invalid_multipart");
    }
}
