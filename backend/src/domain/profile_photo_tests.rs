//! Tests for profile photo replacement.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::rstest;
use serde_json::json;

use super::*;
use crate::domain::ports::{
    MockProfileImageStore, MockStudentRepository, StudentLookup, StudentPersistenceError,
};
use crate::domain::{ErrorCode, Student};

const NOW_MILLIS: i64 = 1_760_000_000_000;

struct FixtureClock;

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        Utc.timestamp_millis_opt(NOW_MILLIS)
            .single()
            .expect("valid fixture timestamp")
    }
}

fn id(raw: &str) -> ScholarId {
    ScholarId::new(raw).expect("valid id")
}

fn student_with_image(image: &str) -> Student {
    Student {
        profile_image: image.to_owned(),
        ..Student::new(id("2415062"))
    }
}

fn upload(content_type: &str, bytes: usize) -> ProfilePhotoUpload {
    ProfilePhotoUpload {
        content_type: Some(content_type.to_owned()),
        original_name: Some("selfie.png".to_owned()),
        bytes: vec![0; bytes],
    }
}

fn students_finding(image: &'static str) -> MockStudentRepository {
    let mut students = MockStudentRepository::new();
    students
        .expect_find()
        .withf(|lookup| matches!(lookup, StudentLookup::Exact(_)))
        .returning(move |_| Ok(Some(student_with_image(image))));
    students
}

fn make_service(
    students: MockStudentRepository,
    images: MockProfileImageStore,
) -> ProfilePhotoService<MockStudentRepository, MockProfileImageStore> {
    ProfilePhotoService::new(Arc::new(students), Arc::new(images), Arc::new(FixtureClock))
}

const EXPECTED_NAME: &str = "2415062-1760000000000.png";

#[rstest]
#[case(Some("jpg"), "image/jpeg", "2415062-5.jpg")]
#[case(Some("JPG"), "image/jpeg", "2415062-5.jpg")]
#[case(None, "image/webp", "2415062-5.webp")]
#[case(Some("php%00"), "image/gif", "2415062-5.gif")]
#[case(Some("verylongextension"), "image/svg+xml", "2415062-5")]
fn filenames_prefer_safe_client_extensions(
    #[case] extension: Option<&str>,
    #[case] content_type: &str,
    #[case] expected: &str,
) {
    let original = extension.map(|ext| format!("photo.{ext}"));
    let name = profile_image_filename(&id("2415062"), 5, original.as_deref(), content_type);
    assert_eq!(name, expected);
}

#[tokio::test]
async fn replaces_photo_and_deletes_previous_custom_image() {
    let mut students = students_finding("2415062-1.png");
    students
        .expect_set_profile_image()
        .withf(|scholar_id, filename| scholar_id.as_str() == "2415062" && filename == EXPECTED_NAME)
        .times(1)
        .return_once(|_, _| Ok(Some("2415062-1.png".to_owned())));
    let mut images = MockProfileImageStore::new();
    images
        .expect_save()
        .withf(|filename, bytes| filename == EXPECTED_NAME && bytes.len() == 16)
        .times(1)
        .return_once(|_, _| Ok(()));
    images
        .expect_remove()
        .withf(|filename| filename == "2415062-1.png")
        .times(1)
        .return_once(|_| Ok(()));

    let stored = make_service(students, images)
        .replace_photo(&id("2415062"), upload("image/png", 16))
        .await
        .expect("photo replaced");
    assert_eq!(stored.filename, EXPECTED_NAME);
    assert_eq!(stored.url, format!("/uploads/profile-images/{EXPECTED_NAME}"));
}

#[tokio::test]
async fn keeps_the_default_image() {
    let mut students = students_finding(DEFAULT_PROFILE_IMAGE);
    students
        .expect_set_profile_image()
        .return_once(|_, _| Ok(Some(DEFAULT_PROFILE_IMAGE.to_owned())));
    let mut images = MockProfileImageStore::new();
    images.expect_save().return_once(|_, _| Ok(()));
    images.expect_remove().never();

    make_service(students, images)
        .replace_photo(&id("2415062"), upload("image/png", 1))
        .await
        .expect("photo replaced");
}

#[tokio::test]
async fn removes_new_file_when_record_update_fails() {
    let mut students = students_finding(DEFAULT_PROFILE_IMAGE);
    students
        .expect_set_profile_image()
        .return_once(|_, _| Err(StudentPersistenceError::query("deadlock")));
    let mut images = MockProfileImageStore::new();
    images.expect_save().return_once(|_, _| Ok(()));
    images
        .expect_remove()
        .withf(|filename| filename == EXPECTED_NAME)
        .times(1)
        .return_once(|_| Ok(()));

    let err = make_service(students, images)
        .replace_photo(&id("2415062"), upload("image/png", 1))
        .await
        .expect_err("update fails");
    assert_eq!(err.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn unknown_student_is_not_found_before_any_write() {
    let mut students = MockStudentRepository::new();
    students.expect_find().returning(|_| Ok(None));
    let mut images = MockProfileImageStore::new();
    images.expect_save().never();

    let err = make_service(students, images)
        .replace_photo(&id("2415062"), upload("image/png", 1))
        .await
        .expect_err("missing student");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[case(Some("application/pdf"), 1, "unsupported_media_type")]
#[case(None, 1, "unsupported_media_type")]
#[case(Some("image/png"), MAX_PROFILE_IMAGE_BYTES + 1, "too_large")]
#[tokio::test]
async fn rejects_invalid_uploads(
    #[case] content_type: Option<&str>,
    #[case] size: usize,
    #[case] code: &str,
) {
    let mut students = MockStudentRepository::new();
    students.expect_find().never();
    let mut images = MockProfileImageStore::new();
    images.expect_save().never();

    let mut rejected = upload("image/png", size);
    rejected.content_type = content_type.map(str::to_owned);
    let err = make_service(students, images)
        .replace_photo(&id("2415062"), rejected)
        .await
        .expect_err("upload rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    assert_eq!(err.details().map(|d| &d["code"]), Some(&json!(code)));
}

#[tokio::test]
async fn accepts_exactly_five_megabytes() {
    let mut students = students_finding(DEFAULT_PROFILE_IMAGE);
    students
        .expect_set_profile_image()
        .return_once(|_, _| Ok(Some(DEFAULT_PROFILE_IMAGE.to_owned())));
    let mut images = MockProfileImageStore::new();
    images.expect_save().return_once(|_, _| Ok(()));

    let result = make_service(students, images)
        .replace_photo(&id("2415062"), upload("image/jpeg", MAX_PROFILE_IMAGE_BYTES))
        .await;
    assert!(result.is_ok());
}
