//! Profile photo replacement.
//!
//! A new image is written first, then the student record is pointed at it,
//! then the previous image is deleted. If the record update fails the new
//! file is removed again so no orphan is left behind.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{ProfileImageStore, ProfileImageStoreError, ProfilePhotoCommand, StudentRepository};
use crate::domain::student_accounts::map_student_persistence_error;
use crate::domain::{DEFAULT_PROFILE_IMAGE, Error, ScholarId, StudentResolver};

/// Largest accepted upload.
pub const MAX_PROFILE_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// URL prefix under which stored images are served.
pub const PROFILE_IMAGE_ROUTE: &str = "/uploads/profile-images";

const MAX_EXTENSION_LEN: usize = 8;

/// An uploaded image as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfilePhotoUpload {
    /// Declared MIME type.
    pub content_type: Option<String>,
    /// Client-side filename.
    pub original_name: Option<String>,
    /// File contents.
    pub bytes: Vec<u8>,
}

/// Where a stored photo ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredProfilePhoto {
    /// Filename recorded on the student.
    pub filename: String,
    /// Public path serving the file.
    pub url: String,
}

impl StoredProfilePhoto {
    fn new(filename: String) -> Self {
        let url = format!("{PROFILE_IMAGE_ROUTE}/{filename}");
        Self { filename, url }
    }
}

/// Filename for a new upload: `{scholarId}-{millis}{.ext}`.
///
/// The client's extension is kept when it is short and lowercase
/// alphanumeric; otherwise the MIME subtype is used.
///
/// # Examples
/// ```
/// use scholar_portal::domain::{ScholarId, profile_image_filename};
///
/// let id = ScholarId::new("2415062").expect("valid id");
/// assert_eq!(
///     profile_image_filename(&id, 1_700_000_000_000, Some("me.jpg"), "image/jpeg"),
///     "2415062-1700000000000.jpg"
/// );
/// assert_eq!(
///     profile_image_filename(&id, 7, Some("shot"), "image/png"),
///     "2415062-7.png"
/// );
/// ```
#[must_use]
pub fn profile_image_filename(
    scholar_id: &ScholarId,
    unix_millis: i64,
    original_name: Option<&str>,
    content_type: &str,
) -> String {
    let extension = original_name
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .filter(|ext| is_safe_extension(ext))
        .or_else(|| {
            content_type
                .split_once('/')
                .map(|(_, subtype)| subtype.to_ascii_lowercase())
                .filter(|subtype| is_safe_extension(subtype))
        });
    match extension {
        Some(ext) => format!("{scholar_id}-{unix_millis}.{ext}"),
        None => format!("{scholar_id}-{unix_millis}"),
    }
}

fn is_safe_extension(ext: &str) -> bool {
    !ext.is_empty()
        && ext.len() <= MAX_EXTENSION_LEN
        && ext
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
}

fn is_image(content_type: Option<&str>) -> bool {
    content_type.is_some_and(|value| {
        value
            .trim()
            .get(..6)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("image/"))
    })
}

fn map_image_store_error(err: &ProfileImageStoreError) -> Error {
    error!(error = %err, "profile image store failed");
    Error::internal(err.to_string())
}

/// Photo replacement over a student repository and an image store.
pub struct ProfilePhotoService<R: ?Sized, S: ?Sized> {
    students: Arc<R>,
    resolver: StudentResolver<R>,
    images: Arc<S>,
    clock: Arc<dyn Clock>,
}

impl<R, S> ProfilePhotoService<R, S>
where
    R: StudentRepository + ?Sized,
    S: ProfileImageStore + ?Sized,
{
    /// Service writing images to `images` and timestamps from `clock`.
    pub fn new(students: Arc<R>, images: Arc<S>, clock: Arc<dyn Clock>) -> Self {
        let resolver = StudentResolver::new(Arc::clone(&students));
        Self {
            students,
            resolver,
            images,
            clock,
        }
    }

    async fn discard(&self, filename: &str) {
        if let Err(err) = self.images.remove(filename).await {
            warn!(error = %err, %filename, "failed to delete profile image");
        }
    }
}

fn validate_upload(upload: &ProfilePhotoUpload) -> Result<(), Error> {
    if !is_image(upload.content_type.as_deref()) {
        return Err(
            Error::invalid_request("Only image uploads are allowed").with_details(json!({
                "field": "profileImage",
                "code": "unsupported_media_type",
            })),
        );
    }
    if upload.bytes.len() > MAX_PROFILE_IMAGE_BYTES {
        return Err(
            Error::invalid_request("Image must be at most 5 MB").with_details(json!({
                "field": "profileImage",
                "code": "too_large",
                "maxBytes": MAX_PROFILE_IMAGE_BYTES,
            })),
        );
    }
    Ok(())
}

#[async_trait]
impl<R, S> ProfilePhotoCommand for ProfilePhotoService<R, S>
where
    R: StudentRepository + ?Sized,
    S: ProfileImageStore + ?Sized,
{
    async fn replace_photo(
        &self,
        scholar_id: &ScholarId,
        upload: ProfilePhotoUpload,
    ) -> Result<StoredProfilePhoto, Error> {
        validate_upload(&upload)?;
        let student = self
            .resolver
            .resolve(scholar_id)
            .await
            .map_err(map_student_persistence_error)?
            .ok_or_else(|| Error::not_found("Student not found"))?;

        let filename = profile_image_filename(
            &student.scholar_id,
            self.clock.utc().timestamp_millis(),
            upload.original_name.as_deref(),
            upload.content_type.as_deref().unwrap_or_default(),
        );
        self.images
            .save(&filename, &upload.bytes)
            .await
            .map_err(|err| map_image_store_error(&err))?;

        let previous = match self
            .students
            .set_profile_image(&student.scholar_id, &filename)
            .await
        {
            Ok(Some(previous)) => previous,
            Ok(None) => {
                self.discard(&filename).await;
                return Err(Error::not_found("Student not found"));
            }
            Err(err) => {
                self.discard(&filename).await;
                return Err(map_student_persistence_error(err));
            }
        };

        if previous != DEFAULT_PROFILE_IMAGE && previous != filename && !previous.is_empty() {
            self.discard(&previous).await;
        }
        info!(scholar_id = %student.scholar_id, %filename, "profile photo replaced");
        Ok(StoredProfilePhoto::new(filename))
    }
}

#[cfg(test)]
#[path = "profile_photo_tests.rs"]
mod tests;
