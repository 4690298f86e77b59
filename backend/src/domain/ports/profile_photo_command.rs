//! Driving port for replacing a student's profile photo.

use async_trait::async_trait;

use crate::domain::{Error, ProfilePhotoUpload, ScholarId, StoredProfilePhoto};

/// Replace profile photos.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfilePhotoCommand: Send + Sync {
    /// Store `upload` as the student's new photo and discard the old one.
    async fn replace_photo(
        &self,
        scholar_id: &ScholarId,
        upload: ProfilePhotoUpload,
    ) -> Result<StoredProfilePhoto, Error>;
}
