//! Driven port for profile image files.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by image store adapters.
    pub enum ProfileImageStoreError {
        /// Filesystem or transport failure.
        Io as io => "profile image store failed: {message}",
        /// The filename would escape the store.
        InvalidName as invalid_name => "invalid profile image name: {message}",
    }
}

/// Port for writing and deleting stored profile images.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProfileImageStore: Send + Sync {
    /// Write `bytes` under `filename`, replacing any existing file.
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), ProfileImageStoreError>;

    /// Delete `filename`. Missing files are not an error.
    async fn remove(&self, filename: &str) -> Result<(), ProfileImageStoreError>;
}
