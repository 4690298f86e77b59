//! Profile images on the local filesystem.
//!
//! All access goes through a capability handle on the uploads directory, so
//! a crafted filename cannot reach outside it.

use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use tracing::debug;

use crate::domain::ports::{ProfileImageStore, ProfileImageStoreError};

/// [`ProfileImageStore`] writing into one directory.
#[derive(Clone)]
pub struct CapStdProfileImageStore {
    dir: Arc<Dir>,
}

impl CapStdProfileImageStore {
    /// Open `path`, creating it first when missing.
    ///
    /// # Errors
    /// Returns the underlying I/O error when the directory cannot be created
    /// or opened.
    pub fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        Dir::create_ambient_dir_all(path, ambient_authority())?;
        let dir = Dir::open_ambient_dir(path, ambient_authority())?;
        Ok(Self { dir: Arc::new(dir) })
    }
}

fn check_name(filename: &str) -> Result<(), ProfileImageStoreError> {
    let plain = !filename.is_empty()
        && filename != "."
        && filename != ".."
        && !filename.contains(['/', '\\', '\0']);
    if plain {
        Ok(())
    } else {
        Err(ProfileImageStoreError::invalid_name(filename))
    }
}

async fn run_blocking<T, F>(task: F) -> Result<T, ProfileImageStoreError>
where
    F: FnOnce() -> Result<T, ProfileImageStoreError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| ProfileImageStoreError::io(err.to_string()))?
}

#[async_trait]
impl ProfileImageStore for CapStdProfileImageStore {
    async fn save(&self, filename: &str, bytes: &[u8]) -> Result<(), ProfileImageStoreError> {
        check_name(filename)?;
        let dir = Arc::clone(&self.dir);
        let name = filename.to_owned();
        let contents = bytes.to_vec();
        run_blocking(move || {
            dir.write(&name, contents)
                .map_err(|err| ProfileImageStoreError::io(format!("{name}: {err}")))
        })
        .await?;
        debug!(%filename, size = bytes.len(), "profile image written");
        Ok(())
    }

    async fn remove(&self, filename: &str) -> Result<(), ProfileImageStoreError> {
        check_name(filename)?;
        let dir = Arc::clone(&self.dir);
        let name = filename.to_owned();
        run_blocking(move || match dir.remove_file(&name) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(ProfileImageStoreError::io(format!("{name}: {err}"))),
        })
        .await
    }
}
