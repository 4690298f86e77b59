//! Builders wiring driven adapters into the HTTP state.

use std::io;
use std::sync::Arc;

use mockable::DefaultClock;
use tracing::warn;

use scholar_portal::domain::ports::{
    AttendanceRepository, CourseCatalogueRepository, StudentRepository,
};
use scholar_portal::inbound::http::state::{HttpState, HttpStateAdapters};
use scholar_portal::outbound::memory::InMemoryPortalStore;
use scholar_portal::outbound::persistence::{
    DieselAttendanceRepository, DieselCourseCatalogueRepository, DieselStudentRepository,
};
use scholar_portal::outbound::storage::CapStdProfileImageStore;

use super::ServerConfig;

struct Repositories {
    students: Arc<dyn StudentRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    catalogue: Arc<dyn CourseCatalogueRepository>,
}

fn build_repositories(config: &ServerConfig) -> Repositories {
    match &config.db_pool {
        Some(pool) => Repositories {
            students: Arc::new(DieselStudentRepository::new(pool.clone())),
            attendance: Arc::new(DieselAttendanceRepository::new(pool.clone())),
            catalogue: Arc::new(DieselCourseCatalogueRepository::new(pool.clone())),
        },
        None => {
            warn!("no database configured; records are kept in memory and lost on restart");
            let store = Arc::new(InMemoryPortalStore::with_catalogue(config.catalogue.clone()));
            Repositories {
                students: store.clone(),
                attendance: store.clone(),
                catalogue: store,
            }
        }
    }
}

/// Build the HTTP state over the configured adapters.
///
/// # Errors
/// Returns [`io::Error`] when the uploads directory cannot be created or
/// opened.
pub fn build_http_state(config: &ServerConfig) -> io::Result<HttpState> {
    let Repositories {
        students,
        attendance,
        catalogue,
    } = build_repositories(config);
    let images = CapStdProfileImageStore::open(&config.uploads_dir).map_err(|err| {
        io::Error::new(
            err.kind(),
            format!(
                "open uploads directory '{}': {err}",
                config.uploads_dir.display()
            ),
        )
    })?;
    Ok(HttpState::from_adapters(HttpStateAdapters {
        students,
        attendance,
        catalogue,
        images: Arc::new(images),
        clock: Arc::new(DefaultClock),
        email_policy: config.email_policy.clone(),
    }))
}
