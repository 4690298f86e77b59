//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and remain testable without I/O.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AttendanceCommand, AttendanceQuery, AttendanceRepository, CourseCatalogueRepository,
    CourseQuery, LoginService, ProfileImageStore, ProfilePhotoCommand, RegistrationCommand,
    StudentProfileQuery, StudentRepository,
};
use crate::domain::{
    AttendanceService, CourseService, EmailPolicy, ProfilePhotoService, StudentAccountService,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub registration: Arc<dyn RegistrationCommand>,
    pub profile: Arc<dyn StudentProfileQuery>,
    pub attendance: Arc<dyn AttendanceCommand>,
    pub attendance_query: Arc<dyn AttendanceQuery>,
    pub courses: Arc<dyn CourseQuery>,
    pub profile_photos: Arc<dyn ProfilePhotoCommand>,
}

/// Driven adapters the domain services are built over.
#[derive(Clone)]
pub struct HttpStateAdapters {
    pub students: Arc<dyn StudentRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub catalogue: Arc<dyn CourseCatalogueRepository>,
    pub images: Arc<dyn ProfileImageStore>,
    pub clock: Arc<dyn Clock>,
    pub email_policy: EmailPolicy,
}

impl HttpState {
    /// Wire the domain services over `adapters`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use scholar_portal::domain::EmailPolicy;
    /// use scholar_portal::inbound::http::state::{HttpState, HttpStateAdapters};
    /// use scholar_portal::outbound::memory::InMemoryPortalStore;
    /// use scholar_portal::outbound::storage::CapStdProfileImageStore;
    ///
    /// let store = Arc::new(InMemoryPortalStore::default());
    /// let dir = std::env::temp_dir().join("scholar-portal-doc");
    /// let images = Arc::new(CapStdProfileImageStore::open(&dir).expect("uploads dir"));
    /// let _state = HttpState::from_adapters(HttpStateAdapters {
    ///     students: store.clone(),
    ///     attendance: store.clone(),
    ///     catalogue: store,
    ///     images,
    ///     clock: Arc::new(DefaultClock),
    ///     email_policy: EmailPolicy::default(),
    /// });
    /// ```
    #[must_use]
    pub fn from_adapters(adapters: HttpStateAdapters) -> Self {
        let HttpStateAdapters {
            students,
            attendance,
            catalogue,
            images,
            clock,
            email_policy,
        } = adapters;
        let accounts = Arc::new(StudentAccountService::new(
            Arc::clone(&students),
            email_policy,
        ));
        let attendance = Arc::new(AttendanceService::new(attendance));
        Self {
            login: accounts.clone(),
            registration: accounts.clone(),
            profile: accounts,
            attendance: attendance.clone(),
            attendance_query: attendance,
            courses: Arc::new(CourseService::new(catalogue)),
            profile_photos: Arc::new(ProfilePhotoService::new(students, images, clock)),
        }
    }
}
