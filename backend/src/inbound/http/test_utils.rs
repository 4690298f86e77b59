//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::{
    MockAttendanceCommand, MockAttendanceQuery, MockCourseQuery, MockLoginService,
    MockProfilePhotoCommand, MockRegistrationCommand, MockStudentProfileQuery,
};
use crate::inbound::http::configure_api;
use crate::inbound::http::state::HttpState;

/// One mock per driving port. Unconfigured mocks panic when called.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub registration: MockRegistrationCommand,
    pub profile: MockStudentProfileQuery,
    pub attendance: MockAttendanceCommand,
    pub attendance_query: MockAttendanceQuery,
    pub courses: MockCourseQuery,
    pub profile_photos: MockProfilePhotoCommand,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState {
            login: Arc::new(self.login),
            registration: Arc::new(self.registration),
            profile: Arc::new(self.profile),
            attendance: Arc::new(self.attendance),
            attendance_query: Arc::new(self.attendance_query),
            courses: Arc::new(self.courses),
            profile_photos: Arc::new(self.profile_photos),
        }
    }
}

/// App with the full `/api` scope over `ports`.
pub fn test_app(
    ports: MockPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .configure(configure_api)
}
