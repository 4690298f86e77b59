//! HTTP inbound adapter exposing the portal's REST endpoints.

pub mod attendance;
pub mod courses;
pub mod error;
pub mod health;
pub mod profile_photo;
pub mod schemas;
pub mod state;
pub mod students;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

use actix_web::web;

/// Register the `/api` scope with its body extractor configuration.
///
/// Callers provide [`state::HttpState`] as app data.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use scholar_portal::inbound::http::configure_api;
///
/// let _app = App::new().configure(configure_api);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
            .app_data(profile_photo::multipart_config())
            .service(students::login)
            .service(students::register)
            .service(students::check_registration)
            .service(students::profile)
            .service(courses::get_courses)
            .service(attendance::get_attendance)
            .service(attendance::update_attendance)
            .service(profile_photo::upload_photo),
    );
}
