//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use std::path::PathBuf;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use scholar_portal::Trace;
#[cfg(debug_assertions)]
use scholar_portal::doc::ApiDoc;
use scholar_portal::domain::PROFILE_IMAGE_ROUTE;
use scholar_portal::inbound::http::configure_api;
use scholar_portal::inbound::http::health::{HealthState, live, ready, status};
use scholar_portal::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

const CORS_MAX_AGE_SECS: usize = 3600;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    uploads_dir: PathBuf,
    static_dir: Option<PathBuf>,
    allowed_origin: Option<String>,
}

fn build_cors(allowed_origin: Option<&str>) -> Cors {
    let cors = match allowed_origin {
        Some(origin) => Cors::default().allowed_origin(origin),
        None => Cors::default().allow_any_origin(),
    };
    cors.allow_any_method()
        .allow_any_header()
        .expose_headers(["trace-id"])
        .max_age(CORS_MAX_AGE_SECS)
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody + 'static>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        uploads_dir,
        static_dir,
        allowed_origin,
    } = deps;

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .wrap(build_cors(allowed_origin.as_deref()))
        .service(status)
        .service(ready)
        .service(live)
        .configure(configure_api)
        .service(Files::new(PROFILE_IMAGE_ROUTE, uploads_dir));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // Registered last: the catch-all mount would otherwise shadow the API.
    match static_dir {
        Some(dir) => app.service(Files::new("/", dir).index_file("index.html")),
        None => app,
    }
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] with the bind address, storage, and CORS settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when opening the uploads directory, binding
/// the socket, or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config)?);
    info!(
        storage = if config.uses_database() { "postgres" } else { "memory" },
        bind_addr = %config.bind_addr,
        "starting HTTP server"
    );
    let ServerConfig {
        bind_addr,
        db_pool: _,
        uploads_dir,
        static_dir,
        allowed_origin,
        catalogue: _,
        email_policy: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            uploads_dir: uploads_dir.clone(),
            static_dir: static_dir.clone(),
            allowed_origin: allowed_origin.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
