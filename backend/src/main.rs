//! Backend entry-point: loads settings, picks the storage mode, and serves
//! the REST API, uploaded images, and OpenAPI docs.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use scholar_portal::config::PortalSettings;
use scholar_portal::inbound::http::health::HealthState;
use scholar_portal::legacy_import::{load_course_catalogue, read_json_file};
use scholar_portal::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = PortalSettings::load_from_iter(std::env::args_os())
        .map_err(|err| io::Error::other(format!("load settings: {err}")))?;
    let config = build_server_config(&settings).await?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;
    server.await
}

async fn build_server_config(settings: &PortalSettings) -> io::Result<ServerConfig> {
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidInput, err.to_string()))?;
    let config = ServerConfig::new(bind_addr, settings.uploads_dir())
        .with_static_dir(settings.static_dir.clone())
        .with_allowed_origin(settings.allowed_origin.clone())
        .with_email_policy(settings.email_policy());

    let Some(database_url) = settings.database_url() else {
        let catalogue = match settings.course_catalogue_path() {
            Some(path) => {
                let entries = load_course_catalogue(&read_json_file(path)?)
                    .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err.to_string()))?;
                info!(path = %path.display(), entries = entries.len(), "course catalogue loaded");
                entries
            }
            None => Vec::new(),
        };
        return Ok(config.with_catalogue(catalogue));
    };

    if let Some(path) = settings.course_catalogue_path() {
        warn!(
            path = %path.display(),
            "course catalogue file ignored with a database; load it with import-legacy"
        );
    }
    if settings.run_migrations {
        run_pending_migrations(database_url)
            .await
            .map_err(|err| io::Error::other(err.to_string()))?;
    } else {
        info!("skipping database migrations");
    }
    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .map_err(|err| io::Error::other(format!("create database pool: {err}")))?;
    Ok(config.with_db_pool(pool))
}
