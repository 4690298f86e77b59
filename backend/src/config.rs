//! Server settings loaded via OrthoConfig.
//!
//! Values come from `PORTAL_*` environment variables, an optional config
//! file and command-line flags. Everything except the database URL has a
//! default so the server starts with no configuration at all.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{DEFAULT_INSTITUTION_DOMAIN, EmailPolicy};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_UPLOADS_DIR: &str = "uploads/profile-images";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;

/// Errors interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// `bind_addr` is not a socket address.
    #[error("invalid bind address {value:?}: {source}")]
    BindAddr {
        /// Offending value.
        value: String,
        /// Parse failure.
        source: std::net::AddrParseError,
    },
}

/// Portal server configuration.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// PostgreSQL URL. Without it the server keeps data in memory.
    pub database_url: Option<String>,
    /// Apply embedded migrations at startup.
    #[ortho_config(default = false)]
    pub run_migrations: bool,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Directory profile images are written to and served from.
    pub uploads_dir: Option<PathBuf>,
    /// Optional directory holding the built frontend.
    pub static_dir: Option<PathBuf>,
    /// JSON course catalogue loaded into the in-memory store.
    pub course_catalogue_path: Option<PathBuf>,
    /// Domain fragment registration emails must contain.
    pub institution_domain: Option<String>,
    /// Browser origin allowed by CORS; any origin when unset.
    pub allowed_origin: Option<String>,
}

impl PortalSettings {
    /// Listen address, falling back to `0.0.0.0:5000`.
    ///
    /// # Errors
    /// [`SettingsError::BindAddr`] when the configured value does not parse.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Database URL when one is configured and non-blank.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Pool size, falling back to ten.
    #[must_use]
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Uploads directory, falling back to `uploads/profile-images`.
    #[must_use]
    pub fn uploads_dir(&self) -> PathBuf {
        self.uploads_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_UPLOADS_DIR))
    }

    /// Catalogue seeded into the in-memory store, if any.
    #[must_use]
    pub fn course_catalogue_path(&self) -> Option<&Path> {
        self.course_catalogue_path.as_deref()
    }

    /// Registration email policy.
    #[must_use]
    pub fn email_policy(&self) -> EmailPolicy {
        EmailPolicy::new(
            self.institution_domain
                .as_deref()
                .unwrap_or(DEFAULT_INSTITUTION_DOMAIN),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 9] = [
        "PORTAL_BIND_ADDR",
        "PORTAL_DATABASE_URL",
        "PORTAL_RUN_MIGRATIONS",
        "PORTAL_POOL_MAX_SIZE",
        "PORTAL_UPLOADS_DIR",
        "PORTAL_STATIC_DIR",
        "PORTAL_COURSE_CATALOGUE_PATH",
        "PORTAL_INSTITUTION_DOMAIN",
        "PORTAL_ALLOWED_ORIGIN",
    ];

    fn load() -> PortalSettings {
        PortalSettings::load_from_iter([OsString::from("scholar-portal")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_without_configuration() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("default parses"),
            "0.0.0.0:5000".parse::<SocketAddr>().expect("literal parses")
        );
        assert!(settings.database_url().is_none());
        assert!(!settings.run_migrations);
        assert_eq!(settings.pool_max_size(), 10);
        assert_eq!(settings.uploads_dir(), PathBuf::from("uploads/profile-images"));
        assert!(settings.course_catalogue_path().is_none());
        assert_eq!(settings.email_policy(), EmailPolicy::default());
        assert!(settings.allowed_origin.is_none());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("PORTAL_BIND_ADDR", Some("127.0.0.1:8080".to_owned())),
            ("PORTAL_DATABASE_URL", Some("postgres://localhost/portal".to_owned())),
            ("PORTAL_RUN_MIGRATIONS", Some("true".to_owned())),
            ("PORTAL_POOL_MAX_SIZE", Some("3".to_owned())),
            ("PORTAL_UPLOADS_DIR", Some("/srv/uploads".to_owned())),
            ("PORTAL_STATIC_DIR", None),
            ("PORTAL_COURSE_CATALOGUE_PATH", Some("/srv/catalogue.json".to_owned())),
            ("PORTAL_INSTITUTION_DOMAIN", Some("example.edu".to_owned())),
            ("PORTAL_ALLOWED_ORIGIN", Some("https://portal.example.edu".to_owned())),
        ]);

        let settings = load();
        assert_eq!(
            settings.bind_addr().expect("parses").to_string(),
            "127.0.0.1:8080"
        );
        assert_eq!(settings.database_url(), Some("postgres://localhost/portal"));
        assert!(settings.run_migrations);
        assert_eq!(settings.pool_max_size(), 3);
        assert_eq!(settings.uploads_dir(), PathBuf::from("/srv/uploads"));
        assert_eq!(
            settings.course_catalogue_path(),
            Some(Path::new("/srv/catalogue.json"))
        );
        assert_eq!(settings.email_policy().domain(), "example.edu");
        assert_eq!(
            settings.allowed_origin.as_deref(),
            Some("https://portal.example.edu")
        );
    }

    #[rstest]
    fn invalid_bind_address_is_reported() {
        let _guard = lock_env([("PORTAL_BIND_ADDR", Some("not an address".to_owned()))]);
        let err = load().bind_addr().expect_err("invalid address");
        assert!(err.to_string().contains("not an address"));
    }

    #[rstest]
    fn blank_database_url_means_in_memory() {
        let _guard = lock_env([("PORTAL_DATABASE_URL", Some("   ".to_owned()))]);
        assert!(load().database_url().is_none());
    }
}
