//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::path::PathBuf;

use scholar_portal::domain::{CourseCatalogueEntry, EmailPolicy};
use scholar_portal::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) uploads_dir: PathBuf,
    pub(crate) static_dir: Option<PathBuf>,
    pub(crate) allowed_origin: Option<String>,
    pub(crate) catalogue: Vec<CourseCatalogueEntry>,
    pub(crate) email_policy: EmailPolicy,
}

impl ServerConfig {
    /// Configuration listening on `bind_addr` and storing uploads in
    /// `uploads_dir`, with the in-memory store and an empty catalogue.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, uploads_dir: PathBuf) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            uploads_dir,
            static_dir: None,
            allowed_origin: None,
            catalogue: Vec::new(),
            email_policy: EmailPolicy::default(),
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one the server keeps all records in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Serve frontend assets from `dir` at `/`.
    #[must_use]
    pub fn with_static_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.static_dir = dir;
        self
    }

    /// Restrict CORS to a single origin. `None` allows any origin.
    #[must_use]
    pub fn with_allowed_origin(mut self, origin: Option<String>) -> Self {
        self.allowed_origin = origin;
        self
    }

    /// Seed the in-memory store with a course catalogue.
    #[must_use]
    pub fn with_catalogue(mut self, catalogue: Vec<CourseCatalogueEntry>) -> Self {
        self.catalogue = catalogue;
        self
    }

    /// Registration email policy.
    #[must_use]
    pub fn with_email_policy(mut self, policy: EmailPolicy) -> Self {
        self.email_policy = policy;
        self
    }

    /// Whether records are persisted in PostgreSQL.
    #[must_use]
    pub fn uses_database(&self) -> bool {
        self.db_pool.is_some()
    }
}
