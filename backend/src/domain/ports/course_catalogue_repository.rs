//! Driven port for the course catalogue.

use async_trait::async_trait;

use crate::domain::CourseCatalogueEntry;

use super::define_port_error;

define_port_error! {
    /// Errors raised by course catalogue adapters.
    pub enum CourseCataloguePersistenceError {
        /// The store could not be reached.
        Connection as connection => "course catalogue connection failed: {message}",
        /// A query or mutation failed.
        Query as query => "course catalogue query failed: {message}",
    }
}

/// Port for reading and seeding catalogue entries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CourseCatalogueRepository: Send + Sync {
    /// Every entry for `branch_short`, ordered by semester.
    async fn entries_for_branch(
        &self,
        branch_short: &str,
    ) -> Result<Vec<CourseCatalogueEntry>, CourseCataloguePersistenceError>;

    /// Replace the entry for the same branch and semester.
    async fn replace_entry(
        &self,
        entry: &CourseCatalogueEntry,
    ) -> Result<(), CourseCataloguePersistenceError>;
}
