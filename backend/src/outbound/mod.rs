//! Outbound adapters implementing the driven ports.
//!
//! - `persistence`: PostgreSQL repositories.
//! - `memory`: a process-local store for development and tests.
//! - `storage`: profile images on the local filesystem.

pub mod memory;
pub mod persistence;
pub mod storage;
