//! Scholar portal backend.
//!
//! Students log in with their institute scholar identifier, register an
//! email and display name, and read their courses and attendance. The crate
//! follows a hexagonal layout: [`domain`] holds the business rules and port
//! traits, [`inbound`] adapts HTTP requests onto driving ports, and
//! [`outbound`] implements the driven ports over PostgreSQL, memory, and the
//! local filesystem.

pub mod config;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod legacy_import;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
