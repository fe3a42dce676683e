//! Revue API service library
//!
//! The binary in `main.rs` wires configuration, the database pool, and the
//! router together; everything else lives here so integration tests can
//! exercise the repositories and handlers directly.

pub mod error;
pub mod jwt;
pub mod mailer;
pub mod middleware;
pub mod models;
pub mod permissions;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod validation;
