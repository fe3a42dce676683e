//! Common library for the Revue application
//!
//! This crate provides shared functionality used by the Revue API service,
//! including database connectivity and error handling.

pub mod database;
pub mod error;
