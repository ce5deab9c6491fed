//! Core infrastructure: errors and deployment configuration.

pub mod config;
pub mod errors;
